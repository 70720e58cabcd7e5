use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::domain::DashError;

/// Load/save boundary for a piece of persisted state.
pub trait Persistence<S> {
    fn load(&self) -> Result<Option<S>, DashError>;
    fn save(&self, snapshot: &S) -> Result<(), DashError>;
}

/// Persists state as pretty printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// `~` and environment variables in `path` are expanded.
    pub fn new(path: impl AsRef<str>) -> Self {
        let expanded = shellexpand::full(path.as_ref())
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| path.as_ref().to_string());
        Self {
            path: PathBuf::from(expanded),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // `settings.json` -> `settings.json.<suffix>`
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }
}

impl<S: Serialize + DeserializeOwned> Persistence<S> for JsonFileStore {
    fn load(&self) -> Result<Option<S>, DashError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state at {:?}, starting fresh", self.path);
                return Ok(None);
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(DashError::PermissionDenied);
            }
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(snapshot) => {
                debug!("Loaded state from {:?}", self.path);
                Ok(Some(snapshot))
            }
            // Unreadable state is moved aside and the store starts over
            Err(e) => {
                let backup = self.sibling("corrupt");
                warn!("Cannot parse {:?} ({e}), moving it to {:?}", self.path, backup);
                fs::rename(&self.path, &backup)?;
                Ok(None)
            }
        }
    }

    fn save(&self, snapshot: &S) -> Result<(), DashError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;

        // Write a sibling file first, the rename replaces the target atomically
        let tmp_path = self.sibling("tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &self.path)?;

        debug!("Saved state to {:?}", self.path);
        Ok(())
    }
}

/// Keeps the last saved snapshot in memory. Nothing survives the process.
#[derive(Debug)]
pub struct MemoryStore<S> {
    saved: Mutex<Option<S>>,
}

impl<S> MemoryStore<S> {
    pub fn new(initial: Option<S>) -> Self {
        Self {
            saved: Mutex::new(initial),
        }
    }
}

impl<S> Default for MemoryStore<S> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<S: Clone> Persistence<S> for MemoryStore<S> {
    fn load(&self) -> Result<Option<S>, DashError> {
        let saved = self.saved.lock().unwrap_or_else(|e| e.into_inner());
        Ok((*saved).clone())
    }

    fn save(&self, snapshot: &S) -> Result<(), DashError> {
        let mut saved = self.saved.lock().unwrap_or_else(|e| e.into_inner());
        *saved = Some(snapshot.clone());
        Ok(())
    }
}

impl<S, P: Persistence<S> + ?Sized> Persistence<S> for Box<P> {
    fn load(&self) -> Result<Option<S>, DashError> {
        (**self).load()
    }

    fn save(&self, snapshot: &S) -> Result<(), DashError> {
        (**self).save(snapshot)
    }
}

/// State object with its persistence adapter: loaded on open, saved after
/// every successful mutation.
pub struct Store<S, P> {
    state: S,
    adapter: P,
}

impl<S: Default + Clone, P: Persistence<S>> Store<S, P> {
    pub fn open(adapter: P) -> Result<Self, DashError> {
        let state = adapter.load()?.unwrap_or_default();
        Ok(Self { state, adapter })
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Runs `f` on a copy of the state. The copy replaces the state and is
    /// saved only when `f` succeeds, so a failed mutation changes nothing.
    pub fn update<T>(
        &mut self,
        f: impl FnOnce(&mut S) -> Result<T, DashError>,
    ) -> Result<T, DashError> {
        let mut next = self.state.clone();
        let out = f(&mut next)?;
        self.adapter.save(&next)?;
        self.state = next;
        info!("State updated and saved");
        Ok(out)
    }
}
