use std::fmt;
use std::io::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use tracing_error::SpanTrace;

use crate::session::MIN_PASSWORD_LEN;
use crate::settings::NotificationKind;

#[derive(Debug)]
pub enum DashError {
    IoError(Error),
    PolarsError(PolarsError),
    JsonError(serde_json::Error),
    LoadingFailed(String, SpanTrace),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    InvalidEmail(String),
    DuplicateMember(String),
    UnknownMember(String),
    OwnerRemoval,
    UnknownPlan(String),
    InvalidName,
    NotSignedIn,
    ShortPassword,
}

impl DashError {
    /// Loading errors keep the span they were raised in.
    pub fn loading(reason: impl Into<String>) -> Self {
        DashError::LoadingFailed(reason.into(), SpanTrace::capture())
    }
}

impl fmt::Display for DashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashError::IoError(e) => write!(f, "I/O error: {e}"),
            DashError::PolarsError(e) => write!(f, "Could not read data: {e}"),
            DashError::JsonError(e) => write!(f, "Corrupt state file: {e}"),
            DashError::LoadingFailed(reason, trace) => write!(f, "Loading failed: {reason}\n{trace}"),
            DashError::FileNotFound => write!(f, "File not found"),
            DashError::PermissionDenied => write!(f, "Permission denied"),
            DashError::UnknownFileType => write!(f, "Unknown file type"),
            DashError::InvalidEmail(email) => write!(f, "Invalid email address {email:?}"),
            DashError::DuplicateMember(email) => write!(f, "{email} is already on the team"),
            DashError::UnknownMember(id) => write!(f, "No team member with id {id}"),
            DashError::OwnerRemoval => write!(f, "The owner cannot be removed"),
            DashError::UnknownPlan(name) => write!(f, "Unknown plan {name:?}"),
            DashError::InvalidName => write!(f, "Name must not be empty"),
            DashError::NotSignedIn => write!(f, "Not signed in"),
            DashError::ShortPassword => write!(f, "Password must be at least {MIN_PASSWORD_LEN} characters"),
        }
    }
}

impl From<Error> for DashError {
    fn from(err: Error) -> Self {
        DashError::IoError(err)
    }
}

impl From<PolarsError> for DashError {
    fn from(err: PolarsError) -> Self {
        DashError::PolarsError(err)
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        DashError::JsonError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct DashConfig {
    pub event_poll_time: u64,
    pub page_size: NonZeroUsize,
    pub data_path: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub email: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            page_size: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            data_path: None,
            state_dir: None,
            email: "demo@example.com".to_string(),
        }
    }
}

/// What a prompt line is collecting input for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromptMode {
    Search,
    Invite,
    Profile,
    Card,
    LoginEmail,
    LoginPassword,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Help,
    Exit,
    NextTab,
    MoveUp,
    MoveDown,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    SortColumn(usize),
    Search,
    Invite,
    RemoveMember,
    ToggleNotification(NotificationKind),
    CyclePlan,
    EditCard,
    EditProfile,
    Logout,
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Navigation
  Tab        switch between Overview, Users, Team and Settings
  Up/Down    move the row cursor
  Left/p     previous page
  Right/n    next page
  g / G      first / last page

Table
  /          search (live, Enter keeps it, Esc clears it)
  1-9        sort by column, again to flip direction

Team & Settings
  i          invite a member by email
  x          remove the selected member
  e / m / s  toggle email, marketing, security notifications
  P          switch to the next plan
  c          new card as `number, MM/YY`
  r          rename your profile
  L          sign out

  ?          this help, Esc closes it
  q          quit";
