use std::fmt;
use std::sync::Arc;

use crate::record::Record;

pub type RenderFn = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// Describes how one attribute is labeled, sorted and optionally rendered.
///
/// Sorting and searching always read the raw attribute under `key`; a render
/// function only changes what ends up in the cell.
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub label: String,
    pub key: String,
    render: Option<RenderFn>,
}

impl ColumnDescriptor {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            render: None,
        }
    }

    pub fn with_render(mut self, render: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn cell(&self, record: &Record) -> String {
        match &self.render {
            Some(render) => render(record),
            None => record
                .get(&self.key)
                .map(|v| v.as_text().into_owned())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("label", &self.label)
            .field("key", &self.key)
            .field("render", &self.render.is_some())
            .finish()
    }
}
