use std::collections::HashMap;

use url::Url;

/// Last folder visited per caller window.
///
/// Keyed by the raw `parent_window` token. Lives as long as the portal that
/// owns it and is never persisted.
#[derive(Clone, Debug, Default)]
pub struct LastVisitedDirs {
    dirs: HashMap<String, Url>,
}

impl LastVisitedDirs {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder recorded for `parent_window`.
    pub fn get(&self, parent_window: &str) -> Option<&Url> {
        self.dirs.get(parent_window)
    }

    /// Record the folder a session for `parent_window` ended in.
    pub fn record(&mut self, parent_window: &str, dir: Url) {
        self.dirs.insert(parent_window.to_owned(), dir);
    }

    /// Number of windows with a recorded folder.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
