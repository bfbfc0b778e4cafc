//! Dialog session state machine.
//!
//! ```text
//! Configuring ──run()──▶ Running ──▶ Accepted ─┬─▶ status 0
//!                                              └─▶ status 2 (open, nothing selected)
//!                                 └─▶ Rejected ──▶ status 1
//! ```
//!
//! A session serves exactly one request and is consumed by
//! [`DialogSession::execute`].

use url::Url;

use crate::choices::ChoicePanel;
use crate::core::{
    RequestDescriptor, RequestKind, ResponseDescriptor, ResponseStatus, SaveTarget,
};
use crate::dialog::{DialogConfig, DialogOutcome, FileDialog};
use crate::memory::LastVisitedDirs;
use crate::parent::ParentWindow;

/// Where a session currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionState {
    /// Dialog is being set up from the request
    Configuring,
    /// Dialog is shown, waiting for the user
    Running,
    /// User accepted
    Accepted,
    /// User cancelled
    Rejected,
}

/// One request being served by one dialog.
#[derive(Debug)]
pub struct DialogSession<D> {
    dialog: D,
    request: RequestDescriptor,
    title: String,
    parent_window: String,
    panel: Option<ChoicePanel>,
    state: SessionState,
}

impl<D: FileDialog> DialogSession<D> {
    /// Create a session for `request`, shown with `title` on behalf of the
    /// window identified by `parent_window`.
    pub fn new(
        dialog: D,
        request: RequestDescriptor,
        title: impl Into<String>,
        parent_window: impl Into<String>,
    ) -> Self {
        Self {
            dialog,
            request,
            title: title.into(),
            parent_window: parent_window.into(),
            panel: None,
            state: SessionState::Configuring,
        }
    }

    /// Configure, run and finish the session.
    ///
    /// `memory` seeds the starting folder and records the final folder on
    /// success.
    pub async fn execute(mut self, memory: &mut LastVisitedDirs) -> ResponseDescriptor {
        self.configure(memory);
        let outcome = self.run().await;
        self.finish(outcome, memory)
    }

    fn configure(&mut self, memory: &LastVisitedDirs) {
        debug_assert_eq!(self.state, SessionState::Configuring);
        let req = &self.request;

        let mut config = DialogConfig::new(self.title.clone(), req.mode());
        config.modal = req.modal;
        if !req.accept_label.is_empty() {
            config.accept_label = Some(req.accept_label.clone());
        }
        config.directory = req
            .current_folder
            .clone()
            .or_else(|| memory.get(&self.parent_window).cloned());

        if req.kind == RequestKind::Save {
            config.save_target = match (&req.current_file, &req.current_name) {
                (Some(file), _) => Some(SaveTarget::File(file.clone())),
                (None, Some(name)) => {
                    let base = config.directory.clone().or_else(|| self.dialog.directory());
                    Some(
                        match base.as_ref().and_then(|dir| resolve_save_name(dir, name)) {
                            Some(file) => SaveTarget::File(file),
                            None => SaveTarget::Name(name.clone()),
                        },
                    )
                }
                (None, None) => None,
            };
        }

        if !req.name_filters.is_empty() {
            config.name_filters = req.name_filters.labels().to_vec();
            config.selected_name_filter = req.name_filters.selected().map(str::to_owned);
        }

        self.panel = ChoicePanel::project(&req.choices);
        if self.panel.is_some() && !self.dialog.supports_choices() {
            portal_debug!("dialog cannot host choice controls; choices are not reported");
            self.panel = None;
        }

        portal_trace!(?config, "configuring dialog");
        self.dialog.configure(config);
    }

    async fn run(&mut self) -> DialogOutcome {
        match ParentWindow::parse(&self.parent_window) {
            Some(parent) => self.dialog.set_parent(&parent),
            None => {
                portal_trace!(parent_window = %self.parent_window, "no usable parent window");
            }
        }
        self.state = SessionState::Running;
        let outcome = self.dialog.run(self.panel.as_mut()).await;
        self.state = match outcome {
            DialogOutcome::Accepted => SessionState::Accepted,
            DialogOutcome::Rejected => SessionState::Rejected,
        };
        outcome
    }

    fn finish(self, outcome: DialogOutcome, memory: &mut LastVisitedDirs) -> ResponseDescriptor {
        if outcome == DialogOutcome::Rejected {
            return ResponseDescriptor::cancelled();
        }

        let mut uris = self.dialog.selected_files();
        match self.request.kind {
            RequestKind::Open if uris.is_empty() => {
                portal_debug!("dialog accepted without a selected file");
                return ResponseDescriptor::status_only(ResponseStatus::NoSelection);
            }
            RequestKind::Open => {}
            RequestKind::Save => uris.truncate(1),
        }

        let current_filter = self
            .dialog
            .active_filter()
            .and_then(|label| self.request.name_filters.group_for(&label).cloned());
        let choices = self.panel.as_ref().map(ChoicePanel::collapse);

        if let Some(dir) = self.dialog.directory() {
            memory.record(&self.parent_window, dir);
        }

        ResponseDescriptor {
            status: ResponseStatus::Success,
            uris,
            writable: (self.request.kind == RequestKind::Open).then_some(true),
            choices,
            current_filter,
        }
    }
}

/// Resolve a bare save name inside `dir`.
///
/// The folder's last path segment is kept as a path component whether or not
/// the URL carries a trailing slash, so `file:///home/u/docs` plus
/// `report.txt` gives `file:///home/u/docs/report.txt`. A relative name such
/// as `sub/x.txt` descends into `dir`. Returns `None` for names that would
/// escape `dir` (`..`) or that name no file at all.
pub fn resolve_save_name(dir: &Url, name: &str) -> Option<Url> {
    let parts: Vec<&str> = name
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    if parts.is_empty() || parts.contains(&"..") {
        return None;
    }
    let mut file = dir.clone();
    {
        let mut segments = file.path_segments_mut().ok()?;
        segments.pop_if_empty().extend(parts);
    }
    Some(file)
}
