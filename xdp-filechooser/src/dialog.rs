use std::future::Future;

use url::Url;

use crate::choices::ChoicePanel;
use crate::core::{DialogMode, SaveTarget};
use crate::parent::ParentWindow;

/// Everything a dialog needs to know before it is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogConfig {
    /// Window title
    pub title: String,
    /// Block input to the parent window
    pub modal: bool,
    /// Selection mode
    pub mode: DialogMode,
    /// Accept button text in `&`-mnemonic syntax (None = toolkit default)
    pub accept_label: Option<String>,
    /// Starting folder (None = toolkit default)
    pub directory: Option<Url>,
    /// Preselected file for save dialogs
    pub save_target: Option<SaveTarget>,
    /// Filter selector labels, in display order
    pub name_filters: Vec<String>,
    /// Filter label to preselect
    pub selected_name_filter: Option<String>,
}

impl DialogConfig {
    /// Config with the given title and mode and everything else unset.
    pub fn new(title: impl Into<String>, mode: DialogMode) -> Self {
        Self {
            title: title.into(),
            modal: true,
            mode,
            accept_label: None,
            directory: None,
            save_target: None,
            name_filters: Vec::new(),
            selected_name_filter: None,
        }
    }
}

/// Terminal state of a dialog run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The user confirmed the selection
    Accepted,
    /// The user dismissed the dialog
    Rejected,
}

/// Native file dialog capability.
///
/// One instance serves one request. The session calls, in order:
/// [`directory`](Self::directory) (optional, to resolve save names),
/// [`supports_choices`](Self::supports_choices), [`configure`](Self::configure),
/// [`set_parent`](Self::set_parent) (only for a recognized parent token),
/// [`run`](Self::run), then the query methods.
pub trait FileDialog {
    /// Apply the request configuration.
    fn configure(&mut self, config: DialogConfig);

    /// Make the dialog transient for a foreign window.
    fn set_parent(&mut self, parent: &ParentWindow);

    /// Whether the toolkit can host a [`ChoicePanel`].
    fn supports_choices(&self) -> bool {
        false
    }

    /// Show the dialog and wait until the user accepts or cancels.
    ///
    /// `choices` is only passed when [`supports_choices`](Self::supports_choices)
    /// returned `true`; the dialog renders it and writes user input into it.
    fn run(
        &mut self,
        choices: Option<&mut ChoicePanel>,
    ) -> impl Future<Output = DialogOutcome> + Send;

    /// Selected locations after an accepted run.
    fn selected_files(&self) -> Vec<Url>;

    /// Label of the filter active when the dialog closed.
    fn active_filter(&self) -> Option<String>;

    /// Current folder: the toolkit default before [`run`](Self::run), the
    /// folder the user ended up in afterwards.
    fn directory(&self) -> Option<Url>;
}

/// Factory producing one [`FileDialog`] per request.
pub trait DialogBackend {
    /// Dialog type produced by this backend.
    type Dialog: FileDialog;

    /// Create a fresh, unconfigured dialog.
    fn create_dialog(&self) -> Self::Dialog;
}
