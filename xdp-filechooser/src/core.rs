use thiserror::Error;
use url::Url;

use crate::codec::CodecError;

/// Which of the two portal operations a request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// `OpenFile`: pick one or more existing files or a folder.
    Open,
    /// `SaveFile`: pick a single file location to write.
    Save,
}

/// File-selection mode handed to the dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogMode {
    /// Pick a single existing file
    OpenFile,
    /// Pick multiple existing files
    OpenFiles,
    /// Pick a directory
    PickFolder,
    /// Any file name, save accept mode
    SaveFile,
}

impl DialogMode {
    /// Derive the mode for a request.
    ///
    /// `directory` wins over `multiple` for open requests; both flags are
    /// meaningless for save requests.
    pub fn for_request(kind: RequestKind, multiple: bool, directory: bool) -> Self {
        match kind {
            RequestKind::Save => DialogMode::SaveFile,
            RequestKind::Open if directory => DialogMode::PickFolder,
            RequestKind::Open if multiple => DialogMode::OpenFiles,
            RequestKind::Open => DialogMode::OpenFile,
        }
    }
}

/// How a [`Filter`] pattern is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Shell glob such as `*.png` (wire value `0`).
    Glob,
    /// MIME type such as `image/png`, expanded to globs (wire value `1`).
    MimeType,
}

impl FilterKind {
    /// Wire discriminant.
    pub fn as_u32(self) -> u32 {
        match self {
            FilterKind::Glob => 0,
            FilterKind::MimeType => 1,
        }
    }

    /// Map a wire discriminant back to a kind.
    ///
    /// Any non-zero value is treated as a MIME type.
    pub fn from_u32(value: u32) -> Self {
        if value == 0 {
            FilterKind::Glob
        } else {
            FilterKind::MimeType
        }
    }
}

/// One pattern inside a [`FilterGroup`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Filter {
    /// Pattern interpretation
    pub kind: FilterKind,
    /// Glob or MIME type string
    pub pattern: String,
}

impl Filter {
    /// Glob pattern filter.
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::Glob,
            pattern: pattern.into(),
        }
    }

    /// MIME type filter.
    pub fn mime(mime: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::MimeType,
            pattern: mime.into(),
        }
    }
}

/// A named set of filters shown as one entry of the dialog's filter selector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterGroup {
    /// User-visible name (e.g. "Images")
    pub name: String,
    /// Filters in caller order
    pub filters: Vec<Filter>,
}

impl FilterGroup {
    /// Create a group from a name and its filters.
    pub fn new(name: impl Into<String>, filters: impl Into<Vec<Filter>>) -> Self {
        Self {
            name: name.into(),
            filters: filters.into(),
        }
    }
}

/// One entry of an enumerated [`ChoiceDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceOption {
    /// Data tag reported back when this entry is selected
    pub value: String,
    /// Display text
    pub label: String,
}

impl ChoiceOption {
    /// Create an entry.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Caller-supplied control embedded in the dialog.
///
/// An empty `options` list makes this a boolean toggle whose values are the
/// literal strings `"true"` / `"false"`; otherwise it is a single-select
/// enumeration over `options`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceDescriptor {
    /// Identifier echoed back in the results
    pub id: String,
    /// Control label
    pub label: String,
    /// Enumeration entries (empty = boolean)
    pub options: Vec<ChoiceOption>,
    /// Initially selected entry value, or `"true"` for a checked toggle
    pub initial: String,
}

impl ChoiceDescriptor {
    /// Boolean toggle.
    pub fn toggle(id: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options: Vec::new(),
            initial: if checked { "true" } else { "false" }.to_owned(),
        }
    }

    /// Single-select enumeration.
    pub fn select(
        id: impl Into<String>,
        label: impl Into<String>,
        options: impl Into<Vec<ChoiceOption>>,
        initial: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options: options.into(),
            initial: initial.into(),
        }
    }

    /// Whether this descriptor denotes a boolean toggle.
    pub fn is_toggle(&self) -> bool {
        self.options.is_empty()
    }
}

/// Final state of one control, as reported in the `choices` result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedChoice {
    /// Control identifier
    pub id: String,
    /// `"true"`/`"false"` for toggles, entry value for enumerations
    pub value: String,
}

impl SelectedChoice {
    /// Create a selected choice.
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Normalized form of the untyped option bag.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    /// Operation this request belongs to
    pub kind: RequestKind,
    /// Dialog modality (default `true`)
    pub modal: bool,
    /// Allow several files (open only, default `false`)
    pub multiple: bool,
    /// Select folders instead of files (open only, default `false`)
    pub directory: bool,
    /// Explicit starting folder
    pub current_folder: Option<Url>,
    /// Suggested file name (save only)
    pub current_name: Option<String>,
    /// File to preselect (save only)
    pub current_file: Option<Url>,
    /// Accept button label, already translated to `&` mnemonics
    pub accept_label: String,
    /// Rendered name filters and their originating groups
    pub name_filters: crate::normalize::NameFilters,
    /// Caller-supplied controls
    pub choices: Vec<ChoiceDescriptor>,
}

impl RequestDescriptor {
    /// A request with every field at its documented default.
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            modal: true,
            multiple: false,
            directory: false,
            current_folder: None,
            current_name: None,
            current_file: None,
            accept_label: String::new(),
            name_filters: Default::default(),
            choices: Vec::new(),
        }
    }

    /// Dialog mode implied by the request flags.
    pub fn mode(&self) -> DialogMode {
        DialogMode::for_request(self.kind, self.multiple, self.directory)
    }
}

/// Numeric status returned as the primary result of a portal call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseStatus {
    /// The user accepted and at least one location was produced.
    Success,
    /// The user dismissed the dialog.
    Cancelled,
    /// The user accepted but nothing was selected.
    NoSelection,
}

impl ResponseStatus {
    /// Wire value (`0`, `1` or `2`).
    pub fn code(self) -> u32 {
        match self {
            ResponseStatus::Success => 0,
            ResponseStatus::Cancelled => 1,
            ResponseStatus::NoSelection => 2,
        }
    }
}

/// Outcome of a dialog session, ready to be encoded into the result bag.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseDescriptor {
    /// Primary status
    pub status: ResponseStatus,
    /// Selected locations
    pub uris: Vec<Url>,
    /// `Some(true)` for successful open requests, `None` otherwise
    pub writable: Option<bool>,
    /// Final control states, present when an options panel was mounted
    pub choices: Option<Vec<SelectedChoice>>,
    /// Group matching the filter active at accept time
    pub current_filter: Option<FilterGroup>,
}

impl ResponseDescriptor {
    /// Response with only a status and no result fields.
    pub fn status_only(status: ResponseStatus) -> Self {
        Self {
            status,
            uris: Vec::new(),
            writable: None,
            choices: None,
            current_filter: None,
        }
    }

    /// Response for a dismissed dialog.
    pub fn cancelled() -> Self {
        Self::status_only(ResponseStatus::Cancelled)
    }
}

/// File preselection handed to a save dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveTarget {
    /// Fully resolved file location
    File(Url),
    /// Bare name, used when no starting folder is known
    Name(String),
}

/// Errors produced while serving a portal call.
///
/// Malformed options never produce these; they only surface when the result
/// bag cannot be built.
#[derive(Error, Debug)]
pub enum FileChooserError {
    /// Wire structure had an unexpected shape
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}
