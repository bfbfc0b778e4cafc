#![deny(missing_docs)]
//! Request-to-dialog mapping core for an `org.freedesktop.impl.portal.FileChooser`
//! backend.
//!
//! Sandboxed applications ask the portal frontend to open or save a file; the
//! frontend forwards the request to a backend over the session bus with an
//! untyped `a{sv}` option bag. This crate turns that bag into a normalized
//! request, drives a native dialog through the [`FileDialog`] capability and
//! projects the outcome back into the strictly-typed result bag.
//!
//! Pieces, leaves first:
//! - [`codec`]: explicit encode/decode of the wire structures
//!   (filters, filter groups, choices, options).
//! - [`choices`]: projects caller-supplied options into stateful controls and
//!   collapses them back into selected choices.
//! - [`normalize`]: validates the option bag into a [`RequestDescriptor`].
//! - [`session`]: the dialog state machine for a single request.
//! - [`FileChooserPortal`]: owns the per-caller directory memory and serves
//!   `OpenFile` / `SaveFile`.
//!
//! The bus transport and the dialog toolkit are external collaborators; see
//! the `xdp-filechooser-daemon` and `xdp-filechooser-rfd` crates.

#[macro_use]
mod logging;

pub mod choices;
pub mod codec;
mod core;
mod dialog;
mod memory;
mod mime;
pub mod normalize;
mod parent;
mod portal;
pub mod session;

pub use crate::core::{
    ChoiceDescriptor, ChoiceOption, DialogMode, FileChooserError, Filter, FilterGroup,
    FilterKind, RequestDescriptor, RequestKind, ResponseDescriptor, ResponseStatus, SaveTarget,
    SelectedChoice,
};
pub use choices::{ChoiceControl, ChoicePanel};
pub use dialog::{DialogBackend, DialogConfig, DialogOutcome, FileDialog};
pub use memory::LastVisitedDirs;
#[cfg(feature = "mime-guess")]
pub use mime::MimeGuessLookup;
pub use mime::{MimeLookup, NoMimeLookup};
pub use normalize::NameFilters;
pub use parent::ParentWindow;
pub use portal::{FileChooserPortal, PortalCall, PortalReply};
pub use zvariant;
