//! Native dialogs for the file chooser portal via the `rfd` crate.
//!
//! [`RfdBackend`] produces one [`RfdDialog`] per portal request. The dialog
//! maps a [`DialogConfig`] onto `rfd::AsyncFileDialog` and reports the picked
//! paths back as `file://` URLs.
//!
//! Notes
//! - Name filters arrive as rendered labels (`"Images (*.png *.jpg)"`); only
//!   `*.ext` and bare extension patterns survive, since `rfd` filters by
//!   extension. Groups left without extensions are skipped.
//! - `rfd` has no accept label, no choice controls and does not report the
//!   active filter, so those are dropped.
//! - X11 parents are forwarded; Wayland export handles are ignored.
#![deny(missing_docs)]

use std::ffi::c_ulong;
use std::path::{Path, PathBuf};

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, WindowHandle, XlibDisplayHandle, XlibWindowHandle,
};
use url::Url;
use xdp_filechooser::{
    ChoicePanel, DialogBackend, DialogConfig, DialogMode, DialogOutcome, FileDialog, ParentWindow,
    SaveTarget,
};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Backend handing out GTK dialogs through `rfd`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RfdBackend;

impl DialogBackend for RfdBackend {
    type Dialog = RfdDialog;

    fn create_dialog(&self) -> RfdDialog {
        RfdDialog::default()
    }
}

/// One `rfd` dialog, configured lazily and shown on [`FileDialog::run`].
#[derive(Debug, Default)]
pub struct RfdDialog {
    config: Option<DialogConfig>,
    parent: Option<X11Parent>,
    picked: Vec<PathBuf>,
}

impl RfdDialog {
    fn mode(&self) -> DialogMode {
        self.config
            .as_ref()
            .map_or(DialogMode::OpenFile, |config| config.mode)
    }

    fn to_rfd(&self) -> rfd::AsyncFileDialog {
        let mut d = rfd::AsyncFileDialog::new();
        let Some(config) = &self.config else {
            return d;
        };
        if !config.title.is_empty() {
            d = d.set_title(config.title.as_str());
        }
        let (dir, name) = start_location(config);
        if let Some(dir) = dir {
            d = d.set_directory(dir);
        }
        if let Some(name) = name {
            d = d.set_file_name(name);
        }
        if config.mode != DialogMode::PickFolder {
            for label in &config.name_filters {
                if let Some((name, exts)) = native_filter(label) {
                    d = d.add_filter(name, &exts);
                }
            }
        }
        if let Some(parent) = &self.parent {
            d = d.set_parent(parent);
        }
        d
    }
}

impl FileDialog for RfdDialog {
    fn configure(&mut self, config: DialogConfig) {
        #[cfg(feature = "tracing")]
        if config.accept_label.is_some() {
            debug!("rfd dialogs have no accept label; ignoring");
        }
        self.config = Some(config);
    }

    fn set_parent(&mut self, parent: &ParentWindow) {
        match parent {
            ParentWindow::X11(xid) => self.parent = Some(X11Parent(*xid)),
            ParentWindow::Wayland(_handle) => {
                #[cfg(feature = "tracing")]
                debug!(handle = %_handle, "wayland parents are not supported by rfd");
            }
        }
    }

    async fn run(&mut self, _choices: Option<&mut ChoicePanel>) -> DialogOutcome {
        let mode = self.mode();
        #[cfg(feature = "tracing")]
        trace!(?mode, "rfd async open");
        let dialog = self.to_rfd();
        let picked: Option<Vec<PathBuf>> = match mode {
            DialogMode::OpenFile => dialog
                .pick_file()
                .await
                .map(|h| vec![h.path().to_path_buf()]),
            DialogMode::OpenFiles => dialog
                .pick_files()
                .await
                .map(|v| v.into_iter().map(|h| h.path().to_path_buf()).collect()),
            DialogMode::PickFolder => dialog
                .pick_folder()
                .await
                .map(|h| vec![h.path().to_path_buf()]),
            DialogMode::SaveFile => dialog
                .save_file()
                .await
                .map(|h| vec![h.path().to_path_buf()]),
        };
        match picked {
            Some(paths) => {
                self.picked = paths;
                DialogOutcome::Accepted
            }
            None => DialogOutcome::Rejected,
        }
    }

    fn selected_files(&self) -> Vec<Url> {
        self.picked
            .iter()
            .filter_map(|p| Url::from_file_path(p).ok())
            .collect()
    }

    fn active_filter(&self) -> Option<String> {
        None
    }

    fn directory(&self) -> Option<Url> {
        match self.picked.first() {
            Some(first) => first.parent().and_then(|dir| Url::from_file_path(dir).ok()),
            None => self.config.as_ref().and_then(|c| c.directory.clone()),
        }
    }
}

/// Starting folder and suggested file name for `config`.
fn start_location(config: &DialogConfig) -> (Option<PathBuf>, Option<String>) {
    let mut dir = config.directory.as_ref().and_then(|u| u.to_file_path().ok());
    let mut name = None;
    match &config.save_target {
        Some(SaveTarget::File(file)) => {
            if let Ok(path) = file.to_file_path() {
                dir = path.parent().map(Path::to_path_buf).or(dir);
                name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            }
        }
        Some(SaveTarget::Name(n)) => name = Some(n.clone()),
        None => {}
    }
    (dir, name)
}

/// Split a rendered label into an `rfd` filter name and its extensions.
fn native_filter(label: &str) -> Option<(&str, Vec<String>)> {
    let (name, rest) = label.rsplit_once(" (")?;
    let patterns = rest.strip_suffix(')')?;
    let exts: Vec<String> = patterns
        .split_whitespace()
        .filter_map(plain_extension_for_native)
        .collect();
    if exts.is_empty() {
        return None;
    }
    Some((name, exts))
}

fn is_plain_extension_token(token: &str) -> bool {
    let t = token.trim();
    if t.is_empty() {
        return false;
    }
    !(t.contains('*') || t.contains('?') || t.contains('['))
}

fn plain_extension_for_native(token: &str) -> Option<String> {
    let t = token.trim();
    let t = t.strip_prefix("*.").unwrap_or(t).trim_start_matches('.');
    if !is_plain_extension_token(t) {
        return None;
    }
    Some(t.to_lowercase())
}

/// Foreign X11 window used as the dialog's transient parent.
#[derive(Clone, Copy, Debug)]
struct X11Parent(u64);

impl HasWindowHandle for X11Parent {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        let raw = RawWindowHandle::Xlib(XlibWindowHandle::new(self.0 as c_ulong));
        // SAFETY: an Xlib handle is a plain XID; the toolkit resolves it on
        // its own display connection.
        Ok(unsafe { WindowHandle::borrow_raw(raw) })
    }
}

impl HasDisplayHandle for X11Parent {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        let raw = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
        // SAFETY: no display pointer is carried.
        Ok(unsafe { DisplayHandle::borrow_raw(raw) })
    }
}
