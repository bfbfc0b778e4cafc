//! `org.freedesktop.impl.portal.FileChooser` on the session bus.

use tokio::sync::Mutex;
use tracing::{debug, warn};
use xdp_filechooser::normalize::OptionBag;
use xdp_filechooser::{
    DialogBackend, FileChooserPortal, MimeGuessLookup, MimeLookup, PortalCall, RequestKind,
};
use xdp_filechooser_rfd::RfdBackend;
use zbus::zvariant::OwnedObjectPath;

/// Bus-facing wrapper that serializes calls into one [`FileChooserPortal`].
///
/// Only one dialog is shown at a time; a call arriving while another is
/// open waits for the lock.
pub struct FileChooserService<B, M> {
    portal: Mutex<FileChooserPortal<B, M>>,
}

/// The service exported by the daemon binary.
pub type RfdFileChooser = FileChooserService<RfdBackend, MimeGuessLookup>;

impl RfdFileChooser {
    /// Service backed by GTK dialogs and `mime_guess` globs.
    pub fn rfd() -> Self {
        Self::new(FileChooserPortal::new(RfdBackend, MimeGuessLookup))
    }
}

impl<B, M> FileChooserService<B, M>
where
    B: DialogBackend,
    M: MimeLookup,
{
    /// Wrap `portal`.
    pub fn new(portal: FileChooserPortal<B, M>) -> Self {
        Self {
            portal: Mutex::new(portal),
        }
    }

    /// Serve one call and shape the reply as the `(u a{sv})` out arguments.
    pub async fn dispatch(
        &self,
        kind: RequestKind,
        handle: &str,
        app_id: &str,
        parent_window: &str,
        title: &str,
        options: &OptionBag,
    ) -> zbus::fdo::Result<(u32, OptionBag)> {
        let mut portal = match self.portal.try_lock() {
            Ok(portal) => portal,
            Err(_) => {
                debug!(handle, "another dialog is open; queueing request");
                self.portal.lock().await
            }
        };
        let call = PortalCall {
            handle,
            app_id,
            parent_window,
            title,
            options,
        };
        let reply = match kind {
            RequestKind::Open => portal.open_file(call).await,
            RequestKind::Save => portal.save_file(call).await,
        };
        match reply {
            Ok(reply) => Ok((reply.status, reply.results)),
            Err(err) => {
                warn!(handle, error = %err, "failed to build the result bag");
                Err(zbus::fdo::Error::Failed(err.to_string()))
            }
        }
    }
}

#[zbus::interface(name = "org.freedesktop.impl.portal.FileChooser")]
impl RfdFileChooser {
    /// Ask the user to pick one or more files or a folder.
    #[zbus(out_args("response", "results"))]
    async fn open_file(
        &self,
        handle: OwnedObjectPath,
        app_id: String,
        parent_window: String,
        title: String,
        options: OptionBag,
    ) -> zbus::fdo::Result<(u32, OptionBag)> {
        self.dispatch(
            RequestKind::Open,
            handle.as_str(),
            &app_id,
            &parent_window,
            &title,
            &options,
        )
        .await
    }

    /// Ask the user for a location to save one file to.
    #[zbus(out_args("response", "results"))]
    async fn save_file(
        &self,
        handle: OwnedObjectPath,
        app_id: String,
        parent_window: String,
        title: String,
        options: OptionBag,
    ) -> zbus::fdo::Result<(u32, OptionBag)> {
        self.dispatch(
            RequestKind::Save,
            handle.as_str(),
            &app_id,
            &parent_window,
            &title,
            &options,
        )
        .await
    }
}
