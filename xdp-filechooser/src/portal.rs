use std::collections::HashMap;

use zvariant::OwnedValue;

use crate::codec;
use crate::core::{FileChooserError, RequestKind, ResponseDescriptor, ResponseStatus};
use crate::dialog::DialogBackend;
use crate::memory::LastVisitedDirs;
use crate::mime::MimeLookup;
use crate::normalize::{self, OptionBag};
use crate::session::DialogSession;

/// Arguments shared by `OpenFile` and `SaveFile`.
#[derive(Clone, Copy, Debug)]
pub struct PortalCall<'a> {
    /// Request object path (informational)
    pub handle: &'a str,
    /// Caller application id (informational)
    pub app_id: &'a str,
    /// Caller window token, e.g. `x11:3a0000c`
    pub parent_window: &'a str,
    /// Dialog title
    pub title: &'a str,
    /// Untyped option bag
    pub options: &'a OptionBag,
}

/// Status code and result bag of a portal call.
#[derive(Debug)]
pub struct PortalReply {
    /// `0` success, `1` cancelled, `2` accepted without selection
    pub status: u32,
    /// `a{sv}` results
    pub results: HashMap<String, OwnedValue>,
}

/// FileChooser portal backend.
///
/// Owns the per-caller folder memory for its whole lifetime. Calls take
/// `&mut self`, so sessions are strictly serial: a host that receives calls
/// concurrently has to queue them (the daemon wraps the portal in an async
/// mutex).
#[derive(Debug)]
pub struct FileChooserPortal<B, M> {
    backend: B,
    mime: M,
    last_dirs: LastVisitedDirs,
}

impl<B, M> FileChooserPortal<B, M>
where
    B: DialogBackend,
    M: MimeLookup,
{
    /// Create a portal producing dialogs from `backend` and expanding MIME
    /// filters with `mime`.
    pub fn new(backend: B, mime: M) -> Self {
        Self {
            backend,
            mime,
            last_dirs: LastVisitedDirs::new(),
        }
    }

    /// Per-caller folder memory.
    pub fn last_visited_dirs(&self) -> &LastVisitedDirs {
        &self.last_dirs
    }

    /// Serve an `OpenFile` call.
    pub async fn open_file(
        &mut self,
        call: PortalCall<'_>,
    ) -> Result<PortalReply, FileChooserError> {
        let response = self.serve(RequestKind::Open, call).await;
        reply(&response)
    }

    /// Serve a `SaveFile` call.
    pub async fn save_file(
        &mut self,
        call: PortalCall<'_>,
    ) -> Result<PortalReply, FileChooserError> {
        let response = self.serve(RequestKind::Save, call).await;
        reply(&response)
    }

    /// Normalize, run one dialog session and return its response descriptor.
    pub async fn serve(&mut self, kind: RequestKind, call: PortalCall<'_>) -> ResponseDescriptor {
        portal_debug!(
            ?kind,
            handle = call.handle,
            app_id = call.app_id,
            parent_window = call.parent_window,
            title = call.title,
            options = ?call.options,
            "file chooser request"
        );

        let request = normalize::normalize(kind, call.options, &self.mime);
        let dialog = self.backend.create_dialog();
        let session = DialogSession::new(dialog, request, call.title, call.parent_window);
        let response = session.execute(&mut self.last_dirs).await;

        portal_debug!(
            handle = call.handle,
            status = response.status.code(),
            uris = response.uris.len(),
            "file chooser request finished"
        );
        if response.status == ResponseStatus::NoSelection {
            portal_warn!(handle = call.handle, "dialog accepted without a local file");
        }
        response
    }
}

fn reply(response: &ResponseDescriptor) -> Result<PortalReply, FileChooserError> {
    Ok(PortalReply {
        status: response.status.code(),
        results: codec::encode_results(response)?,
    })
}
