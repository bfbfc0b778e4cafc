/// MIME type to glob pattern expansion.
///
/// Used for [`FilterKind::MimeType`](crate::FilterKind::MimeType) filters. An
/// unknown MIME type returns an empty list, which makes the filter contribute
/// nothing to its group.
pub trait MimeLookup {
    /// Glob patterns (e.g. `*.png`) registered for `mime_type`.
    fn globs_for(&self, mime_type: &str) -> Vec<String>;
}

impl<T: MimeLookup + ?Sized> MimeLookup for &T {
    fn globs_for(&self, mime_type: &str) -> Vec<String> {
        (**self).globs_for(mime_type)
    }
}

/// Lookup that knows no MIME types at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMimeLookup;

impl MimeLookup for NoMimeLookup {
    fn globs_for(&self, _mime_type: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Lookup backed by the `mime_guess` extension table.
///
/// `application/octet-stream` is the catch-all type and expands to `*`.
#[cfg(feature = "mime-guess")]
#[derive(Clone, Copy, Debug, Default)]
pub struct MimeGuessLookup;

#[cfg(feature = "mime-guess")]
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[cfg(feature = "mime-guess")]
impl MimeLookup for MimeGuessLookup {
    fn globs_for(&self, mime_type: &str) -> Vec<String> {
        let mime_type = mime_type.trim();
        if mime_type.eq_ignore_ascii_case(DEFAULT_MIME_TYPE) {
            return vec!["*".to_owned()];
        }
        match mime_guess::get_mime_extensions_str(mime_type) {
            Some(exts) => exts.iter().map(|ext| format!("*.{ext}")).collect(),
            None => {
                portal_debug!(mime_type, "no glob patterns registered for mime type");
                Vec::new()
            }
        }
    }
}
