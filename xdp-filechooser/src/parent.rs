use std::fmt;

/// Caller window a dialog should be transient for.
///
/// Parsed from the portal's `parent_window` token. Only `x11:` and `wayland:`
/// prefixes are recognized; anything else means "no parent".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParentWindow {
    /// X11 window id (`x11:<hex>`)
    X11(u64),
    /// Exported xdg-foreign handle (`wayland:<handle>`)
    Wayland(String),
}

impl ParentWindow {
    /// Parse a `parent_window` token.
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(xid) = token.strip_prefix("x11:") {
            let xid = xid.trim_start_matches("0x");
            return u64::from_str_radix(xid, 16)
                .ok()
                .filter(|id| *id != 0)
                .map(ParentWindow::X11);
        }
        if let Some(handle) = token.strip_prefix("wayland:") {
            if !handle.is_empty() {
                return Some(ParentWindow::Wayland(handle.to_owned()));
            }
        }
        None
    }
}

impl fmt::Display for ParentWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentWindow::X11(xid) => write!(f, "x11:{xid:x}"),
            ParentWindow::Wayland(handle) => write!(f, "wayland:{handle}"),
        }
    }
}
