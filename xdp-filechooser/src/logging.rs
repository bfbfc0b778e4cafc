//! Conditional logging macros.
//!
//! Every log site in the crate goes through these so the `tracing` feature can
//! be switched off without touching call sites.

macro_rules! portal_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

macro_rules! portal_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

macro_rules! portal_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::warn!($($arg)*);
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn logging_macros_expand_in_statement_position() {
        let handle = "/org/freedesktop/portal/desktop/request/1_1/t";
        portal_trace!(handle, "trace");
        portal_debug!(handle, "debug");
        portal_warn!(handle, "warn");
        let _ = handle;
    }
}
