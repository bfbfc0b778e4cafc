//! Session-bus shell around the `xdp-filechooser` core.
//!
//! The binary parses [`config::Args`], installs the tracing subscriber from
//! [`logging`] and exports a [`service::FileChooserService`] on the session
//! bus.

pub mod config;
pub mod logging;
pub mod service;
