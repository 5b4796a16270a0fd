//! Gatepass CLI: product surface over the core session flow.
//!
//! The CLI provides the two concrete host capabilities the core treats as
//! injected: a loopback sign-in page ([`signin`]) hosting the Google
//! identity widget, and a localhost WebSocket relay ([`relay`]) the
//! companion extension connects to.

pub mod app;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod relay;
pub mod signin;
