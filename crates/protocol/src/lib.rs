//! Wire types for Gatepass's external channels.
//!
//! This crate contains the serde-serializable types exchanged with the auth
//! backend over HTTPS and with the companion browser extension over the
//! message channel. These types represent the "protocol layer" - the shapes
//! of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with the wire: Field names match what the backend and the extension
//!   actually send (camelCase, exact message tags)
//! * Stable: Changes only when a wire format changes
//!
//! Higher-level session types are built on top of these in `gatepass-core`.

pub mod auth_exchange;
pub mod extension;
pub mod profile;

pub use auth_exchange::*;
pub use extension::*;
pub use profile::*;
