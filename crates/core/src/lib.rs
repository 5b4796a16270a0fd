//! Gatepass core: the authentication/session synchronization flow for a
//! browser-extension companion product.
//!
//! The flow runs: identity widget ([`widget`]) -> opaque credential ->
//! backend exchange ([`exchange`]) -> tokens + profile -> persisted session
//! ([`store`]) and extension sync ([`bridge`]) -> in-memory state and
//! navigation ([`controller`], [`routes`]).
//!
//! A session is either fully present (both tokens and the profile) or fully
//! absent; anything in between is purged on sight. Login-path failures fail
//! closed to unauthenticated, logout-path failures fail open to fully
//! logged-out locally.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod exchange;
pub mod routes;
pub mod session;
pub mod storage;
pub mod store;
pub mod widget;

pub use config::{AppConfig, Profile};
pub use controller::{LoginOutcome, LogoutOutcome, LogoutTrigger, SessionController};
pub use error::{Error, Result};
pub use session::{IdentityCredential, Session};
