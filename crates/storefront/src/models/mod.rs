//! Session-stored models for storefront.

pub mod session;

pub use session::{PageSession, keys as session_keys};
