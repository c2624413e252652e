//! Permission catalog
//!
//! Static, versioned enumeration of the atomic capabilities the engine knows
//! about. The catalog is read-only at runtime: permissions are never created,
//! mutated or deleted after startup, and anything that references a
//! permission code it cannot resolve has hit a fatal configuration error.

mod permissions;

pub use permissions::{Permission, ScopeCategory};
