//! Stored credential references.
//!
//! Specifications only ever hold opaque secret identifiers. The resolver lists
//! credentials of one kind from the backend and lets the operator pick one by name.

mod kind;
mod resolver;

pub use kind::SecretKind;
pub use resolver::SecretResolver;
