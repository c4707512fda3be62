//! Abacus: an imperative command API derived from a table of counter
//! operations.
//!
//! The OO API is [`Abacus`]. The imperative API in [`imperative`] works on
//! one shared abacus through entry points installed from the command table
//! in [`registry`]; [`Session`] is the same machinery as an explicit handle.

pub mod abacus;
pub mod error;
pub mod imperative;
#[doc(hidden)]
pub mod invariant_ppt;
pub mod registry;
pub mod session;

pub use abacus::Abacus;
pub use error::{AbacusError, Result};
pub use imperative::{add, dir, new_abacus, sub, subtract};
pub use registry::{default_registry, Binding, CommandRegistry, CommandSpec, Commands, EntryPoint};
pub use session::Session;
