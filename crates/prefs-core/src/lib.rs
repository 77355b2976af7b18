//! Typed key-value settings facade.
//!
//! This crate defines the storage contract the rest of the workspace
//! builds on: a flat, string-keyed store of primitive values with typed
//! accessors, plus optional per-key change observation.
//!
//! # Key Types
//!
//! - [`Value`] / [`ValueKind`] -- the primitive slots a backend offers
//! - [`Settings`] -- the storage trait: raw get/put plus typed accessors
//! - [`ObservableSettings`] -- change observation on top of [`Settings`]
//! - [`MemorySettings`] -- `HashMap`-based backend for tests and ephemeral
//!   state
//!
//! # Design Rules
//!
//! 1. A missing key is never an error: defaulting accessors return the
//!    caller's default, `_opt` accessors return `None`.
//! 2. A kind mismatch between the stored value and the accessor is always
//!    an error, reported identically by every backend.
//! 3. Operations act on one key at a time; there is no atomicity across
//!    keys and no transaction layer.
//! 4. Listener notification is synchronous on the mutating thread and
//!    carries no payload; observers re-read through the accessors.

pub mod error;
pub mod memory;
pub mod observe;
pub mod settings;
pub mod value;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{Error, Result};
pub use memory::MemorySettings;
pub use observe::{ChangeListener, ListenerHandle, ListenerSet, ObservableSettings};
pub use settings::Settings;
pub use value::{Value, ValueKind};
