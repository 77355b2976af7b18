//! File-backed settings storage.
//!
//! [`FileSettings`] keeps the full key-value map in memory and mirrors it
//! to a single JSON document on disk, rewriting the document through a
//! temp-file-plus-rename on every mutation so a crash never leaves a torn
//! file. It implements [`Settings`](prefs_core::Settings) only -- this
//! backend has no change-notification facility, matching stores whose
//! platform API offers none.

pub mod file;

pub use file::FileSettings;
