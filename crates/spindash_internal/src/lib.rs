//! This module is separated into its own crate to enable simple dynamic linking for `spindash`, and should not be used directly.

/// `use spindash::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use spindash_engine;
pub use spindash_types;
pub use spindash_vfs;

// Re-export commonly used types at crate root
pub use spindash_engine::{ArtCache, Session, TimerManager, World};
pub use spindash_types::art::{ArtManifest, SpriteArtBundle};
pub use spindash_vfs::{ByteSource, FileImage, MemoryImage, VfsError};
