//! Prelude module for `spindash_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use spindash_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let mut session = Session::new(ArtCache::default(), PlayerState::new(3));
//! session.spawn(Sprite::monitor("m1", 0, 0, Monitor::new(MonitorKind::Rings)));
//! session.spawn(Sprite::new("sonic", 0, 0, 20, 38).with_kind(SpriteKind::Player));
//!
//! assert!(session.collide("m1", "sonic").unwrap());
//! assert_eq!(session.world().player().rings, 10);
//! ```

// Re-export everything from the member preludes
#[doc(inline)]
pub use spindash_engine::prelude::*;
#[doc(inline)]
pub use spindash_types::prelude::*;
#[doc(inline)]
pub use spindash_vfs::{ByteSource, FileImage, MemoryImage, VfsError};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use spindash_engine;
#[doc(inline)]
pub use spindash_types;
