//! Prelude module for `spindash_types`.
//!
//! ```
//! use spindash_types::prelude::*;
//!
//! let store = PatternStore::new();
//! assert!(store.is_empty());
//! ```

#[doc(inline)]
pub use crate::art::{
	// Animation data
	Animation,
	AnimationProfile,
	AnimationScript,
	AnimationSet,
	AnimationStep,

	// Manifests
	ArtManifest,
	ByteRange,

	// Errors
	DecodeError,

	// Tables
	DplcEntry,
	DplcFrame,
	EncodeError,
	LoadError,
	MappingFrame,
	MappingPiece,
	PatternStore,
	ProfileEntry,
	RecordError,

	// Bundles
	SpriteArtBundle,
	SpriteArtEntry,
	TilePattern,
	ValidationError,
};

// Re-export the art module for advanced usage
#[doc(inline)]
pub use crate::art;
