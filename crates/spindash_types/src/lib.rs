//! Core data types for the `spindash-rs` project.
//!
//! # Art tables
//!
//! - **Patterns**: 4bpp 8×8 tiles, 32 bytes each
//! - **Mappings**: per-frame lists of pattern pieces with offsets and flips
//! - **DPLC**: per-frame lists of pattern runs to upload before drawing
//! - **Animation scripts**: compact delay/frames/command byte scripts
//!
//! Decoded tables are assembled into a validated, immutable
//! [`SpriteArtBundle`](art::SpriteArtBundle).
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```
//! use spindash_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = SpriteArtBundle::builder()
//!     .patterns(PatternStore::from_patterns(vec![TilePattern::default(); 4]))
//!     .mapping_frames(vec![MappingFrame::from_pieces(vec![MappingPiece::new(0, -8, -8, 2, 2)])])
//!     .animation("idle", Animation::looping(vec![AnimationStep::new(0, 8)], 0))
//!     .build()?;
//! assert_eq!(bundle.frame_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod art;

/// `use spindash_types::prelude::*;` to import commonly used items.
pub mod prelude;
