//! Sprite art support for `spindash-rs`.
//!
//! This module decodes the binary art tables of a Mega Drive style data image
//! and assembles them into immutable [`SpriteArtBundle`]s:
//!
//! - [`pattern`]: 4bpp 8×8 tile patterns ([`PatternStore`])
//! - [`mapping`]: mapping frames, the spatial layout of each animation frame
//! - [`dplc`]: dynamic pattern load cues, what to upload before drawing a frame
//! - [`script`]: compact animation scripts
//! - [`animation`]: animation profiles and sets
//! - [`bundle`]: validated aggregate of all of the above
//! - [`manifest`]: where each sprite's tables live in the data image
//!
//! # Frame pairing
//!
//! Mapping and DPLC frames are paired by position: index `i` in both
//! sequences describes the same logical frame. The bundle rejects sequences of
//! different lengths.
//!
//! # Examples
//!
//! ```
//! use spindash_types::art::{DplcEntry, DplcFrame, MappingFrame, MappingPiece};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = MappingFrame::from_pieces(vec![MappingPiece::new(0, -8, -16, 2, 4)]);
//! let bytes = frame.to_bytes()?;
//! assert_eq!(MappingFrame::from_bytes(&bytes)?, frame);
//!
//! let dplc = DplcFrame::from_entries(vec![DplcEntry::new(8, 0x40)]);
//! assert_eq!(dplc.total_patterns(), frame.pattern_span());
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod bundle;
pub mod constants;
pub mod dplc;
mod error;
pub mod manifest;
pub mod mapping;
pub mod pattern;
pub mod script;
mod table;


pub use animation::{Animation, AnimationProfile, AnimationSet, AnimationStep, ProfileEntry};
pub use bundle::{DEFAULT_FRAME_DELAY, SpriteArtBundle, SpriteArtBundleBuilder};
pub use dplc::{DplcEntry, DplcFrame, decode_dplc_frame, decode_dplc_table, encode_dplc_table};
pub use error::{DecodeError, EncodeError, LoadError, RecordError, TableKind, ValidationError};
pub use manifest::{AnimationSpec, ArtManifest, ByteRange, SpriteArtEntry};
pub use mapping::{
	FrameBounds, MappingFrame, MappingPiece, decode_mapping_frame, decode_mapping_table,
	encode_mapping_table,
};
pub use pattern::{PatternStore, TilePattern};
pub use script::{AnimationScript, ScriptEnd, decode_script_table};
