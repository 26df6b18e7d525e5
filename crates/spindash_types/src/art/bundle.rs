//! Sprite art bundles.
//!
//! A bundle aggregates everything needed to draw and animate one sprite
//! species: decoded patterns, positionally paired mapping and DPLC frames,
//! palette/bank metadata and the animation data. Bundles are validated once
//! at construction and never mutated afterwards, so they can be shared
//! read-only (typically through an `Arc`) by any number of sprites.

use std::fmt::Display;

use log::debug;

use super::{
	animation::{Animation, AnimationProfile, AnimationSet},
	dplc::DplcFrame,
	error::{TableKind, ValidationError},
	mapping::MappingFrame,
	pattern::PatternStore,
};

/// Default number of ticks a frame is shown when neither the step nor the
/// bundle specifies a delay.
pub const DEFAULT_FRAME_DELAY: u32 = 1;

/// Immutable, validated sprite art.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteArtBundle {
	patterns: PatternStore,
	mapping_frames: Vec<MappingFrame>,
	dplc_frames: Vec<DplcFrame>,
	palette_line: u8,
	base_pattern: u16,
	frame_delay: u32,
	bank_size: usize,
	profile: AnimationProfile,
	animations: AnimationSet,
}

impl SpriteArtBundle {
	/// Assembles and validates a bundle.
	///
	/// # Errors
	///
	/// Returns a [`ValidationError`] when the mapping and DPLC sequences differ
	/// in length, a mapping piece or DPLC entry does not fit its binary record,
	/// an animation step points at a missing frame, the animation
	/// set disagrees with the profile, or a frame's patterns are not covered by
	/// its DPLC frame, the bank or the pattern store.
	#[allow(clippy::too_many_arguments)]
	pub fn build(
		patterns: PatternStore,
		mapping_frames: Vec<MappingFrame>,
		dplc_frames: Vec<DplcFrame>,
		palette_line: u8,
		base_pattern: u16,
		frame_delay: u32,
		bank_size: usize,
		profile: AnimationProfile,
		animations: AnimationSet,
	) -> Result<Self, ValidationError> {
		let bundle = Self {
			patterns,
			mapping_frames,
			dplc_frames,
			palette_line,
			base_pattern,
			frame_delay,
			bank_size,
			profile,
			animations,
		};
		bundle.validate()?;

		debug!(
			"built sprite art: {} patterns, {} frames, {} animations",
			bundle.patterns.len(),
			bundle.frame_count(),
			bundle.animations.len()
		);
		Ok(bundle)
	}

	/// Starts a [`SpriteArtBundleBuilder`].
	pub fn builder() -> SpriteArtBundleBuilder {
		SpriteArtBundleBuilder::default()
	}

	fn validate(&self) -> Result<(), ValidationError> {
		if self.mapping_frames.len() != self.dplc_frames.len() {
			return Err(ValidationError::LengthMismatch {
				mapping: self.mapping_frames.len(),
				dplc: self.dplc_frames.len(),
			});
		}

		self.profile.validate(&self.animations, self.frame_count())?;

		let pattern_count = self.patterns.len();
		for (frame, (mapping, dplc)) in self.mapping_frames.iter().zip(&self.dplc_frames).enumerate()
		{
			for (record, piece) in mapping.pieces().iter().enumerate() {
				piece.check().map_err(|source| ValidationError::InvalidRecord {
					frame,
					table: TableKind::Mapping,
					record,
					source,
				})?;
			}
			for (record, entry) in dplc.entries().iter().enumerate() {
				entry.check().map_err(|source| ValidationError::InvalidRecord {
					frame,
					table: TableKind::Dplc,
					record,
					source,
				})?;
			}

			let required = mapping.pattern_span();

			if dplc.is_empty() {
				if required > pattern_count {
					return Err(ValidationError::PatternOutOfRange {
						frame,
						pattern: required - 1,
						pattern_count,
					});
				}
				continue;
			}

			let loaded = dplc.total_patterns();
			if required > loaded {
				return Err(ValidationError::UncoveredPatterns {
					frame,
					required,
					loaded,
				});
			}
			if loaded > self.bank_size {
				return Err(ValidationError::BankOverflow {
					frame,
					loaded,
					bank_size: self.bank_size,
				});
			}
			let source_span = dplc.source_span();
			if source_span > pattern_count {
				return Err(ValidationError::PatternOutOfRange {
					frame,
					pattern: source_span - 1,
					pattern_count,
				});
			}
		}

		Ok(())
	}

	/// Decoded patterns.
	pub fn patterns(&self) -> &PatternStore {
		&self.patterns
	}

	/// Mapping frames, paired by index with [`dplc_frames`](Self::dplc_frames).
	pub fn mapping_frames(&self) -> &[MappingFrame] {
		&self.mapping_frames
	}

	/// DPLC frames, paired by index with [`mapping_frames`](Self::mapping_frames).
	pub fn dplc_frames(&self) -> &[DplcFrame] {
		&self.dplc_frames
	}

	/// Mapping and DPLC frame for logical frame `index`.
	pub fn frame(&self, index: usize) -> Option<(&MappingFrame, &DplcFrame)> {
		Some((self.mapping_frames.get(index)?, self.dplc_frames.get(index)?))
	}

	/// Number of logical frames.
	pub fn frame_count(&self) -> usize {
		self.mapping_frames.len()
	}

	/// Returns `true` if any frame loads patterns dynamically.
	pub fn uses_dplc(&self) -> bool {
		self.dplc_frames.iter().any(|f| !f.is_empty())
	}

	/// Palette line used to draw the sprite.
	pub fn palette_line(&self) -> u8 {
		self.palette_line
	}

	/// VRAM pattern index the mapping frames are relative to.
	pub fn base_pattern(&self) -> u16 {
		self.base_pattern
	}

	/// Default ticks per frame for steps without an explicit duration.
	pub fn frame_delay(&self) -> u32 {
		self.frame_delay
	}

	/// Maximum number of patterns resident at once.
	pub fn bank_size(&self) -> usize {
		self.bank_size
	}

	/// Animation profile.
	pub fn profile(&self) -> &AnimationProfile {
		&self.profile
	}

	/// Animation set.
	pub fn animations(&self) -> &AnimationSet {
		&self.animations
	}

	/// Looks up an animation by name.
	pub fn animation(&self, name: &str) -> Option<&Animation> {
		self.animations.get(name)
	}
}

impl Display for SpriteArtBundle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"SpriteArt: {} patterns, {} frames, {} animations, pal={} base=0x{:04X} delay={} bank={}",
			self.patterns.len(),
			self.frame_count(),
			self.animations.len(),
			self.palette_line,
			self.base_pattern,
			self.frame_delay,
			self.bank_size
		)
	}
}

/// Builder for [`SpriteArtBundle`].
///
/// Missing DPLC frames are filled with empty frames (static art), a missing
/// profile declares every animation of the set without constraints, and a
/// missing bank size becomes the largest number of patterns any DPLC frame
/// loads.
#[derive(Debug, Default)]
pub struct SpriteArtBundleBuilder {
	patterns: PatternStore,
	mapping_frames: Vec<MappingFrame>,
	dplc_frames: Option<Vec<DplcFrame>>,
	palette_line: u8,
	base_pattern: u16,
	frame_delay: Option<u32>,
	bank_size: Option<usize>,
	profile: Option<AnimationProfile>,
	animations: AnimationSet,
}

impl SpriteArtBundleBuilder {
	/// Sets the decoded patterns.
	pub fn patterns(mut self, patterns: PatternStore) -> Self {
		self.patterns = patterns;
		self
	}

	/// Sets the mapping frames.
	pub fn mapping_frames(mut self, frames: Vec<MappingFrame>) -> Self {
		self.mapping_frames = frames;
		self
	}

	/// Sets the DPLC frames.
	pub fn dplc_frames(mut self, frames: Vec<DplcFrame>) -> Self {
		self.dplc_frames = Some(frames);
		self
	}

	/// Sets the palette line.
	pub fn palette_line(mut self, palette_line: u8) -> Self {
		self.palette_line = palette_line;
		self
	}

	/// Sets the base pattern index.
	pub fn base_pattern(mut self, base_pattern: u16) -> Self {
		self.base_pattern = base_pattern;
		self
	}

	/// Sets the default frame delay.
	pub fn frame_delay(mut self, ticks: u32) -> Self {
		self.frame_delay = Some(ticks);
		self
	}

	/// Sets the bank size.
	pub fn bank_size(mut self, patterns: usize) -> Self {
		self.bank_size = Some(patterns);
		self
	}

	/// Sets the animation profile.
	pub fn profile(mut self, profile: AnimationProfile) -> Self {
		self.profile = Some(profile);
		self
	}

	/// Sets the animation set.
	pub fn animations(mut self, animations: AnimationSet) -> Self {
		self.animations = animations;
		self
	}

	/// Adds a single animation to the set.
	pub fn animation(mut self, name: impl Into<String>, animation: Animation) -> Self {
		self.animations.insert(name, animation);
		self
	}

	/// Validates and builds the bundle.
	///
	/// # Errors
	///
	/// See [`SpriteArtBundle::build`].
	pub fn build(self) -> Result<SpriteArtBundle, ValidationError> {
		let dplc_frames = self
			.dplc_frames
			.unwrap_or_else(|| vec![DplcFrame::new(); self.mapping_frames.len()]);
		let bank_size = self
			.bank_size
			.unwrap_or_else(|| dplc_frames.iter().map(DplcFrame::total_patterns).max().unwrap_or(0));
		let profile = self.profile.unwrap_or_else(|| AnimationProfile::unrestricted_for(&self.animations));

		SpriteArtBundle::build(
			self.patterns,
			self.mapping_frames,
			dplc_frames,
			self.palette_line,
			self.base_pattern,
			self.frame_delay.unwrap_or(DEFAULT_FRAME_DELAY),
			bank_size,
			profile,
			self.animations,
		)
	}
}
