//! Art manifests.
//!
//! A manifest tells the loader where each sprite species' tables live inside
//! the data image and how its animations are defined. Manifests are read with
//! the `config` crate, so TOML and JSON files both work:
//!
//! ```toml
//! [[sprites]]
//! name = "monitor"
//! palette_line = 0
//! base_pattern = 0x680
//! frame_delay = 2
//! art = { offset = 0x1000, size = 0x200 }
//! mappings = { offset = 0x1200, size = 0x40 }
//! dplc = { offset = 0x1240, size = 0x20 }
//!
//! [sprites.animations.idle]
//! steps = [{ frame = 0, duration = 2 }, { frame = 1, duration = 2 }]
//! loop_target = 0
//!
//! [sprites.animations.break]
//! script = { offset = 0x1260, size = 6 }
//! ```

use std::{
	collections::{BTreeMap, BTreeSet},
	path::Path,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use spindash_vfs::ByteSource;

use super::{
	animation::{Animation, AnimationProfile, AnimationSet, AnimationStep, ProfileEntry},
	bundle::{DEFAULT_FRAME_DELAY, SpriteArtBundle},
	dplc::{DplcFrame, decode_dplc_table},
	error::LoadError,
	mapping::decode_mapping_table,
	pattern::PatternStore,
	script::AnimationScript,
};

/// A byte range inside the data image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRange {
	/// Start offset
	pub offset: usize,
	/// Length in bytes
	pub size: usize,
}

impl ByteRange {
	/// Creates a new range.
	pub fn new(offset: usize, size: usize) -> Self {
		Self {
			offset,
			size,
		}
	}

	/// Reads the range from `source`.
	pub fn read<S: ByteSource + ?Sized>(&self, source: &S) -> Result<Vec<u8>, LoadError> {
		Ok(source.read_bytes(self.offset, self.size)?)
	}
}

/// Manifest description of one animation.
///
/// Either `steps` (with an optional `loop_target`) or a `script` byte range
/// defines the sequence; a script wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSpec {
	/// Explicit steps
	#[serde(default)]
	pub steps: Vec<AnimationStep>,
	/// Loop target for explicit steps; absent means one-shot
	#[serde(default)]
	pub loop_target: Option<usize>,
	/// Animation script stored in the data image
	#[serde(default)]
	pub script: Option<ByteRange>,
	/// Frames the animation may use; empty allows any
	#[serde(default)]
	pub allowed_frames: BTreeSet<usize>,
	/// Inclusive range of allowed loop targets
	#[serde(default)]
	pub loop_range: Option<(usize, usize)>,
}

impl AnimationSpec {
	fn profile_entry(&self) -> ProfileEntry {
		ProfileEntry {
			allowed_frames: self.allowed_frames.clone(),
			loop_range: self.loop_range,
		}
	}

	fn to_animation<S: ByteSource + ?Sized>(&self, source: &S) -> Result<Animation, LoadError> {
		match &self.script {
			Some(range) => Ok(AnimationScript::from_bytes(&range.read(source)?)?.to_animation()),
			None => Ok(Animation::new(self.steps.clone(), self.loop_target)),
		}
	}
}

fn default_frame_delay() -> u32 {
	DEFAULT_FRAME_DELAY
}

/// Manifest entry for one sprite species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteArtEntry {
	/// Name the art is looked up by
	pub name: String,
	/// Raw 4bpp pattern art
	pub art: ByteRange,
	/// Mapping table
	pub mappings: ByteRange,
	/// DPLC table; absent for statically loaded art
	#[serde(default)]
	pub dplc: Option<ByteRange>,
	/// Palette line
	#[serde(default)]
	pub palette_line: u8,
	/// Base VRAM pattern index
	#[serde(default)]
	pub base_pattern: u16,
	/// Default ticks per frame
	#[serde(default = "default_frame_delay")]
	pub frame_delay: u32,
	/// Pattern bank size; defaults to the largest DPLC load
	#[serde(default)]
	pub bank_size: Option<usize>,
	/// Animations by name
	#[serde(default)]
	pub animations: BTreeMap<String, AnimationSpec>,
}

impl SpriteArtEntry {
	/// Reads, decodes and validates this sprite's art from `source`.
	///
	/// # Errors
	///
	/// Returns [`LoadError::Io`] on read failures, [`LoadError::Decode`] on
	/// malformed tables and [`LoadError::Validation`] if the assembled bundle
	/// breaks an invariant.
	pub fn load<S: ByteSource + ?Sized>(&self, source: &S) -> Result<SpriteArtBundle, LoadError> {
		let patterns = PatternStore::load(source, self.art.offset, self.art.size)?;
		let mapping_frames = decode_mapping_table(&self.mappings.read(source)?)?;
		let dplc_frames = match &self.dplc {
			Some(range) => decode_dplc_table(&range.read(source)?)?,
			None => vec![DplcFrame::new(); mapping_frames.len()],
		};

		let mut animations = AnimationSet::new();
		let mut profile = AnimationProfile::new();
		for (name, spec) in &self.animations {
			animations.insert(name.clone(), spec.to_animation(source)?);
			profile.declare(name.clone(), spec.profile_entry());
		}

		let bank_size = self
			.bank_size
			.unwrap_or_else(|| dplc_frames.iter().map(DplcFrame::total_patterns).max().unwrap_or(0));

		debug!(
			"loading '{}': {} mapping frames, {} DPLC frames",
			self.name,
			mapping_frames.len(),
			dplc_frames.len()
		);

		Ok(SpriteArtBundle::build(
			patterns,
			mapping_frames,
			dplc_frames,
			self.palette_line,
			self.base_pattern,
			self.frame_delay,
			bank_size,
			profile,
			animations,
		)?)
	}
}

/// List of sprite art entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtManifest {
	/// Sprite entries
	#[serde(default)]
	pub sprites: Vec<SpriteArtEntry>,
}

impl ArtManifest {
	/// Reads a manifest file; the format follows the file extension.
	///
	/// # Errors
	///
	/// Returns [`LoadError::Config`] if the file cannot be read or parsed.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
		let path = path.as_ref();
		let manifest: Self = config::Config::builder()
			.add_source(config::File::from(path))
			.build()?
			.try_deserialize()?;
		info!("loaded art manifest {} ({} sprites)", path.display(), manifest.sprites.len());
		Ok(manifest)
	}

	/// Parses a manifest from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
		Self::from_str_with_format(text, config::FileFormat::Toml)
	}

	/// Parses a manifest from JSON text.
	pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
		Self::from_str_with_format(text, config::FileFormat::Json)
	}

	fn from_str_with_format(text: &str, format: config::FileFormat) -> Result<Self, LoadError> {
		Ok(config::Config::builder()
			.add_source(config::File::from_str(text, format))
			.build()?
			.try_deserialize()?)
	}

	/// Looks up an entry by name.
	pub fn get(&self, name: &str) -> Option<&SpriteArtEntry> {
		self.sprites.iter().find(|s| s.name == name)
	}

	/// Names of all entries.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.sprites.iter().map(|s| s.name.as_str())
	}

	/// Loads the bundle for `name` from `source`.
	///
	/// # Errors
	///
	/// Returns [`LoadError::UnknownSprite`] if `name` is not in the manifest,
	/// otherwise see [`SpriteArtEntry::load`].
	pub fn load_bundle<S: ByteSource + ?Sized>(
		&self,
		source: &S,
		name: &str,
	) -> Result<SpriteArtBundle, LoadError> {
		self.get(name).ok_or_else(|| LoadError::UnknownSprite(name.to_string()))?.load(source)
	}
}
