//! Synthetic data image with one sprite species.
//!
//! Layout:
//!
//! ```text
//! 0x0000  20 patterns, pattern n filled with color n % 16
//! 0x0400  mapping table, 5 frames of one 2×2 piece
//! 0x0500  DPLC table, frame n loads patterns 4n..4n+4
//! 0x0600  script "roll": delay 0, frames 0 1, loop
//! 0x0610  script "hurt": delay 3, frame 4, switch to 0
//! ```

use std::path::PathBuf;

use spindash::prelude::*;
use spindash::spindash_types::art::{encode_dplc_table, encode_mapping_table};

pub(crate) const FRAME_COUNT: usize = 5;
pub(crate) const ART_OFFSET: usize = 0x0000;
pub(crate) const MAPPING_OFFSET: usize = 0x0400;
pub(crate) const DPLC_OFFSET: usize = 0x0500;
pub(crate) const ROLL_OFFSET: usize = 0x0600;
pub(crate) const HURT_OFFSET: usize = 0x0610;
pub(crate) const ROLL_SCRIPT: [u8; 4] = [0x00, 0x00, 0x01, 0xFF];
pub(crate) const HURT_SCRIPT: [u8; 4] = [0x03, 0x04, 0xFD, 0x00];

pub(crate) struct Fixture {
	pub image: Vec<u8>,
	pub mapping_table: Vec<u8>,
	pub dplc_table: Vec<u8>,
	pub manifest: String,
}

pub(crate) fn mapping_frames() -> Vec<MappingFrame> {
	(0..FRAME_COUNT)
		.map(|i| {
			let piece = MappingPiece::new(0, -8, -16, 2, 2).with_flips(i % 2 == 1, false);
			MappingFrame::from_pieces(vec![piece])
		})
		.collect()
}

pub(crate) fn dplc_frames() -> Vec<DplcFrame> {
	(0..FRAME_COUNT as u16).map(|i| DplcFrame::from_entries(vec![DplcEntry::new(4, i * 4)])).collect()
}

pub(crate) fn patterns() -> PatternStore {
	PatternStore::from_patterns((0..20u8).map(|n| TilePattern::from_pixels([n % 16; 64])).collect())
}

pub(crate) fn build() -> Fixture {
	let art = patterns().to_bytes();
	let mapping_table = encode_mapping_table(&mapping_frames()).unwrap();
	let dplc_table = encode_dplc_table(&dplc_frames()).unwrap();

	let mut image = vec![0u8; 0x0620];
	image[ART_OFFSET..ART_OFFSET + art.len()].copy_from_slice(&art);
	image[MAPPING_OFFSET..MAPPING_OFFSET + mapping_table.len()].copy_from_slice(&mapping_table);
	image[DPLC_OFFSET..DPLC_OFFSET + dplc_table.len()].copy_from_slice(&dplc_table);
	image[ROLL_OFFSET..ROLL_OFFSET + 4].copy_from_slice(&ROLL_SCRIPT);
	image[HURT_OFFSET..HURT_OFFSET + 4].copy_from_slice(&HURT_SCRIPT);

	let manifest = format!(
		r#"
[[sprites]]
name = "sonic"
palette_line = 0
base_pattern = 1920
frame_delay = 2
art = {{ offset = {ART_OFFSET}, size = {art_size} }}
mappings = {{ offset = {MAPPING_OFFSET}, size = {mapping_size} }}
dplc = {{ offset = {DPLC_OFFSET}, size = {dplc_size} }}

[sprites.animations.walk]
steps = [{{ frame = 2, duration = 4 }}, {{ frame = 3, duration = 4 }}, {{ frame = 4, duration = 4 }}]
loop_target = 0

[sprites.animations.stand]
steps = [{{ frame = 0 }}]
loop_target = 0

[sprites.animations.roll]
script = {{ offset = {ROLL_OFFSET}, size = 4 }}

[sprites.animations.hurt]
script = {{ offset = {HURT_OFFSET}, size = 4 }}
allowed_frames = [4]
"#,
		art_size = art.len(),
		mapping_size = mapping_table.len(),
		dplc_size = dplc_table.len(),
	);

	Fixture {
		image,
		mapping_table,
		dplc_table,
		manifest,
	}
}

/// Writes the manifest to a uniquely named TOML file in the temp directory.
pub(crate) fn write_manifest(name: &str, text: &str) -> PathBuf {
	let path = std::env::temp_dir().join(format!("spindash-{}-{name}.toml", std::process::id()));
	std::fs::write(&path, text).unwrap();
	path
}

/// Session with the fixture's art cache and "sonic" standing at (160, 112).
pub(crate) fn session() -> Session {
	let fixture = build();
	let manifest = ArtManifest::from_toml_str(&fixture.manifest).unwrap();
	let cache = ArtCache::new(manifest, MemoryImage::new(fixture.image));

	let mut session = Session::new(cache, PlayerState::new(3));
	let sonic = Sprite::new("sonic", 160, 112, 20, 38).with_kind(SpriteKind::Player);
	session.spawn_with_art(sonic, "sonic", Some("stand")).unwrap();
	session
}
