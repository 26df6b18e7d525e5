//! Benchmark helper utilities for spindash-rs
//!
//! This module generates synthetic art tables for the benchmarks. Layouts
//! follow the data image conventions: big-endian `u16` offset headers, 8-byte
//! mapping pieces and 2-byte DPLC entries.

/// Generates `count` patterns of raw 4bpp art.
pub fn generate_pattern_data(count: usize) -> Vec<u8> {
	(0..count * 32).map(|i| (i.wrapping_mul(37) % 256) as u8).collect()
}

/// Generates a mapping table with `frames` frames of `pieces` pieces each.
///
/// Every piece is 2×2 tiles, so frame `n` spans `pieces * 4` patterns.
pub fn generate_mapping_table(frames: usize, pieces: usize) -> Vec<u8> {
	let frame_size = 2 + pieces * 8;
	let mut data = Vec::with_capacity(frames * (2 + frame_size));

	for frame in 0..frames {
		let offset = (frames * 2 + frame * frame_size) as u16;
		data.extend_from_slice(&offset.to_be_bytes());
	}

	for frame in 0..frames {
		data.extend_from_slice(&(pieces as u16).to_be_bytes());
		for piece in 0..pieces {
			let y = (piece as i8).wrapping_mul(16).wrapping_sub(32);
			data.push(y as u8);
			// 2×2 tiles
			data.push(0x05);
			let word = ((piece * 4) as u16) | if frame % 2 == 1 { 0x0800 } else { 0 };
			data.extend_from_slice(&word.to_be_bytes());
			data.extend_from_slice(&word.to_be_bytes());
			data.extend_from_slice(&(-8i16 + piece as i16 * 4).to_be_bytes());
		}
	}

	data
}

/// Generates a DPLC table with `frames` frames of `entries` 4-pattern runs.
pub fn generate_dplc_table(frames: usize, entries: usize) -> Vec<u8> {
	let frame_size = 2 + entries * 2;
	let mut data = Vec::with_capacity(frames * (2 + frame_size));

	for frame in 0..frames {
		let offset = (frames * 2 + frame * frame_size) as u16;
		data.extend_from_slice(&offset.to_be_bytes());
	}

	for frame in 0..frames {
		data.extend_from_slice(&(entries as u16).to_be_bytes());
		for entry in 0..entries {
			let source = ((frame * entries + entry) * 4) as u16 & 0x0FFF;
			data.extend_from_slice(&((3u16 << 12) | source).to_be_bytes());
		}
	}

	data
}

/// Common benchmark sizes for synthetic tables
pub mod sizes {
	/// Small object such as a ring: (frames, pieces per frame)
	pub const SMALL: (usize, usize) = (4, 1);
	/// Typical badnik
	pub const MEDIUM: (usize, usize) = (16, 4);
	/// Player character sheet
	pub const LARGE: (usize, usize) = (128, 8);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_mapping_table() {
		let data = generate_mapping_table(3, 2);

		// Header: first offset = 3 frames * 2 bytes
		assert_eq!(&data[0..2], &[0x00, 0x06]);
		assert_eq!(data.len(), 6 + 3 * (2 + 2 * 8));

		// Second frame starts one frame later
		assert_eq!(&data[2..4], &(6u16 + 18).to_be_bytes());
	}

	#[test]
	fn test_generate_dplc_table() {
		let data = generate_dplc_table(2, 3);
		assert_eq!(&data[0..2], &[0x00, 0x04]);
		assert_eq!(data.len(), 4 + 2 * (2 + 3 * 2));

		// First entry: 4 patterns from index 0
		assert_eq!(&data[6..8], &[0x30, 0x00]);
	}

	#[test]
	fn test_generate_pattern_data() {
		assert_eq!(generate_pattern_data(4).len(), 128);
	}
}
