//! Tile patterns and the pattern store.
//!
//! A pattern is an 8×8 tile of 4-bit palette indices. Encoded patterns are
//! 32 bytes long: eight rows of four bytes, two pixels per byte with the
//! left pixel in the high nibble.
//!
//! ```text
//! byte:   0x12 0x34 0x56 0x78
//! pixels: 1 2  3 4  5 6  7 8    (row 0, x = 0..8)
//! ```

use std::fmt::Display;

use log::debug;
use spindash_vfs::ByteSource;

use super::{
	constants::{PATTERN_DIMENSION, PATTERN_PIXELS, PATTERN_SIZE},
	error::{DecodeError, LoadError},
};

/// A single 8×8 tile of palette indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePattern {
	pixels: [u8; PATTERN_PIXELS],
}

impl Default for TilePattern {
	fn default() -> Self {
		Self {
			pixels: [0; PATTERN_PIXELS],
		}
	}
}

impl TilePattern {
	/// Creates a pattern from 64 palette indices in row-major order.
	///
	/// Only the low nibble of each value is kept.
	pub fn from_pixels(pixels: [u8; PATTERN_PIXELS]) -> Self {
		Self {
			pixels: pixels.map(|p| p & 0x0F),
		}
	}

	/// Decodes one pattern from exactly [`PATTERN_SIZE`] bytes.
	pub fn from_bytes(data: &[u8; PATTERN_SIZE]) -> Self {
		let mut pixels = [0u8; PATTERN_PIXELS];
		for (i, byte) in data.iter().enumerate() {
			pixels[i * 2] = byte >> 4;
			pixels[i * 2 + 1] = byte & 0x0F;
		}
		Self {
			pixels,
		}
	}

	/// Encodes the pattern back to its 32-byte representation.
	pub fn to_bytes(&self) -> [u8; PATTERN_SIZE] {
		let mut bytes = [0u8; PATTERN_SIZE];
		for (i, byte) in bytes.iter_mut().enumerate() {
			*byte = (self.pixels[i * 2] << 4) | self.pixels[i * 2 + 1];
		}
		bytes
	}

	/// Returns the palette indices in row-major order.
	pub fn pixels(&self) -> &[u8; PATTERN_PIXELS] {
		&self.pixels
	}

	/// Gets the palette index at (x, y), or `None` when out of bounds.
	pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
		if x >= PATTERN_DIMENSION || y >= PATTERN_DIMENSION {
			return None;
		}
		Some(self.pixels[y * PATTERN_DIMENSION + x])
	}

	/// Gets the palette index at (x, y) as seen through the given flips.
	pub fn pixel_flipped(&self, x: usize, y: usize, h_flip: bool, v_flip: bool) -> Option<u8> {
		if x >= PATTERN_DIMENSION || y >= PATTERN_DIMENSION {
			return None;
		}
		let sx = if h_flip {
			PATTERN_DIMENSION - 1 - x
		} else {
			x
		};
		let sy = if v_flip {
			PATTERN_DIMENSION - 1 - y
		} else {
			y
		};
		self.pixel(sx, sy)
	}

	/// Returns `true` when every pixel uses palette index 0 (transparent).
	pub fn is_blank(&self) -> bool {
		self.pixels.iter().all(|&p| p == 0)
	}
}

/// Ordered sequence of decoded tile patterns.
///
/// Patterns are identified by their position in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PatternStore {
	patterns: Vec<TilePattern>,
}

impl PatternStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store from already decoded patterns.
	pub fn from_patterns(patterns: Vec<TilePattern>) -> Self {
		Self {
			patterns,
		}
	}

	/// Decodes raw 4bpp art.
	///
	/// # Errors
	///
	/// Returns [`DecodeError::MisalignedPatternData`] if the data is not a whole
	/// number of patterns.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
		if data.len() % PATTERN_SIZE != 0 {
			return Err(DecodeError::MisalignedPatternData {
				len: data.len(),
				pattern_size: PATTERN_SIZE,
			});
		}

		let patterns = data
			.chunks_exact(PATTERN_SIZE)
			.map(|chunk| {
				let mut raw = [0u8; PATTERN_SIZE];
				raw.copy_from_slice(chunk);
				TilePattern::from_bytes(&raw)
			})
			.collect();

		Ok(Self {
			patterns,
		})
	}

	/// Reads `size` bytes at `offset` from the byte source and decodes them.
	///
	/// # Errors
	///
	/// Read failures are returned as [`LoadError::Io`]; malformed art as
	/// [`LoadError::Decode`].
	pub fn load<S: ByteSource + ?Sized>(
		source: &S,
		offset: usize,
		size: usize,
	) -> Result<Self, LoadError> {
		let data = source.read_bytes(offset, size)?;
		let store = Self::from_bytes(&data)?;
		debug!("decoded {} patterns from 0x{offset:06X}+{size}", store.len());
		Ok(store)
	}

	/// Encodes every pattern back to raw 4bpp art.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut bytes = Vec::with_capacity(self.patterns.len() * PATTERN_SIZE);
		for pattern in &self.patterns {
			bytes.extend_from_slice(&pattern.to_bytes());
		}
		bytes
	}

	/// Returns the pattern at `index`.
	pub fn get(&self, index: usize) -> Option<&TilePattern> {
		self.patterns.get(index)
	}

	/// Returns all patterns.
	pub fn patterns(&self) -> &[TilePattern] {
		&self.patterns
	}

	/// Appends a pattern, returning its index.
	pub fn push(&mut self, pattern: TilePattern) -> usize {
		self.patterns.push(pattern);
		self.patterns.len() - 1
	}

	/// Number of patterns.
	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	/// Returns `true` if the store holds no patterns.
	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	/// Iterates over the patterns in order.
	pub fn iter(&self) -> std::slice::Iter<'_, TilePattern> {
		self.patterns.iter()
	}
}

impl<'a> IntoIterator for &'a PatternStore {
	type Item = &'a TilePattern;
	type IntoIter = std::slice::Iter<'a, TilePattern>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl Display for PatternStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "PatternStore({} patterns, {} bytes)", self.len(), self.len() * PATTERN_SIZE)
	}
}
