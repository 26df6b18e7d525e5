//! Sprite mapping frames.
//!
//! A mapping frame is the static spatial layout of one animation frame: a list
//! of pieces, each a block of 1-4 × 1-4 tile patterns placed at a signed
//! offset from the sprite's anchor.
//!
//! # Frame layout
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ----------------------------------------------
//! 0x00    2     piece count (u16, big-endian)
//! 0x02    8×n   piece records
//! ```
//!
//! # Piece layout (8 bytes)
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ----------------------------------------------
//! +0x00   1     y offset (i8)
//! +0x01   1     size class: 0000wwhh (width = ww+1, height = hh+1)
//! +0x02   2     pattern word: PCCV Hnnn nnnn nnnn
//!               P = priority, CC = palette line, V/H = flips,
//!               n = pattern index relative to the frame's base
//! +0x04   2     two-player pattern word (kept verbatim)
//! +0x06   2     x offset (i16)
//! ```

use std::{fmt::Display, ops::Range};

use super::{
	constants::{
		FRAME_HEADER_SIZE, HFLIP_BIT, MAPPING_PIECE_SIZE, MAX_PALETTE_LINE, MAX_PIECE_DIMENSION,
		MAX_SIZE_CLASS, PALETTE_MASK, PALETTE_SHIFT, PATTERN_INDEX_MASK, PRIORITY_BIT, VFLIP_BIT,
	},
	error::{DecodeError, EncodeError, RecordError, TableKind},
	table,
};

/// One block of patterns inside a mapping frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingPiece {
	/// First pattern index, relative to the frame's base pattern (0-2047)
	pub pattern_index: u16,
	/// Horizontal pixel offset from the anchor
	pub x_offset: i16,
	/// Vertical pixel offset from the anchor
	pub y_offset: i8,
	/// Width in patterns (1-4)
	pub width: u8,
	/// Height in patterns (1-4)
	pub height: u8,
	/// Horizontal flip
	pub h_flip: bool,
	/// Vertical flip
	pub v_flip: bool,
	/// Palette line (0-3)
	pub palette_line: u8,
	/// Drawn above high-priority planes
	pub priority: bool,
	/// Raw pattern word used in two-player mode
	pub two_player_word: u16,
}

impl MappingPiece {
	/// Creates an unflipped piece on palette line 0.
	pub fn new(pattern_index: u16, x_offset: i16, y_offset: i8, width: u8, height: u8) -> Self {
		Self {
			pattern_index: pattern_index & PATTERN_INDEX_MASK,
			x_offset,
			y_offset,
			width,
			height,
			h_flip: false,
			v_flip: false,
			palette_line: 0,
			priority: false,
			two_player_word: 0,
		}
	}

	/// Returns the piece with the given flip flags.
	pub fn with_flips(mut self, h_flip: bool, v_flip: bool) -> Self {
		self.h_flip = h_flip;
		self.v_flip = v_flip;
		self
	}

	/// Number of patterns the piece covers.
	pub fn pattern_count(&self) -> usize {
		self.width as usize * self.height as usize
	}

	/// Range of relative pattern indices the piece draws from.
	///
	/// Patterns are laid out column-major: `pattern_index + column * height + row`.
	pub fn patterns(&self) -> Range<usize> {
		let start = self.pattern_index as usize;
		start..start + self.pattern_count()
	}

	/// Size of the piece in pixels.
	pub fn pixel_size(&self) -> (u32, u32) {
		(self.width as u32 * 8, self.height as u32 * 8)
	}

	/// Relative pattern index for the tile at (`column`, `row`) inside the piece.
	pub fn pattern_at(&self, column: u8, row: u8) -> Option<usize> {
		if column >= self.width || row >= self.height {
			return None;
		}
		Some(self.pattern_index as usize + column as usize * self.height as usize + row as usize)
	}

	/// Checks that every field fits the 8-byte record.
	///
	/// # Errors
	///
	/// Returns the first field that is out of range.
	pub fn check(&self) -> Result<(), RecordError> {
		if !(1..=MAX_PIECE_DIMENSION).contains(&self.width) {
			return Err(RecordError::PieceWidth(self.width));
		}
		if !(1..=MAX_PIECE_DIMENSION).contains(&self.height) {
			return Err(RecordError::PieceHeight(self.height));
		}
		if self.pattern_index > PATTERN_INDEX_MASK {
			return Err(RecordError::PatternIndex(self.pattern_index));
		}
		if self.palette_line > MAX_PALETTE_LINE {
			return Err(RecordError::PaletteLine(self.palette_line));
		}
		Ok(())
	}

	/// Size class byte (`0000wwhh`). Only meaningful for pieces that pass
	/// [`check`](Self::check).
	pub fn size_class(&self) -> u8 {
		(((self.width.saturating_sub(1)) & 0x03) << 2) | ((self.height.saturating_sub(1)) & 0x03)
	}

	/// Pattern word as stored in the table.
	pub fn pattern_word(&self) -> u16 {
		let mut word = self.pattern_index & PATTERN_INDEX_MASK;
		if self.priority {
			word |= PRIORITY_BIT;
		}
		word |= ((self.palette_line as u16) << PALETTE_SHIFT) & PALETTE_MASK;
		if self.v_flip {
			word |= VFLIP_BIT;
		}
		if self.h_flip {
			word |= HFLIP_BIT;
		}
		word
	}

	/// Parses a piece from an 8-byte record.
	///
	/// `piece` is the index of the record within its frame, used for error reporting.
	///
	/// # Errors
	///
	/// Returns an error if the data is too short or the size class is out of range.
	pub fn from_bytes(data: &[u8], piece: usize) -> Result<Self, DecodeError> {
		if data.len() < MAPPING_PIECE_SIZE {
			return Err(DecodeError::insufficient_data(
				TableKind::Mapping,
				MAPPING_PIECE_SIZE,
				data.len(),
			));
		}

		let size_class = data[1];
		if size_class > MAX_SIZE_CLASS {
			return Err(DecodeError::InvalidSizeClass {
				piece,
				size_class,
			});
		}

		let word = u16::from_be_bytes([data[2], data[3]]);
		Ok(Self {
			pattern_index: word & PATTERN_INDEX_MASK,
			x_offset: i16::from_be_bytes([data[6], data[7]]),
			y_offset: data[0] as i8,
			width: ((size_class >> 2) & 0x03) + 1,
			height: (size_class & 0x03) + 1,
			h_flip: word & HFLIP_BIT != 0,
			v_flip: word & VFLIP_BIT != 0,
			palette_line: ((word & PALETTE_MASK) >> PALETTE_SHIFT) as u8,
			priority: word & PRIORITY_BIT != 0,
			two_player_word: u16::from_be_bytes([data[4], data[5]]),
		})
	}

	/// Converts the piece to its 8-byte record.
	///
	/// # Errors
	///
	/// Returns an error if a field does not fit the record; see [`check`](Self::check).
	pub fn to_bytes(&self) -> Result<[u8; MAPPING_PIECE_SIZE], RecordError> {
		self.check()?;

		let mut bytes = [0u8; MAPPING_PIECE_SIZE];
		bytes[0] = self.y_offset as u8;
		bytes[1] = self.size_class();
		bytes[2..4].copy_from_slice(&self.pattern_word().to_be_bytes());
		bytes[4..6].copy_from_slice(&self.two_player_word.to_be_bytes());
		bytes[6..8].copy_from_slice(&self.x_offset.to_be_bytes());
		Ok(bytes)
	}
}

impl Display for MappingPiece {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}x{} @ ({}, {}) pattern={} pal={}{}{}{}",
			self.width,
			self.height,
			self.x_offset,
			self.y_offset,
			self.pattern_index,
			self.palette_line,
			if self.h_flip { " H" } else { "" },
			if self.v_flip { " V" } else { "" },
			if self.priority { " P" } else { "" },
		)
	}
}

/// Pixel-space bounding box of a mapping frame, relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameBounds {
	/// Left edge (inclusive)
	pub left: i32,
	/// Top edge (inclusive)
	pub top: i32,
	/// Right edge (exclusive)
	pub right: i32,
	/// Bottom edge (exclusive)
	pub bottom: i32,
}

impl FrameBounds {
	/// Width in pixels.
	pub fn width(&self) -> u32 {
		(self.right - self.left).max(0) as u32
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		(self.bottom - self.top).max(0) as u32
	}
}

/// Ordered list of pieces forming one visual frame.
///
/// A mapping frame has no duration of its own; timing lives in the
/// animation set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MappingFrame {
	pieces: Vec<MappingPiece>,
}

impl MappingFrame {
	/// Creates an empty frame.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a frame from a list of pieces.
	pub fn from_pieces(pieces: Vec<MappingPiece>) -> Self {
		Self {
			pieces,
		}
	}

	/// Returns the pieces in draw order.
	pub fn pieces(&self) -> &[MappingPiece] {
		&self.pieces
	}

	/// Appends a piece.
	pub fn add_piece(&mut self, piece: MappingPiece) {
		self.pieces.push(piece);
	}

	/// Number of pieces.
	pub fn len(&self) -> usize {
		self.pieces.len()
	}

	/// Returns `true` if the frame draws nothing.
	pub fn is_empty(&self) -> bool {
		self.pieces.is_empty()
	}

	/// One past the highest relative pattern index any piece uses.
	///
	/// This is the number of pattern slots that must be resident for the
	/// frame to draw correctly.
	pub fn pattern_span(&self) -> usize {
		self.pieces.iter().map(|p| p.patterns().end).max().unwrap_or(0)
	}

	/// Bounding box of all pieces, or `None` for an empty frame.
	pub fn bounds(&self) -> Option<FrameBounds> {
		self.pieces.iter().fold(None, |acc, piece| {
			let (w, h) = piece.pixel_size();
			let left = piece.x_offset as i32;
			let top = piece.y_offset as i32;
			let piece_bounds = FrameBounds {
				left,
				top,
				right: left + w as i32,
				bottom: top + h as i32,
			};
			Some(match acc {
				None => piece_bounds,
				Some(b) => FrameBounds {
					left: b.left.min(piece_bounds.left),
					top: b.top.min(piece_bounds.top),
					right: b.right.max(piece_bounds.right),
					bottom: b.bottom.max(piece_bounds.bottom),
				},
			})
		})
	}

	/// Byte size of the encoded frame.
	pub fn byte_size(&self) -> usize {
		FRAME_HEADER_SIZE + self.pieces.len() * MAPPING_PIECE_SIZE
	}

	/// Decodes a mapping frame: a piece count followed by that many records.
	///
	/// Trailing bytes after the last piece are ignored.
	///
	/// # Errors
	///
	/// Returns an error on truncated input or an out-of-range size class.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
		let count = table::read_u16(data, 0, TableKind::Mapping)? as usize;
		let expected = FRAME_HEADER_SIZE + count * MAPPING_PIECE_SIZE;
		if data.len() < expected {
			return Err(DecodeError::insufficient_data(TableKind::Mapping, expected, data.len()));
		}

		let pieces = data[FRAME_HEADER_SIZE..expected]
			.chunks_exact(MAPPING_PIECE_SIZE)
			.enumerate()
			.map(|(i, record)| MappingPiece::from_bytes(record, i))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			pieces,
		})
	}

	/// Encodes the frame.
	///
	/// # Errors
	///
	/// Returns an error if the frame holds more than 65535 pieces or a piece
	/// does not fit its record.
	pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
		let count = u16::try_from(self.pieces.len()).map_err(|_| EncodeError::TooManyRecords {
			table: TableKind::Mapping,
			count: self.pieces.len(),
		})?;

		let mut bytes = Vec::with_capacity(self.byte_size());
		bytes.extend_from_slice(&count.to_be_bytes());
		for (record, piece) in self.pieces.iter().enumerate() {
			let piece = piece.to_bytes().map_err(|source| EncodeError::InvalidRecord {
				table: TableKind::Mapping,
				record,
				source,
			})?;
			bytes.extend_from_slice(&piece);
		}
		Ok(bytes)
	}
}

impl Display for MappingFrame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "MappingFrame({} pieces, {} patterns)", self.pieces.len(), self.pattern_span())
	}
}

/// Decodes a single mapping frame.
///
/// # Errors
///
/// See [`MappingFrame::from_bytes`].
pub fn decode_mapping_frame(data: &[u8]) -> Result<MappingFrame, DecodeError> {
	MappingFrame::from_bytes(data)
}

/// Decodes a whole mapping table (offset header + frames).
///
/// # Errors
///
/// Returns an error if the offset header or any frame is malformed.
pub fn decode_mapping_table(data: &[u8]) -> Result<Vec<MappingFrame>, DecodeError> {
	table::decode_table(data, TableKind::Mapping, MappingFrame::from_bytes)
}

/// Encodes frames as a mapping table; identical frames share one record.
///
/// # Errors
///
/// Returns an error if the table would not fit 16-bit offsets.
pub fn encode_mapping_table(frames: &[MappingFrame]) -> Result<Vec<u8>, EncodeError> {
	let encoded = frames.iter().map(MappingFrame::to_bytes).collect::<Result<Vec<_>, _>>()?;
	table::encode_table(&encoded, TableKind::Mapping)
}
