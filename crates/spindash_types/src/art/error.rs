//! Error types for art table decoding, bundle validation and asset loading.

use std::fmt::Display;

use spindash_vfs::VfsError;
use thiserror::Error;

/// Kind of binary table being decoded, used to give errors context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
	/// 4bpp tile patterns
	Patterns,
	/// Sprite mapping frames
	Mapping,
	/// Dynamic pattern load cues
	Dplc,
	/// Compact animation scripts
	AnimationScript,
}

impl Display for TableKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TableKind::Patterns => write!(f, "patterns"),
			TableKind::Mapping => write!(f, "mappings"),
			TableKind::Dplc => write!(f, "DPLC"),
			TableKind::AnimationScript => write!(f, "animation script"),
		}
	}
}

/// Errors that can occur when decoding a binary art table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	/// Not enough data to parse
	#[error("Insufficient {table} data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Table being decoded
		table: TableKind,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Pattern data length is not a whole number of patterns
	#[error("Pattern data length {len} is not a multiple of {pattern_size} bytes")]
	MisalignedPatternData {
		/// Length of the supplied data
		len: usize,
		/// Size of a single pattern
		pattern_size: usize,
	},

	/// Mapping piece with an unknown size class
	#[error("Invalid size class 0x{size_class:02X} in mapping piece {piece}")]
	InvalidSizeClass {
		/// Index of the offending piece within its frame
		piece: usize,
		/// Raw size class byte
		size_class: u8,
	},

	/// Offset table header of a mapping or DPLC table is malformed
	#[error("Invalid {table} offset table: {message}")]
	InvalidOffsetTable {
		/// Table being decoded
		table: TableKind,
		/// Description of the problem
		message: String,
	},

	/// Animation script contains an unsupported command byte
	#[error("Invalid animation script command 0x{command:02X} at byte {position}")]
	InvalidScriptCommand {
		/// Command byte
		command: u8,
		/// Byte position within the script
		position: usize,
	},

	/// Animation script has no frames before its terminator
	#[error("Animation script contains no frames")]
	EmptyScript,
}

impl DecodeError {
	/// Creates an [`DecodeError::InsufficientData`] error.
	pub fn insufficient_data(table: TableKind, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			table,
			expected,
			actual,
		}
	}

	/// Creates an [`DecodeError::InvalidOffsetTable`] error.
	pub fn invalid_offset_table(table: TableKind, message: impl Into<String>) -> Self {
		Self::InvalidOffsetTable {
			table,
			message: message.into(),
		}
	}
}

/// A mapping piece or DPLC entry field that does not fit its binary record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
	/// Piece width outside 1-4 patterns
	#[error("piece width {0} is outside 1-4 patterns")]
	PieceWidth(u8),

	/// Piece height outside 1-4 patterns
	#[error("piece height {0} is outside 1-4 patterns")]
	PieceHeight(u8),

	/// Pattern index wider than 11 bits
	#[error("pattern index {0} exceeds 0x7FF")]
	PatternIndex(u16),

	/// Palette line above 3
	#[error("palette line {0} exceeds 3")]
	PaletteLine(u8),

	/// DPLC run length outside 1-16 patterns
	#[error("run length {0} is outside 1-16 patterns")]
	RunLength(u8),

	/// DPLC source index wider than 12 bits
	#[error("source pattern index {0} exceeds 0xFFF")]
	SourceIndex(u16),
}

/// Errors that can occur when encoding an art table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
	/// Encoded table does not fit the 16-bit offset header
	#[error("Encoded {table} table is {size} bytes, exceeding the 16-bit offset range")]
	TableTooLarge {
		/// Table being encoded
		table: TableKind,
		/// Size the table would need
		size: usize,
	},

	/// Frame holds more records than its 16-bit count can describe
	#[error("{table} frame holds {count} records, exceeding the 16-bit count")]
	TooManyRecords {
		/// Table being encoded
		table: TableKind,
		/// Number of records in the frame
		count: usize,
	},

	/// A record holds a value its binary layout cannot represent
	#[error("{table} record {record} cannot be encoded: {source}")]
	InvalidRecord {
		/// Table being encoded
		table: TableKind,
		/// Index of the record within its frame
		record: usize,
		/// Offending field
		source: RecordError,
	},
}

/// Errors raised when a sprite art bundle violates one of its invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A mapping piece or DPLC entry does not fit its binary record
	#[error("Frame {frame} {table} record {record} is invalid: {source}")]
	InvalidRecord {
		/// Frame index
		frame: usize,
		/// Table the record belongs to
		table: TableKind,
		/// Index of the record within its frame
		record: usize,
		/// Offending field
		source: RecordError,
	},

	/// Mapping and DPLC sequences differ in length
	#[error("Frame count mismatch: {mapping} mapping frames, {dplc} DPLC frames")]
	LengthMismatch {
		/// Number of mapping frames
		mapping: usize,
		/// Number of DPLC frames
		dplc: usize,
	},

	/// An animation step refers to a frame that does not exist
	#[error(
		"Animation '{animation}' step {step} refers to frame {frame}, but only {frame_count} frames exist"
	)]
	FrameOutOfRange {
		/// Animation name
		animation: String,
		/// Step index within the animation
		step: usize,
		/// Referenced frame index
		frame: usize,
		/// Number of frames in the bundle
		frame_count: usize,
	},

	/// An animation step uses a frame its profile does not allow
	#[error("Animation '{animation}' step {step} uses frame {frame}, which its profile does not allow")]
	FrameNotAllowed {
		/// Animation name
		animation: String,
		/// Step index within the animation
		step: usize,
		/// Referenced frame index
		frame: usize,
	},

	/// The animation set contains an animation the profile does not declare
	#[error("Animation '{0}' is not declared in the animation profile")]
	UndeclaredAnimation(String),

	/// The profile declares an animation with no sequence in the set
	#[error("Animation '{0}' is declared in the profile but has no sequence")]
	MissingSequence(String),

	/// An animation sequence has no steps
	#[error("Animation '{0}' has no steps")]
	EmptyAnimation(String),

	/// Loop target is outside the sequence or the profile's loop range
	#[error("Animation '{animation}' loops to step {target}, which is not allowed")]
	InvalidLoopTarget {
		/// Animation name
		animation: String,
		/// Requested loop target
		target: usize,
	},

	/// Mapping frame references patterns its DPLC frame never loads
	#[error(
		"Frame {frame} references {required} patterns, but its DPLC frame only loads {loaded}"
	)]
	UncoveredPatterns {
		/// Frame index
		frame: usize,
		/// Number of pattern slots the mapping frame needs
		required: usize,
		/// Number of patterns the DPLC frame loads
		loaded: usize,
	},

	/// DPLC frame loads more patterns than the bank can hold
	#[error("Frame {frame} loads {loaded} patterns, exceeding the bank size of {bank_size}")]
	BankOverflow {
		/// Frame index
		frame: usize,
		/// Number of patterns the DPLC frame loads
		loaded: usize,
		/// Bank size of the bundle
		bank_size: usize,
	},

	/// Pattern reference points past the end of the pattern store
	#[error("Frame {frame} references pattern {pattern}, but only {pattern_count} patterns exist")]
	PatternOutOfRange {
		/// Frame index
		frame: usize,
		/// Last referenced pattern index
		pattern: usize,
		/// Number of decoded patterns
		pattern_count: usize,
	},
}

/// Errors that can occur while loading sprite art from a data image
#[derive(Debug, Error)]
pub enum LoadError {
	/// Byte-source read failure
	#[error(transparent)]
	Io(#[from] VfsError),

	/// Malformed binary table
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Bundle invariant violated
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Manifest could not be read or deserialized
	#[error(transparent)]
	Config(#[from] config::ConfigError),

	/// Manifest has no entry with the requested name
	#[error("Unknown sprite art '{0}'")]
	UnknownSprite(String),
}
