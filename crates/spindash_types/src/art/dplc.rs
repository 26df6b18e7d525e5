//! Dynamic pattern load cues (DPLC).
//!
//! A DPLC frame lists the runs of source patterns that must be copied into a
//! sprite's pattern bank before the mapping frame at the same index can be
//! drawn. Runs are loaded back to back, so the mapping frame's relative
//! pattern indices address the concatenation of all runs.
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ----------------------------------------------
//! 0x00    2     entry count (u16, big-endian)
//! 0x02    2×n   entries: CCCC iiii iiii iiii
//!               C = run length - 1, i = source pattern index
//! ```

use std::fmt::Display;

use super::{
	constants::{DPLC_COUNT_SHIFT, DPLC_ENTRY_SIZE, DPLC_INDEX_MASK, DPLC_MAX_RUN, FRAME_HEADER_SIZE},
	error::{DecodeError, EncodeError, RecordError, TableKind},
	pattern::{PatternStore, TilePattern},
	table,
};

/// A contiguous run of source patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DplcEntry {
	/// Number of patterns in the run (1-16)
	pub count: u8,
	/// Index of the first source pattern (0-4095)
	pub source_index: u16,
}

impl DplcEntry {
	/// Creates a new entry.
	pub fn new(count: u8, source_index: u16) -> Self {
		Self {
			count,
			source_index: source_index & DPLC_INDEX_MASK,
		}
	}

	/// Range of source pattern indices covered by the run.
	pub fn sources(&self) -> std::ops::Range<usize> {
		let start = self.source_index as usize;
		start..start + self.count as usize
	}

	/// Decodes an entry from its 16-bit word.
	pub fn from_word(word: u16) -> Self {
		Self {
			count: (word >> DPLC_COUNT_SHIFT) as u8 + 1,
			source_index: word & DPLC_INDEX_MASK,
		}
	}

	/// Checks that the run fits a 16-bit entry word.
	///
	/// # Errors
	///
	/// Returns an error for run lengths outside 1-16 or source indices above 0xFFF.
	pub fn check(&self) -> Result<(), RecordError> {
		if !(1..=DPLC_MAX_RUN).contains(&self.count) {
			return Err(RecordError::RunLength(self.count));
		}
		if self.source_index > DPLC_INDEX_MASK {
			return Err(RecordError::SourceIndex(self.source_index));
		}
		Ok(())
	}

	/// Encodes the entry as its 16-bit word.
	///
	/// # Errors
	///
	/// See [`check`](Self::check).
	pub fn to_word(&self) -> Result<u16, RecordError> {
		self.check()?;
		Ok((u16::from(self.count - 1) << DPLC_COUNT_SHIFT) | self.source_index)
	}
}

impl Display for DplcEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}×@{}", self.count, self.source_index)
	}
}

/// Load list for one logical animation frame.
///
/// An empty DPLC frame means nothing has to be loaded dynamically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DplcFrame {
	entries: Vec<DplcEntry>,
}

impl DplcFrame {
	/// Creates an empty frame.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a frame from entries.
	pub fn from_entries(entries: Vec<DplcEntry>) -> Self {
		Self {
			entries,
		}
	}

	/// Returns the load entries in order.
	pub fn entries(&self) -> &[DplcEntry] {
		&self.entries
	}

	/// Appends a run.
	pub fn add_entry(&mut self, entry: DplcEntry) {
		self.entries.push(entry);
	}

	/// Number of runs.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the frame loads nothing.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Total number of patterns loaded by all runs.
	pub fn total_patterns(&self) -> usize {
		self.entries.iter().map(|e| e.count as usize).sum()
	}

	/// One past the highest source pattern index referenced.
	pub fn source_span(&self) -> usize {
		self.entries.iter().map(|e| e.sources().end).max().unwrap_or(0)
	}

	/// Source pattern indices in bank order.
	pub fn source_indices(&self) -> impl Iterator<Item = usize> + '_ {
		self.entries.iter().flat_map(DplcEntry::sources)
	}

	/// Resolves the runs against a pattern store, yielding the patterns to
	/// upload in bank order.
	///
	/// Returns `None` if a run points past the end of the store.
	pub fn resolve<'a>(&self, patterns: &'a PatternStore) -> Option<Vec<&'a TilePattern>> {
		self.source_indices().map(|i| patterns.get(i)).collect()
	}

	/// Byte size of the encoded frame.
	pub fn byte_size(&self) -> usize {
		FRAME_HEADER_SIZE + self.entries.len() * DPLC_ENTRY_SIZE
	}

	/// Decodes a DPLC frame: a run count followed by that many entries.
	///
	/// # Errors
	///
	/// Returns an error on truncated input.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
		let count = table::read_u16(data, 0, TableKind::Dplc)? as usize;
		let expected = FRAME_HEADER_SIZE + count * DPLC_ENTRY_SIZE;
		if data.len() < expected {
			return Err(DecodeError::insufficient_data(TableKind::Dplc, expected, data.len()));
		}

		let entries = data[FRAME_HEADER_SIZE..expected]
			.chunks_exact(DPLC_ENTRY_SIZE)
			.map(|w| DplcEntry::from_word(u16::from_be_bytes([w[0], w[1]])))
			.collect();

		Ok(Self {
			entries,
		})
	}

	/// Encodes the frame.
	///
	/// # Errors
	///
	/// Returns an error if the frame holds more than 65535 entries or an entry
	/// does not fit its 16-bit word.
	pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
		let count = u16::try_from(self.entries.len()).map_err(|_| EncodeError::TooManyRecords {
			table: TableKind::Dplc,
			count: self.entries.len(),
		})?;

		let mut bytes = Vec::with_capacity(self.byte_size());
		bytes.extend_from_slice(&count.to_be_bytes());
		for (record, entry) in self.entries.iter().enumerate() {
			let word = entry.to_word().map_err(|source| EncodeError::InvalidRecord {
				table: TableKind::Dplc,
				record,
				source,
			})?;
			bytes.extend_from_slice(&word.to_be_bytes());
		}
		Ok(bytes)
	}
}

impl Display for DplcFrame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "DplcFrame({} runs, {} patterns)", self.entries.len(), self.total_patterns())
	}
}

/// Decodes a single DPLC frame.
///
/// # Errors
///
/// See [`DplcFrame::from_bytes`].
pub fn decode_dplc_frame(data: &[u8]) -> Result<DplcFrame, DecodeError> {
	DplcFrame::from_bytes(data)
}

/// Decodes a whole DPLC table (offset header + frames).
///
/// # Errors
///
/// Returns an error if the offset header or any frame is malformed.
pub fn decode_dplc_table(data: &[u8]) -> Result<Vec<DplcFrame>, DecodeError> {
	table::decode_table(data, TableKind::Dplc, DplcFrame::from_bytes)
}

/// Encodes frames as a DPLC table; identical frames share one record.
///
/// # Errors
///
/// Returns an error if the table would not fit 16-bit offsets.
pub fn encode_dplc_table(frames: &[DplcFrame]) -> Result<Vec<u8>, EncodeError> {
	let encoded = frames.iter().map(DplcFrame::to_bytes).collect::<Result<Vec<_>, _>>()?;
	table::encode_table(&encoded, TableKind::Dplc)
}
