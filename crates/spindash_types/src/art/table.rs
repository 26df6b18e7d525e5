//! Offset-table framing shared by mapping and DPLC tables.
//!
//! ```text
//! Offset  Size    Field
//! ------  ------  -----------------------------------------------
//! 0x00    2 × n   u16 offsets (big-endian), relative to table start
//! ...     var     frame records
//! ```
//!
//! The frame count is implied by the lowest offset: `n = min(offsets) / 2`.
//! Entries need not be in record order, and several may point at the same
//! frame record.

use std::collections::HashMap;

use super::{
	constants::OFFSET_ENTRY_SIZE,
	error::{DecodeError, EncodeError, TableKind},
};

pub(crate) fn read_u16(data: &[u8], offset: usize, table: TableKind) -> Result<u16, DecodeError> {
	match data.get(offset..offset + 2) {
		Some(bytes) => Ok(u16::from_be_bytes([bytes[0], bytes[1]])),
		None => Err(DecodeError::insufficient_data(table, offset + 2, data.len())),
	}
}

/// Reads the offset header of a table and returns one offset per frame.
///
/// The header ends where the lowest frame offset begins, so it is read entry
/// by entry until that point.
pub(crate) fn read_offsets(data: &[u8], table: TableKind) -> Result<Vec<usize>, DecodeError> {
	if data.is_empty() {
		return Ok(Vec::new());
	}

	let mut header_end = usize::MAX;
	let mut offsets = Vec::new();
	while offsets.len() * OFFSET_ENTRY_SIZE < header_end {
		let frame = offsets.len();
		let position = frame * OFFSET_ENTRY_SIZE;
		let offset = read_u16(data, position, table)? as usize;

		if offset % OFFSET_ENTRY_SIZE != 0 || offset < position + OFFSET_ENTRY_SIZE {
			return Err(DecodeError::invalid_offset_table(
				table,
				format!("frame {frame} offset 0x{offset:04X} is odd or points into the offset header"),
			));
		}
		if offset >= data.len() {
			return Err(DecodeError::invalid_offset_table(
				table,
				format!("frame {frame} offset 0x{offset:04X} is past the end of the table"),
			));
		}

		header_end = header_end.min(offset);
		offsets.push(offset);
	}
	Ok(offsets)
}

/// Decodes every frame of an offset table with `decode`.
pub(crate) fn decode_table<T>(
	data: &[u8],
	table: TableKind,
	decode: impl Fn(&[u8]) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
	read_offsets(data, table)?.into_iter().map(|offset| decode(&data[offset..])).collect()
}

/// Lays out encoded frames behind an offset header.
///
/// Identical frames are stored once and share an offset.
pub(crate) fn encode_table(frames: &[Vec<u8>], table: TableKind) -> Result<Vec<u8>, EncodeError> {
	let header_size = frames.len() * OFFSET_ENTRY_SIZE;
	let mut header = Vec::with_capacity(header_size);
	let mut body: Vec<u8> = Vec::new();
	let mut placed: HashMap<&[u8], usize> = HashMap::new();

	for frame in frames {
		let offset = match placed.get(frame.as_slice()) {
			Some(&offset) => offset,
			None => {
				let offset = header_size + body.len();
				body.extend_from_slice(frame);
				placed.insert(frame.as_slice(), offset);
				offset
			}
		};

		let offset = u16::try_from(offset).map_err(|_| EncodeError::TableTooLarge {
			table,
			size: header_size + body.len(),
		})?;
		header.extend_from_slice(&offset.to_be_bytes());
	}

	header.extend_from_slice(&body);
	Ok(header)
}
