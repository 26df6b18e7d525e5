//! Byte-source access to a game's data image.
//!
//! Everything above this crate only ever asks for "`size` bytes at `offset`".
//! The [`ByteSource`] trait captures that contract; [`MemoryImage`] serves a
//! fully loaded image and [`FileImage`] reads ranges straight from disk.

use std::{
	fs,
	io::{self, Read, Seek, SeekFrom},
	path::{Path, PathBuf},
	sync::Mutex,
};

use log::trace;
use thiserror::Error;

/// Errors raised by a byte source.
#[derive(Debug, Error)]
pub enum VfsError {
	/// The requested range does not fit inside the image
	#[error("Byte range out of bounds: offset 0x{offset:06X} + {size} bytes exceeds image size {len}")]
	OutOfRange {
		/// Requested start offset
		offset: usize,
		/// Requested number of bytes
		size: usize,
		/// Total length of the image
		len: usize,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Something that can hand out byte ranges of a data image.
pub trait ByteSource {
	/// Reads exactly `size` bytes starting at `offset`.
	///
	/// # Errors
	///
	/// Returns [`VfsError::OutOfRange`] on a short read or an invalid range.
	fn read_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>, VfsError>;

	/// Total length of the image in bytes.
	fn len(&self) -> usize;

	/// Returns `true` when the image holds no bytes.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
	fn read_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>, VfsError> {
		(**self).read_bytes(offset, size)
	}

	fn len(&self) -> usize {
		(**self).len()
	}
}

fn check_range(offset: usize, size: usize, len: usize) -> Result<(), VfsError> {
	match offset.checked_add(size) {
		Some(end) if end <= len => Ok(()),
		_ => Err(VfsError::OutOfRange {
			offset,
			size,
			len,
		}),
	}
}

/// A data image held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MemoryImage {
	data: Vec<u8>,
}

impl MemoryImage {
	/// Wraps an owned byte buffer.
	pub fn new(data: Vec<u8>) -> Self {
		Self {
			data,
		}
	}

	/// Reads a whole image file into memory.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, VfsError> {
		let data = fs::read(path)?;
		Ok(Self::new(data))
	}

	/// Loads an image from any reader
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, VfsError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Ok(Self::new(data))
	}

	/// Returns the raw bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}
}

impl From<Vec<u8>> for MemoryImage {
	fn from(data: Vec<u8>) -> Self {
		Self::new(data)
	}
}

impl ByteSource for MemoryImage {
	fn read_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>, VfsError> {
		check_range(offset, size, self.data.len())?;
		trace!("memory image read: 0x{offset:06X}+{size}");
		Ok(self.data[offset..offset + size].to_vec())
	}

	fn len(&self) -> usize {
		self.data.len()
	}
}

/// A data image read lazily from disk.
///
/// The file handle sits behind a mutex so reads work through `&self`.
#[derive(Debug)]
pub struct FileImage {
	path: PathBuf,
	file: Mutex<fs::File>,
	len: usize,
}

impl FileImage {
	/// Opens the image at `path`.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, VfsError> {
		let path = path.as_ref().to_path_buf();
		let file = fs::File::open(&path)?;
		let len = file.metadata()?.len() as usize;
		Ok(Self {
			path,
			file: Mutex::new(file),
			len,
		})
	}

	/// Path the image was opened from.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ByteSource for FileImage {
	fn read_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>, VfsError> {
		check_range(offset, size, self.len)?;

		let mut file = self.file.lock().map_err(|_| io::Error::other("image file lock poisoned"))?;
		file.seek(SeekFrom::Start(offset as u64))?;
		let mut buf = vec![0u8; size];
		file.read_exact(&mut buf).map_err(|e| match e.kind() {
			io::ErrorKind::UnexpectedEof => VfsError::OutOfRange {
				offset,
				size,
				len: self.len,
			},
			_ => VfsError::Io(e),
		})?;

		trace!("file image read: {} 0x{offset:06X}+{size}", self.path.display());
		Ok(buf)
	}

	fn len(&self) -> usize {
		self.len
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_memory_image_reads_range() {
		let image = MemoryImage::new((0u8..16).collect());
		assert_eq!(image.read_bytes(4, 3).unwrap(), vec![4, 5, 6]);
		assert_eq!(image.read_bytes(16, 0).unwrap(), Vec::<u8>::new());
	}

	#[test]
	fn test_memory_image_short_read() {
		let image = MemoryImage::new(vec![0; 8]);
		let err = image.read_bytes(6, 4).unwrap_err();
		assert!(matches!(
			err,
			VfsError::OutOfRange {
				offset: 6,
				size: 4,
				len: 8
			}
		));
	}

	#[test]
	fn test_memory_image_overflowing_range() {
		let image = MemoryImage::new(vec![0; 8]);
		assert!(image.read_bytes(usize::MAX, 2).is_err());
	}

	#[test]
	fn test_file_image_reads_range() {
		let path = std::env::temp_dir().join(format!("spindash_vfs_{}.bin", std::process::id()));
		fs::write(&path, [0xAA, 0xBB, 0xCC, 0xDD]).unwrap();

		let image = FileImage::open(&path).unwrap();
		assert_eq!(image.len(), 4);
		assert_eq!(image.read_bytes(1, 2).unwrap(), vec![0xBB, 0xCC]);
		assert!(image.read_bytes(3, 2).is_err());

		fs::remove_file(&path).unwrap();
	}
}
