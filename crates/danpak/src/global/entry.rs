use std::{fmt, io::Read};

use super::{error::*, header::MAX_HEADER_SIZE};

/// Size of the initialization vector stored with every entry
pub const BLOCK_SIZE: usize = 16;

/// Header written immediately before the stored bytes of an entry.
/// Used both for files ([`FileHeader`]) and for the directory tree blob ([`DirectoryHeader`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryHeader {
	/// Size of the data before compression and encryption
	pub uncompressed_size: u64,
	/// Size of the stored bytes, after compression and encryption
	pub compressed_size: u64,
	/// Reserved checksum, always written as 0
	pub crc: u32,
	/// The CBC initialization vector for this entry, stored in the clear
	pub block: [u8; BLOCK_SIZE],
}

/// Header of a single packed file
pub type FileHeader = EntryHeader;

/// Header of the serialized directory tree
pub type DirectoryHeader = EntryHeader;

impl EntryHeader {
	/// 8(uncompressed) + 8(compressed) + 4(crc) + 16(block)
	pub const BASE_SIZE: usize = 8 + 8 + 4 + BLOCK_SIZE;

	/// Reads an entry header spanning `declared_size` bytes, as announced by the archive header.
	/// Bytes past [`EntryHeader::BASE_SIZE`] belong to newer writers and are skipped.
	pub(crate) fn from_handle<T: Read>(mut handle: T, declared_size: u64) -> InternalResult<EntryHeader> {
		if declared_size < Self::BASE_SIZE as u64 || declared_size > MAX_HEADER_SIZE {
			return Err(InternalError::MalformedHeader(format!(
				"Entry header declares an impossible size: {}",
				declared_size
			)));
		};

		let mut buffer = vec![0u8; declared_size as usize];
		handle.read_exact(&mut buffer)?;

		Ok(EntryHeader {
			uncompressed_size: u64::from_le_bytes(buffer[0..8].try_into().unwrap()),
			compressed_size: u64::from_le_bytes(buffer[8..16].try_into().unwrap()),
			crc: u32::from_le_bytes(buffer[16..20].try_into().unwrap()),
			block: buffer[20..36].try_into().unwrap(),
		})
	}

	pub(crate) fn to_bytes(&self) -> [u8; EntryHeader::BASE_SIZE] {
		let mut buffer = [0u8; EntryHeader::BASE_SIZE];
		buffer[0..8].copy_from_slice(&self.uncompressed_size.to_le_bytes());
		buffer[8..16].copy_from_slice(&self.compressed_size.to_le_bytes());
		buffer[16..20].copy_from_slice(&self.crc.to_le_bytes());
		buffer[20..36].copy_from_slice(&self.block);
		buffer
	}
}

impl fmt::Display for EntryHeader {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"[EntryHeader] stored: {}B, original: {}B, crc: {:#010x}",
			self.compressed_size, self.uncompressed_size, self.crc
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn entry_header_with_extension() {
		let header = EntryHeader {
			uncompressed_size: 37 * 1024,
			compressed_size: 2048,
			crc: 0,
			block: [7; BLOCK_SIZE],
		};

		let mut bytes = header.to_bytes().to_vec();
		bytes.extend_from_slice(&[1, 2, 3, 4]);

		let parsed = EntryHeader::from_handle(bytes.as_slice(), bytes.len() as u64).unwrap();
		assert_eq!(parsed, header);

		assert!(EntryHeader::from_handle(bytes.as_slice(), 12).is_err());
	}
}
