use std::io::Read;

use super::{compressor::CompressionAlgorithm, entry::EntryHeader, error::*, flags::Flags};
use crate::crypto::EncryptionAlgorithm;

// Upper bound on any header we're willing to buffer, newer writers may append fields but never this many
pub(crate) const MAX_HEADER_SIZE: u64 = 64 * 1024;

/// The fixed-size header at the very start of every archive.
/// Written once as a placeholder, then rewritten after packing with the real [`dir_header_loc`](ArchiveHeader::dir_header_loc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
	/// Size of this header as produced by the writer. Readers always trust the stream's value
	pub header_size: u64,
	/// Size of every [`FileHeader`](crate::global::entry::FileHeader) in this archive
	pub file_header_size: u64,
	/// Size of the [`DirectoryHeader`](crate::global::entry::DirectoryHeader), or the byte length of the raw tree when `min_version == 0`
	pub dir_header_size: u64,
	/// Format version of the writer
	pub version: u16,
	/// Lowest format version a reader must understand to parse this archive
	pub min_version: u16,
	/// Cipher applied to every entry and to the directory tree
	pub encryption: EncryptionAlgorithm,
	/// Compression applied to every entry and to the directory tree
	pub compression: CompressionAlgorithm,
	/// Compression level, 0-9
	pub level: u8,
	/// Archive wide flags
	pub flags: Flags,
	/// Absolute offset of the directory header, 0 for single-file and legacy archives
	pub dir_header_loc: u64,
}

impl Default for ArchiveHeader {
	#[inline(always)]
	fn default() -> ArchiveHeader {
		ArchiveHeader {
			header_size: ArchiveHeader::BASE_SIZE as u64,
			file_header_size: EntryHeader::BASE_SIZE as u64,
			dir_header_size: EntryHeader::BASE_SIZE as u64,
			version: crate::VERSION,
			min_version: crate::MIN_VERSION,
			encryption: EncryptionAlgorithm::default(),
			compression: CompressionAlgorithm::default(),
			level: 9,
			flags: Flags::default(),
			dir_header_loc: 0,
		}
	}
}

impl ArchiveHeader {
	/// Size of the header as written by this implementation
	pub const BASE_SIZE: usize = Self::SIZES_SIZE + Self::VERSIONS_SIZE + Self::CODECS_SIZE + Flags::BYTES + Self::LOCATION_SIZE;

	// Data appears in this order
	pub(crate) const SIZES_SIZE: usize = 3 * 8;
	pub(crate) const VERSIONS_SIZE: usize = 2 * 2;
	pub(crate) const CODECS_SIZE: usize = 3;
	pub(crate) const LOCATION_SIZE: usize = 8;

	/// Byte offset just past the `min_version` field, all a version probe ever needs to read
	pub(crate) const MIN_VERSION_END: usize = Self::SIZES_SIZE + Self::VERSIONS_SIZE;

	/// Rejects sources whose `min_version` this implementation doesn't understand
	pub(crate) fn validate_version(min_version: u16) -> InternalResult {
		if min_version > crate::VERSION {
			return Err(InternalError::UnsupportedVersion(min_version));
		};

		Ok(())
	}

	/// Reads a size-prefixed header: the first 8 bytes declare how many bytes the header spans.
	/// Trailing fields from newer writers are skipped over.
	pub(crate) fn from_handle<T: Read>(mut handle: T) -> InternalResult<ArchiveHeader> {
		let mut size_bytes = [0u8; 8];
		handle.read_exact(&mut size_bytes)?;
		let header_size = u64::from_le_bytes(size_bytes);

		if header_size < Self::MIN_VERSION_END as u64 || header_size > MAX_HEADER_SIZE {
			return Err(InternalError::MalformedHeader(format!(
				"Archive header declares an impossible size: {}",
				header_size
			)));
		};

		let mut buffer = vec![0u8; header_size as usize];
		buffer[0..8].copy_from_slice(&size_bytes);
		handle.read_exact(&mut buffer[8..])?;

		// Version gating happens before any other field is interpreted
		let min_version = u16::from_le_bytes(buffer[26..28].try_into().unwrap());
		Self::validate_version(min_version)?;

		if buffer.len() < Self::BASE_SIZE {
			return Err(InternalError::MalformedHeader(format!(
				"Archive header is {} bytes long, expected at least {}",
				buffer.len(),
				Self::BASE_SIZE
			)));
		};

		Ok(ArchiveHeader {
			header_size,
			file_header_size: u64::from_le_bytes(buffer[8..16].try_into().unwrap()),
			dir_header_size: u64::from_le_bytes(buffer[16..24].try_into().unwrap()),
			version: u16::from_le_bytes(buffer[24..26].try_into().unwrap()),
			min_version,
			encryption: EncryptionAlgorithm::try_from(buffer[28])?,
			compression: CompressionAlgorithm::try_from(buffer[29])?,
			level: buffer[30],
			flags: Flags::from_bits(u32::from_le_bytes(buffer[31..35].try_into().unwrap())),
			dir_header_loc: u64::from_le_bytes(buffer[35..43].try_into().unwrap()),
		})
	}

	pub(crate) fn to_bytes(&self) -> [u8; ArchiveHeader::BASE_SIZE] {
		let mut buffer: [u8; ArchiveHeader::BASE_SIZE] = [0u8; ArchiveHeader::BASE_SIZE];
		buffer[0..8].copy_from_slice(&self.header_size.to_le_bytes());
		buffer[8..16].copy_from_slice(&self.file_header_size.to_le_bytes());
		buffer[16..24].copy_from_slice(&self.dir_header_size.to_le_bytes());
		buffer[24..26].copy_from_slice(&self.version.to_le_bytes());
		buffer[26..28].copy_from_slice(&self.min_version.to_le_bytes());
		buffer[28] = self.encryption as u8;
		buffer[29] = self.compression as u8;
		buffer[30] = self.level;
		buffer[31..35].copy_from_slice(&self.flags.bits().to_le_bytes());
		buffer[35..43].copy_from_slice(&self.dir_header_loc.to_le_bytes());
		buffer
	}
}

/// Reads only as far as the `min_version` field and returns it, without validating anything else.
pub fn peek_min_version<T: Read>(mut handle: T) -> InternalResult<u16> {
	let mut buffer = [0u8; ArchiveHeader::MIN_VERSION_END];
	handle.read_exact(&mut buffer)?;

	let header_size = u64::from_le_bytes(buffer[0..8].try_into().unwrap());
	if header_size < ArchiveHeader::MIN_VERSION_END as u64 {
		return Err(InternalError::MalformedHeader(format!(
			"Archive header declares an impossible size: {}",
			header_size
		)));
	};

	Ok(u16::from_le_bytes(buffer[26..28].try_into().unwrap()))
}
