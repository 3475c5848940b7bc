use std::{
	fs::File,
	io::{self, BufReader, Read, Seek, SeekFrom},
	path::Path,
};

pub(crate) mod archive;
pub(crate) mod single;

use archive::{ArchiveConfig, FileArchive};
use crate::global::{
	entry::EntryHeader,
	error::*,
	header::{peek_min_version, ArchiveHeader},
};

/// The capabilities a reader needs from its source: readable, seekable and of known size
pub trait ArchiveSource: Read + Seek {
	/// Total length of the source in bytes, the cursor is left where it was
	fn source_len(&mut self) -> io::Result<u64> {
		let position = self.stream_position()?;
		let end = self.seek(SeekFrom::End(0))?;
		self.seek(SeekFrom::Start(position))?;

		Ok(end)
	}
}

impl<T: Read + Seek> ArchiveSource for T {}

/// Reads the [`EntryHeader`] at `offset` and exactly `compressed_size` stored bytes after it.
/// Declared sizes are checked against the end of the source and [`ArchiveConfig::max_entry_size`] before anything is allocated.
pub(crate) fn read_entry<T: ArchiveSource>(
	handle: &mut T, offset: u64, header: &ArchiveHeader, source_len: u64, config: &ArchiveConfig,
) -> InternalResult<(EntryHeader, Vec<u8>)> {
	handle.seek(SeekFrom::Start(offset))?;
	let entry = EntryHeader::from_handle(&mut *handle, header.file_header_size)?;

	let remaining = source_len.saturating_sub(offset.saturating_add(header.file_header_size));
	check_size(entry.compressed_size, remaining)?;
	check_size(entry.compressed_size, config.max_entry_size)?;
	check_size(entry.uncompressed_size, config.max_entry_size)?;

	let mut stored = vec![0u8; entry.compressed_size as usize];
	handle.read_exact(&mut stored)?;

	Ok((entry, stored))
}

pub(crate) fn check_size(size: u64, limit: u64) -> InternalResult {
	if size > limit {
		return Err(InternalError::EntryTooLarge { size, limit });
	}

	Ok(())
}

/// Extract every file of the archive at `archive_path` into `folder_path`.
/// Only `minVersion` is probed up front, so unsupported archives are rejected before the rest of the header is parsed
pub fn unpack(archive_path: impl AsRef<Path>, folder_path: impl AsRef<Path>, password: &str) -> InternalResult {
	let mut handle = BufReader::new(File::open(archive_path.as_ref())?);

	let min_version = peek_min_version(&mut handle)?;
	ArchiveHeader::validate_version(min_version)?;

	log::debug!("Unpacking {} (min version {})", archive_path.as_ref().display(), min_version);

	let mut archive = FileArchive::new();
	archive.open(handle, password)?;
	archive.unpack_to(folder_path)?;
	archive.close();

	Ok(())
}
