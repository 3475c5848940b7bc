use std::{
	fs::File,
	io::{BufReader, SeekFrom},
	path::Path,
};

use super::{archive::ArchiveConfig, read_entry, ArchiveSource};
use crate::crypto_utils::hash_password;
use crate::global::{
	codec::{check_crc, Codec},
	error::*,
	flags::Flags,
	header::ArchiveHeader,
};

const SINGLE_PATH: &str = "<single file>";

/// Inverse of [`seal`](crate::builder::seal): reads the one entry of a single-file archive
pub fn unseal<T: ArchiveSource>(mut handle: T, password: &str, config: &ArchiveConfig) -> InternalResult<Vec<u8>> {
	let source_len = handle.source_len()?;
	handle.seek(SeekFrom::Start(0))?;

	let header = ArchiveHeader::from_handle(&mut handle)?;
	if !header.flags.contains(Flags::SINGLE_FILE_ARCHIVE) {
		return Err(InternalError::NotSingleFileArchive);
	}

	let key = hash_password(password);
	let (entry, stored) = read_entry(&mut handle, header.header_size, &header, source_len, config)?;
	check_crc(&header.flags, &entry, SINGLE_PATH)?;

	Codec::from_header(&header, &key).decode(&stored, &entry, SINGLE_PATH)
}

/// Read the single-file archive at `path`
pub fn load_encrypted_binary_file(path: impl AsRef<Path>, password: &str) -> InternalResult<Vec<u8>> {
	let file = BufReader::new(File::open(path)?);
	unseal(file, password, &ArchiveConfig::default())
}

/// Same as [`load_encrypted_binary_file`], the payload must be UTF-8
pub fn load_encrypted_text_file(path: impl AsRef<Path>, password: &str) -> InternalResult<String> {
	let data = load_encrypted_binary_file(path, password)?;
	Ok(String::from_utf8(data)?)
}
