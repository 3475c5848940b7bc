use std::{
	fs::File,
	io::{BufWriter, Write},
	path::Path,
};

use super::{leaf::process_leaf, Leaf, PackConfig};
use crate::crypto_utils::{hash_password, BlockIssuer};
use crate::global::{codec::Codec, error::*, flags::Flags, header::ArchiveHeader};

/// Wraps exactly one blob: an [`ArchiveHeader`] with [`Flags::SINGLE_FILE_ARCHIVE`] set and no directory tree,
/// followed by a single [`FileHeader`](crate::global::entry::FileHeader) and the payload.
pub fn seal<W: Write>(mut target: W, data: &[u8], config: &PackConfig) -> InternalResult<u64> {
	let key = hash_password(&config.password);

	let mut header = ArchiveHeader::from(config);
	header.flags.set(Flags::SINGLE_FILE_ARCHIVE, true);
	header.dir_header_loc = 0;

	let codec = Codec::from_header(&header, &key);
	let processed = process_leaf(&mut Leaf::new(data, "single"), &codec, &mut BlockIssuer::default())?;

	target.write_all(&header.to_bytes())?;
	target.write_all(&processed.header.to_bytes())?;
	target.write_all(&processed.data)?;
	target.flush()?;

	Ok(header.header_size + header.file_header_size + processed.header.compressed_size)
}

/// Write `data` to `path` as a single-file archive
pub fn save_encrypted_binary_file(path: impl AsRef<Path>, data: &[u8], config: &PackConfig) -> InternalResult<u64> {
	let file = File::create(path)?;
	seal(BufWriter::new(file), data, config)
}

/// Same as [`save_encrypted_binary_file`], with UTF-8 text
pub fn save_encrypted_text_file(path: impl AsRef<Path>, text: &str, config: &PackConfig) -> InternalResult<u64> {
	save_encrypted_binary_file(path, text.as_bytes(), config)
}
