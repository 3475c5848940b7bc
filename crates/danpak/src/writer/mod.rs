use std::{
	fs::{self, File},
	io::{BufWriter, Read, Seek, SeekFrom, Write},
	path::Path,
};

mod config;
mod leaf;
mod single;

pub use config::PackConfig;
pub use leaf::{LazyFile, Leaf};
pub use single::{save_encrypted_binary_file, save_encrypted_text_file, seal};

use leaf::process_leaf;

use crate::crypto_utils::{hash_password, BlockIssuer};
use crate::global::{
	codec::Codec,
	entry::{DirectoryHeader, FileHeader},
	error::*,
	flags::Flags,
	header::ArchiveHeader,
	tree::DirTree,
};

impl From<&PackConfig> for ArchiveHeader {
	fn from(config: &PackConfig) -> Self {
		let mut flags = config.flags;
		flags.set(Flags::SINGLE_FILE_ARCHIVE, false);

		ArchiveHeader {
			encryption: config.encryption,
			compression: config.compression,
			level: config.level,
			flags,
			..ArchiveHeader::default()
		}
	}
}

/// This iterates over all [`Leaf`]s in the processing queue, parses them and writes the bytes out into the target.
/// Every leaf is written as a [`FileHeader`] followed by its compressed and encrypted bytes, then the directory tree
/// goes last and the [`ArchiveHeader`] at offset 0 is patched to point at it.
/// The `callback` is handed each leaf's ID and header right after it was written. Returns the number of bytes written.
pub fn dump<W: Write + Seek, R: Read>(
	mut target: W, leaves: &mut [Leaf<R>], config: &PackConfig,
	mut callback: Option<&mut dyn FnMut(&str, &FileHeader)>,
) -> InternalResult<u64> {
	// Catch duplicate and colliding IDs before a single byte is written
	let mut dry_run = DirTree::new();
	for leaf in leaves.iter() {
		dry_run.insert(&leaf.id, 0)?;
	}

	let key = hash_password(&config.password);
	let mut header = ArchiveHeader::from(config);
	let codec = Codec::from_header(&header, &key);
	let mut issuer = BlockIssuer::default();

	// Reserve the header, it's rewritten once the tree's location is known
	target.seek(SeekFrom::Start(0))?;
	target.write_all(&header.to_bytes())?;

	let mut tree = DirTree::new();
	let mut offset = header.header_size;

	for leaf in leaves.iter_mut() {
		let processed = process_leaf(leaf, &codec, &mut issuer)?;

		target.write_all(&processed.header.to_bytes())?;
		target.write_all(&processed.data)?;
		tree.insert(&leaf.id, offset)?;

		log::trace!("Packed {} @ {}: {}", leaf.id, offset, processed.header);

		if let Some(callback) = callback.as_mut() {
			callback(leaf.id.as_ref(), &processed.header);
		}

		offset += header.file_header_size + processed.header.compressed_size;
	}

	// Write out the directory tree
	let json = tree.to_json()?;
	let block = issuer.issue();
	let blob = codec.encode(json.as_bytes(), &block)?;

	let dir_header = DirectoryHeader {
		uncompressed_size: json.len() as u64,
		compressed_size: blob.len() as u64,
		crc: 0,
		block,
	};

	header.dir_header_loc = offset;
	target.write_all(&dir_header.to_bytes())?;
	target.write_all(&blob)?;

	let bytes_written = offset + header.dir_header_size + dir_header.compressed_size;

	// Patch the header, then leave the cursor at the end of the archive
	target.seek(SeekFrom::Start(0))?;
	target.write_all(&header.to_bytes())?;
	target.seek(SeekFrom::Start(bytes_written))?;
	target.flush()?;

	log::debug!(
		"Packed {} entries, directory tree @ {}, {} bytes total",
		leaves.len(),
		header.dir_header_loc,
		bytes_written
	);

	Ok(bytes_written)
}

/// Collects every file below `folder` as a [`Leaf`], IDs being the `/` joined path relative to `folder`.
/// Traversal is depth first with siblings sorted by name, `skip` is left out if encountered.
pub fn leaves_from_dir(folder: impl AsRef<Path>, skip: Option<&Path>) -> InternalResult<Vec<Leaf<LazyFile>>> {
	let folder = folder.as_ref();
	let mut leaves = vec![];

	for entry in walkdir::WalkDir::new(folder).sort_by_file_name() {
		let entry = entry.map_err(|err| InternalError::IOError(err.into()))?;
		if !entry.file_type().is_file() {
			continue;
		}

		let path = entry.into_path();
		if let Some(skip) = skip {
			if fs::canonicalize(&path)? == skip {
				continue;
			}
		}

		let relative = path.strip_prefix(folder).map_err(|err| InternalError::OtherError(Box::new(err)))?;
		let id = relative
			.components()
			.map(|c| c.as_os_str().to_str())
			.collect::<Option<Vec<_>>>()
			.ok_or_else(|| {
				InternalError::OtherError(format!("File name is not valid UTF-8: {}", path.display()).into())
			})?
			.join("/");

		leaves.push(Leaf::new(LazyFile::new(path), id));
	}

	Ok(leaves)
}

/// Pack the whole of `folder_path` into a new archive at `archive_path`.
/// Any failure aborts the pack and leaves a partially written file behind.
pub fn pack(archive_path: impl AsRef<Path>, folder_path: impl AsRef<Path>, config: &PackConfig) -> InternalResult<u64> {
	let file = File::create(archive_path.as_ref())?;
	let archive = fs::canonicalize(archive_path.as_ref())?;

	let mut leaves = leaves_from_dir(folder_path, Some(&archive))?;
	dump(BufWriter::new(file), &mut leaves, config, None)
}
