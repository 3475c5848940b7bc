use std::{
	fmt,
	fs::{self, File},
	io::{BufReader, Seek, SeekFrom},
	path::Path,
};

use rand::seq::SliceRandom;

use super::{check_size, read_entry, ArchiveSource};
use crate::crypto_utils::{hash_password, HASH_LENGTH};
use crate::global::{
	codec::{check_crc, Codec},
	entry::{DirectoryHeader, FileHeader},
	error::*,
	flags::Flags,
	header::ArchiveHeader,
	tree::DirTree,
};

/// Default for [`ArchiveConfig::max_entry_size`], 4 GiB
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 4 * 1024 * 1024 * 1024;

const TREE_PATH: &str = "<directory tree>";

/// Settings for a [`FileArchive`]
#[derive(Debug, Clone, Copy)]
pub struct ArchiveConfig {
	/// Largest stored or uncompressed size any header may declare, checked before buffers are allocated
	pub max_entry_size: u64,
}

impl ArchiveConfig {
	/// Setter for the `max_entry_size` field
	pub fn max_entry_size(mut self, max_entry_size: u64) -> Self {
		self.max_entry_size = max_entry_size;
		self
	}
}

impl Default for ArchiveConfig {
	fn default() -> Self {
		ArchiveConfig {
			max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
		}
	}
}

// Everything that only exists between `open` and `close`
struct OpenArchive<T> {
	handle: T,
	header: ArchiveHeader,
	tree: DirTree,
	key: [u8; HASH_LENGTH],
	source_len: u64,
}

/// Random access reader over a multi-file archive.
/// Starts closed, [`open`](FileArchive::open) parses the header and caches the directory tree until [`close`](FileArchive::close).
/// Reads move the underlying cursor, so every read takes `&mut self`; open one [`FileArchive`] per handle for parallel extraction.
pub struct FileArchive<T> {
	state: Option<OpenArchive<T>>,
	config: ArchiveConfig,
}

impl<T> fmt::Debug for FileArchive<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FileArchive")
			.field("open", &self.state.is_some())
			.field("header", &self.state.as_ref().map(|s| &s.header))
			.field("config", &self.config)
			.finish()
	}
}

impl<T> fmt::Display for FileArchive<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.state.as_ref() {
			Some(state) => write!(
				f,
				"[FileArchive] Version: {}, Min-Version: {}, Members: {}, Encryption: {}, Compression: {} (level {}), {}",
				state.header.version,
				state.header.min_version,
				state.tree.paths().len(),
				state.header.encryption,
				state.header.compression,
				state.header.level,
				state.header.flags,
			),
			None => write!(f, "[FileArchive] closed"),
		}
	}
}

impl<T> Default for FileArchive<T> {
	fn default() -> Self {
		FileArchive::new()
	}
}

impl<T> FileArchive<T> {
	/// A closed archive with the default [`ArchiveConfig`]
	pub fn new() -> FileArchive<T> {
		FileArchive::with_config(ArchiveConfig::default())
	}

	/// A closed archive with a custom [`ArchiveConfig`]
	pub fn with_config(config: ArchiveConfig) -> FileArchive<T> {
		FileArchive { state: None, config }
	}

	/// Whether a source is currently open
	#[inline(always)]
	pub fn is_open(&self) -> bool {
		self.state.is_some()
	}

	/// Drops the cached tree and hands back the underlying handle, `None` if nothing was open
	pub fn close(&mut self) -> Option<T> {
		self.state.take().map(|state| state.handle)
	}

	fn state(&self) -> InternalResult<&OpenArchive<T>> {
		self.state.as_ref().ok_or(InternalError::ArchiveNotOpen)
	}

	/// The parsed [`ArchiveHeader`]
	pub fn header(&self) -> InternalResult<&ArchiveHeader> {
		self.state().map(|s| &s.header)
	}

	/// The directory found at `root` inside the archive, `""` returns the whole tree
	pub fn file_tree(&self, root: &str) -> InternalResult<&DirTree> {
		self.state()?.tree.subtree(root)
	}

	/// Resolve `path` to the offset of its [`FileHeader`]. Separators may be `/` or `\`, names compare case-insensitively
	pub fn locate(&self, path: &str) -> InternalResult<u64> {
		self.state()?.tree.resolve(path)
	}

	/// Every file in the archive as a `/` joined path and its offset
	pub fn entries(&self) -> InternalResult<Vec<(String, u64)>> {
		Ok(self.state()?.tree.paths())
	}
}

impl FileArchive<BufReader<File>> {
	/// Open the archive at `path`
	pub fn from_path(path: impl AsRef<Path>, password: &str) -> InternalResult<Self> {
		let mut archive = FileArchive::new();
		archive.open(BufReader::new(File::open(path)?), password)?;

		Ok(archive)
	}
}

impl<T: ArchiveSource> FileArchive<T> {
	/// Parse the header and the directory tree from `handle`. A no-op if this archive is already open
	pub fn open(&mut self, mut handle: T, password: &str) -> InternalResult {
		if self.is_open() {
			log::debug!("FileArchive::open called on an open archive, ignoring the new handle");
			return Ok(());
		}

		let source_len = handle.source_len()?;
		handle.seek(SeekFrom::Start(0))?;

		let header = ArchiveHeader::from_handle(&mut handle)?;
		if header.flags.contains(Flags::SINGLE_FILE_ARCHIVE) {
			return Err(InternalError::NotMultiFileArchive);
		}

		let key = hash_password(password);

		let (json, data_region) = match header.min_version {
			0 => {
				let json = Self::read_legacy_tree(&mut handle, &header, source_len)?;
				(json, header.header_size + header.dir_header_size..source_len)
			},
			1 => {
				let json = self.read_tree(&mut handle, &header, &key, source_len)?;
				(json, header.header_size..header.dir_header_loc)
			},
			version => return Err(InternalError::UnsupportedVersion(version)),
		};

		let tree = DirTree::from_json(&json)?;
		tree.validate_offsets(data_region)?;

		log::debug!(
			"Opened archive v{} (min v{}), {} bytes, {} entries",
			header.version,
			header.min_version,
			source_len,
			tree.paths().len()
		);

		self.state = Some(OpenArchive {
			handle,
			header,
			tree,
			key,
			source_len,
		});

		Ok(())
	}

	// minVersion 0: `dir_header_size` bytes of plain JSON straight after the header
	fn read_legacy_tree(handle: &mut T, header: &ArchiveHeader, source_len: u64) -> InternalResult<String> {
		let remaining = source_len.saturating_sub(header.header_size);
		if header.dir_header_size > remaining {
			return Err(InternalError::DirectoryTreeError(format!(
				"legacy tree declares {} bytes, only {} remain",
				header.dir_header_size, remaining
			)));
		}

		handle.seek(SeekFrom::Start(header.header_size))?;

		let mut raw = vec![0u8; header.dir_header_size as usize];
		handle.read_exact(&mut raw)?;

		String::from_utf8(raw).map_err(|err| InternalError::DirectoryTreeError(err.to_string()))
	}

	// minVersion 1: a DirectoryHeader + compressed and encrypted blob at `dir_header_loc`
	fn read_tree(
		&self, handle: &mut T, header: &ArchiveHeader, key: &[u8], source_len: u64,
	) -> InternalResult<String> {
		let location = header.dir_header_loc;
		if location == 0 {
			return Err(InternalError::DirectoryTreeError(
				"the archive header carries no directory header location".to_string(),
			));
		}

		if location < header.header_size || location >= source_len {
			return Err(InternalError::DirectoryTreeError(format!(
				"directory header location {} lies outside the archive",
				location
			)));
		}

		handle.seek(SeekFrom::Start(location))?;
		let dir_header = DirectoryHeader::from_handle(&mut *handle, header.dir_header_size)?;

		let remaining = source_len.saturating_sub(location.saturating_add(header.dir_header_size));
		check_size(dir_header.compressed_size, remaining)?;
		check_size(dir_header.compressed_size, self.config.max_entry_size)?;
		check_size(dir_header.uncompressed_size, self.config.max_entry_size)?;

		let mut stored = vec![0u8; dir_header.compressed_size as usize];
		handle.read_exact(&mut stored)?;

		let raw = Codec::from_header(header, key)
			.decode(&stored, &dir_header, TREE_PATH)
			.map_err(|err| match err {
				InternalError::CorruptedFile { reason, .. } => InternalError::DirectoryTreeError(reason),
				err => err,
			})?;

		String::from_utf8(raw).map_err(|err| InternalError::DirectoryTreeError(err.to_string()))
	}

	// Read, decrypt and decompress the entry whose FileHeader sits at `offset`
	fn read_at(&mut self, offset: u64, path: &str) -> InternalResult<Vec<u8>> {
		let config = self.config;
		let state = self.state.as_mut().ok_or(InternalError::ArchiveNotOpen)?;

		let (entry, stored) = read_entry(&mut state.handle, offset, &state.header, state.source_len, &config)?;
		check_crc(&state.header.flags, &entry, path)?;

		log::trace!("Fetched {} @ {}: {}", path, offset, entry);
		Codec::from_header(&state.header, &state.key).decode(&stored, &entry, path)
	}

	/// Read the [`FileHeader`] of `path` without touching its data
	pub fn fetch_entry(&mut self, path: &str) -> InternalResult<FileHeader> {
		let offset = self.locate(path)?;
		let config = self.config;
		let state = self.state.as_mut().ok_or(InternalError::ArchiveNotOpen)?;

		state.handle.seek(SeekFrom::Start(offset))?;
		let entry = FileHeader::from_handle(&mut state.handle, state.header.file_header_size)?;

		check_size(entry.uncompressed_size, config.max_entry_size)?;
		Ok(entry)
	}

	/// The decoded bytes of the file at `path`
	pub fn binary_file(&mut self, path: &str) -> InternalResult<Vec<u8>> {
		let offset = self.locate(path)?;
		self.read_at(offset, path)
	}

	/// The decoded contents of the file at `path`, which must be UTF-8
	pub fn text_file(&mut self, path: &str) -> InternalResult<String> {
		let data = self.binary_file(path)?;
		Ok(String::from_utf8(data)?)
	}

	/// Extract every file into `target`, recreating the directory structure.
	/// Siblings are written in random order
	pub fn unpack_to(&mut self, target: impl AsRef<Path>) -> InternalResult {
		self.unpack_to_with(target, None)
	}

	/// Same as [`unpack_to`](FileArchive::unpack_to), calling `callback` with each path and its decoded size after it is written
	pub fn unpack_to_with(
		&mut self, target: impl AsRef<Path>, mut callback: Option<&mut dyn FnMut(&str, u64)>,
	) -> InternalResult {
		let tree = self.state()?.tree.clone();
		let target = target.as_ref();

		fs::create_dir_all(target)?;
		self.extract(&tree, target, "", &mut callback)
	}

	fn extract(
		&mut self, node: &DirTree, folder: &Path, prefix: &str, callback: &mut Option<&mut dyn FnMut(&str, u64)>,
	) -> InternalResult {
		let children = match node {
			DirTree::Directory(children) => children,
			DirTree::File(_) => return Err(InternalError::NotADirectory(prefix.to_string())),
		};

		let mut order: Vec<_> = children.iter().collect();
		order.shuffle(&mut rand::thread_rng());

		for (name, child) in order {
			let path = if prefix.is_empty() {
				name.clone()
			} else {
				format!("{}/{}", prefix, name)
			};

			// A name is a single path component, anything else could write outside `folder`
			if name.is_empty() || name == "." || name == ".." || name.contains(|c: char| c == '/' || c == '\\') {
				return Err(InternalError::OutOfArchiveBounds(path));
			}

			let destination = folder.join(name);

			match child {
				DirTree::Directory(_) => {
					fs::create_dir_all(&destination)?;
					self.extract(child, &destination, &path, callback)?;
				},
				DirTree::File(offset) => {
					let data = self.read_at(*offset, &path)?;
					fs::write(&destination, &data)?;

					if let Some(callback) = callback.as_mut() {
						callback(&path, data.len() as u64);
					}
				},
			}
		}

		Ok(())
	}
}
