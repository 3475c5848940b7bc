use std::{
	fs::File,
	io::{self, Read},
	path::PathBuf,
	sync::Arc,
};

use crate::crypto_utils::BlockIssuer;
use crate::global::{codec::Codec, entry::FileHeader, error::InternalResult};

/// A named ([`ID`](Leaf::id)) wrapper around an [`io::Read`](Read) handle.
/// The ID is the `/` separated path the data will have inside the archive.
#[derive(Debug, Default, Clone)]
pub struct Leaf<R = &'static [u8]> {
	/// source data
	pub handle: R,
	/// The path under which the embedded data will be referenced
	pub id: Arc<str>,
}

impl<R: Read> Leaf<R> {
	/// Creates a new [`Leaf`] wrapping around the given [`Read`] handle, with an ID
	pub fn new<S: AsRef<str>>(handle: R, id: S) -> Leaf<R> {
		Leaf {
			handle,
			id: Arc::from(id.as_ref()),
		}
	}
}

/// A file that is only opened once it is first read, and closed again once drained.
/// Packing a large folder never holds more than one descriptor at a time.
#[derive(Debug)]
pub struct LazyFile {
	path: PathBuf,
	file: Option<File>,
	drained: bool,
}

impl LazyFile {
	/// Wrap a path, nothing is opened yet
	pub fn new(path: impl Into<PathBuf>) -> LazyFile {
		LazyFile {
			path: path.into(),
			file: None,
			drained: false,
		}
	}
}

impl Read for LazyFile {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if self.drained {
			return Ok(0);
		}

		if self.file.is_none() {
			self.file = Some(File::open(&self.path)?);
		}

		let result = match self.file.as_mut() {
			Some(file) => file.read(buf),
			None => Ok(0),
		};

		if matches!(result, Ok(0)) && !buf.is_empty() {
			self.file.take();
			self.drained = true;
		};

		result
	}
}

// Processed data ready to be written out
pub(crate) struct ProcessedLeaf {
	pub(crate) data: Vec<u8>,
	pub(crate) header: FileHeader,
}

// Read a leaf fully, then compress and encrypt it under a fresh IV
pub(crate) fn process_leaf<R: Read>(
	leaf: &mut Leaf<R>, codec: &Codec<'_>, issuer: &mut BlockIssuer,
) -> InternalResult<ProcessedLeaf> {
	let mut raw = Vec::new();
	leaf.handle.read_to_end(&mut raw)?;

	let block = issuer.issue();
	let data = codec.encode(&raw, &block)?;

	Ok(ProcessedLeaf {
		header: FileHeader {
			uncompressed_size: raw.len() as u64,
			compressed_size: data.len() as u64,
			crc: 0,
			block,
		},
		data,
	})
}
