use super::{
	compressor::{self, CompressionAlgorithm},
	entry::{EntryHeader, BLOCK_SIZE},
	error::*,
	flags::Flags,
	header::ArchiveHeader,
};
use crate::crypto::{self, EncryptionAlgorithm};

/// The compress → encrypt pipeline of one archive, and its inverse
#[derive(Debug, Clone, Copy)]
pub(crate) struct Codec<'a> {
	pub(crate) key: &'a [u8],
	pub(crate) encryption: EncryptionAlgorithm,
	pub(crate) compression: CompressionAlgorithm,
	pub(crate) level: u8,
}

impl<'a> Codec<'a> {
	pub(crate) fn from_header(header: &ArchiveHeader, key: &'a [u8]) -> Codec<'a> {
		Codec {
			key,
			encryption: header.encryption,
			compression: header.compression,
			level: header.level,
		}
	}

	/// Compress then encrypt. Empty input is stored as empty without touching either codec
	pub(crate) fn encode(&self, data: &[u8], block: &[u8; BLOCK_SIZE]) -> InternalResult<Vec<u8>> {
		if data.is_empty() {
			return Ok(Vec::new());
		}

		let compressed = compressor::compress(data, self.compression, self.level)?;
		crypto::encrypt(&compressed, self.key, self.encryption, block)
	}

	/// Decrypt then decompress, verifying the result against the header's `uncompressed_size`.
	/// Anything that goes wrong on the way is reported as a corrupted entry
	pub(crate) fn decode(&self, stored: &[u8], header: &EntryHeader, path: &str) -> InternalResult<Vec<u8>> {
		if stored.is_empty() && header.uncompressed_size == 0 {
			return Ok(Vec::new());
		}

		let corrupted = |err: InternalError| match err {
			InternalError::MissingFeatureError(_) => err,
			err => InternalError::CorruptedFile {
				path: path.to_string(),
				reason: err.to_string(),
			},
		};

		let decrypted = crypto::decrypt(stored, self.key, self.encryption, &header.block).map_err(corrupted)?;
		let data = compressor::decompress(&decrypted, self.compression, header.uncompressed_size).map_err(corrupted)?;

		// decompress already enforces the size, kept explicit since it's the only integrity check the format has
		if data.len() as u64 != header.uncompressed_size {
			return Err(InternalError::CorruptedFile {
				path: path.to_string(),
				reason: format!("expected {} bytes, found {}", header.uncompressed_size, data.len()),
			});
		}

		Ok(data)
	}
}

/// Gated behind [`Flags::SHOULD_CHECK_CRC`], but writers never populate the `crc` field so there is nothing to compare against.
// TODO: compute a CRC32 over the uncompressed data on pack and compare it here, once the field is confirmed to stay in the format
pub(crate) fn check_crc(flags: &Flags, header: &EntryHeader, path: &str) -> InternalResult {
	if flags.contains(Flags::SHOULD_CHECK_CRC) {
		log::warn!(
			"CRC check requested for {} (stored crc: {:#010x}), but CRC verification is not implemented",
			path,
			header.crc
		);
	}

	Ok(())
}
