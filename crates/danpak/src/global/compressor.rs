use std::io::{self, Read, Write};

use super::error::*;

#[cfg(feature = "compression")]
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

/// Exported utility compressor used by `danpak`
#[derive(Debug)]
pub struct Compressor<T: Read> {
	data: T,
}

impl<T: Read> Compressor<T> {
	/// Construct a new compressor over a read handle
	pub fn new(data: T) -> Compressor<T> {
		Compressor { data }
	}

	/// Pass in a compression algorithm and level, sit back and let the compressor do it's job.
	/// The level is clamped to 1-9.
	pub fn compress(&mut self, algo: CompressionAlgorithm, level: u8, output: &mut dyn Write) -> InternalResult {
		match algo {
			CompressionAlgorithm::None => {
				io::copy(&mut self.data, output)?;
				Ok(())
			},
			#[cfg(feature = "compression")]
			CompressionAlgorithm::Zip => {
				let mut compressor = ZlibEncoder::new(output, Compression::new(level.clamp(1, 9) as u32));
				io::copy(&mut self.data, &mut compressor)?;
				compressor.finish()?;

				Ok(())
			},
			#[cfg(not(feature = "compression"))]
			CompressionAlgorithm::Zip => {
				let _ = level;
				Err(InternalError::MissingFeatureError("compression"))
			},
		}
	}

	/// Inflates at most `expected + 1` bytes into `output`, so an oversized stream is caught without reading all of it.
	/// Returns the number of bytes produced.
	pub fn decompress(&mut self, algo: CompressionAlgorithm, expected: u64, output: &mut Vec<u8>) -> InternalResult<usize> {
		let limit = expected.saturating_add(1);

		match algo {
			CompressionAlgorithm::None => (&mut self.data)
				.take(limit)
				.read_to_end(output)
				.map_err(InternalError::IOError),
			#[cfg(feature = "compression")]
			CompressionAlgorithm::Zip => ZlibDecoder::new(&mut self.data)
				.take(limit)
				.read_to_end(output)
				.map_err(InternalError::IOError),
			#[cfg(not(feature = "compression"))]
			CompressionAlgorithm::Zip => Err(InternalError::MissingFeatureError("compression")),
		}
	}
}

/// Compress a buffer in one go, `None` returns a copy of the input
pub fn compress(data: &[u8], algo: CompressionAlgorithm, level: u8) -> InternalResult<Vec<u8>> {
	let mut output = Vec::with_capacity(data.len() / 2);
	Compressor::new(data).compress(algo, level, &mut output)?;
	Ok(output)
}

/// Decompress a buffer in one go. `expected` is the exact uncompressed size, a mismatch is an error
pub fn decompress(data: &[u8], algo: CompressionAlgorithm, expected: u64) -> InternalResult<Vec<u8>> {
	// Never trust `expected` for the up-front allocation
	let mut output = Vec::with_capacity(expected.min(data.len() as u64 * 4) as usize);
	let read = Compressor::new(data).decompress(algo, expected, &mut output)?;

	if read as u64 != expected {
		return Err(InternalError::OtherError(
			format!("Decompressed {} bytes, expected {}", read, expected).into(),
		));
	};

	Ok(output)
}

/// Allows the user to specify which compression scheme to use. Stored as a single byte in the archive header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionAlgorithm {
	/// Data is stored as is
	None = 0,
	/// Uses zlib framed [deflate](https://crates.io/crates/flate2)
	#[default]
	Zip = 1,
}

impl std::fmt::Display for CompressionAlgorithm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CompressionAlgorithm::None => write!(f, "None"),
			CompressionAlgorithm::Zip => write!(f, "Zip"),
		}
	}
}

impl TryFrom<u8> for CompressionAlgorithm {
	type Error = InternalError;

	fn try_from(code: u8) -> Result<Self, Self::Error> {
		match code {
			0 => Ok(CompressionAlgorithm::None),
			1 => Ok(CompressionAlgorithm::Zip),
			code => Err(InternalError::UnknownCodec {
				kind: "compression",
				code,
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn none_is_identity() {
		let data = b"Hello, Cassandra!";
		let stored = compress(data, CompressionAlgorithm::None, 9).unwrap();

		assert_eq!(stored, data);
		assert_eq!(decompress(&stored, CompressionAlgorithm::None, data.len() as u64).unwrap(), data);
	}

	#[test]
	#[cfg(feature = "compression")]
	fn zip_roundtrip_and_level_clamp() {
		let data = b"Around The World, Fatter wetter stronker".repeat(64);

		for level in [0, 1, 6, 9, 200] {
			let stored = compress(&data, CompressionAlgorithm::Zip, level).unwrap();
			assert!(stored.len() < data.len());
			assert_eq!(decompress(&stored, CompressionAlgorithm::Zip, data.len() as u64).unwrap(), data);
		}
	}

	#[test]
	#[cfg(feature = "compression")]
	fn zip_wrong_expected_size() {
		let data = vec![42u8; 4096];
		let stored = compress(&data, CompressionAlgorithm::Zip, 9).unwrap();

		assert!(decompress(&stored, CompressionAlgorithm::Zip, 4095).is_err());
		assert!(decompress(&stored, CompressionAlgorithm::Zip, 4097).is_err());
	}

	#[test]
	fn unknown_code() {
		assert!(matches!(
			CompressionAlgorithm::try_from(7),
			Err(InternalError::UnknownCodec { kind: "compression", code: 7 })
		));
	}
}
