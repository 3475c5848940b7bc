use std::{error, io, string::FromUtf8Error};
use thiserror::Error;

/// Internal `Result` type alias used by `danpak`. Basically equal to: `Result<T, InternalError>`
pub type InternalResult<T = ()> = Result<T, InternalError>;

/// All errors manifestable within `danpak` collected into a neat enum
#[derive(Debug, Error)]
pub enum InternalError {
	/// Generic Error
	#[error("[PakError::GenericError] {0}")]
	OtherError(Box<dyn error::Error + Send + Sync>),
	/// a necessary cargo feature wasn't enabled for a certain action: eg trying to decompress without the `compression` feature
	#[error("[PakError::MissingFeatureError] Unable to continue with operation, the cargo feature ({0}) is missing")]
	MissingFeatureError(&'static str),
	/// thin wrapper over [io::Error](std::io::Error), captures all IO errors
	#[error("[PakError::IOError] {0}")]
	IOError(#[from] io::Error),
	/// an operation was attempted on a [`FileArchive`](crate::archive::FileArchive) that is not open
	#[error("[PakError::ArchiveNotOpen] The archive is not open")]
	ArchiveNotOpen,
	/// the single-file flag is set, but the multi-file API was used
	#[error("[PakError::NotMultiFileArchive] The source is a single-file archive, not a multi-file archive")]
	NotMultiFileArchive,
	/// the single-file flag is missing, but the single-file API was used
	#[error("[PakError::NotSingleFileArchive] The source is a multi-file archive, not a single-file archive")]
	NotSingleFileArchive,
	/// the directory tree is absent, unparsable or has the wrong size
	#[error("[PakError::DirectoryTreeError] Missing or corrupted directory tree: {0}")]
	DirectoryTreeError(String),
	/// a header is too short or carries impossible values
	#[error("[PakError::MalformedHeader] {0}")]
	MalformedHeader(String),
	/// the resource was not found
	#[error("[PakError::MissingResourceError] File or directory does not exist: {0}")]
	MissingResourceError(String),
	/// a `..` segment tried to climb above the root of the archive
	#[error("[PakError::OutOfArchiveBounds] Path escapes the archive root: {0}")]
	OutOfArchiveBounds(String),
	/// the path names a directory where a file was expected
	#[error("[PakError::NotAFile] Path is a directory, not a file: {0}")]
	NotAFile(String),
	/// the path names a file where a directory was expected
	#[error("[PakError::NotADirectory] Path is a file, not a directory: {0}")]
	NotADirectory(String),
	/// the processed entry doesn't match what its header declares, or could not be decoded at all
	#[error("[PakError::CorruptedFile] Corrupted entry {path}: {reason}")]
	CorruptedFile {
		/// The entry that failed to decode
		path: String,
		/// What went wrong
		reason: String,
	},
	/// the stored checksum doesn't match the decoded data
	#[error("[PakError::CrcMismatch] CRC check failed for: {0}")]
	CrcMismatch(String),
	/// the source requires a newer reader, contains the source's `minVersion`
	#[error("[PakError::UnsupportedVersion] The provided archive source requires reader version: {}. While the current implementation supports up to: {}", .0, crate::VERSION)]
	UnsupportedVersion(u16),
	/// an encryption or compression code in a header is unknown to this implementation
	#[error("[PakError::UnknownCodec] Unknown {kind} code: {code}")]
	UnknownCodec {
		/// "encryption" or "compression"
		kind: &'static str,
		/// The raw code found in the header
		code: u8,
	},
	/// encryption or decryption failed
	#[error("[PakError::CryptoError] {0}")]
	CryptoError(String),
	/// two leaves found with the same ID, or an ID colliding with a directory
	#[error("[PakError::LeafAppendError] A leaf with the ID: {0} already exists, or collides with a directory of the same name")]
	DuplicateLeafID(String),
	/// a header declares a size beyond [`ArchiveConfig::max_entry_size`](crate::archive::ArchiveConfig::max_entry_size) or past the end of the source
	#[error("[PakError::EntryTooLarge] Entry declares {size} bytes, which exceeds the limit of {limit} bytes")]
	EntryTooLarge {
		/// Declared size
		size: u64,
		/// The limit it broke
		limit: u64,
	},
	/// a text entry isn't valid UTF-8
	#[error("[PakError::TextDecodeError] {0}")]
	TextDecodeError(#[from] FromUtf8Error),
}
