use crate::{
	crypto::EncryptionAlgorithm,
	global::{compressor::CompressionAlgorithm, flags::Flags},
};

/// Settings for [`dump`](crate::writer::dump), [`pack`](crate::writer::pack) and [`seal`](crate::writer::seal)
#[derive(Debug, Clone)]
pub struct PackConfig {
	/// Human password, hashed with SHA3-256 before use. Empty by default
	pub password: String,
	/// Cipher applied to every entry, defaults to [`EncryptionAlgorithm::Aes256`]
	pub encryption: EncryptionAlgorithm,
	/// Compression applied to every entry, defaults to [`CompressionAlgorithm::Zip`]
	pub compression: CompressionAlgorithm,
	/// Compression level, 0-9. Defaults to 9
	pub level: u8,
	/// Written into the archive header. [`Flags::SINGLE_FILE_ARCHIVE`] is managed by the writer and ignored here
	pub flags: Flags,
}

// Helper functions
impl PackConfig {
	/// Setter for the `password` field
	pub fn password(mut self, password: impl Into<String>) -> Self {
		self.password = password.into();
		self
	}

	/// Setter for the `encryption` field
	pub fn encryption(mut self, encryption: EncryptionAlgorithm) -> Self {
		self.encryption = encryption;
		self
	}

	/// Setter for the `compression` field
	pub fn compression(mut self, compression: CompressionAlgorithm) -> Self {
		self.compression = compression;
		self
	}

	/// Setter for the `flags` field
	pub fn flags(mut self, flags: Flags) -> Self {
		self.flags = flags;
		self
	}

	///```
	/// use danpak::prelude::PackConfig;
	///
	/// let config = PackConfig::default().level(12);
	/// assert_eq!(config.level, 9);
	///```
	pub fn level(mut self, level: u8) -> Self {
		self.level = level.min(9);
		self
	}
}

impl Default for PackConfig {
	fn default() -> PackConfig {
		PackConfig {
			password: String::new(),
			encryption: EncryptionAlgorithm::Aes256,
			compression: CompressionAlgorithm::Zip,
			level: 9,
			flags: Flags::default(),
		}
	}
}
