use std::fmt;

use crate::global::{entry::BLOCK_SIZE, error::*};

#[cfg(feature = "crypto")]
use {
	aes::Aes256,
	cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit},
};

#[cfg(feature = "crypto")]
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
#[cfg(feature = "crypto")]
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Size of the key fed into the cipher, passwords are padded or truncated to this
pub const KEY_LENGTH: usize = 32;

/// Allows the user to specify which cipher to use. Stored as a single byte in the archive header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum EncryptionAlgorithm {
	/// Data is stored in the clear
	None = 0,
	/// AES-256 in CBC mode with PKCS#7 padding
	#[default]
	Aes256 = 1,
}

impl fmt::Display for EncryptionAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EncryptionAlgorithm::None => write!(f, "None"),
			EncryptionAlgorithm::Aes256 => write!(f, "AES256"),
		}
	}
}

impl TryFrom<u8> for EncryptionAlgorithm {
	type Error = InternalError;

	fn try_from(code: u8) -> Result<Self, Self::Error> {
		match code {
			0 => Ok(EncryptionAlgorithm::None),
			1 => Ok(EncryptionAlgorithm::Aes256),
			code => Err(InternalError::UnknownCodec {
				kind: "encryption",
				code,
			}),
		}
	}
}

/// Encryption - Decryption, A convenient wrapper around AES-256-CBC.
/// The password bytes are zero padded or truncated to [`KEY_LENGTH`] and used directly as the key, there is no key derivation.
#[cfg(feature = "crypto")]
pub(crate) struct Encryptor {
	key: [u8; KEY_LENGTH],
}

#[cfg(feature = "crypto")]
impl fmt::Debug for Encryptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[Danpak::Encryptor] cipher: Aes256Cbc")
	}
}

#[cfg(feature = "crypto")]
impl Encryptor {
	pub(crate) fn new(password: &[u8]) -> Encryptor {
		let mut key = [0u8; KEY_LENGTH];
		let len = password.len().min(KEY_LENGTH);
		key[..len].copy_from_slice(&password[..len]);

		Encryptor { key }
	}

	pub(crate) fn encrypt(&self, data: &[u8], iv: &[u8; BLOCK_SIZE]) -> InternalResult<Vec<u8>> {
		let cipher =
			Aes256CbcEnc::new_from_slices(&self.key, iv).map_err(|err| InternalError::CryptoError(err.to_string()))?;

		Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
	}

	pub(crate) fn decrypt(&self, data: &[u8], iv: &[u8; BLOCK_SIZE]) -> InternalResult<Vec<u8>> {
		let cipher =
			Aes256CbcDec::new_from_slices(&self.key, iv).map_err(|err| InternalError::CryptoError(err.to_string()))?;

		cipher
			.decrypt_padded_vec_mut::<Pkcs7>(data)
			.map_err(|err| InternalError::CryptoError(format!("Decryption failed: {}", err)))
	}
}

/// Encrypt `data` with the given password and initialization vector. `None` returns a copy of the input
pub fn encrypt(
	data: &[u8], password: &[u8], algo: EncryptionAlgorithm, iv: &[u8; BLOCK_SIZE],
) -> InternalResult<Vec<u8>> {
	match algo {
		EncryptionAlgorithm::None => Ok(data.to_vec()),
		#[cfg(feature = "crypto")]
		EncryptionAlgorithm::Aes256 => Encryptor::new(password).encrypt(data, iv),
		#[cfg(not(feature = "crypto"))]
		EncryptionAlgorithm::Aes256 => {
			let _ = (password, iv);
			Err(InternalError::MissingFeatureError("crypto"))
		},
	}
}

/// Inverse of [`encrypt`]
pub fn decrypt(
	data: &[u8], password: &[u8], algo: EncryptionAlgorithm, iv: &[u8; BLOCK_SIZE],
) -> InternalResult<Vec<u8>> {
	match algo {
		EncryptionAlgorithm::None => Ok(data.to_vec()),
		#[cfg(feature = "crypto")]
		EncryptionAlgorithm::Aes256 => Encryptor::new(password).decrypt(data, iv),
		#[cfg(not(feature = "crypto"))]
		EncryptionAlgorithm::Aes256 => {
			let _ = (password, iv);
			Err(InternalError::MissingFeatureError("crypto"))
		},
	}
}
