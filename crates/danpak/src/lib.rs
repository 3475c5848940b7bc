#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

/*!
A single-file container for a whole directory tree of game assets, in Pure Rust.

Every file is deflated, then encrypted with AES-256-CBC under its own IV, and indexed by a directory tree
that is itself compressed and encrypted at the end of the archive. Files can be read one at a time through
[`FileArchive`](archive::FileArchive), or the whole tree extracted with [`unpack`](archive::unpack).

### 🔫 Cargo Features
- `archive`: Enables the [`FileArchive`](archive::FileArchive) reader and [`unpack`](archive::unpack).
- `builder`: Enables [`pack`](builder::pack) and [`dump`](builder::dump).
- `crypto`: Pulls `aes` and `cbc` for [`EncryptionAlgorithm::Aes256`](crypto::EncryptionAlgorithm::Aes256).
- `compression`: Pulls `flate2` for [`CompressionAlgorithm::Zip`](builder::CompressionAlgorithm::Zip).
- `default`: Enables all the above features.

### 🀄 Show me some code _dang it!_

```
use std::io::Cursor;
use danpak::prelude::*;

let mut leaves = [
	Leaf::new(b"{\"volume\": 0.8}".as_slice(), "data/cfg.json"),
	Leaf::new([12, 23, 34, 45, 56, 67, 78, 90, 69].as_slice(), "sfx/footstep.raw"),
];

let config = PackConfig::default().password("secret");
let mut target = Cursor::new(Vec::new());
dump(&mut target, &mut leaves, &config, None).unwrap();

// roundtrip
let mut archive = FileArchive::new();
archive.open(target, "secret").unwrap();

assert_eq!(archive.text_file("DATA/cfg.json").unwrap(), "{\"volume\": 0.8}");
assert_eq!(archive.binary_file("sfx/../sfx/footstep.raw").unwrap(), [12, 23, 34, 45, 56, 67, 78, 90, 69]);
```
*/

/// All tests are included in this module.
mod tests;

pub(crate) mod global;

#[cfg(feature = "archive")]
#[cfg_attr(docsrs, doc(cfg(feature = "archive")))]
pub(crate) mod loader;

#[cfg(feature = "builder")]
#[cfg_attr(docsrs, doc(cfg(feature = "builder")))]
pub(crate) mod writer;

/// Current format version written by this implementation, also the highest `min_version` it can read
pub const VERSION: u16 = 1;

/// The `min_version` written by this implementation. Version 0 archives embed a plain tree after the header
pub const MIN_VERSION: u16 = 1;

/// Consolidated crate imports.
pub mod prelude {
	pub use crate::global::{error::*, flags::Flags, tree::DirTree};
	pub use crate::global::entry::{DirectoryHeader, EntryHeader, FileHeader};
	pub use crate::global::compressor::CompressionAlgorithm;
	pub use crate::crypto::EncryptionAlgorithm;

	#[cfg(feature = "archive")]
	pub use crate::archive::*;

	#[cfg(feature = "builder")]
	pub use crate::builder::*;
}

/// Cipher selection and the stateless encrypt/decrypt primitives
pub mod crypto;

/// Archive Creation logic and data structures, [`pack`](crate::builder::pack), [`dump`](crate::builder::dump), [`seal`](crate::builder::seal) and [`PackConfig`](crate::builder::PackConfig)
#[cfg(feature = "builder")]
#[cfg_attr(docsrs, doc(cfg(feature = "builder")))]
pub mod builder {
	pub use crate::writer::*;
	pub use crate::global::{error::*, flags::Flags};
	pub use crate::global::compressor::CompressionAlgorithm;
	pub use crate::crypto::EncryptionAlgorithm;
}

/// Archive Reading logic and data-structures, [`FileArchive`](crate::archive::FileArchive), [`unpack`](crate::archive::unpack) and the single-file loaders
#[cfg(feature = "archive")]
#[cfg_attr(docsrs, doc(cfg(feature = "archive")))]
pub mod archive {
	pub use crate::loader::{
		archive::{ArchiveConfig, FileArchive, DEFAULT_MAX_ENTRY_SIZE},
		single::{load_encrypted_binary_file, load_encrypted_text_file, unseal},
		unpack, ArchiveSource,
	};
	pub use crate::global::{error::*, flags::Flags, header::peek_min_version, tree::DirTree};
	pub use crate::global::entry::{DirectoryHeader, FileHeader};
}

/// Headers and the stateless codec functions, for tooling that works on raw archive bytes
pub mod format {
	pub use crate::global::header::{peek_min_version, ArchiveHeader};
	pub use crate::global::entry::{EntryHeader, BLOCK_SIZE};
	pub use crate::global::compressor::{compress, decompress, CompressionAlgorithm, Compressor};
	pub use crate::crypto::{decrypt, encrypt, EncryptionAlgorithm, KEY_LENGTH};
}

/// Some utility functions to keep you happy
pub mod crypto_utils;
