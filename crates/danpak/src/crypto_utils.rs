use std::collections::HashSet;

use sha3::{Digest, Sha3_256};

use crate::global::entry::BLOCK_SIZE;

/// Size of a hashed password
pub const HASH_LENGTH: usize = 32;

/// SHA3-256 of the UTF-8 password. This is the key material handed to the cipher wherever a human password is accepted,
/// so the on-disk format never depends on the raw password's length
pub fn hash_password(password: &str) -> [u8; HASH_LENGTH] {
	let digest = Sha3_256::digest(password.as_bytes());

	let mut hash = [0u8; HASH_LENGTH];
	hash.copy_from_slice(&digest);
	hash
}

/// Two `u64` words from the thread-local RNG, laid out little-endian
#[inline(always)]
pub fn gen_block() -> [u8; BLOCK_SIZE] {
	let mut block = [0u8; BLOCK_SIZE];
	block[0..8].copy_from_slice(&rand::random::<u64>().to_le_bytes());
	block[8..16].copy_from_slice(&rand::random::<u64>().to_le_bytes());
	block
}

/// Hands out initialization vectors that are unique for the lifetime of one archive
#[derive(Debug, Default)]
pub(crate) struct BlockIssuer {
	issued: HashSet<[u8; BLOCK_SIZE]>,
}

impl BlockIssuer {
	pub(crate) fn issue(&mut self) -> [u8; BLOCK_SIZE] {
		loop {
			let block = gen_block();
			if self.issued.insert(block) {
				return block;
			}

			log::debug!("Initialization vector collision, drawing again");
		}
	}
}
