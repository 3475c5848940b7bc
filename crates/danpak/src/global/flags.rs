use std::fmt;

/// Abstracted flag access and manipulation `struct`, stored in the `flags` field of the archive header.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Flags {
	pub(crate) bits: u32,
}

impl Flags {
	/// The size in bytes of any flags entry
	pub const BYTES: usize = 4;

	/// The archive wraps exactly one blob and carries no directory tree
	pub const SINGLE_FILE_ARCHIVE: u32 = 0b_1000_0000_0000_0000_0000_0000_0000_0000;
	/// Readers should verify the `crc` field of every entry
	pub const SHOULD_CHECK_CRC: u32 = 0b_0100_0000_0000_0000_0000_0000_0000_0000;

	/// Construct a `Flags` struct from a `u32` number
	#[inline(always)]
	pub fn from_bits(bits: u32) -> Self {
		Flags { bits }
	}

	/// Returns a copy of the underlying number.
	#[inline(always)]
	pub fn bits(&self) -> u32 {
		self.bits
	}

	/// Insert (`toggle == true`) or clear (`toggle == false`) the given bit(s).
	pub fn set(&mut self, mask: u32, toggle: bool) {
		if toggle {
			self.bits |= mask;
		} else {
			self.bits &= !mask;
		}
	}

	#[inline(always)]
	/// Checks whether the given flag is set.
	pub fn contains(&self, bit: u32) -> bool {
		(self.bits & bit) != 0
	}
}

#[rustfmt::skip]
impl fmt::Display for Flags {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let single = if self.contains(Flags::SINGLE_FILE_ARCHIVE) { 'S' } else { '-' };
		let crc = if self.contains(Flags::SHOULD_CHECK_CRC) { 'C' } else { '-' };

		write!(f, "Flags[{}{}]", single, crc)
	}
}

#[rustfmt::skip]
impl fmt::Debug for Flags {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let single = if self.contains(Flags::SINGLE_FILE_ARCHIVE) { 'S' } else { '-' };
		let crc = if self.contains(Flags::SHOULD_CHECK_CRC) { 'C' } else { '-' };

		write!(f, "Flags[{}{}]: <{}u32 : {:#034b}>", single, crc, self.bits, self.bits)
	}
}
