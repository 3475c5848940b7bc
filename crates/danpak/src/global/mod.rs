pub(crate) mod codec;
pub(crate) mod compressor;
pub(crate) mod entry;
pub(crate) mod error;
pub(crate) mod flags;
pub(crate) mod header;
pub(crate) mod tree;
