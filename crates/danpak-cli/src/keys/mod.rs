use clap::Arg;
use std::collections::HashMap;

pub mod key_names {
	pub(crate) const OUTPUT: &str = "OUTPUT";
	pub(crate) const INPUT: &str = "INPUT";
	pub(crate) const RESOURCE: &str = "RESOURCE";
	pub(crate) const ROOT: &str = "ROOT";

	pub(crate) const PASSWORD: &str = "PASSWORD";
	pub(crate) const ENCRYPTION: &str = "ENCRYPTION";
	pub(crate) const COMPRESSION: &str = "COMPRESSION";
	pub(crate) const LEVEL: &str = "LEVEL";
}

pub fn build_keys<'a>() -> HashMap<&'static str, Arg<'a>> {
	/* please only use this function once during the lifecycle of the program */
	let mut map = HashMap::with_capacity(8);

	/* The various keys usable in the CLI */
	// A general output target
	map.insert(
		key_names::OUTPUT,
		Arg::new(key_names::OUTPUT)
			.short('o')
			.long("output")
			.value_name(key_names::OUTPUT)
			.help("A general output target, an archive to write or a folder to extract into")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// A general input source
	map.insert(
		key_names::INPUT,
		Arg::new(key_names::INPUT)
			.long("input")
			.short('i')
			.value_name(key_names::INPUT)
			.help("A general input source, an archive to read or a folder to pack")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// A resource to focus on and extract
	map.insert(
		key_names::RESOURCE,
		Arg::new(key_names::RESOURCE)
			.short('r')
			.long("resource")
			.value_name(key_names::RESOURCE)
			.help("A `/` separated path to a file inside the archive")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// Only list entries below this directory
	map.insert(
		key_names::ROOT,
		Arg::new(key_names::ROOT)
			.long("root")
			.value_name(key_names::ROOT)
			.help("A directory inside the archive to start listing from")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// The password every key is derived from
	map.insert(
		key_names::PASSWORD,
		Arg::new(key_names::PASSWORD)
			.short('p')
			.long("password")
			.value_name(key_names::PASSWORD)
			.help("The archive password, defaults to an empty password")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// Cipher applied to every entry
	map.insert(
		key_names::ENCRYPTION,
		Arg::new(key_names::ENCRYPTION)
			.short('e')
			.long("encryption")
			.value_name(key_names::ENCRYPTION)
			.help("The cipher to encrypt entries with, defaults to aes256")
			.possible_values(["none", "aes256"])
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// Compression applied to every entry
	map.insert(
		key_names::COMPRESSION,
		Arg::new(key_names::COMPRESSION)
			.short('c')
			.long("compression")
			.value_name(key_names::COMPRESSION)
			.help("The compression algorithm to use, defaults to zip")
			.possible_values(["none", "zip"])
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	map.insert(
		key_names::LEVEL,
		Arg::new(key_names::LEVEL)
			.short('l')
			.long("level")
			.value_name(key_names::LEVEL)
			.help("Deflate level from 0 to 9, defaults to 9")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	map
}
