use std::collections::HashMap;
use clap::{Command, Arg};

use crate::keys::key_names;
use crate::commands;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

pub fn build_app<'a>(key_map: HashMap<&'static str, Arg<'a>>) -> Command<'a> {
	Command::new("danpak")
		.author(self::AUTHORS)
		.about("A command-line interface for packing and unpacking asset archives")
		.version(self::VERSION)
		.subcommand(
			Command::new("pack")
				.author(AUTHORS)
				.version(commands::pack::VERSION)
				.about("Packages a folder into an archive")
				// Files
				.arg(&key_map[key_names::INPUT])
				.arg(&key_map[key_names::OUTPUT])
				// Codecs
				.arg(&key_map[key_names::PASSWORD])
				.arg(&key_map[key_names::ENCRYPTION])
				.arg(&key_map[key_names::COMPRESSION])
				.arg(&key_map[key_names::LEVEL]),
		)
		.subcommand(
			Command::new("unpack")
				.author(AUTHORS)
				.version(commands::unpack::VERSION)
				.about("Extracts an archive into a folder")
				.arg(&key_map[key_names::INPUT])
				.arg(&key_map[key_names::OUTPUT])
				.arg(&key_map[key_names::PASSWORD]),
		)
		.subcommand(
			Command::new("list")
				.author(AUTHORS)
				.version(commands::list::VERSION)
				.about("Lists the files in an archive and their sizes")
				.arg(&key_map[key_names::INPUT])
				.arg(&key_map[key_names::PASSWORD])
				.arg(&key_map[key_names::ROOT]),
		)
		.subcommand(
			Command::new("pipe")
				.author(AUTHORS)
				.version(commands::pipe::VERSION)
				.about("Pipes a file from an archive to stdout")
				.arg(&key_map[key_names::INPUT])
				.arg(&key_map[key_names::RESOURCE])
				.arg(&key_map[key_names::PASSWORD]),
		)
		.subcommand(
			Command::new("seal")
				.author(AUTHORS)
				.version(commands::seal::VERSION)
				.about("Encrypts a single file into a single-file archive")
				.arg(&key_map[key_names::INPUT])
				.arg(&key_map[key_names::OUTPUT])
				.arg(&key_map[key_names::PASSWORD])
				.arg(&key_map[key_names::ENCRYPTION])
				.arg(&key_map[key_names::COMPRESSION])
				.arg(&key_map[key_names::LEVEL]),
		)
		.subcommand(
			Command::new("unseal")
				.author(AUTHORS)
				.version(commands::unseal::VERSION)
				.about("Decrypts a single-file archive, to a file or stdout")
				.arg(&key_map[key_names::INPUT])
				.arg(&key_map[key_names::OUTPUT])
				.arg(&key_map[key_names::PASSWORD]),
		)
}
