use std::collections::HashMap;

use danpak::prelude::*;

use crate::keys::key_names;

// A common progress bar style for all commands
const PROGRESS_BAR_STYLE: &str = "[{elapsed_precise}] {spinner} {bar:50.cyan/blue} {pos:>7}/{len:7} ETA {eta_precise} {msg}";

// Trait that all subcommands must implement
pub trait CommandTrait: Sync {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()>;
}

// All sub-commands are defined in the below modules
pub mod list;
pub mod pack;
pub mod pipe;
pub mod seal;
pub mod unpack;
pub mod unseal;

pub fn build_commands() -> HashMap<&'static str, Box<dyn CommandTrait>> {
	let mut map: HashMap<&'static str, Box<dyn CommandTrait>> = HashMap::new();

	map.insert("pack", Box::new(pack::Evaluator));
	map.insert("unpack", Box::new(unpack::Evaluator));
	map.insert("list", Box::new(list::Evaluator));
	map.insert("pipe", Box::new(pipe::Evaluator));
	map.insert("seal", Box::new(seal::Evaluator));
	map.insert("unseal", Box::new(unseal::Evaluator));

	map
}

fn progress_style() -> anyhow::Result<indicatif::ProgressStyle> {
	Ok(indicatif::ProgressStyle::default_bar()
		.template(PROGRESS_BAR_STYLE)?
		.progress_chars("█░-")
		.tick_chars("⢀ ⡀ ⠄ ⢂ ⡂ ⠅ ⢃ ⡃ ⠍ ⢋ ⡋ ⠍⠁⢋⠁⡋⠁⠍⠉⠋⠉⠋⠉⠉⠙⠉⠙⠉⠩⠈⢙⠈⡙⢈⠩⡀⢙⠄⡙⢂⠩⡂⢘⠅⡘⢃⠨⡃⢐⠍⡐⢋⠠⡋⢀⠍⡁⢋⠁⡋⠁⠍⠉⠋⠉⠋⠉⠉⠙⠉⠙⠉⠩⠈⢙⠈⡙⠈⠩ ⢙ ⡙ ⠩ ⢘ ⡘ ⠨ ⢐ ⡐ ⠠ ⢀ ⡀"))
}

fn password<'a>(args: &'a clap::ArgMatches) -> &'a str {
	args.value_of(key_names::PASSWORD).unwrap_or("")
}

// Reads -p, -e, -c and -l into a PackConfig
fn pack_config(args: &clap::ArgMatches) -> anyhow::Result<PackConfig> {
	let encryption = match args.value_of(key_names::ENCRYPTION) {
		Some("none") => EncryptionAlgorithm::None,
		Some("aes256") | None => EncryptionAlgorithm::Aes256,
		Some(other) => anyhow::bail!("Unknown encryption: {}. Valid values are: 'none' 'aes256'", other),
	};

	let compression = match args.value_of(key_names::COMPRESSION) {
		Some("none") => CompressionAlgorithm::None,
		Some("zip") | None => CompressionAlgorithm::Zip,
		Some(other) => anyhow::bail!("Unknown compression: {}. Valid values are: 'none' 'zip'", other),
	};

	let level: u8 = match args.value_of(key_names::LEVEL) {
		Some(level) => level.parse()?,
		None => 9,
	};

	if level > 9 {
		anyhow::bail!("Compression level must be between 0 and 9, found {}", level);
	}

	Ok(PackConfig::default()
		.password(password(args))
		.encryption(encryption)
		.compression(compression)
		.level(level))
}

// Turns the errors a user can act upon into readable advice
fn explain(err: InternalError) -> anyhow::Error {
	match err {
		InternalError::UnsupportedVersion(version) => anyhow::anyhow!(
			"This archive requires format version {}, this build only reads up to version {}",
			version,
			danpak::VERSION
		),
		InternalError::DirectoryTreeError(_) => {
			anyhow::anyhow!("Unable to read the directory tree, is the password right? ({})", err)
		},
		InternalError::NotMultiFileArchive => {
			anyhow::anyhow!("This is a single-file archive, use `danpak unseal` to read it")
		},
		InternalError::NotSingleFileArchive => {
			anyhow::anyhow!("This is a multi-file archive, use `danpak unpack` or `danpak pipe` to read it")
		},
		err => err.into(),
	}
}
