use std::fs;
use danpak::prelude::*;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1.0";

/// This command wraps one file into a single-file archive
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide a file to seal using the -i or --input key"),
		};

		let output_path = match args.value_of(key_names::OUTPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an output path using the -o or --output key"),
		};

		let config = super::pack_config(args)?;
		let data = fs::read(input_path)?;

		let bytes_written = save_encrypted_binary_file(output_path, &data, &config)?;
		log::info!("Sealed {} @ {}; Bytes written: {}", input_path, output_path, bytes_written);

		Ok(())
	}
}
