use std::{
	fs,
	io::{self, Write},
};
use danpak::prelude::*;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1.0";

/// This command reads a single-file archive back, into a file or stdout when no output is given
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide a sealed file using the -i or --input key"),
		};

		let data = load_encrypted_binary_file(input_path, super::password(args)).map_err(super::explain)?;

		match args.value_of(key_names::OUTPUT) {
			Some(output_path) => {
				fs::write(output_path, &data)?;
				log::info!("Unsealed {} @ {}; {} bytes", input_path, output_path, data.len());
			},
			None => {
				let mut handle = io::stdout().lock();
				handle.write_all(&data)?;
				handle.flush()?;
			},
		}

		Ok(())
	}
}
