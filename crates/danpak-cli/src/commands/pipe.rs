use std::io::{self, Write};
use danpak::prelude::*;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1.0";

pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input path using the -i or --input key"),
		};

		let resource = match args.value_of(key_names::RESOURCE) {
			Some(resource) => resource,
			None => anyhow::bail!("Please provide a resource to extract using the -r or --resource key"),
		};

		let mut archive = FileArchive::from_path(input_path, super::password(args)).map_err(super::explain)?;
		let data = archive.binary_file(resource)?;

		let stdout = io::stdout();
		{
			let mut handle = stdout.lock();
			handle.write_all(&data)?;
			handle.flush()?;
		}

		Ok(())
	}
}
