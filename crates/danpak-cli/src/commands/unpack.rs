use std::{path::PathBuf, str::FromStr, time::Instant};

use danpak::prelude::*;
use indicatif::ProgressBar;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1.0";

/// This command extracts an archive into the specified output folder
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input path using the -i or --input key"),
		};

		let output_path = match args.value_of(key_names::OUTPUT) {
			Some(path) => PathBuf::from_str(path)?,
			None => Default::default(),
		};

		if output_path.is_file() {
			anyhow::bail!("Please provide a directory|folder path as the value of -o | --output")
		};

		// For measuring the time difference
		let time = Instant::now();

		let mut archive = FileArchive::from_path(input_path, super::password(args)).map_err(super::explain)?;
		let count = archive.entries()?.len();

		let progress = ProgressBar::new(count as u64);
		progress.set_style(super::progress_style()?);

		let mut callback = |path: &str, _: u64| {
			progress.inc(1);
			progress.set_message(path.to_string());
		};

		archive.unpack_to_with(&output_path, Some(&mut callback))?;
		archive.close();
		progress.finish();

		log::info!("Extracted {} files in {}s", count, time.elapsed().as_secs_f64());
		Ok(())
	}
}
