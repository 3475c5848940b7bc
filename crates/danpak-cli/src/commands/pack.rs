use std::{
	fs,
	io::{BufWriter, Write},
	path::Path,
};

use danpak::prelude::*;
use indicatif::{HumanBytes, ProgressBar};
use tempfile::NamedTempFile;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1.0";

/// This command packs a whole folder into a new archive
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => Path::new(path),
			None => anyhow::bail!("Please provide a folder to pack using the -i or --input key"),
		};

		if !input_path.is_dir() {
			anyhow::bail!("{} is not a folder", input_path.display());
		}

		let output_path = match args.value_of(key_names::OUTPUT) {
			Some(path) => Path::new(path),
			None => anyhow::bail!("Please provide an output path using the -o or --output key"),
		};

		let config = super::pack_config(args)?;

		// An older archive sitting inside the input folder must not pack itself
		let skip = fs::canonicalize(output_path).ok();
		let mut leaves = leaves_from_dir(input_path, skip.as_deref())?;

		let progress = ProgressBar::new(leaves.len() as u64);
		progress.set_style(super::progress_style()?);

		let mut callback = |id: &str, _: &FileHeader| {
			progress.inc(1);
			progress.set_message(id.to_string());
		};

		// Write next to the destination, then persist, so a failed pack never clobbers an existing archive
		let directory = match output_path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};

		let mut temporary_file = NamedTempFile::new_in(directory)?;

		let bytes_written = {
			let mut writer = BufWriter::new(temporary_file.as_file_mut());
			let written = dump(&mut writer, &mut leaves, &config, Some(&mut callback))?;
			writer.flush()?;
			written
		};

		temporary_file.persist(output_path)?;
		progress.finish();

		log::info!(
			"Generated a new archive @ {}; {} files, {} written",
			output_path.display(),
			leaves.len(),
			HumanBytes(bytes_written)
		);

		Ok(())
	}
}
