use tabled::{
	Table, Tabled,
	settings::{*, object::Columns},
};
use danpak::prelude::*;
use indicatif::HumanBytes;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1.0";

/// This command lists the entries in an archive in tabulated form
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let archive_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => {
				anyhow::bail!("Please provide an input archive file using the -i or --input keys!")
			},
		};

		let root = args.value_of(key_names::ROOT).unwrap_or("").trim_matches('/');

		let mut archive = FileArchive::from_path(archive_path, super::password(args)).map_err(super::explain)?;

		// log basic metadata
		println!("{}", archive);

		let paths = archive.file_tree(root)?.paths();
		let mut table_entries = Vec::with_capacity(paths.len());

		for (path, _) in paths {
			let path = if root.is_empty() { path } else { format!("{}/{}", root, path) };
			let entry = archive.fetch_entry(&path)?;

			table_entries.push(FileTableEntry {
				stored: HumanBytes(entry.compressed_size).to_string(),
				original: HumanBytes(entry.uncompressed_size).to_string(),
				path,
			});
		}

		let mut table = Table::new(table_entries);
		table
			.with(Style::rounded())
			.with(Modify::list(Columns::new(..1), Alignment::left()));

		println!("{}", table);

		Ok(())
	}
}

#[derive(Tabled)]
struct FileTableEntry {
	path: String,
	stored: String,
	original: String,
}
