mod app;
mod commands;
mod keys;

use std::{env, process};

fn main() {
	if env::var("RUST_LOG").is_err() {
		// log level not explicitly set by the user
		env::set_var("RUST_LOG", "info");
	}
	pretty_env_logger::init();

	// Build CLI
	let keys = keys::build_keys();
	let app = app::build_app(keys);
	let commands = commands::build_commands();

	// Start CLI
	let matches = app.get_matches();

	let result = match matches.subcommand() {
		Some((key, mtx)) => match commands.get(key) {
			Some(command) => command.evaluate(mtx),
			None => Err(anyhow::anyhow!("Unknown subcommand: {}", key)),
		},
		None => {
			log::info!("danpak: Run `danpak --help` for usage");
			Ok(())
		},
	};

	if let Err(err) = result {
		log::error!("{:#}", err);
		process::exit(1);
	}
}
