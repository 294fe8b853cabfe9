#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "nsvalue", about = "Resolve and write namespaced values in typed JSON documents")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Resolve a namespace and print what it reaches.
	Get(cmd::get::Args),
	/// Write text into the scalar a namespace reaches and print the document.
	Set(cmd::set::Args),
	/// Coerce text into a scalar type.
	Parse(cmd::parse::Args),
}

fn main() {
	cmd::util::init_logging();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> nsvalue::ns::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Get(args) => cmd::get::run(args),
		Commands::Set(args) => cmd::set::run(args),
		Commands::Parse(args) => cmd::parse::run(args),
	}
}
