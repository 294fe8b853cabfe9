use std::path::PathBuf;

use nsvalue::ns::{Resolver, Result, UnwrapRegistry, to_json};

use crate::cmd::util::{emit_json, load_document};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	pub document: PathBuf,
	pub namespace: String,
	pub text: String,
	#[arg(long)]
	pub json: bool,
}

/// Write text at a namespace and print the updated document.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema,
		document,
		namespace,
		text,
		json,
	} = args;

	let (_, mut root) = load_document(&schema, &document)?;
	let registry = UnwrapRegistry::new();
	let resolver = Resolver::new(&registry);
	resolver.write(&mut root, &namespace, &text)?;

	if json {
		let written = resolver.resolve(&root, &namespace)?;
		return emit_json(&SetJson {
			namespace,
			written: to_json(&written.value),
			document: to_json(&root),
		});
	}

	emit_json(&to_json(&root))
}

#[derive(serde::Serialize)]
struct SetJson {
	namespace: String,
	written: serde_json::Value,
	document: serde_json::Value,
}
