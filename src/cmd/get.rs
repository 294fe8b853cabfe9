use std::path::PathBuf;

use nsvalue::ns::{ResolveOptions, Resolver, Result, Step, UnwrapRegistry, to_json};

use crate::cmd::util::{emit_json, load_document};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	pub document: PathBuf,
	pub namespace: String,
	/// Treat malformed index text as 0 and malformed key text as the zero key.
	#[arg(long)]
	pub lenient: bool,
	#[arg(long)]
	pub json: bool,
}

/// Resolve a namespace in a document and print the outcome.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema,
		document,
		namespace,
		lenient,
		json,
	} = args;

	let (_, root) = load_document(&schema, &document)?;
	let registry = UnwrapRegistry::new();
	let options = if lenient { ResolveOptions::lenient() } else { ResolveOptions::strict() };
	let resolver = Resolver::with_options(&registry, options);
	let resolution = resolver.resolve(&root, &namespace)?;

	let payload = GetJson {
		namespace,
		found: resolution.found(),
		kind: resolution.kind.to_string(),
		category: resolution.category().to_string(),
		nullable: resolution.nullable,
		trail: resolution.trail.iter().copied().map(step_label).collect(),
		miss: resolution.miss.as_ref().map(|miss| MissJson {
			segment: miss.segment,
			reason: miss.reason.to_string(),
		}),
		value: to_json(&resolution.value),
	};

	if json {
		return emit_json(&payload);
	}

	println!("namespace: {}", payload.namespace);
	println!("found: {}", payload.found);
	println!("kind: {}", payload.kind);
	println!("category: {}", payload.category);
	println!("nullable: {}", payload.nullable);
	println!("trail: {}", payload.trail.join(" "));
	if let Some(miss) = &payload.miss {
		println!("miss: segment {} ({})", miss.segment, miss.reason);
	}
	println!("value: {}", resolution.value.as_ref());
	Ok(())
}

fn step_label(step: Step) -> String {
	match step {
		Step::Deref => "deref".to_owned(),
		Step::Unwrap => "unwrap".to_owned(),
		Step::Field(idx) => format!("field:{idx}"),
		Step::Index(idx) => format!("index:{idx}"),
		Step::Entry(pos) => format!("entry:{pos}"),
	}
}

#[derive(serde::Serialize)]
struct GetJson {
	namespace: String,
	found: bool,
	kind: String,
	category: String,
	nullable: bool,
	trail: Vec<String>,
	miss: Option<MissJson>,
	value: serde_json::Value,
}

#[derive(serde::Serialize)]
struct MissJson {
	segment: usize,
	reason: String,
}
