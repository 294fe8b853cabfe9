use nsvalue::ns::{Result, named_type, parse_as, to_json};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Scalar type name such as `int8`, `float32` or `duration`.
	pub type_name: String,
	pub text: String,
	#[arg(long)]
	pub json: bool,
}

/// Coerce text into a scalar type and print the result.
pub fn run(args: Args) -> Result<()> {
	let Args { type_name, text, json } = args;

	let ty = named_type(&type_name)?;
	let value = parse_as(&ty, &text)?;

	if json {
		return emit_json(&ParseJson {
			type_name: ty.to_string(),
			kind: value.kind().to_string(),
			value: to_json(&value),
		});
	}

	println!("type: {ty}");
	println!("kind: {}", value.kind());
	println!("value: {value}");
	Ok(())
}

#[derive(serde::Serialize)]
struct ParseJson {
	#[serde(rename = "type")]
	type_name: String,
	kind: String,
	value: serde_json::Value,
}
