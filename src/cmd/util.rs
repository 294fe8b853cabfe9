use std::fs;
use std::path::Path;

use nsvalue::ns::{Result, Type, Value, from_json, load_type};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub(crate) const LOG_ENV: &str = "NSVALUE_LOG";

/// Install the stderr log subscriber; stdout stays reserved for command output.
pub(crate) fn init_logging() {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Load a schema file and bind a JSON document to it.
pub(crate) fn load_document(schema: &Path, document: &Path) -> Result<(Type, Value)> {
	let ty = load_type(schema)?;
	let json: serde_json::Value = serde_json::from_slice(&fs::read(document)?)?;
	let value = from_json(&ty, &json)?;
	Ok((ty, value))
}

/// Print a serializable payload as pretty JSON.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}
