use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, NsError>;

/// Errors produced while resolving namespaces, coercing text, and writing values.
#[derive(Debug, Error)]
pub enum NsError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON syntax or shape failure while reading schemas and documents.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Namespace does not match the shape of the value it is applied to.
	#[error("invalid namespace {namespace:?} at offset {offset}: {detail}")]
	InvalidNamespace {
		/// Full namespace as supplied by the caller.
		namespace: String,
		/// Byte offset of the offending segment.
		offset: usize,
		/// Human-readable description of the mismatch.
		detail: String,
	},
	/// Text could not be parsed as the requested scalar kind.
	#[error("cannot convert {text:?} to {target}: {reason}")]
	Conversion {
		/// Input text.
		text: String,
		/// Target type label.
		target: String,
		/// Parser failure description.
		reason: &'static str,
	},
	/// Operation has no rule for the given type.
	#[error("unsupported type {type_name}")]
	UnsupportedType {
		/// Rendered type name.
		type_name: String,
	},
	/// Value type does not match the slot or container type.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Expected type label.
		expected: String,
		/// Actual type label.
		got: String,
	},
	/// Registering an unwrap function would make settling loop forever.
	#[error("custom unwrap for {input} -> {output} would create a cycle")]
	UnwrapCycle {
		/// Registered input type.
		input: String,
		/// Declared output type.
		output: String,
	},
	/// Unwrap function returned a value of a different type than it declared.
	#[error("custom unwrap for {input} returned {got}, declared {declared}")]
	UnwrapMismatch {
		/// Registered input type.
		input: String,
		/// Declared output type.
		declared: String,
		/// Type actually returned.
		got: String,
	},
	/// Settling applied more unwrap functions than allowed.
	#[error("custom unwrap chain exceeded limit (max={max_unwraps})")]
	UnwrapLimitExceeded {
		/// Configured ceiling.
		max_unwraps: usize,
	},
	/// Write target only exists as a custom-unwrap replacement value.
	#[error("namespace {namespace:?} resolves through a custom unwrap and is not writable")]
	Detached {
		/// Namespace that was resolved for writing.
		namespace: String,
	},
	/// Namespace did not resolve to a slot that can be written.
	#[error("namespace {namespace:?} not found: {reason}")]
	NotFound {
		/// Namespace that was resolved.
		namespace: String,
		/// Rendered miss reason.
		reason: String,
	},
	/// JSON document does not fit the declared schema.
	#[error("schema mismatch at {path}: {detail}")]
	Schema {
		/// Location in the document, rendered as a namespace.
		path: String,
		/// Description of the mismatch.
		detail: String,
	},
}
