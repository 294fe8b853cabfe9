mod coerce;
mod error;
mod mutate;
mod path;
mod registry;
mod resolve;
mod schema;
mod settle;
mod types;
mod value;

/// Scalar text parsers.
pub use coerce::{parse_as, parse_bool, parse_duration, parse_float, parse_index, parse_int, parse_int_for, parse_key, parse_uint};
/// Error and result aliases.
pub use error::{NsError, Result};
/// Write handle and write-back entry point.
pub use mutate::{Slot, write};
/// Namespace parser types and delimiters.
pub use path::{LEFT_BRACKET, NAMESPACE_SEPARATOR, NamespacePath, RIGHT_BRACKET, Segment, Selector};
/// Custom unwrap function registry.
pub use registry::{UnwrapFn, UnwrapRegistry};
/// Namespace resolution types and entry points.
pub use resolve::{IndexPolicy, Miss, MissReason, Resolution, ResolutionMut, ResolveOptions, Resolver};
/// JSON schema notation and document binding.
pub use schema::{CompositeSpec, FieldSpec, TypeSpec, from_json, load_type, named_type, to_json};
/// Indirection and custom-unwrap settling.
pub use settle::{Settled, extract_type, settle};
/// Type descriptors and kind classification.
pub use types::{Category, DURATION_TYPE_NAME, FieldDef, FloatKind, IntKind, Kind, Repr, TIME_TYPE_NAME, Type, UintKind};
/// Dynamic values and traversal steps.
pub use value::{Data, Step, Value};
