/// Namespace read command.
pub mod get;
/// Scalar coercion command.
pub mod parse;
/// Namespace write command.
pub mod set;
/// Shared loading and output helpers.
pub mod util;
