use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::ns::{Kind, NsError, Repr, Result, Type, Value};

/// Signature of a custom unwrap function.
pub type UnwrapFn = dyn Fn(&Value) -> Value + Send + Sync;

struct UnwrapEntry {
	output: Type,
	func: Arc<UnwrapFn>,
}

/// Custom unwrap functions keyed by exact input type.
///
/// Built once, then shared by reference; settling only reads it.
#[derive(Default)]
pub struct UnwrapRegistry {
	entries: HashMap<Type, UnwrapEntry>,
}

impl UnwrapRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `func` for values whose type is exactly `input`, declaring it returns `output`.
	///
	/// Pointer, interface, and invalid inputs are rejected because settling never consults the
	/// registry at those kinds. A registration whose output chain (looking through pointer layers)
	/// reaches `input` again is rejected as a cycle. Registering the same input twice replaces the
	/// earlier function.
	pub fn register<F>(&mut self, input: &Type, output: &Type, func: F) -> Result<()>
	where
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		if matches!(input.kind(), Kind::Ptr | Kind::Interface | Kind::Invalid) {
			return Err(NsError::UnsupportedType {
				type_name: format!("custom unwrap input {input}"),
			});
		}

		let mut current = strip_pointers(output);
		loop {
			if current == input {
				return Err(NsError::UnwrapCycle {
					input: input.to_string(),
					output: output.to_string(),
				});
			}
			match self.entries.get(current) {
				Some(entry) => current = strip_pointers(&entry.output),
				None => break,
			}
		}

		debug!(input = %input, output = %output, "registered custom unwrap");
		self.entries.insert(
			input.clone(),
			UnwrapEntry {
				output: output.clone(),
				func: Arc::new(func),
			},
		);
		Ok(())
	}

	/// Whether a function is registered for exactly `ty`.
	pub fn contains(&self, ty: &Type) -> bool {
		self.entries.contains_key(ty)
	}

	/// Number of registered functions.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Apply the function registered for `value`'s type, if any.
	///
	/// The returned value must have the declared output type; an interface output accepts anything.
	pub fn apply(&self, value: &Value) -> Option<Result<Value>> {
		let entry = self.entries.get(value.ty())?;
		let out = (entry.func)(value);

		if out.ty() != &entry.output && entry.output.kind() != Kind::Interface {
			return Some(Err(NsError::UnwrapMismatch {
				input: value.ty().to_string(),
				declared: entry.output.to_string(),
				got: out.ty().to_string(),
			}));
		}
		Some(Ok(out))
	}
}

impl fmt::Debug for UnwrapRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.entries.iter().map(|(input, entry)| (input.to_string(), entry.output.to_string())))
			.finish()
	}
}

fn strip_pointers(ty: &Type) -> &Type {
	let mut current = ty;
	while let Repr::Ptr(elem) = current.repr() {
		current = elem;
	}
	current
}
