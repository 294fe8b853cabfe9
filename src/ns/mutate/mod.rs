use tracing::debug;

use crate::ns::coerce::parse_as;
use crate::ns::{Category, Data, Kind, Result, Value};

/// Writable handle to a location inside a host value.
#[derive(Debug)]
pub struct Slot<'a> {
	value: &'a mut Value,
}

impl<'a> Slot<'a> {
	/// Wrap a mutable reference.
	pub fn new(value: &'a mut Value) -> Self {
		Self { value }
	}

	/// Current value.
	pub fn get(&self) -> &Value {
		self.value
	}

	/// Kind of the current value.
	pub fn kind(&self) -> Kind {
		self.value.kind()
	}

	/// Resolver category of the current value.
	pub fn category(&self) -> Category {
		self.value.category()
	}

	/// Replace the value; see [`Value::set`] for the type rule.
	pub fn set(&mut self, value: Value) -> Result<()> {
		self.value.set(value)
	}

	/// Parse `text` for this slot and store it.
	pub fn write(&mut self, text: &str) -> Result<()> {
		write(self.value, text)
	}

	/// Give up the handle and return the underlying reference.
	pub fn into_mut(self) -> &'a mut Value {
		self.value
	}
}

/// Parse `text` as the scalar type of `target` and store it in place.
///
/// A pointer target is followed one layer per call; a nil pointer first receives a zero-valued
/// pointee, dropped again if the write fails. Non-scalar targets fail with
/// [`NsError::UnsupportedType`](crate::ns::NsError::UnsupportedType) and are left untouched.
pub fn write(target: &mut Value, text: &str) -> Result<()> {
	let pointee = match target.kind() {
		Kind::Ptr => target.ty().elem().cloned(),
		_ => None,
	};

	if let (Some(pointee), Data::Ptr(inner)) = (pointee, target.data_mut()) {
		let allocated = inner.is_none();
		let interior = inner.get_or_insert_with(|| {
			debug!(pointee = %pointee, "allocating pointer target");
			Box::new(Value::zero(&pointee))
		});
		let outcome = write(interior, text);
		if outcome.is_err() && allocated {
			*inner = None;
		}
		return outcome;
	}

	*target = parse_as(target.ty(), text)?;
	Ok(())
}
