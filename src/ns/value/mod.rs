use std::fmt;

use crate::ns::{Category, FloatKind, IntKind, Kind, NsError, Repr, Result, Type, UintKind};

/// Raw storage of a value. The owning [`Value`] keeps it consistent with its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
	/// Nothing present.
	Invalid,
	/// Boolean payload.
	Bool(bool),
	/// Signed integer payload, already truncated to the declared width.
	Int(i64),
	/// Unsigned integer payload, already truncated to the declared width.
	Uint(u64),
	/// Float payload; `float32` values are exactly representable as `f32`.
	Float(f64),
	/// String payload.
	String(String),
	/// Pointer target, `None` when nil.
	Ptr(Option<Box<Value>>),
	/// Interface content with its dynamic type, `None` when nil.
	Interface(Option<Box<Value>>),
	/// Slice or array elements.
	Seq(Vec<Value>),
	/// Map entries in insertion order with unique keys.
	Map(Vec<(Value, Value)>),
	/// Record field values in declaration order.
	Record(Vec<Value>),
}

/// One hop from a value to a value nested inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
	/// Pointer target or interface content.
	Deref,
	/// Record field by declaration position.
	Field(usize),
	/// Sequence element by index.
	Index(usize),
	/// Map entry by storage position.
	Entry(usize),
	/// Replacement produced by a custom unwrap function.
	Unwrap,
}

/// Dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
	ty: Type,
	data: Data,
}

impl Value {
	pub(crate) fn from_parts(ty: Type, data: Data) -> Self {
		Self { ty, data }
	}

	/// Build a value, checking that `data` fits `ty`.
	pub fn new(ty: &Type, data: Data) -> Result<Self> {
		check_data(ty, &data)?;
		Ok(Self { ty: ty.clone(), data })
	}

	/// Value with no type and no content.
	pub fn invalid() -> Self {
		Self::from_parts(Type::invalid(), Data::Invalid)
	}

	/// `bool` value.
	pub fn bool(value: bool) -> Self {
		Self::from_parts(Type::bool(), Data::Bool(value))
	}

	/// `int` value.
	pub fn int(value: i64) -> Self {
		Self::from_parts(Type::int(IntKind::Int), Data::Int(value))
	}

	/// Signed integer of `kind`, truncated to its width.
	pub fn int_of(kind: IntKind, value: i64) -> Self {
		Self::from_parts(Type::int(kind), Data::Int(kind.wrap(value)))
	}

	/// Unsigned integer of `kind`, truncated to its width.
	pub fn uint_of(kind: UintKind, value: u64) -> Self {
		Self::from_parts(Type::uint(kind), Data::Uint(kind.wrap(value)))
	}

	/// `float64` value.
	pub fn float64(value: f64) -> Self {
		Self::from_parts(Type::float(FloatKind::F64), Data::Float(value))
	}

	/// `float32` value.
	pub fn float32(value: f32) -> Self {
		Self::from_parts(Type::float(FloatKind::F32), Data::Float(f64::from(value)))
	}

	/// `string` value.
	pub fn string(value: impl Into<String>) -> Self {
		Self::from_parts(Type::string(), Data::String(value.into()))
	}

	/// Duration counting `nanos` nanoseconds.
	pub fn duration_nanos(nanos: i64) -> Self {
		Self::from_parts(Type::duration(), Data::Int(nanos))
	}

	/// Timestamp value.
	pub fn time(secs: i64, nanos: i32) -> Self {
		Self::from_parts(Type::time(), Data::Record(vec![Self::int_of(IntKind::I64, secs), Self::int_of(IntKind::I32, i64::from(nanos))]))
	}

	/// Non-nil pointer to `value`.
	pub fn ptr_to(value: Value) -> Self {
		Self::from_parts(Type::ptr(&value.ty), Data::Ptr(Some(Box::new(value))))
	}

	/// Nil pointer to `elem`.
	pub fn nil(elem: &Type) -> Self {
		Self::from_parts(Type::ptr(elem), Data::Ptr(None))
	}

	/// Interface holding `value` as its dynamic content.
	pub fn boxed(value: Value) -> Self {
		if value.kind() == Kind::Invalid {
			return Self::nil_interface();
		}
		Self::from_parts(Type::interface(), Data::Interface(Some(Box::new(value))))
	}

	/// Interface with no content.
	pub fn nil_interface() -> Self {
		Self::from_parts(Type::interface(), Data::Interface(None))
	}

	/// Slice of `elem` values.
	pub fn slice(elem: &Type, items: Vec<Value>) -> Result<Self> {
		Self::new(&Type::slice(elem), Data::Seq(items))
	}

	/// Fixed array sized by `items`.
	pub fn array(elem: &Type, items: Vec<Value>) -> Result<Self> {
		Self::new(&Type::array(elem, items.len()), Data::Seq(items))
	}

	/// Map value. A repeated key replaces the earlier entry.
	pub fn map(key: &Type, value: &Type, entries: Vec<(Value, Value)>) -> Result<Self> {
		let ty = Type::map(key, value)?;
		let mut unique: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
		for (entry_key, entry_value) in entries {
			expect_type(key, &entry_key)?;
			expect_type(value, &entry_value)?;
			match unique.iter_mut().find(|(existing, _)| *existing == entry_key) {
				Some(slot) => slot.1 = entry_value,
				None => unique.push((entry_key, entry_value)),
			}
		}
		Ok(Self::from_parts(ty, Data::Map(unique)))
	}

	/// Record of `ty` with field values in declaration order.
	pub fn record(ty: &Type, fields: Vec<Value>) -> Result<Self> {
		Self::new(ty, Data::Record(fields))
	}

	/// Zero value of `ty`: false, 0, "", nil, empty, or a record of zero fields.
	pub fn zero(ty: &Type) -> Self {
		let data = match ty.repr() {
			Repr::Invalid => Data::Invalid,
			Repr::Bool => Data::Bool(false),
			Repr::Int(_) => Data::Int(0),
			Repr::Uint(_) => Data::Uint(0),
			Repr::Float(_) => Data::Float(0.0),
			Repr::String => Data::String(String::new()),
			Repr::Ptr(_) => Data::Ptr(None),
			Repr::Interface => Data::Interface(None),
			Repr::Slice(_) => Data::Seq(Vec::new()),
			Repr::Array(elem, len) => Data::Seq((0..*len).map(|_| Self::zero(elem)).collect()),
			Repr::Map(..) => Data::Map(Vec::new()),
			Repr::Struct(fields) => Data::Record(fields.iter().map(|field| Self::zero(&field.ty)).collect()),
		};
		Self::from_parts(ty.clone(), data)
	}

	/// Static type.
	pub fn ty(&self) -> &Type {
		&self.ty
	}

	/// Fine-grained kind of the static type.
	pub fn kind(&self) -> Kind {
		self.ty.kind()
	}

	/// Resolver category of the static type.
	pub fn category(&self) -> Category {
		self.ty.category()
	}

	/// Raw storage.
	pub fn data(&self) -> &Data {
		&self.data
	}

	pub(crate) fn data_mut(&mut self) -> &mut Data {
		&mut self.data
	}

	/// Whether this is a nil pointer or an empty interface.
	pub fn is_nil(&self) -> bool {
		matches!(self.data, Data::Ptr(None) | Data::Interface(None))
	}

	/// Boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self.data {
			Data::Bool(value) => Some(value),
			_ => None,
		}
	}

	/// Signed integer payload.
	pub fn as_i64(&self) -> Option<i64> {
		match self.data {
			Data::Int(value) => Some(value),
			_ => None,
		}
	}

	/// Unsigned integer payload.
	pub fn as_u64(&self) -> Option<u64> {
		match self.data {
			Data::Uint(value) => Some(value),
			_ => None,
		}
	}

	/// Float payload.
	pub fn as_f64(&self) -> Option<f64> {
		match self.data {
			Data::Float(value) => Some(value),
			_ => None,
		}
	}

	/// String payload.
	pub fn as_str(&self) -> Option<&str> {
		match &self.data {
			Data::String(value) => Some(value),
			_ => None,
		}
	}

	/// Pointer target or interface content.
	pub fn elem(&self) -> Option<&Value> {
		self.at(Step::Deref)
	}

	/// Record field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.at(Step::Field(self.ty.field_index(name)?))
	}

	/// Sequence element by index.
	pub fn index(&self, idx: usize) -> Option<&Value> {
		self.at(Step::Index(idx))
	}

	/// Sequence elements; empty for non-sequences.
	pub fn items(&self) -> &[Value] {
		match &self.data {
			Data::Seq(items) => items,
			_ => &[],
		}
	}

	/// Map entries; empty for non-maps.
	pub fn entries(&self) -> &[(Value, Value)] {
		match &self.data {
			Data::Map(entries) => entries,
			_ => &[],
		}
	}

	/// Number of sequence elements or map entries.
	pub fn len(&self) -> usize {
		match &self.data {
			Data::Seq(items) => items.len(),
			Data::Map(entries) => entries.len(),
			_ => 0,
		}
	}

	/// Whether [`Value::len`] is zero.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Storage position of the entry whose key equals `key`.
	pub fn entry_position(&self, key: &Value) -> Option<usize> {
		self.entries().iter().position(|(candidate, _)| candidate == key)
	}

	/// Map value stored under `key`.
	pub fn map_get(&self, key: &Value) -> Option<&Value> {
		self.at(Step::Entry(self.entry_position(key)?))
	}

	/// Follow one step.
	pub fn at(&self, step: Step) -> Option<&Value> {
		match (step, &self.data) {
			(Step::Deref, Data::Ptr(inner) | Data::Interface(inner)) => inner.as_deref(),
			(Step::Field(idx), Data::Record(values)) | (Step::Index(idx), Data::Seq(values)) => values.get(idx),
			(Step::Entry(pos), Data::Map(entries)) => entries.get(pos).map(|(_, value)| value),
			_ => None,
		}
	}

	/// Follow one step for writing.
	pub fn at_mut(&mut self, step: Step) -> Option<&mut Value> {
		match (step, &mut self.data) {
			(Step::Deref, Data::Ptr(inner) | Data::Interface(inner)) => inner.as_deref_mut(),
			(Step::Field(idx), Data::Record(values)) | (Step::Index(idx), Data::Seq(values)) => values.get_mut(idx),
			(Step::Entry(pos), Data::Map(entries)) => entries.get_mut(pos).map(|(_, value)| value),
			_ => None,
		}
	}

	/// Replace this value in place. Interfaces accept any valid value; other slots need identical types.
	pub fn set(&mut self, value: Value) -> Result<()> {
		if value.ty == self.ty {
			*self = value;
			return Ok(());
		}

		if self.kind() == Kind::Interface && value.kind() != Kind::Invalid {
			self.data = Data::Interface(Some(Box::new(value)));
			return Ok(());
		}

		Err(NsError::TypeMismatch {
			expected: self.ty.to_string(),
			got: value.ty.to_string(),
		})
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.data {
			Data::Invalid => f.write_str("<invalid>"),
			Data::Bool(value) => write!(f, "{value}"),
			Data::Int(value) => write!(f, "{value}"),
			Data::Uint(value) => write!(f, "{value}"),
			Data::Float(value) => write!(f, "{value}"),
			Data::String(value) => write!(f, "{value:?}"),
			Data::Ptr(None) | Data::Interface(None) => f.write_str("nil"),
			Data::Ptr(Some(inner)) => write!(f, "&{inner}"),
			Data::Interface(Some(inner)) => write!(f, "{inner}"),
			Data::Seq(items) => {
				f.write_str("[")?;
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(" ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Data::Map(entries) => {
				f.write_str("map[")?;
				for (idx, (key, value)) in entries.iter().enumerate() {
					if idx > 0 {
						f.write_str(" ")?;
					}
					write!(f, "{key}:{value}")?;
				}
				f.write_str("]")
			}
			Data::Record(values) => {
				f.write_str("{")?;
				for (idx, (field, value)) in self.ty.fields().iter().zip(values).enumerate() {
					if idx > 0 {
						f.write_str(" ")?;
					}
					write!(f, "{}:{value}", field.name)?;
				}
				f.write_str("}")
			}
		}
	}
}

fn expect_type(expected: &Type, value: &Value) -> Result<()> {
	if value.ty == *expected {
		return Ok(());
	}
	Err(NsError::TypeMismatch {
		expected: expected.to_string(),
		got: value.ty.to_string(),
	})
}

fn check_data(ty: &Type, data: &Data) -> Result<()> {
	let fits = match (ty.repr(), data) {
		(Repr::Invalid, Data::Invalid) | (Repr::Bool, Data::Bool(_)) | (Repr::String, Data::String(_)) => true,
		(Repr::Int(kind), Data::Int(value)) => kind.wrap(*value) == *value,
		(Repr::Uint(kind), Data::Uint(value)) => kind.wrap(*value) == *value,
		(Repr::Float(FloatKind::F64), Data::Float(_)) => true,
		(Repr::Float(FloatKind::F32), Data::Float(value)) => value.is_nan() || f64::from(*value as f32) == *value,
		(Repr::Ptr(elem), Data::Ptr(inner)) => {
			if let Some(inner) = inner {
				expect_type(elem, inner)?;
			}
			true
		}
		(Repr::Interface, Data::Interface(inner)) => inner.as_deref().is_none_or(|inner| inner.kind() != Kind::Invalid),
		(Repr::Slice(elem), Data::Seq(items)) => {
			for item in items {
				expect_type(elem, item)?;
			}
			true
		}
		(Repr::Array(elem, len), Data::Seq(items)) => {
			for item in items {
				expect_type(elem, item)?;
			}
			items.len() == *len
		}
		(Repr::Map(key, value), Data::Map(entries)) => {
			for (idx, (entry_key, entry_value)) in entries.iter().enumerate() {
				expect_type(key, entry_key)?;
				expect_type(value, entry_value)?;
				if entries[..idx].iter().any(|(earlier, _)| earlier == entry_key) {
					return Err(NsError::TypeMismatch {
						expected: format!("unique keys in {ty}"),
						got: format!("duplicate key {entry_key}"),
					});
				}
			}
			true
		}
		(Repr::Struct(fields), Data::Record(values)) => {
			for (field, value) in fields.iter().zip(values) {
				expect_type(&field.ty, value)?;
			}
			fields.len() == values.len()
		}
		_ => false,
	};

	if fits {
		return Ok(());
	}
	Err(NsError::TypeMismatch {
		expected: ty.to_string(),
		got: data_label(data).to_owned(),
	})
}

fn data_label(data: &Data) -> &'static str {
	match data {
		Data::Invalid => "invalid",
		Data::Bool(_) => "bool data",
		Data::Int(_) => "signed integer data",
		Data::Uint(_) => "unsigned integer data",
		Data::Float(_) => "float data",
		Data::String(_) => "string data",
		Data::Ptr(_) => "pointer data",
		Data::Interface(_) => "interface data",
		Data::Seq(_) => "sequence data",
		Data::Map(_) => "map data",
		Data::Record(_) => "record data",
	}
}

#[cfg(test)]
mod tests;
