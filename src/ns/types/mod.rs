use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::ns::{NsError, Result};

/// Declared name of the elapsed-time duration type.
pub const DURATION_TYPE_NAME: &str = "time.Duration";
/// Declared name of the wall-clock timestamp type.
pub const TIME_TYPE_NAME: &str = "time.Time";

/// Signed integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
	/// Platform-width signed integer (64-bit).
	Int,
	/// 8-bit signed integer.
	I8,
	/// 16-bit signed integer.
	I16,
	/// 32-bit signed integer.
	I32,
	/// 64-bit signed integer.
	I64,
}

impl IntKind {
	/// Truncate a 64-bit value to this width, wrapping like a two's-complement cast.
	pub fn wrap(self, value: i64) -> i64 {
		match self {
			Self::I8 => i64::from(value as i8),
			Self::I16 => i64::from(value as i16),
			Self::I32 => i64::from(value as i32),
			Self::Int | Self::I64 => value,
		}
	}

	/// Canonical type label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Int => "int",
			Self::I8 => "int8",
			Self::I16 => "int16",
			Self::I32 => "int32",
			Self::I64 => "int64",
		}
	}
}

/// Unsigned integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintKind {
	/// Platform-width unsigned integer (64-bit).
	Uint,
	/// 8-bit unsigned integer.
	U8,
	/// 16-bit unsigned integer.
	U16,
	/// 32-bit unsigned integer.
	U32,
	/// 64-bit unsigned integer.
	U64,
}

impl UintKind {
	/// Truncate a 64-bit value to this width.
	pub fn wrap(self, value: u64) -> u64 {
		match self {
			Self::U8 => u64::from(value as u8),
			Self::U16 => u64::from(value as u16),
			Self::U32 => u64::from(value as u32),
			Self::Uint | Self::U64 => value,
		}
	}

	/// Canonical type label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Uint => "uint",
			Self::U8 => "uint8",
			Self::U16 => "uint16",
			Self::U32 => "uint32",
			Self::U64 => "uint64",
		}
	}
}

/// Floating point widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
	/// IEEE-754 single precision.
	F32,
	/// IEEE-754 double precision.
	F64,
}

impl FloatKind {
	/// Canonical type label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::F32 => "float32",
			Self::F64 => "float64",
		}
	}
}

/// Fine-grained kind of a type, independent of its declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// No value and no static type.
	Invalid,
	/// Boolean scalar.
	Bool,
	/// Signed integer scalar.
	Int(IntKind),
	/// Unsigned integer scalar.
	Uint(UintKind),
	/// Floating point scalar.
	Float(FloatKind),
	/// UTF-8 string scalar.
	String,
	/// Pointer/optional indirection.
	Ptr,
	/// Polymorphic container holding any dynamic type.
	Interface,
	/// Growable sequence.
	Slice,
	/// Fixed-length sequence.
	Array,
	/// Keyed map.
	Map,
	/// Record with named fields.
	Struct,
}

impl Kind {
	/// Dispatch category used by namespace resolution.
	pub fn category(self) -> Category {
		match self {
			Self::Invalid => Category::Invalid,
			Self::Bool | Self::Int(_) | Self::Uint(_) | Self::Float(_) | Self::String => Category::Scalar,
			Self::Ptr => Category::Pointer,
			Self::Interface => Category::Interface,
			Self::Slice | Self::Array => Category::Sequence,
			Self::Map => Category::KeyedMap,
			Self::Struct => Category::Record,
		}
	}

	/// Stable lower-case label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Invalid => "invalid",
			Self::Bool => "bool",
			Self::Int(kind) => kind.as_str(),
			Self::Uint(kind) => kind.as_str(),
			Self::Float(kind) => kind.as_str(),
			Self::String => "string",
			Self::Ptr => "ptr",
			Self::Interface => "interface",
			Self::Slice => "slice",
			Self::Array => "array",
			Self::Map => "map",
			Self::Struct => "struct",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Closed set of shapes the resolver dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
	/// Struct-like value with named fields.
	Record,
	/// Slice or array indexed by position.
	Sequence,
	/// Map indexed by typed key.
	KeyedMap,
	/// Pointer/optional layer.
	Pointer,
	/// Polymorphic container layer.
	Interface,
	/// Terminal leaf value.
	Scalar,
	/// Nothing present.
	Invalid,
}

impl Category {
	/// Whether this category is an indirection layer.
	pub fn is_indirection(self) -> bool {
		matches!(self, Self::Pointer | Self::Interface)
	}

	/// Stable lower-case label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Record => "record",
			Self::Sequence => "sequence",
			Self::KeyedMap => "keyed_map",
			Self::Pointer => "pointer",
			Self::Interface => "interface",
			Self::Scalar => "scalar",
			Self::Invalid => "invalid",
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Structural representation of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Repr {
	/// No static type.
	Invalid,
	/// Boolean.
	Bool,
	/// Signed integer.
	Int(IntKind),
	/// Unsigned integer.
	Uint(UintKind),
	/// Floating point.
	Float(FloatKind),
	/// String.
	String,
	/// Pointer to the inner type.
	Ptr(Type),
	/// Polymorphic container.
	Interface,
	/// Slice of the element type.
	Slice(Type),
	/// Fixed array of element type and length.
	Array(Type, usize),
	/// Map from key type to value type.
	Map(Type, Type),
	/// Record with ordered fields.
	Struct(Vec<FieldDef>),
}

/// One declared record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
	/// Field name, matched case-sensitively.
	pub name: Arc<str>,
	/// Field type.
	pub ty: Type,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct TypeDef {
	name: Option<Arc<str>>,
	repr: Repr,
}

/// Shared type descriptor. Equality is type identity: declared name plus structure.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type(Arc<TypeDef>);

impl Type {
	fn from_repr(repr: Repr) -> Self {
		Self(Arc::new(TypeDef { name: None, repr }))
	}

	/// Type of values that hold nothing at all.
	pub fn invalid() -> Self {
		Self::from_repr(Repr::Invalid)
	}

	/// `bool`.
	pub fn bool() -> Self {
		Self::from_repr(Repr::Bool)
	}

	/// Signed integer of the given width.
	pub fn int(kind: IntKind) -> Self {
		Self::from_repr(Repr::Int(kind))
	}

	/// Unsigned integer of the given width.
	pub fn uint(kind: UintKind) -> Self {
		Self::from_repr(Repr::Uint(kind))
	}

	/// Float of the given width.
	pub fn float(kind: FloatKind) -> Self {
		Self::from_repr(Repr::Float(kind))
	}

	/// `string`.
	pub fn string() -> Self {
		Self::from_repr(Repr::String)
	}

	/// Pointer to `elem`.
	pub fn ptr(elem: &Type) -> Self {
		Self::from_repr(Repr::Ptr(elem.clone()))
	}

	/// Empty interface: any dynamic type.
	pub fn interface() -> Self {
		Self::from_repr(Repr::Interface)
	}

	/// Slice of `elem`.
	pub fn slice(elem: &Type) -> Self {
		Self::from_repr(Repr::Slice(elem.clone()))
	}

	/// Fixed array of `len` elements.
	pub fn array(elem: &Type, len: usize) -> Self {
		Self::from_repr(Repr::Array(elem.clone(), len))
	}

	/// Map keyed by a bool, integer, float, or string type.
	pub fn map(key: &Type, value: &Type) -> Result<Self> {
		if !matches!(key.repr(), Repr::Bool | Repr::Int(_) | Repr::Uint(_) | Repr::Float(_) | Repr::String) {
			return Err(NsError::UnsupportedType {
				type_name: format!("map key {key}"),
			});
		}
		Ok(Self::from_repr(Repr::Map(key.clone(), value.clone())))
	}

	/// Map keyed by `string`.
	pub fn string_map(value: &Type) -> Self {
		Self::from_repr(Repr::Map(Self::string(), value.clone()))
	}

	/// Record with fields in declaration order.
	pub fn record<'n>(fields: impl IntoIterator<Item = (&'n str, Type)>) -> Self {
		let fields = fields
			.into_iter()
			.map(|(name, ty)| FieldDef { name: Arc::from(name), ty })
			.collect();
		Self::from_repr(Repr::Struct(fields))
	}

	/// Named type sharing the structure of `underlying`.
	pub fn named(name: &str, underlying: &Type) -> Self {
		Self(Arc::new(TypeDef {
			name: Some(Arc::from(name)),
			repr: underlying.repr().clone(),
		}))
	}

	/// Elapsed-time duration: a named 64-bit integer counting nanoseconds.
	pub fn duration() -> Self {
		static DURATION: OnceLock<Type> = OnceLock::new();
		DURATION
			.get_or_init(|| Type::named(DURATION_TYPE_NAME, &Type::int(IntKind::I64)))
			.clone()
	}

	/// Wall-clock timestamp: a named record of seconds and nanoseconds.
	pub fn time() -> Self {
		static TIME: OnceLock<Type> = OnceLock::new();
		TIME.get_or_init(|| {
			let layout = Type::record([("Secs", Type::int(IntKind::I64)), ("Nanos", Type::int(IntKind::I32))]);
			Type::named(TIME_TYPE_NAME, &layout)
		})
		.clone()
	}

	/// Declared name, if any.
	pub fn name(&self) -> Option<&str> {
		self.0.name.as_deref()
	}

	/// Structural representation.
	pub fn repr(&self) -> &Repr {
		&self.0.repr
	}

	/// Fine-grained kind.
	pub fn kind(&self) -> Kind {
		match self.repr() {
			Repr::Invalid => Kind::Invalid,
			Repr::Bool => Kind::Bool,
			Repr::Int(kind) => Kind::Int(*kind),
			Repr::Uint(kind) => Kind::Uint(*kind),
			Repr::Float(kind) => Kind::Float(*kind),
			Repr::String => Kind::String,
			Repr::Ptr(_) => Kind::Ptr,
			Repr::Interface => Kind::Interface,
			Repr::Slice(_) => Kind::Slice,
			Repr::Array(..) => Kind::Array,
			Repr::Map(..) => Kind::Map,
			Repr::Struct(_) => Kind::Struct,
		}
	}

	/// Resolver category. Timestamp-shaped records are terminal scalars.
	pub fn category(&self) -> Category {
		if self.is_time() { Category::Scalar } else { self.kind().category() }
	}

	/// Whether this is exactly the duration type.
	pub fn is_duration(&self) -> bool {
		*self == Self::duration()
	}

	/// Whether this record type converts to the timestamp type (same underlying layout).
	pub fn is_time(&self) -> bool {
		matches!(self.repr(), Repr::Struct(_)) && self.repr() == Self::time().repr()
	}

	/// Pointee, slice/array element, or map value type.
	pub fn elem(&self) -> Option<&Type> {
		match self.repr() {
			Repr::Ptr(elem) | Repr::Slice(elem) | Repr::Array(elem, _) | Repr::Map(_, elem) => Some(elem),
			_ => None,
		}
	}

	/// Map key type.
	pub fn key(&self) -> Option<&Type> {
		match self.repr() {
			Repr::Map(key, _) => Some(key),
			_ => None,
		}
	}

	/// Record fields; empty for non-records.
	pub fn fields(&self) -> &[FieldDef] {
		match self.repr() {
			Repr::Struct(fields) => fields,
			_ => &[],
		}
	}

	/// Position of the first field named `name`.
	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields().iter().position(|field| field.name.as_ref() == name)
	}
}

impl fmt::Debug for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Type({self})")
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(name) = self.name() {
			return f.write_str(name);
		}

		match self.repr() {
			Repr::Invalid => f.write_str("invalid"),
			Repr::Bool => f.write_str("bool"),
			Repr::Int(kind) => f.write_str(kind.as_str()),
			Repr::Uint(kind) => f.write_str(kind.as_str()),
			Repr::Float(kind) => f.write_str(kind.as_str()),
			Repr::String => f.write_str("string"),
			Repr::Ptr(elem) => write!(f, "*{elem}"),
			Repr::Interface => f.write_str("interface {}"),
			Repr::Slice(elem) => write!(f, "[]{elem}"),
			Repr::Array(elem, len) => write!(f, "[{len}]{elem}"),
			Repr::Map(key, value) => write!(f, "map[{key}]{value}"),
			Repr::Struct(fields) => {
				f.write_str("struct {")?;
				for (idx, field) in fields.iter().enumerate() {
					if idx > 0 {
						f.write_str(";")?;
					}
					write!(f, " {} {}", field.name, field.ty)?;
				}
				f.write_str(" }")
			}
		}
	}
}

#[cfg(test)]
mod tests;
