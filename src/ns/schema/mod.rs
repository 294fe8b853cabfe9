use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};

use crate::ns::coerce::{parse_duration, parse_key};
use crate::ns::{Data, FloatKind, IndexPolicy, IntKind, NsError, Repr, Result, Type, UintKind, Value};

/// Serializable type notation.
///
/// Scalars and well-known types are written by name (`"int8"`, `"string"`, `"duration"`, `"time"`,
/// `"any"`); composites use a single-key object such as `{"ptr": "int"}` or
/// `{"map": {"key": "int", "value": "string"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
	/// Named scalar or well-known type.
	Name(String),
	/// Composite constructor.
	Composite(Box<CompositeSpec>),
}

/// Composite type constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum CompositeSpec {
	/// Pointer to the inner type.
	Ptr(TypeSpec),
	/// Growable sequence.
	Slice(TypeSpec),
	/// Fixed-length sequence.
	Array {
		/// Element type.
		elem: TypeSpec,
		/// Element count.
		len: usize,
	},
	/// Keyed map.
	Map {
		/// Key type; must be a bool, number or string type.
		key: TypeSpec,
		/// Value type.
		value: TypeSpec,
	},
	/// Record with ordered fields.
	Struct(Vec<FieldSpec>),
	/// Declared name over an underlying type.
	Named {
		/// Declared name.
		name: String,
		/// Underlying type.
		#[serde(rename = "type")]
		ty: TypeSpec,
	},
}

/// One record field in a [`CompositeSpec::Struct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
	/// Field name.
	pub name: String,
	/// Field type.
	#[serde(rename = "type")]
	pub ty: TypeSpec,
}

impl TypeSpec {
	/// Build the described [`Type`].
	pub fn to_type(&self) -> Result<Type> {
		match self {
			Self::Name(name) => named_type(name),
			Self::Composite(composite) => match composite.as_ref() {
				CompositeSpec::Ptr(elem) => Ok(Type::ptr(&elem.to_type()?)),
				CompositeSpec::Slice(elem) => Ok(Type::slice(&elem.to_type()?)),
				CompositeSpec::Array { elem, len } => Ok(Type::array(&elem.to_type()?, *len)),
				CompositeSpec::Map { key, value } => Type::map(&key.to_type()?, &value.to_type()?),
				CompositeSpec::Struct(fields) => {
					let built = fields
						.iter()
						.map(|field| Ok((field.name.as_str(), field.ty.to_type()?)))
						.collect::<Result<Vec<_>>>()?;
					Ok(Type::record(built))
				}
				CompositeSpec::Named { name, ty } => Ok(Type::named(name, &ty.to_type()?)),
			},
		}
	}
}

/// Resolve a scalar or well-known type by name.
pub fn named_type(name: &str) -> Result<Type> {
	let ty = match name {
		"bool" => Type::bool(),
		"int" => Type::int(IntKind::Int),
		"int8" => Type::int(IntKind::I8),
		"int16" => Type::int(IntKind::I16),
		"int32" => Type::int(IntKind::I32),
		"int64" => Type::int(IntKind::I64),
		"uint" => Type::uint(UintKind::Uint),
		"uint8" | "byte" => Type::uint(UintKind::U8),
		"uint16" => Type::uint(UintKind::U16),
		"uint32" => Type::uint(UintKind::U32),
		"uint64" => Type::uint(UintKind::U64),
		"float32" => Type::float(FloatKind::F32),
		"float64" => Type::float(FloatKind::F64),
		"string" => Type::string(),
		"any" | "interface" => Type::interface(),
		"duration" | crate::ns::DURATION_TYPE_NAME => Type::duration(),
		"time" | crate::ns::TIME_TYPE_NAME => Type::time(),
		_ => {
			return Err(mismatch("", format!("unknown type name {name:?}")));
		}
	};
	Ok(ty)
}

/// Read a [`TypeSpec`] from a JSON file and build its type.
pub fn load_type(path: impl AsRef<Path>) -> Result<Type> {
	let bytes = fs::read(path)?;
	let spec: TypeSpec = serde_json::from_slice(&bytes)?;
	spec.to_type()
}

/// Bind a JSON document to a value of `ty`.
///
/// Missing record fields take their zero value and unknown ones are ignored. `null` is accepted for
/// pointers, interfaces, slices and maps. Interface slots take the JSON-natural dynamic type:
/// `float64`, `string`, `bool`, `[]interface {}` or `map[string]interface {}`.
pub fn from_json(ty: &Type, json: &JsonValue) -> Result<Value> {
	bind(ty, json, &mut String::new())
}

/// Render a value as JSON. Nil layers become `null`; map keys use their text form.
pub fn to_json(value: &Value) -> JsonValue {
	match value.data() {
		Data::Invalid | Data::Ptr(None) | Data::Interface(None) => JsonValue::Null,
		Data::Bool(flag) => JsonValue::Bool(*flag),
		Data::Int(number) => JsonValue::from(*number),
		Data::Uint(number) => JsonValue::from(*number),
		Data::Float(number) => Number::from_f64(*number).map_or(JsonValue::Null, JsonValue::Number),
		Data::String(text) => JsonValue::String(text.clone()),
		Data::Ptr(Some(inner)) | Data::Interface(Some(inner)) => to_json(inner),
		Data::Seq(items) => JsonValue::Array(items.iter().map(to_json).collect()),
		Data::Map(entries) => {
			let object: Map<String, JsonValue> = entries.iter().map(|(key, item)| (key_text(key), to_json(item))).collect();
			JsonValue::Object(object)
		}
		Data::Record(values) => {
			let object: Map<String, JsonValue> = value
				.ty()
				.fields()
				.iter()
				.zip(values)
				.map(|(field, item)| (field.name.to_string(), to_json(item)))
				.collect();
			JsonValue::Object(object)
		}
	}
}

fn key_text(key: &Value) -> String {
	match key.as_str() {
		Some(text) => text.to_owned(),
		None => key.to_string(),
	}
}

fn bind(ty: &Type, json: &JsonValue, path: &mut String) -> Result<Value> {
	let data = match (ty.repr(), json) {
		(Repr::Ptr(_) | Repr::Interface | Repr::Slice(_) | Repr::Map(..), JsonValue::Null) => return Ok(Value::zero(ty)),
		(Repr::Bool, JsonValue::Bool(flag)) => Data::Bool(*flag),
		(Repr::Int(kind), JsonValue::Number(number)) => Data::Int(fit_int(*kind, number, path)?),
		(Repr::Int(_), JsonValue::String(text)) if ty.is_duration() => {
			Data::Int(parse_duration(text).map_err(|err| mismatch(path, err.to_string()))?)
		}
		(Repr::Uint(kind), JsonValue::Number(number)) => Data::Uint(fit_uint(*kind, number, path)?),
		(Repr::Float(kind), JsonValue::Number(number)) => {
			let wide = number.as_f64().ok_or_else(|| mismatch(path, format!("{number} is not a float")))?;
			match kind {
				FloatKind::F32 => Data::Float(f64::from(wide as f32)),
				FloatKind::F64 => Data::Float(wide),
			}
		}
		(Repr::String, JsonValue::String(text)) => Data::String(text.clone()),
		(Repr::Ptr(elem), _) => Data::Ptr(Some(Box::new(bind(elem, json, path)?))),
		(Repr::Interface, _) => Data::Interface(Some(Box::new(dynamic(json)))),
		(Repr::Slice(elem), JsonValue::Array(items)) => Data::Seq(bind_items(elem, items, path)?),
		(Repr::Array(elem, len), JsonValue::Array(items)) => {
			let mut bound = bind_items(elem, &items[..items.len().min(*len)], path)?;
			bound.resize_with(*len, || Value::zero(elem));
			Data::Seq(bound)
		}
		(Repr::Map(key_ty, value_ty), JsonValue::Object(object)) => {
			let mut entries: Vec<(Value, Value)> = Vec::with_capacity(object.len());
			for (raw_key, item) in object {
				let key = parse_key(key_ty, raw_key, IndexPolicy::Strict).map_err(|err| mismatch(path, err.to_string()))?;
				let mark = path.len();
				path.push_str(&format!("[{raw_key}]"));
				let value = bind(value_ty, item, path)?;
				path.truncate(mark);
				match entries.iter_mut().find(|(existing, _)| *existing == key) {
					Some(entry) => entry.1 = value,
					None => entries.push((key, value)),
				}
			}
			Data::Map(entries)
		}
		(Repr::Struct(fields), JsonValue::Object(object)) => {
			let mut values = Vec::with_capacity(fields.len());
			for field in fields {
				let value = match object.get(&*field.name) {
					Some(item) => {
						let mark = path.len();
						if !path.is_empty() {
							path.push('.');
						}
						path.push_str(&field.name);
						let value = bind(&field.ty, item, path)?;
						path.truncate(mark);
						value
					}
					None => Value::zero(&field.ty),
				};
				values.push(value);
			}
			Data::Record(values)
		}
		(_, other) => return Err(mismatch(path, format!("cannot bind {} to {ty}", json_kind(other)))),
	};
	Ok(Value::from_parts(ty.clone(), data))
}

fn bind_items(elem: &Type, items: &[JsonValue], path: &mut String) -> Result<Vec<Value>> {
	let mut bound = Vec::with_capacity(items.len());
	for (idx, item) in items.iter().enumerate() {
		let mark = path.len();
		path.push_str(&format!("[{idx}]"));
		bound.push(bind(elem, item, path)?);
		path.truncate(mark);
	}
	Ok(bound)
}

fn dynamic(json: &JsonValue) -> Value {
	match json {
		JsonValue::Null => Value::nil_interface(),
		JsonValue::Bool(flag) => Value::bool(*flag),
		JsonValue::Number(number) => Value::float64(number.as_f64().unwrap_or_default()),
		JsonValue::String(text) => Value::string(text.clone()),
		JsonValue::Array(items) => {
			let any = Type::interface();
			let items = items.iter().map(|item| Value::from_parts(any.clone(), Data::Interface(boxed_dynamic(item)))).collect();
			Value::from_parts(Type::slice(&any), Data::Seq(items))
		}
		JsonValue::Object(object) => {
			let any = Type::interface();
			let entries = object
				.iter()
				.map(|(key, item)| (Value::string(key.clone()), Value::from_parts(any.clone(), Data::Interface(boxed_dynamic(item)))))
				.collect();
			Value::from_parts(Type::string_map(&any), Data::Map(entries))
		}
	}
}

fn boxed_dynamic(json: &JsonValue) -> Option<Box<Value>> {
	match json {
		JsonValue::Null => None,
		other => Some(Box::new(dynamic(other))),
	}
}

fn fit_int(kind: IntKind, number: &Number, path: &str) -> Result<i64> {
	number
		.as_i64()
		.filter(|value| kind.wrap(*value) == *value)
		.ok_or_else(|| mismatch(path, format!("{number} does not fit {}", kind.as_str())))
}

fn fit_uint(kind: UintKind, number: &Number, path: &str) -> Result<u64> {
	number
		.as_u64()
		.filter(|value| kind.wrap(*value) == *value)
		.ok_or_else(|| mismatch(path, format!("{number} does not fit {}", kind.as_str())))
}

fn json_kind(json: &JsonValue) -> &'static str {
	match json {
		JsonValue::Null => "null",
		JsonValue::Bool(_) => "bool",
		JsonValue::Number(_) => "number",
		JsonValue::String(_) => "string",
		JsonValue::Array(_) => "array",
		JsonValue::Object(_) => "object",
	}
}

fn mismatch(path: &str, detail: impl Into<String>) -> NsError {
	NsError::Schema {
		path: if path.is_empty() { "<root>".to_owned() } else { path.to_owned() },
		detail: detail.into(),
	}
}
