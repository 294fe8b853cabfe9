use std::num::IntErrorKind;

use crate::ns::{Data, FloatKind, IndexPolicy, IntKind, NsError, Repr, Result, Type, UintKind, Value};

mod duration;

pub use duration::parse_duration;

/// Parse `text` into a value of `ty`.
///
/// Integers accept `0x`/`0o`/`0b`/leading-`0` prefixes and wrap to the target width. Durations
/// accept a duration literal and fall back to integer nanoseconds. Strings pass through.
pub fn parse_as(ty: &Type, text: &str) -> Result<Value> {
	let data = match ty.repr() {
		Repr::String => Data::String(text.to_owned()),
		Repr::Bool => Data::Bool(parse_bool(text)?),
		Repr::Int(kind) => Data::Int(kind.wrap(parse_int_for(ty, text)?)),
		Repr::Uint(kind) => Data::Uint(kind.wrap(parse_uint(text)?)),
		Repr::Float(kind) => Data::Float(parse_float(text, *kind)?),
		_ => {
			return Err(NsError::UnsupportedType { type_name: ty.to_string() });
		}
	};
	Ok(Value::from_parts(ty.clone(), data))
}

/// Parse a signed integer for `ty`, reading duration literals when `ty` is the duration type.
pub fn parse_int_for(ty: &Type, text: &str) -> Result<i64> {
	if ty.is_duration() {
		return parse_duration(text).or_else(|_| parse_int(text));
	}
	parse_int(text)
}

/// Parse a base-prefix-aware signed 64-bit integer.
pub fn parse_int(text: &str) -> Result<i64> {
	let (negative, body) = split_sign(text);
	let magnitude = parse_magnitude(body).map_err(|reason| conversion(text, "int64", reason))?;

	if negative {
		if magnitude > i64::MIN.unsigned_abs() {
			return Err(conversion(text, "int64", "value out of range"));
		}
		Ok(0_i64.wrapping_sub_unsigned(magnitude))
	} else {
		i64::try_from(magnitude).map_err(|_| conversion(text, "int64", "value out of range"))
	}
}

/// Parse a base-prefix-aware unsigned 64-bit integer. Signs are rejected.
pub fn parse_uint(text: &str) -> Result<u64> {
	if text.starts_with(['+', '-']) {
		return Err(conversion(text, "uint64", "invalid syntax"));
	}
	parse_magnitude(text).map_err(|reason| conversion(text, "uint64", reason))
}

/// Parse a decimal float literal at the given width.
pub fn parse_float(text: &str, kind: FloatKind) -> Result<f64> {
	float_text(text, kind).map_err(|(reason, _)| conversion(text, kind.as_str(), reason))
}

/// Parse a boolean literal: `1 t T TRUE true True` or `0 f F FALSE false False`.
pub fn parse_bool(text: &str) -> Result<bool> {
	match text {
		"1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
		"0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
		_ => Err(conversion(text, "bool", "invalid syntax")),
	}
}

/// Parse sequence index text: optionally signed decimal.
///
/// Under [`IndexPolicy::Lenient`] unparsable text selects index 0.
pub fn parse_index(text: &str, policy: IndexPolicy) -> Result<i64> {
	match (text.parse::<i64>(), policy) {
		(Ok(index), _) => Ok(index),
		(Err(_), IndexPolicy::Lenient) => Ok(0),
		(Err(_), IndexPolicy::Strict) => Err(conversion(text, "index", "invalid syntax")),
	}
}

/// Decode map key text for a map keyed by `key_ty`.
///
/// Integer keys are plain signed decimal with no base prefixes or underscores, and must fit the key
/// width. Under [`IndexPolicy::Lenient`] an out-of-range number selects the nearest representable
/// key and unparsable text selects the zero key.
pub fn parse_key(key_ty: &Type, text: &str, policy: IndexPolicy) -> Result<Value> {
	let decoded = match key_ty.repr() {
		Repr::Int(kind) => decimal_int(text, *kind)
			.map(Data::Int)
			.map_err(|(reason, nearest)| (reason, Data::Int(nearest))),
		Repr::Uint(kind) => decimal_uint(text, *kind)
			.map(Data::Uint)
			.map_err(|(reason, nearest)| (reason, Data::Uint(nearest))),
		Repr::Float(kind) => float_text(text, *kind)
			.map(Data::Float)
			.map_err(|(reason, nearest)| (reason, Data::Float(nearest))),
		Repr::Bool => parse_bool(text).map(Data::Bool).map_err(|_| (INVALID_SYNTAX, Data::Bool(false))),
		Repr::String => Ok(Data::String(text.to_owned())),
		_ => {
			return Err(NsError::UnsupportedType {
				type_name: format!("map key {key_ty}"),
			});
		}
	};

	match (decoded, policy) {
		(Ok(data), _) | (Err((_, data)), IndexPolicy::Lenient) => Ok(Value::from_parts(key_ty.clone(), data)),
		(Err((reason, _)), IndexPolicy::Strict) => Err(conversion(text, &key_ty.to_string(), reason)),
	}
}

const INVALID_SYNTAX: &str = "invalid syntax";
const OUT_OF_RANGE: &str = "value out of range";

// Failures carry the value a lenient caller falls back to.
type Decoded<T> = std::result::Result<T, (&'static str, T)>;

fn decimal_int(text: &str, kind: IntKind) -> Decoded<i64> {
	let (min, max) = match kind {
		IntKind::I8 => (i64::from(i8::MIN), i64::from(i8::MAX)),
		IntKind::I16 => (i64::from(i16::MIN), i64::from(i16::MAX)),
		IntKind::I32 => (i64::from(i32::MIN), i64::from(i32::MAX)),
		IntKind::Int | IntKind::I64 => (i64::MIN, i64::MAX),
	};
	match text.parse::<i64>() {
		Ok(value) if value > max => Err((OUT_OF_RANGE, max)),
		Ok(value) if value < min => Err((OUT_OF_RANGE, min)),
		Ok(value) => Ok(value),
		Err(err) => match err.kind() {
			IntErrorKind::PosOverflow => Err((OUT_OF_RANGE, max)),
			IntErrorKind::NegOverflow => Err((OUT_OF_RANGE, min)),
			_ => Err((INVALID_SYNTAX, 0)),
		},
	}
}

fn decimal_uint(text: &str, kind: UintKind) -> Decoded<u64> {
	let max = match kind {
		UintKind::U8 => u64::from(u8::MAX),
		UintKind::U16 => u64::from(u16::MAX),
		UintKind::U32 => u64::from(u32::MAX),
		UintKind::Uint | UintKind::U64 => u64::MAX,
	};
	if text.starts_with('+') {
		return Err((INVALID_SYNTAX, 0));
	}
	match text.parse::<u64>() {
		Ok(value) if value > max => Err((OUT_OF_RANGE, max)),
		Ok(value) => Ok(value),
		Err(err) if *err.kind() == IntErrorKind::PosOverflow => Err((OUT_OF_RANGE, max)),
		Err(_) => Err((INVALID_SYNTAX, 0)),
	}
}

fn float_text(text: &str, kind: FloatKind) -> Decoded<f64> {
	let parsed = match kind {
		FloatKind::F32 => text.parse::<f32>().map(f64::from),
		FloatKind::F64 => text.parse::<f64>(),
	};
	match parsed {
		Ok(value) if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") => Err((OUT_OF_RANGE, value)),
		Ok(value) => Ok(value),
		Err(_) => Err((INVALID_SYNTAX, 0.0)),
	}
}

fn split_sign(text: &str) -> (bool, &str) {
	if let Some(rest) = text.strip_prefix('-') {
		(true, rest)
	} else if let Some(rest) = text.strip_prefix('+') {
		(false, rest)
	} else {
		(false, text)
	}
}

fn parse_magnitude(body: &str) -> std::result::Result<u64, &'static str> {
	let lower = body.get(..2).map(str::to_ascii_lowercase);
	let (radix, digits, prefixed) = match lower.as_deref() {
		Some("0x") => (16, &body[2..], true),
		Some("0o") => (8, &body[2..], true),
		Some("0b") => (2, &body[2..], true),
		_ if body.len() > 1 && body.starts_with('0') => (8, &body[1..], true),
		_ => (10, body, false),
	};

	let mut cleaned = String::with_capacity(digits.len());
	let mut prev_ok = prefixed;
	for ch in digits.chars() {
		if ch == '_' {
			if !prev_ok {
				return Err(INVALID_SYNTAX);
			}
			prev_ok = false;
			continue;
		}
		if !ch.is_digit(radix) {
			return Err(INVALID_SYNTAX);
		}
		cleaned.push(ch);
		prev_ok = true;
	}

	if cleaned.is_empty() || digits.ends_with('_') {
		return Err(INVALID_SYNTAX);
	}

	u64::from_str_radix(&cleaned, radix).map_err(|err| match err.kind() {
		IntErrorKind::PosOverflow => OUT_OF_RANGE,
		_ => INVALID_SYNTAX,
	})
}

pub(crate) fn conversion(text: &str, target: &str, reason: &'static str) -> NsError {
	NsError::Conversion {
		text: text.to_owned(),
		target: target.to_owned(),
		reason,
	}
}

#[cfg(test)]
mod tests;
