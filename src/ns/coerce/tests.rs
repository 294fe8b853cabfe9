use crate::ns::{Data, FloatKind, IndexPolicy, IntKind, Kind, NsError, Type, UintKind, Value};

use super::{parse_as, parse_bool, parse_duration, parse_float, parse_index, parse_int, parse_int_for, parse_key, parse_uint};

#[test]
fn int_prefixes_and_underscores() {
	assert_eq!(parse_int("42").expect("decimal"), 42);
	assert_eq!(parse_int("-42").expect("negative"), -42);
	assert_eq!(parse_int("+7").expect("plus"), 7);
	assert_eq!(parse_int("0x1F").expect("hex"), 31);
	assert_eq!(parse_int("0o17").expect("octal"), 15);
	assert_eq!(parse_int("017").expect("legacy octal"), 15);
	assert_eq!(parse_int("0b101").expect("binary"), 5);
	assert_eq!(parse_int("1_000").expect("underscores"), 1000);
	assert_eq!(parse_int("0x_ff").expect("underscore after prefix"), 255);
	assert_eq!(parse_int("0").expect("zero"), 0);
	assert_eq!(parse_int("-9223372036854775808").expect("min"), i64::MIN);
}

#[test]
fn int_rejects_malformed_text() {
	for text in ["", "-", "abc", "1__0", "_1", "1_", "09", "0x", "1.5", " 1"] {
		let err = parse_int(text).expect_err(text);
		assert!(matches!(err, NsError::Conversion { .. }), "{text}: {err}");
	}
	let err = parse_int("9223372036854775808").expect_err("overflow");
	assert!(matches!(err, NsError::Conversion { reason: "value out of range", .. }));
}

#[test]
fn uint_rejects_signs() {
	assert_eq!(parse_uint("18446744073709551615").expect("max"), u64::MAX);
	assert!(parse_uint("-1").is_err());
	assert!(parse_uint("+1").is_err());
	assert!(matches!(
		parse_uint("18446744073709551616"),
		Err(NsError::Conversion { reason: "value out of range", .. })
	));
}

#[test]
fn bool_literals() {
	for text in ["1", "t", "T", "TRUE", "true", "True"] {
		assert!(parse_bool(text).expect(text));
	}
	for text in ["0", "f", "F", "FALSE", "false", "False"] {
		assert!(!parse_bool(text).expect(text));
	}
	assert!(parse_bool("yes").is_err());
	assert!(parse_bool("tRUE").is_err());
}

#[test]
fn float_widths_and_range() {
	assert_eq!(parse_float("1.5", FloatKind::F64).expect("f64"), 1.5);
	assert_eq!(parse_float("0.1", FloatKind::F32).expect("f32"), f64::from(0.1_f32));
	assert!(parse_float("inf", FloatKind::F64).expect("inf literal").is_infinite());
	assert!(parse_float("1e400", FloatKind::F64).is_err());
	assert!(parse_float("1e39", FloatKind::F32).is_err());
	assert!(parse_float("one", FloatKind::F64).is_err());
}

#[test]
fn duration_literals() {
	assert_eq!(parse_duration("0").expect("zero"), 0);
	assert_eq!(parse_duration("300ms").expect("ms"), 300_000_000);
	assert_eq!(parse_duration("-1.5h").expect("fractional hours"), -5_400_000_000_000);
	assert_eq!(parse_duration("2h45m").expect("compound"), 9_900_000_000_000);
	assert_eq!(parse_duration("1us").expect("us"), 1_000);
	assert_eq!(parse_duration("1\u{b5}s").expect("micro sign"), 1_000);
	assert_eq!(parse_duration(".5s").expect("leading dot"), 500_000_000);

	assert_eq!(parse_duration(".123456789999s").expect("sub-nanosecond digits"), 123_456_789);
	assert_eq!(parse_duration("-0.3333333333s").expect("truncates toward zero"), -333_333_333);

	for text in ["", "5", "1x", "h", "-", ".s"] {
		assert!(parse_duration(text).is_err(), "{text}");
	}
	assert!(matches!(
		parse_duration("9999999999h"),
		Err(NsError::Conversion { reason: "value out of range", .. })
	));
}

#[test]
fn duration_type_falls_back_to_nanoseconds() {
	let duration = Type::duration();
	assert_eq!(parse_int_for(&duration, "1s").expect("literal"), 1_000_000_000);
	assert_eq!(parse_int_for(&duration, "250").expect("nanos"), 250);
	assert!(parse_int_for(&Type::int(IntKind::I64), "1s").is_err());
}

#[test]
fn parse_as_wraps_to_declared_width() {
	let small = parse_as(&Type::int(IntKind::I8), "300").expect("wraps");
	assert_eq!(small.as_i64(), Some(44));

	let byte = parse_as(&Type::uint(UintKind::U8), "0x1ff").expect("wraps");
	assert_eq!(byte.as_u64(), Some(255));

	let named = Type::named("Level", &Type::int(IntKind::I16));
	let level = parse_as(&named, "-3").expect("named int");
	assert_eq!(level.ty(), &named);
	assert_eq!(level.as_i64(), Some(-3));

	let text = parse_as(&Type::string(), "  as is ").expect("string");
	assert_eq!(text.as_str(), Some("  as is "));
}

#[test]
fn parse_as_rejects_composites() {
	for ty in [Type::slice(&Type::string()), Type::ptr(&Type::int(IntKind::Int)), Type::interface(), Type::time()] {
		let err = parse_as(&ty, "1").expect_err("composite");
		assert!(matches!(err, NsError::UnsupportedType { .. }), "{ty}: {err}");
	}
}

#[test]
fn index_policy_controls_malformed_text() {
	assert_eq!(parse_index("3", IndexPolicy::Strict).expect("digits"), 3);
	assert_eq!(parse_index("-1", IndexPolicy::Strict).expect("negative"), -1);
	assert!(parse_index("x", IndexPolicy::Strict).is_err());
	assert_eq!(parse_index("x", IndexPolicy::Lenient).expect("lenient"), 0);
}

#[test]
fn map_keys_are_range_checked() {
	let key_ty = Type::int(IntKind::I8);
	let key = parse_key(&key_ty, "5", IndexPolicy::Strict).expect("fits");
	assert_eq!(key.data(), &Data::Int(5));
	assert!(parse_key(&key_ty, "300", IndexPolicy::Strict).is_err());

	let lenient = parse_key(&key_ty, "nope", IndexPolicy::Lenient).expect("zero key");
	assert_eq!(lenient, Value::zero(&key_ty));

	let float_key = parse_key(&Type::float(FloatKind::F64), "2.5", IndexPolicy::Strict).expect("float key");
	assert_eq!(float_key.kind(), Kind::Float(FloatKind::F64));

	let bool_key = parse_key(&Type::bool(), "t", IndexPolicy::Strict).expect("bool key");
	assert_eq!(bool_key.as_bool(), Some(true));
}

#[test]
fn map_keys_are_plain_decimal() {
	let key_ty = Type::int(IntKind::Int);
	assert_eq!(parse_key(&key_ty, "010", IndexPolicy::Strict).expect("leading zero").as_i64(), Some(10));
	assert_eq!(parse_key(&key_ty, "+7", IndexPolicy::Strict).expect("plus").as_i64(), Some(7));
	for text in ["0x10", "1_0", "0o10", "0b1", " 1", ""] {
		let err = parse_key(&key_ty, text, IndexPolicy::Strict).expect_err(text);
		assert!(matches!(err, NsError::Conversion { reason: "invalid syntax", .. }), "{text}: {err}");
	}

	let port = Type::uint(UintKind::U16);
	assert_eq!(parse_key(&port, "0443", IndexPolicy::Strict).expect("leading zero").as_u64(), Some(443));
	assert!(parse_key(&port, "+443", IndexPolicy::Strict).is_err());
	assert!(parse_key(&port, "-1", IndexPolicy::Strict).is_err());

	let duration = Type::duration();
	assert_eq!(parse_key(&duration, "1500", IndexPolicy::Strict).expect("nanos").as_i64(), Some(1500));
	assert!(parse_key(&duration, "1.5s", IndexPolicy::Strict).is_err());
}

#[test]
fn lenient_map_keys_saturate_at_the_key_width() {
	let small = Type::int(IntKind::I8);
	assert!(matches!(
		parse_key(&small, "300", IndexPolicy::Strict),
		Err(NsError::Conversion { reason: "value out of range", .. })
	));
	assert_eq!(parse_key(&small, "300", IndexPolicy::Lenient).expect("clamped").as_i64(), Some(127));
	assert_eq!(parse_key(&small, "-300", IndexPolicy::Lenient).expect("clamped").as_i64(), Some(-128));
	assert_eq!(parse_key(&small, "0x10", IndexPolicy::Lenient).expect("zero key").as_i64(), Some(0));

	let wide = Type::int(IntKind::I64);
	assert_eq!(parse_key(&wide, "99999999999999999999", IndexPolicy::Lenient).expect("clamped").as_i64(), Some(i64::MAX));
	assert_eq!(parse_key(&wide, "-99999999999999999999", IndexPolicy::Lenient).expect("clamped").as_i64(), Some(i64::MIN));

	let byte = Type::uint(UintKind::U8);
	assert_eq!(parse_key(&byte, "256", IndexPolicy::Lenient).expect("clamped").as_u64(), Some(255));
	assert_eq!(parse_key(&byte, "-1", IndexPolicy::Lenient).expect("zero key").as_u64(), Some(0));

	let ratio = parse_key(&Type::float(FloatKind::F64), "1e400", IndexPolicy::Lenient).expect("infinite key");
	assert_eq!(ratio.as_f64(), Some(f64::INFINITY));
	assert!(parse_key(&Type::float(FloatKind::F64), "1e400", IndexPolicy::Strict).is_err());
	assert_eq!(parse_key(&Type::bool(), "yes", IndexPolicy::Lenient).expect("zero key").as_bool(), Some(false));
}
