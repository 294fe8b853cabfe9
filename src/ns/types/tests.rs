use crate::ns::{Category, FloatKind, IntKind, Kind, Type, UintKind};

#[test]
fn int_wrap_truncates_like_a_cast() {
	assert_eq!(IntKind::I8.wrap(300), 44);
	assert_eq!(IntKind::I8.wrap(-129), 127);
	assert_eq!(IntKind::I16.wrap(40_000), -25_536);
	assert_eq!(IntKind::I64.wrap(i64::MIN), i64::MIN);
	assert_eq!(UintKind::U8.wrap(256 + 7), 7);
	assert_eq!(UintKind::U32.wrap(u64::MAX), u64::from(u32::MAX));
}

#[test]
fn categories_follow_kinds() {
	assert_eq!(Type::string().category(), Category::Scalar);
	assert_eq!(Type::slice(&Type::bool()).category(), Category::Sequence);
	assert_eq!(Type::array(&Type::bool(), 3).category(), Category::Sequence);
	assert_eq!(Type::ptr(&Type::bool()).category(), Category::Pointer);
	assert_eq!(Type::interface().category(), Category::Interface);
	assert_eq!(Type::invalid().category(), Category::Invalid);
	assert_eq!(Type::record([("A", Type::bool())]).category(), Category::Record);
	assert!(Category::Pointer.is_indirection());
	assert!(!Category::Record.is_indirection());
}

#[test]
fn time_layout_is_terminal_even_when_renamed() {
	let time = Type::time();
	assert_eq!(time.kind(), Kind::Struct);
	assert_eq!(time.category(), Category::Scalar);

	let alias = Type::named("CreatedAt", &time);
	assert!(alias.is_time());
	assert_ne!(alias, time);

	let lookalike = Type::record([("Secs", Type::int(IntKind::I64))]);
	assert!(!lookalike.is_time());
}

#[test]
fn named_types_have_distinct_identity() {
	let celsius = Type::named("Celsius", &Type::float(FloatKind::F64));
	assert_ne!(celsius, Type::float(FloatKind::F64));
	assert_eq!(celsius, Type::named("Celsius", &Type::float(FloatKind::F64)));
	assert_eq!(celsius.kind(), Kind::Float(FloatKind::F64));
	assert!(Type::duration().is_duration());
	assert!(!Type::int(IntKind::I64).is_duration());
}

#[test]
fn map_rejects_non_scalar_keys() {
	assert!(Type::map(&Type::int(IntKind::Int), &Type::string()).is_ok());
	assert!(Type::map(&Type::slice(&Type::string()), &Type::string()).is_err());
	assert!(Type::map(&Type::interface(), &Type::string()).is_err());
}

#[test]
fn display_renders_structure() {
	let ty = Type::map(&Type::int(IntKind::Int), &Type::slice(&Type::ptr(&Type::string()))).expect("map type builds");
	assert_eq!(ty.to_string(), "map[int][]*string");
	assert_eq!(Type::array(&Type::uint(UintKind::U8), 4).to_string(), "[4]uint8");
	assert_eq!(Type::record([("A", Type::bool())]).to_string(), "struct { A bool }");
	assert_eq!(Type::duration().to_string(), "time.Duration");
}
