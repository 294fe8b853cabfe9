use crate::ns::{Data, FloatKind, IntKind, Kind, NsError, Step, Type, UintKind, Value};

fn address_type() -> Type {
	Type::record([("Street", Type::string()), ("Lines", Type::slice(&Type::string()))])
}

#[test]
fn checked_constructor_rejects_mismatched_data() {
	assert!(Value::new(&Type::int(IntKind::I8), Data::Int(127)).is_ok());
	assert!(matches!(Value::new(&Type::int(IntKind::I8), Data::Int(128)), Err(NsError::TypeMismatch { .. })));
	assert!(Value::new(&Type::uint(UintKind::U8), Data::Int(1)).is_err());
	assert!(Value::new(&Type::float(FloatKind::F32), Data::Float(0.1)).is_err());
	assert!(Value::new(&Type::float(FloatKind::F32), Data::Float(0.5)).is_ok());
	assert!(Value::slice(&Type::string(), vec![Value::string("a"), Value::int(1)]).is_err());
	assert!(Value::record(&address_type(), vec![Value::string("Main")]).is_err());
}

#[test]
fn map_constructor_keeps_last_duplicate() {
	let map = Value::map(
		&Type::int(IntKind::Int),
		&Type::string(),
		vec![(Value::int(1), Value::string("a")), (Value::int(1), Value::string("b"))],
	)
	.expect("map builds");

	assert_eq!(map.len(), 1);
	assert_eq!(map.map_get(&Value::int(1)).and_then(Value::as_str), Some("b"));
}

#[test]
fn zero_fills_nested_structure() {
	let ty = Type::record([
		("Name", Type::string()),
		("Count", Type::uint(UintKind::U16)),
		("Next", Type::ptr(&Type::string())),
		("Grid", Type::array(&Type::bool(), 2)),
	]);
	let zero = Value::zero(&ty);

	assert_eq!(zero.field("Name").and_then(Value::as_str), Some(""));
	assert_eq!(zero.field("Count").and_then(Value::as_u64), Some(0));
	assert!(zero.field("Next").is_some_and(Value::is_nil));
	assert_eq!(zero.field("Grid").map(Value::len), Some(2));
	assert_eq!(zero.field("Grid").and_then(|grid| grid.index(1)).and_then(Value::as_bool), Some(false));
}

#[test]
fn steps_walk_nested_values() {
	let lines = Value::slice(&Type::string(), vec![Value::string("a"), Value::string("b")]).expect("slice builds");
	let address = Value::record(&address_type(), vec![Value::string("Main"), lines]).expect("record builds");
	let root = Value::ptr_to(address);

	let lines = root.at(Step::Deref).and_then(|item| item.at(Step::Field(1))).expect("lines present");
	assert_eq!(lines.at(Step::Index(1)).and_then(Value::as_str), Some("b"));
	assert!(lines.at(Step::Index(2)).is_none());
	assert!(lines.at(Step::Deref).is_none());
	assert!(root.at(Step::Unwrap).is_none());
}

#[test]
fn at_mut_writes_in_place() {
	let mut root = Value::slice(&Type::int(IntKind::Int), vec![Value::int(1), Value::int(2)]).expect("slice builds");
	root.at_mut(Step::Index(0)).expect("element exists").set(Value::int(10)).expect("same type");

	assert_eq!(root.index(0).and_then(Value::as_i64), Some(10));
}

#[test]
fn set_checks_types_and_boxes_into_interfaces() {
	let mut slot = Value::int(1);
	assert!(matches!(slot.set(Value::string("x")), Err(NsError::TypeMismatch { .. })));

	let mut any = Value::nil_interface();
	any.set(Value::string("x")).expect("interface accepts any value");
	assert_eq!(any.kind(), Kind::Interface);
	assert_eq!(any.elem().and_then(Value::as_str), Some("x"));
	assert!(any.set(Value::invalid()).is_err());
}

#[test]
fn boxing_invalid_yields_nil_interface() {
	assert!(Value::boxed(Value::invalid()).is_nil());
}

#[test]
fn display_is_compact() {
	let tags = Value::map(&Type::int(IntKind::Int), &Type::string(), vec![(Value::int(5), Value::string("x"))]).expect("map builds");
	assert_eq!(tags.to_string(), "map[5:\"x\"]");
	assert_eq!(Value::nil(&Type::string()).to_string(), "nil");
	assert_eq!(Value::ptr_to(Value::int(7)).to_string(), "&7");
	assert_eq!(Value::time(10, 5).to_string(), "{Secs:10 Nanos:5}");
}
