#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use nsvalue::ns::{
	Category, IntKind, Kind, MissReason, NsError, Resolver, Type, UnwrapRegistry, Value, from_json, load_type, parse_as, to_json,
};

fn person() -> Value {
	let ty = load_type(fixture_path("person.schema.json")).expect("schema loads");
	let bytes = std::fs::read(fixture_path("person.json")).expect("document reads");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("document parses");
	from_json(&ty, &json).expect("document binds")
}

#[test]
fn fixture_scenarios_resolve() {
	let registry = UnwrapRegistry::new();
	let resolver = Resolver::new(&registry);
	let root = person();

	let line = resolver.resolve(&root, "Address.Lines[1]").expect("resolves");
	assert_eq!(line.value.as_str(), Some("b"));

	let tag = resolver.resolve(&root, "Tags[5]").expect("resolves");
	assert_eq!(tag.value.as_str(), Some("x"));

	let missing = resolver.resolve(&root, "Tags[9]").expect("resolves");
	assert!(!missing.found());
	assert!(matches!(missing.miss.map(|miss| miss.reason), Some(MissReason::MissingKey { .. })));

	let timeout = resolver.resolve(&root, "Timeout").expect("resolves");
	assert_eq!(timeout.value.as_i64(), Some(90_000_000_000));
	assert_eq!(timeout.category(), Category::Scalar);
}

#[test]
fn nil_pointer_write_then_read() {
	let registry = UnwrapRegistry::new();
	let resolver = Resolver::new(&registry);
	let mut root = person();

	let before = resolver.resolve(&root, "P").expect("resolves");
	assert_eq!(before.kind, Kind::Ptr);
	assert!(before.value.is_nil());

	resolver.write(&mut root, "P", "7").expect("writes");

	let after = resolver.resolve(&root, "P").expect("resolves");
	assert_eq!(after.kind, Kind::Int(IntKind::Int));
	assert_eq!(after.value.as_i64(), Some(7));
	assert_eq!(to_json(&root)["P"], 7);
}

#[test]
fn write_matches_independent_parse() {
	let registry = UnwrapRegistry::new();
	let resolver = Resolver::new(&registry);
	let mut root = person();

	for (namespace, text) in [("Name", "Grace"), ("Scores[0.5]", "0x10"), ("Timeout", "250ms"), ("Address.Zip", "")] {
		resolver.write(&mut root, namespace, text).expect(namespace);
		let resolved = resolver.resolve(&root, namespace).expect(namespace);
		let expected = parse_as(resolved.value.ty(), text).expect(text);
		assert_eq!(resolved.value.as_ref(), &expected, "{namespace}");
	}
}

#[test]
fn null_string_unwrap_reads_through_registry() {
	let null_string = Type::named("NullString", &Type::record([("String", Type::string()), ("Valid", Type::bool())]));
	let holder = Type::record([("Nick", null_string.clone())]);

	let mut registry = UnwrapRegistry::new();
	registry
		.register(&null_string, &Type::ptr(&Type::string()), |value| {
			match (value.field("String"), value.field("Valid").and_then(Value::as_bool)) {
				(Some(text), Some(true)) => Value::ptr_to(text.clone()),
				_ => Value::nil(&Type::string()),
			}
		})
		.expect("registers");
	let resolver = Resolver::new(&registry);

	let mut set = from_json(&holder, &serde_json::json!({"Nick": {"String": "ada", "Valid": true}})).expect("binds");
	let resolved = resolver.resolve(&set, "Nick").expect("resolves");
	assert_eq!(resolved.value.as_str(), Some("ada"));
	assert!(resolved.nullable);

	let unset = from_json(&holder, &serde_json::json!({"Nick": {"String": "ada"}})).expect("binds");
	let resolved = resolver.resolve(&unset, "Nick").expect("resolves");
	assert_eq!(resolved.kind, Kind::Ptr);
	assert!(resolved.value.is_nil());

	assert!(matches!(resolver.write(&mut set, "Nick", "bob"), Err(NsError::Detached { .. })));
	assert!(matches!(resolver.write(&mut set, "Nick.String", "bob"), Err(NsError::InvalidNamespace { .. })));
}

fn fixture_path(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}
