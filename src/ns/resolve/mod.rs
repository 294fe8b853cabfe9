use std::borrow::Cow;
use std::fmt;

use tracing::trace;

use crate::ns::coerce::{parse_index, parse_key};
use crate::ns::path::invalid;
use crate::ns::settle::{descend, settle_with};
use crate::ns::{Category, Kind, NamespacePath, NsError, Result, Segment, Selector, Settled, Slot, Step, UnwrapRegistry, Value};

/// How malformed bracket text is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexPolicy {
	/// Malformed index or key text is a conversion error.
	#[default]
	Strict,
	/// Malformed index text selects element 0 and malformed key text selects the zero key.
	Lenient,
}

/// Namespace resolution behavior.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
	/// Treatment of unparsable bracket content.
	pub index_policy: IndexPolicy,
	/// Maximum custom unwraps applied while settling one value.
	pub max_unwraps: usize,
}

impl Default for ResolveOptions {
	fn default() -> Self {
		Self {
			index_policy: IndexPolicy::Strict,
			max_unwraps: 64,
		}
	}
}

impl ResolveOptions {
	/// Reject malformed bracket text.
	pub fn strict() -> Self {
		Self::default()
	}

	/// Accept malformed bracket text as index 0 / zero key, matching older namespace producers.
	pub fn lenient() -> Self {
		Self {
			index_policy: IndexPolicy::Lenient,
			..Self::default()
		}
	}
}

/// Why a namespace did not reach a value.
#[derive(Debug, Clone, PartialEq)]
pub enum MissReason {
	/// Nothing present at all.
	Invalid,
	/// A nil pointer or interface sits before the end of the namespace.
	Absent(Category),
	/// Sequence index outside `0..len`.
	IndexOutOfBounds {
		/// Requested index.
		index: i64,
		/// Sequence length.
		len: usize,
	},
	/// Map has no entry for the key.
	MissingKey {
		/// Key text as written in the namespace.
		key: String,
	},
}

impl fmt::Display for MissReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Invalid => f.write_str("invalid value"),
			Self::Absent(category) => write!(f, "nil {category}"),
			Self::IndexOutOfBounds { index, len } => write!(f, "index {index} out of bounds (len={len})"),
			Self::MissingKey { key } => write!(f, "missing key {key:?}"),
		}
	}
}

/// Miss metadata with the segment where resolution stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct Miss {
	/// Index of the segment that could not be applied.
	pub segment: usize,
	/// Structured reason.
	pub reason: MissReason,
}

/// Outcome of a read resolution.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
	/// Last settled value reached; on a miss, the value where resolution stopped.
	pub value: Cow<'a, Value>,
	/// Kind of `value`.
	pub kind: Kind,
	/// Whether a pointer or interface layer was crossed anywhere on the way.
	pub nullable: bool,
	/// Steps from the root to `value`.
	pub trail: Vec<Step>,
	/// Set when the namespace did not reach a value.
	pub miss: Option<Miss>,
}

impl Resolution<'_> {
	/// Whether the namespace reached a value.
	pub fn found(&self) -> bool {
		self.miss.is_none()
	}

	/// Resolver category of `value`.
	pub fn category(&self) -> Category {
		self.value.category()
	}
}

/// Outcome of a resolution for writing.
#[derive(Debug)]
pub struct ResolutionMut<'a> {
	/// Writable slot at the resolved location.
	pub slot: Slot<'a>,
	/// Kind of the slot value.
	pub kind: Kind,
	/// Whether a pointer or interface layer was crossed anywhere on the way.
	pub nullable: bool,
	/// Set when the namespace did not reach a value.
	pub miss: Option<Miss>,
}

impl ResolutionMut<'_> {
	/// Whether the namespace reached a value.
	pub fn found(&self) -> bool {
		self.miss.is_none()
	}
}

/// Namespace resolver bound to an unwrap registry.
#[derive(Debug, Clone)]
pub struct Resolver<'r> {
	registry: &'r UnwrapRegistry,
	options: ResolveOptions,
}

impl<'r> Resolver<'r> {
	/// Resolver with default (strict) options.
	pub fn new(registry: &'r UnwrapRegistry) -> Self {
		Self::with_options(registry, ResolveOptions::default())
	}

	/// Resolver with explicit options.
	pub fn with_options(registry: &'r UnwrapRegistry, options: ResolveOptions) -> Self {
		Self { registry, options }
	}

	/// Active options.
	pub fn options(&self) -> &ResolveOptions {
		&self.options
	}

	/// Settle `value` starting from the given `nullable` flag.
	pub fn settle<'a>(&self, value: &'a Value, nullable: bool) -> Result<Settled<'a>> {
		settle_with(self.registry, Cow::Borrowed(value), nullable, &self.options)
	}

	/// Settle `value` from a non-nullable start.
	pub fn extract_type<'a>(&self, value: &'a Value) -> Result<Settled<'a>> {
		self.settle(value, false)
	}

	/// Resolve `namespace` against `root` for reading.
	///
	/// Misses (nil layers, out-of-range indices, missing keys) come back as `Ok` with `miss` set.
	/// Namespaces that do not fit the value's shape are [`NsError::InvalidNamespace`].
	pub fn resolve<'a>(&self, root: &'a Value, namespace: &str) -> Result<Resolution<'a>> {
		let path = NamespacePath::parse(namespace)?;
		let mut current = Cow::Borrowed(root);
		let mut nullable = false;
		let mut trail = Vec::new();

		for idx in 0..=path.segments.len() {
			let settled = settle_with(self.registry, current, nullable, &self.options)?;
			nullable = settled.nullable;
			trail.extend(settled.steps);
			current = settled.value;

			let kind = current.kind();
			let miss = |reason: MissReason| {
				trace!(namespace, segment = idx, reason = %reason, "namespace miss");
				Some(Miss { segment: idx, reason })
			};

			if kind == Kind::Invalid {
				return Ok(Resolution {
					value: current,
					kind,
					nullable,
					trail,
					miss: miss(MissReason::Invalid),
				});
			}

			let Some(segment) = path.segments.get(idx) else {
				break;
			};

			let step = match self.select(&current, &path, segment)? {
				Selection::Step(step) => step,
				Selection::Miss(reason) => {
					return Ok(Resolution {
						value: current,
						kind,
						nullable,
						trail,
						miss: miss(reason),
					});
				}
			};

			current = descend(&current, step).ok_or_else(|| invalid(namespace, segment.offset, "selected element vanished"))?;
			trail.push(step);
		}

		Ok(Resolution {
			kind: current.kind(),
			value: current,
			nullable,
			trail,
			miss: None,
		})
	}

	/// Resolve `namespace` against `root` and return a writable slot.
	///
	/// Fails with [`NsError::Detached`] when the path runs through a custom unwrap, since the
	/// replacement value does not live in `root`.
	pub fn resolve_mut<'a>(&self, root: &'a mut Value, namespace: &str) -> Result<ResolutionMut<'a>> {
		let Resolution {
			kind, nullable, trail, miss, ..
		} = self.resolve(root, namespace)?;

		if trail.contains(&Step::Unwrap) {
			return Err(NsError::Detached {
				namespace: namespace.to_owned(),
			});
		}

		let mut current = root;
		for step in trail {
			current = current
				.at_mut(step)
				.ok_or_else(|| invalid(namespace, 0, "trail does not match value"))?;
		}

		Ok(ResolutionMut {
			slot: Slot::new(current),
			kind,
			nullable,
			miss,
		})
	}

	/// Resolve `namespace` and write `text` into the slot it names.
	pub fn write(&self, root: &mut Value, namespace: &str, text: &str) -> Result<()> {
		let mut resolved = self.resolve_mut(root, namespace)?;
		if let Some(miss) = resolved.miss {
			return Err(NsError::NotFound {
				namespace: namespace.to_owned(),
				reason: miss.reason.to_string(),
			});
		}
		resolved.slot.write(text)
	}

	fn select(&self, current: &Value, path: &NamespacePath<'_>, segment: &Segment<'_>) -> Result<Selection> {
		let category = current.category();
		match (category, segment.selector) {
			(Category::Pointer | Category::Interface, _) => Ok(Selection::Miss(MissReason::Absent(category))),
			(Category::Record, Selector::Field(name)) => {
				let pos = current.ty().field_index(name).ok_or_else(|| {
					invalid(path.raw, segment.offset, format!("no field {name:?} on {}", current.ty()))
				})?;
				Ok(Selection::Step(Step::Field(pos)))
			}
			(Category::Sequence, Selector::Key(text)) => {
				let index = parse_index(text, self.options.index_policy)?;
				let len = current.len();
				match usize::try_from(index) {
					Ok(pos) if pos < len => Ok(Selection::Step(Step::Index(pos))),
					_ => Ok(Selection::Miss(MissReason::IndexOutOfBounds { index, len })),
				}
			}
			(Category::KeyedMap, Selector::Key(text)) => {
				let key_ty = current
					.ty()
					.key()
					.ok_or_else(|| invalid(path.raw, segment.offset, "map without key type"))?;
				let key = parse_key(key_ty, text, self.options.index_policy)?;
				match current.entry_position(&key) {
					Some(pos) => Ok(Selection::Step(Step::Entry(pos))),
					None => Ok(Selection::Miss(MissReason::MissingKey { key: text.to_owned() })),
				}
			}
			(category, selector) => {
				let what = match selector {
					Selector::Field(name) => format!("field {name:?}"),
					Selector::Key(text) => format!("[{text}]"),
				};
				Err(invalid(
					path.raw,
					segment.offset,
					format!("cannot apply {what} to {category} {}; remaining {:?}", current.ty(), &path.raw[segment.offset..]),
				))
			}
		}
	}
}

enum Selection {
	Step(Step),
	Miss(MissReason),
}
