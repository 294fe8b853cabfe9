use std::borrow::Cow;

use tracing::trace;

use crate::ns::{Category, Kind, NsError, ResolveOptions, Result, Step, UnwrapRegistry, Value};

/// Value after pointer/interface layers and custom unwraps are resolved.
#[derive(Debug, Clone)]
pub struct Settled<'a> {
	/// Settled value: borrowed from the host unless a custom unwrap replaced it.
	pub value: Cow<'a, Value>,
	/// Kind of the settled value. `Ptr`/`Interface` here means the layer is nil.
	pub kind: Kind,
	/// Whether any pointer or interface layer was crossed, nil or not.
	pub nullable: bool,
	/// Steps taken from the input value.
	pub steps: Vec<Step>,
}

impl Settled<'_> {
	/// Resolver category of the settled value.
	pub fn category(&self) -> Category {
		self.value.category()
	}
}

/// Settle `value` with default options, starting from the given `nullable` flag.
pub fn settle<'a>(registry: &UnwrapRegistry, value: &'a Value, nullable: bool) -> Result<Settled<'a>> {
	settle_with(registry, Cow::Borrowed(value), nullable, &ResolveOptions::default())
}

/// Settle `value` from a non-nullable start.
pub fn extract_type<'a>(registry: &UnwrapRegistry, value: &'a Value) -> Result<Settled<'a>> {
	settle(registry, value, false)
}

pub(crate) fn settle_with<'a>(registry: &UnwrapRegistry, mut current: Cow<'a, Value>, mut nullable: bool, options: &ResolveOptions) -> Result<Settled<'a>> {
	let mut steps = Vec::new();
	let mut unwraps = 0_usize;

	loop {
		match current.kind() {
			Kind::Ptr | Kind::Interface => {
				nullable = true;
				if current.is_nil() {
					break;
				}
				let Some(inner) = descend(&current, Step::Deref) else {
					break;
				};
				current = inner;
				steps.push(Step::Deref);
			}
			Kind::Invalid => break,
			_ => {
				if registry.is_empty() || !registry.contains(current.ty()) {
					break;
				}
				if unwraps >= options.max_unwraps {
					return Err(NsError::UnwrapLimitExceeded {
						max_unwraps: options.max_unwraps,
					});
				}
				let Some(out) = registry.apply(&current) else {
					break;
				};
				trace!(from = %current.ty(), "applied custom unwrap");
				current = Cow::Owned(out?);
				unwraps += 1;
				steps.push(Step::Unwrap);
			}
		}
	}

	Ok(Settled {
		kind: current.kind(),
		value: current,
		nullable,
		steps,
	})
}

/// Follow one step, keeping the borrow when the parent is borrowed.
pub(crate) fn descend<'a>(current: &Cow<'a, Value>, step: Step) -> Option<Cow<'a, Value>> {
	match *current {
		Cow::Borrowed(value) => value.at(step).map(Cow::Borrowed),
		Cow::Owned(ref value) => value.at(step).cloned().map(Cow::Owned),
	}
}
