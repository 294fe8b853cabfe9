use crate::ns::Result;

use super::conversion;

const TARGET: &str = "duration";

const UNITS: &[(&str, u64)] = &[
	("ns", 1),
	("us", 1_000),
	("\u{b5}s", 1_000),
	("\u{3bc}s", 1_000),
	("ms", 1_000_000),
	("s", 1_000_000_000),
	("m", 60_000_000_000),
	("h", 3_600_000_000_000),
];

/// Parse a duration literal such as `300ms`, `-1.5h` or `2h45m` into nanoseconds.
///
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted without a unit.
/// Fractional parts are scaled in integer arithmetic and truncated to whole nanoseconds.
pub fn parse_duration(text: &str) -> Result<i64> {
	let (negative, mut rest) = match text.as_bytes().first() {
		Some(b'-') => (true, &text[1..]),
		Some(b'+') => (false, &text[1..]),
		_ => (false, text),
	};

	if rest == "0" {
		return Ok(0);
	}
	if rest.is_empty() {
		return Err(conversion(text, TARGET, "invalid syntax"));
	}

	let limit = 1_u64 << 63;
	let mut total = 0_u64;

	while !rest.is_empty() {
		let (whole, after_whole) = leading_digits(rest);
		let (frac, after_frac) = match after_whole.strip_prefix('.') {
			Some(tail) => {
				let (frac, tail) = leading_digits(tail);
				(Some(frac), tail)
			}
			None => (None, after_whole),
		};
		if whole.is_empty() && frac.is_none_or(str::is_empty) {
			return Err(conversion(text, TARGET, "invalid syntax"));
		}

		let unit_len = after_frac.find(|ch: char| ch == '.' || ch.is_ascii_digit()).unwrap_or(after_frac.len());
		let (unit, tail) = after_frac.split_at(unit_len);
		if unit.is_empty() {
			return Err(conversion(text, TARGET, "missing unit"));
		}
		let Some(&(_, scale)) = UNITS.iter().find(|(name, _)| *name == unit) else {
			return Err(conversion(text, TARGET, "unknown unit"));
		};

		let mut component = accumulate(whole)
			.and_then(|value| value.checked_mul(scale))
			.filter(|value| *value <= limit)
			.ok_or_else(|| conversion(text, TARGET, "value out of range"))?;
		if let Some(frac) = frac {
			component = component
				.checked_add(fraction(frac, scale))
				.filter(|value| *value <= limit)
				.ok_or_else(|| conversion(text, TARGET, "value out of range"))?;
		}
		total = total
			.checked_add(component)
			.filter(|value| *value <= limit)
			.ok_or_else(|| conversion(text, TARGET, "value out of range"))?;

		rest = tail;
	}

	if negative {
		return Ok(0_i64.wrapping_sub_unsigned(total));
	}
	i64::try_from(total).map_err(|_| conversion(text, TARGET, "value out of range"))
}

fn leading_digits(text: &str) -> (&str, &str) {
	let end = text.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(text.len());
	text.split_at(end)
}

fn accumulate(digits: &str) -> Option<u64> {
	digits
		.bytes()
		.try_fold(0_u64, |acc, digit| acc.checked_mul(10)?.checked_add(u64::from(digit - b'0')))
}

// Digits past the precision of `scale` are dropped.
fn fraction(digits: &str, scale: u64) -> u64 {
	let mut value = 0_u64;
	let mut denom = 1_u64;
	for digit in digits.bytes() {
		let (Some(next_value), Some(next_denom)) = (value.checked_mul(10), denom.checked_mul(10)) else {
			break;
		};
		value = next_value + u64::from(digit - b'0');
		denom = next_denom;
	}
	((u128::from(value) * u128::from(scale)) / u128::from(denom)) as u64
}
