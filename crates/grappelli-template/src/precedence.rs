//! Template precedence scoring.
//!
//! Overlapping templates are disambiguated by a decimal specificity score:
//! each segment contributes one digit, more specific shapes scoring lower,
//! and the digits combine positionally so that earlier segments dominate.
//! Candidates are tried in ascending score order.
//!
//! Digits per segment:
//!
//! | segment shape                | digit |
//! |------------------------------|-------|
//! | literal                      | 1     |
//! | multi-part (complex)         | 2     |
//! | constrained parameter        | 2     |
//! | parameter                    | 3     |
//! | constrained catch-all        | 4     |
//! | catch-all                    | 5     |

use rust_decimal::Decimal;

use crate::pattern::{Part, RoutePattern, Segment};

/// Computes the inbound-matching precedence of a pattern.
///
/// Lower values are more specific and are tried first. A zero-segment
/// pattern scores zero, ahead of everything else.
///
/// # Examples
///
/// ```
/// use grappelli_template::{compute_inbound, parse};
///
/// let literal = compute_inbound(&parse("customer/index").unwrap());
/// let parameterized = compute_inbound(&parse("customer/{action}").unwrap());
/// assert!(literal < parameterized);
/// ```
pub fn compute_inbound(pattern: &RoutePattern) -> Decimal {
	let mut precedence = Decimal::ZERO;
	for (index, segment) in pattern.segments().iter().enumerate() {
		// One digit per decimal place; the parser caps segment count at the
		// available scale.
		precedence += Decimal::new(inbound_digit(segment), index as u32);
	}
	precedence
}

fn inbound_digit(segment: &Segment) -> i64 {
	if !segment.is_simple() {
		return 2;
	}
	match &segment.parts()[0] {
		Part::Literal(_) => 1,
		Part::Parameter(parameter) => {
			let digit = if parameter.is_catch_all() { 5 } else { 3 };
			if parameter.has_constraints() {
				digit - 1
			} else {
				digit
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::parse;
	use rstest::rstest;

	fn precedence(template: &str) -> Decimal {
		compute_inbound(&parse(template).unwrap())
	}

	#[rstest]
	#[case("customer", "1")]
	#[case("{id:int}", "2")]
	#[case("{a}-{b}", "2")]
	#[case("{id}", "3")]
	#[case("{*rest:int}", "4")]
	#[case("{*rest}", "5")]
	#[case("customer/{action}/{id:int}", "1.32")]
	#[case("{controller}/{action}/{*parameters}", "3.35")]
	fn test_segment_digits(#[case] template: &str, #[case] expected: &str) {
		assert_eq!(precedence(template), expected.parse::<Decimal>().unwrap());
	}

	#[test]
	fn test_empty_template_scores_zero() {
		assert_eq!(precedence(""), Decimal::ZERO);
	}

	#[rstest]
	#[case("template/5", "template/{parameter:int}")]
	#[case("template/{parameter:int}", "template/{parameter}")]
	#[case("template/{parameter}", "template/{*parameter:int}")]
	#[case("template/{*parameter:int}", "template/{*parameter}")]
	fn test_more_specific_template_scores_lower(#[case] specific: &str, #[case] general: &str) {
		assert!(precedence(specific) < precedence(general));
	}

	#[test]
	fn test_earlier_segments_dominate() {
		// A literal first segment beats a parameter first segment no matter
		// what follows.
		assert!(precedence("customer/{*rest}") < precedence("{controller}/index"));
	}
}
