//! Inline route constraints.
//!
//! Constraints are the validation half of the two-phase match: the tree
//! narrows candidates structurally, and each candidate's matcher then runs
//! the constraints recorded for its parameters against the extracted values.
//!
//! Built-in constraint names: `int`, `bool`, `uuid`, `alpha`, `slug`,
//! `length(n)` / `length(min,max)`, `min(n)`, `max(n)`, `range(min,max)`,
//! and `regex(pattern)`. Custom constraints can be registered on a
//! [`ConstraintResolver`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use uuid::Uuid;

use crate::error::TemplateError;
use crate::pattern::ConstraintSpec;

/// Maximum allowed size for a compiled `regex(...)` constraint, in bytes.
const MAX_CONSTRAINT_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A predicate applied to one extracted parameter value.
pub trait Constraint: Send + Sync + fmt::Debug {
	/// The constraint name, for diagnostics.
	fn name(&self) -> &str;

	/// Returns true if `value` satisfies the constraint.
	fn is_match(&self, value: &str) -> bool;
}

/// Matches 64-bit signed integers.
#[derive(Debug, Clone, Copy)]
pub struct IntConstraint;

impl Constraint for IntConstraint {
	fn name(&self) -> &str {
		"int"
	}

	fn is_match(&self, value: &str) -> bool {
		value.parse::<i64>().is_ok()
	}
}

/// Matches `true` or `false`, case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct BoolConstraint;

impl Constraint for BoolConstraint {
	fn name(&self) -> &str {
		"bool"
	}

	fn is_match(&self, value: &str) -> bool {
		value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
	}
}

/// Matches UUIDs in any of the formats `uuid::Uuid` accepts.
#[derive(Debug, Clone, Copy)]
pub struct UuidConstraint;

impl Constraint for UuidConstraint {
	fn name(&self) -> &str {
		"uuid"
	}

	fn is_match(&self, value: &str) -> bool {
		Uuid::parse_str(value).is_ok()
	}
}

/// Matches non-empty ASCII-alphabetic values.
#[derive(Debug, Clone, Copy)]
pub struct AlphaConstraint;

impl Constraint for AlphaConstraint {
	fn name(&self) -> &str {
		"alpha"
	}

	fn is_match(&self, value: &str) -> bool {
		!value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
	}
}

/// Matches slugs: ASCII alphanumerics, hyphens and underscores.
#[derive(Debug, Clone, Copy)]
pub struct SlugConstraint;

impl Constraint for SlugConstraint {
	fn name(&self) -> &str {
		"slug"
	}

	fn is_match(&self, value: &str) -> bool {
		!value.is_empty()
			&& value
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
	}
}

/// Bounds the value length in characters.
#[derive(Debug, Clone, Copy)]
pub struct LengthConstraint {
	min: usize,
	max: usize,
}

impl LengthConstraint {
	/// Requires exactly `length` characters.
	pub fn exactly(length: usize) -> Self {
		Self {
			min: length,
			max: length,
		}
	}

	/// Requires between `min` and `max` characters, inclusive.
	pub fn between(min: usize, max: usize) -> Self {
		Self { min, max }
	}
}

impl Constraint for LengthConstraint {
	fn name(&self) -> &str {
		"length"
	}

	fn is_match(&self, value: &str) -> bool {
		let length = value.chars().count();
		length >= self.min && length <= self.max
	}
}

/// Requires an integer value of at least `min`.
#[derive(Debug, Clone, Copy)]
pub struct MinConstraint {
	min: i64,
}

impl Constraint for MinConstraint {
	fn name(&self) -> &str {
		"min"
	}

	fn is_match(&self, value: &str) -> bool {
		value.parse::<i64>().is_ok_and(|parsed| parsed >= self.min)
	}
}

/// Requires an integer value of at most `max`.
#[derive(Debug, Clone, Copy)]
pub struct MaxConstraint {
	max: i64,
}

impl Constraint for MaxConstraint {
	fn name(&self) -> &str {
		"max"
	}

	fn is_match(&self, value: &str) -> bool {
		value.parse::<i64>().is_ok_and(|parsed| parsed <= self.max)
	}
}

/// Requires an integer value inside an inclusive range.
#[derive(Debug, Clone, Copy)]
pub struct RangeConstraint {
	min: i64,
	max: i64,
}

impl Constraint for RangeConstraint {
	fn name(&self) -> &str {
		"range"
	}

	fn is_match(&self, value: &str) -> bool {
		value
			.parse::<i64>()
			.is_ok_and(|parsed| parsed >= self.min && parsed <= self.max)
	}
}

/// Matches against an anchored regular expression.
#[derive(Debug, Clone)]
pub struct RegexConstraint {
	regex: Regex,
}

impl RegexConstraint {
	/// Compiles `pattern`, anchored to the whole value.
	pub fn new(pattern: &str) -> Result<Self, TemplateError> {
		let anchored = format!("^(?:{})$", pattern);
		let regex = RegexBuilder::new(&anchored)
			.size_limit(MAX_CONSTRAINT_REGEX_SIZE)
			.build()
			.map_err(|_| TemplateError::InvalidConstraintArgument {
				name: "regex".to_string(),
				argument: pattern.to_string(),
			})?;
		Ok(Self { regex })
	}
}

impl Constraint for RegexConstraint {
	fn name(&self) -> &str {
		"regex"
	}

	fn is_match(&self, value: &str) -> bool {
		self.regex.is_match(value)
	}
}

type ConstraintFactory =
	dyn Fn(Option<&str>) -> Result<Arc<dyn Constraint>, TemplateError> + Send + Sync;

/// Resolves the constraint specs recorded by the parser into executable
/// [`Constraint`] objects. Unknown names and malformed arguments surface at
/// route-registration time, never during lookup.
#[derive(Default)]
pub struct ConstraintResolver {
	custom: HashMap<String, Box<ConstraintFactory>>,
}

impl ConstraintResolver {
	/// A resolver with the built-in constraint set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a custom constraint factory under `name`, shadowing any
	/// built-in of the same name.
	pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
	where
		F: Fn(Option<&str>) -> Result<Arc<dyn Constraint>, TemplateError> + Send + Sync + 'static,
	{
		self.custom.insert(name.into(), Box::new(factory));
	}

	/// Resolves one parsed constraint spec.
	pub fn resolve(&self, spec: &ConstraintSpec) -> Result<Arc<dyn Constraint>, TemplateError> {
		if let Some(factory) = self.custom.get(spec.name()) {
			return factory(spec.argument());
		}
		match spec.name() {
			"int" => no_argument(spec).map(|_| Arc::new(IntConstraint) as Arc<dyn Constraint>),
			"bool" => no_argument(spec).map(|_| Arc::new(BoolConstraint) as Arc<dyn Constraint>),
			"uuid" => no_argument(spec).map(|_| Arc::new(UuidConstraint) as Arc<dyn Constraint>),
			"alpha" => no_argument(spec).map(|_| Arc::new(AlphaConstraint) as Arc<dyn Constraint>),
			"slug" => no_argument(spec).map(|_| Arc::new(SlugConstraint) as Arc<dyn Constraint>),
			"length" => {
				let bounds = integer_arguments(spec)?;
				match bounds.as_slice() {
					[exact] => {
						Ok(Arc::new(LengthConstraint::exactly(*exact as usize)) as Arc<dyn Constraint>)
					}
					[min, max] => Ok(Arc::new(LengthConstraint::between(
						*min as usize,
						*max as usize,
					)) as Arc<dyn Constraint>),
					_ => Err(invalid_argument(spec)),
				}
			}
			"min" => {
				let min = single_integer_argument(spec)?;
				Ok(Arc::new(MinConstraint { min }) as Arc<dyn Constraint>)
			}
			"max" => {
				let max = single_integer_argument(spec)?;
				Ok(Arc::new(MaxConstraint { max }) as Arc<dyn Constraint>)
			}
			"range" => {
				let bounds = integer_arguments(spec)?;
				match bounds.as_slice() {
					[min, max] => Ok(Arc::new(RangeConstraint {
						min: *min,
						max: *max,
					}) as Arc<dyn Constraint>),
					_ => Err(invalid_argument(spec)),
				}
			}
			"regex" => {
				let pattern = spec.argument().ok_or_else(|| invalid_argument(spec))?;
				Ok(Arc::new(RegexConstraint::new(pattern)?) as Arc<dyn Constraint>)
			}
			other => Err(TemplateError::UnknownConstraint(other.to_string())),
		}
	}
}

fn invalid_argument(spec: &ConstraintSpec) -> TemplateError {
	TemplateError::InvalidConstraintArgument {
		name: spec.name().to_string(),
		argument: spec.argument().unwrap_or_default().to_string(),
	}
}

fn no_argument(spec: &ConstraintSpec) -> Result<(), TemplateError> {
	if spec.argument().is_some() {
		return Err(invalid_argument(spec));
	}
	Ok(())
}

fn single_integer_argument(spec: &ConstraintSpec) -> Result<i64, TemplateError> {
	let values = integer_arguments(spec)?;
	match values.as_slice() {
		[value] => Ok(*value),
		_ => Err(invalid_argument(spec)),
	}
}

fn integer_arguments(spec: &ConstraintSpec) -> Result<Vec<i64>, TemplateError> {
	let argument = spec.argument().ok_or_else(|| invalid_argument(spec))?;
	argument
		.split(',')
		.map(|piece| piece.trim().parse::<i64>())
		.collect::<Result<Vec<_>, _>>()
		.map_err(|_| invalid_argument(spec))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn resolve(name: &str, argument: Option<&str>) -> Arc<dyn Constraint> {
		ConstraintResolver::new()
			.resolve(&ConstraintSpec::new(name, argument))
			.unwrap()
	}

	#[rstest]
	#[case("int", None, "42", true)]
	#[case("int", None, "-7", true)]
	#[case("int", None, "4x", false)]
	#[case("bool", None, "TRUE", true)]
	#[case("bool", None, "yes", false)]
	#[case("alpha", None, "Blog", true)]
	#[case("alpha", None, "Blog2", false)]
	#[case("slug", None, "hello-world_2", true)]
	#[case("slug", None, "hello world", false)]
	#[case("length", Some("3"), "abc", true)]
	#[case("length", Some("3"), "abcd", false)]
	#[case("length", Some("2,4"), "abc", true)]
	#[case("length", Some("2,4"), "a", false)]
	#[case("min", Some("10"), "10", true)]
	#[case("min", Some("10"), "9", false)]
	#[case("max", Some("10"), "11", false)]
	#[case("range", Some("1,5"), "3", true)]
	#[case("range", Some("1,5"), "6", false)]
	#[case("regex", Some(r"\d{4}"), "2026", true)]
	#[case("regex", Some(r"\d{4}"), "202", false)]
	fn test_builtin_constraints(
		#[case] name: &str,
		#[case] argument: Option<&str>,
		#[case] value: &str,
		#[case] expected: bool,
	) {
		assert_eq!(resolve(name, argument).is_match(value), expected);
	}

	#[test]
	fn test_uuid_constraint() {
		let constraint = resolve("uuid", None);
		assert!(constraint.is_match("123e4567-e89b-12d3-a456-426614174000"));
		assert!(!constraint.is_match("not-a-uuid"));
	}

	#[test]
	fn test_regex_constraint_is_anchored() {
		let constraint = resolve("regex", Some("ab"));
		assert!(constraint.is_match("ab"));
		assert!(!constraint.is_match("xabx"));
	}

	#[test]
	fn test_unknown_constraint_is_rejected() {
		let resolver = ConstraintResolver::new();
		let result = resolver.resolve(&ConstraintSpec::new("datetime", None::<&str>));
		assert!(matches!(result, Err(TemplateError::UnknownConstraint(_))));
	}

	#[test]
	fn test_malformed_argument_is_rejected() {
		let resolver = ConstraintResolver::new();
		let result = resolver.resolve(&ConstraintSpec::new("min", Some("ten")));
		assert!(matches!(
			result,
			Err(TemplateError::InvalidConstraintArgument { .. })
		));
	}

	#[test]
	fn test_custom_constraint_registration() {
		#[derive(Debug)]
		struct Even;
		impl Constraint for Even {
			fn name(&self) -> &str {
				"even"
			}
			fn is_match(&self, value: &str) -> bool {
				value.parse::<i64>().is_ok_and(|parsed| parsed % 2 == 0)
			}
		}

		let mut resolver = ConstraintResolver::new();
		resolver.register("even", |_| Ok(Arc::new(Even) as Arc<dyn Constraint>));
		let constraint = resolver
			.resolve(&ConstraintSpec::new("even", None::<&str>))
			.unwrap();
		assert!(constraint.is_match("4"));
		assert!(!constraint.is_match("5"));
	}
}
