//! Route template parser.
//!
//! Parses template text such as `blog/{year:int}/{*slug}` into a
//! [`RoutePattern`]. The grammar is handled with nom combinators; a semantic
//! validation pass afterwards enforces the rules the grammar alone cannot
//! express (repeated parameter names, catch-all placement, and so on).
//!
//! Template syntax per `{...}` parameter:
//! - `{name}`: captures one path segment
//! - `{name?}`: optional, may be elided from the end of a path
//! - `{*name}` / `{**name}`: catch-all, absorbs the rest of the path
//! - `{name:constraint}` / `{name:constraint(args)}`: inline constraints,
//!   repeatable
//! - `{name=value}`: default value used when the segment is elided

use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{tag, take_while1},
	character::complete::{alpha1, alphanumeric1},
	combinator::{all_consuming, map, opt, recognize},
	multi::{many0, many0_count, many1},
	sequence::{delimited, pair, preceded},
};

use crate::error::TemplateError;
use crate::pattern::{ConstraintSpec, ParameterKind, ParameterPart, Part, RoutePattern, Segment};

/// Maximum number of segments allowed in one route template. Each segment
/// owns one decimal place of the precedence score, which has 28 available.
pub const MAX_PATTERN_SEGMENTS: usize = 28;

/// A part as it comes out of the grammar, before semantic checks.
enum RawPart<'a> {
	Literal(&'a str),
	Parameter {
		catch_all: bool,
		name: &'a str,
		constraints: Vec<ConstraintSpec>,
		default: Option<&'a str>,
		optional: bool,
	},
}

/// Parse a valid identifier: a letter or underscore followed by
/// alphanumerics or underscores.
fn identifier(input: &str) -> IResult<&str, &str> {
	recognize(pair(
		alt((alpha1, tag("_"))),
		many0_count(alt((alphanumeric1, tag("_")))),
	))
	.parse(input)
}

/// Consume a constraint argument up to the matching close parenthesis,
/// tracking nested parentheses so arguments like `regex((a|b)+)` survive.
fn constraint_argument(input: &str) -> IResult<&str, &str> {
	let mut depth = 0usize;
	for (index, ch) in input.char_indices() {
		match ch {
			'(' => depth += 1,
			')' => {
				if depth == 0 {
					return Ok((&input[index..], &input[..index]));
				}
				depth -= 1;
			}
			_ => {}
		}
	}
	Err(nom::Err::Error(nom::error::Error::new(
		input,
		nom::error::ErrorKind::TakeUntil,
	)))
}

/// Parse one `:name` or `:name(args)` constraint spec.
fn constraint_spec(input: &str) -> IResult<&str, ConstraintSpec> {
	map(
		preceded(
			tag(":"),
			pair(
				identifier,
				opt(delimited(tag("("), constraint_argument, tag(")"))),
			),
		),
		|(name, argument)| ConstraintSpec::new(name, argument),
	)
	.parse(input)
}

/// Parse a `{...}` parameter part.
fn parameter(input: &str) -> IResult<&str, RawPart<'_>> {
	map(
		delimited(
			tag("{"),
			(
				opt(alt((tag("**"), tag("*")))),
				identifier,
				many0(constraint_spec),
				opt(preceded(tag("="), take_while1(|c| c != '{' && c != '}'))),
				opt(tag("?")),
			),
			tag("}"),
		),
		|(stars, name, constraints, default, optional)| RawPart::Parameter {
			catch_all: stars.is_some(),
			name,
			constraints,
			default,
			optional: optional.is_some(),
		},
	)
	.parse(input)
}

/// Parse a literal run (anything up to the next brace).
fn literal(input: &str) -> IResult<&str, RawPart<'_>> {
	map(take_while1(|c| c != '{' && c != '}'), RawPart::Literal).parse(input)
}

fn part(input: &str) -> IResult<&str, RawPart<'_>> {
	alt((parameter, literal)).parse(input)
}

/// Parses a route template into a [`RoutePattern`].
///
/// A leading `/` or `~/` and a single trailing `/` are accepted and ignored.
/// The empty template (or `/`) parses to a zero-segment pattern that matches
/// only the root path.
///
/// # Examples
///
/// ```
/// use grappelli_template::parse;
///
/// let pattern = parse("customer/{action=index}/{id?}").unwrap();
/// assert_eq!(pattern.segments().len(), 3);
/// assert!(pattern.segments()[2].is_elidable());
/// ```
pub fn parse(template: &str) -> Result<RoutePattern, TemplateError> {
	let text = template.strip_prefix("~/").unwrap_or(template);
	let text = text.strip_prefix('/').unwrap_or(text);
	let text = text.strip_suffix('/').unwrap_or(text);

	if text.contains("{{") || text.contains("}}") {
		return Err(TemplateError::MismatchedBraces(template.to_string()));
	}
	if text.contains("{}") {
		return Err(TemplateError::EmptyParameterName(template.to_string()));
	}
	let opens = text.chars().filter(|&c| c == '{').count();
	let closes = text.chars().filter(|&c| c == '}').count();
	if opens != closes {
		return Err(TemplateError::MismatchedBraces(template.to_string()));
	}

	if text.is_empty() {
		return Ok(RoutePattern::new(template, Vec::new()));
	}

	let mut segments = Vec::new();
	for raw_segment in text.split('/') {
		segments.push(parse_segment(raw_segment, template)?);
	}
	validate(&segments)?;
	Ok(RoutePattern::new(template, segments))
}

fn parse_segment(segment: &str, template: &str) -> Result<Segment, TemplateError> {
	if segment.is_empty() {
		return Err(TemplateError::ConsecutiveSeparators(template.to_string()));
	}
	let (_, raw_parts) =
		all_consuming(many1(part))
			.parse(segment)
			.map_err(|_| TemplateError::InvalidSegment {
				segment: segment.to_string(),
				template: template.to_string(),
			})?;
	let mut parts = Vec::with_capacity(raw_parts.len());
	for raw in raw_parts {
		parts.push(convert_part(raw)?);
	}
	Ok(Segment::new(parts))
}

fn convert_part(raw: RawPart<'_>) -> Result<Part, TemplateError> {
	match raw {
		RawPart::Literal(text) => Ok(Part::Literal(text.to_string())),
		RawPart::Parameter {
			catch_all,
			name,
			constraints,
			mut default,
			mut optional,
		} => {
			// `{id=1?}` tokenizes with the marker inside the default text.
			if let Some(stripped) = default.and_then(|text| text.strip_suffix('?')) {
				default = Some(stripped);
				optional = true;
			}
			if optional && default.is_some() {
				return Err(TemplateError::OptionalWithDefault(name.to_string()));
			}
			if catch_all && optional {
				return Err(TemplateError::OptionalCatchAll(name.to_string()));
			}
			let kind = if catch_all {
				ParameterKind::CatchAll
			} else if optional {
				ParameterKind::Optional
			} else {
				ParameterKind::Standard
			};
			Ok(Part::Parameter(ParameterPart::new(
				name,
				kind,
				constraints,
				default.map(str::to_string),
			)))
		}
	}
}

fn validate(segments: &[Segment]) -> Result<(), TemplateError> {
	if segments.len() > MAX_PATTERN_SEGMENTS {
		return Err(TemplateError::TooManySegments {
			count: segments.len(),
			limit: MAX_PATTERN_SEGMENTS,
		});
	}

	let mut seen: Vec<&str> = Vec::new();
	for (index, segment) in segments.iter().enumerate() {
		for window in segment.parts().windows(2) {
			if window[0].is_parameter() && window[1].is_parameter() {
				return Err(TemplateError::ConsecutiveParameters);
			}
		}
		for parameter in segment.parts().iter().filter_map(Part::as_parameter) {
			if seen.contains(&parameter.name()) {
				return Err(TemplateError::RepeatedParameter(parameter.name().to_string()));
			}
			seen.push(parameter.name());

			if parameter.is_catch_all() {
				if !segment.is_simple() {
					return Err(TemplateError::CatchAllInMultiPartSegment);
				}
				if index != segments.len() - 1 {
					return Err(TemplateError::CatchAllMustBeLast);
				}
			}
			if parameter.is_optional() && !segment.is_simple() {
				return Err(TemplateError::OptionalInMultiPartSegment);
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn test_parse_literal_only_template() {
		let pattern = parse("customer/index").unwrap();
		assert_eq!(pattern.segments().len(), 2);
		assert!(pattern.segments().iter().all(Segment::is_simple));
		assert_eq!(
			pattern.segments()[0].parts()[0],
			Part::Literal("customer".to_string())
		);
	}

	#[test]
	fn test_parse_empty_template_has_no_segments() {
		assert!(parse("").unwrap().segments().is_empty());
		assert!(parse("/").unwrap().segments().is_empty());
		assert!(parse("~/").unwrap().segments().is_empty());
	}

	#[test]
	fn test_parse_keeps_raw_text() {
		let pattern = parse("/Customer/{id}").unwrap();
		assert_eq!(pattern.raw(), "/Customer/{id}");
	}

	#[test]
	fn test_parse_parameter_with_constraints_and_default() {
		let pattern = parse("{page:int:min(1)=1}").unwrap();
		let parameter = pattern.segments()[0].parts()[0].as_parameter().unwrap();
		assert_eq!(parameter.name(), "page");
		assert_eq!(parameter.default(), Some("1"));
		assert_eq!(parameter.constraints().len(), 2);
		assert_eq!(parameter.constraints()[0].name(), "int");
		assert_eq!(parameter.constraints()[1].name(), "min");
		assert_eq!(parameter.constraints()[1].argument(), Some("1"));
	}

	#[test]
	fn test_parse_regex_constraint_keeps_nested_parentheses() {
		let pattern = parse("{slug:regex((a|b)+)}").unwrap();
		let parameter = pattern.segments()[0].parts()[0].as_parameter().unwrap();
		assert_eq!(parameter.constraints()[0].argument(), Some("(a|b)+"));
	}

	#[rstest]
	#[case("{*rest}")]
	#[case("{**rest}")]
	fn test_parse_catch_all(#[case] template: &str) {
		let pattern = parse(template).unwrap();
		let parameter = pattern.segments()[0].parts()[0].as_parameter().unwrap();
		assert!(parameter.is_catch_all());
		assert_eq!(parameter.name(), "rest");
	}

	#[test]
	fn test_parse_optional_parameter() {
		let pattern = parse("customer/{id?}").unwrap();
		let parameter = pattern.segments()[1].parts()[0].as_parameter().unwrap();
		assert!(parameter.is_optional());
		assert!(parameter.is_elidable());
	}

	#[test]
	fn test_parse_complex_segment() {
		let pattern = parse("{major}.{minor}").unwrap();
		let segment = &pattern.segments()[0];
		assert!(!segment.is_simple());
		assert_eq!(segment.parts().len(), 3);
		assert!(segment.parts()[1].is_literal());
	}

	#[rstest]
	#[case("{id")]
	#[case("id}")]
	#[case("{id}}")]
	#[case("{{id}")]
	fn test_parse_rejects_mismatched_braces(#[case] template: &str) {
		assert!(matches!(
			parse(template),
			Err(TemplateError::MismatchedBraces(_))
		));
	}

	#[test]
	fn test_parse_rejects_empty_parameter_name() {
		assert!(matches!(
			parse("customer/{}"),
			Err(TemplateError::EmptyParameterName(_))
		));
	}

	#[rstest]
	#[case("a//b")]
	#[case("//a")]
	fn test_parse_rejects_consecutive_separators(#[case] template: &str) {
		assert!(matches!(
			parse(template),
			Err(TemplateError::ConsecutiveSeparators(_))
		));
	}

	#[test]
	fn test_parse_rejects_repeated_parameter() {
		assert!(matches!(
			parse("{id}/{id}"),
			Err(TemplateError::RepeatedParameter(name)) if name == "id"
		));
	}

	#[test]
	fn test_parse_rejects_consecutive_parameters_in_one_segment() {
		assert!(matches!(
			parse("{a}{b}"),
			Err(TemplateError::ConsecutiveParameters)
		));
	}

	#[test]
	fn test_parse_rejects_catch_all_before_last_segment() {
		assert!(matches!(
			parse("{*rest}/tail"),
			Err(TemplateError::CatchAllMustBeLast)
		));
	}

	#[test]
	fn test_parse_rejects_catch_all_in_complex_segment() {
		assert!(matches!(
			parse("x{*rest}"),
			Err(TemplateError::CatchAllInMultiPartSegment)
		));
	}

	#[test]
	fn test_parse_rejects_optional_with_default() {
		assert!(matches!(
			parse("{id=1?}"),
			Err(TemplateError::OptionalWithDefault(name)) if name == "id"
		));
	}

	#[test]
	fn test_parse_rejects_optional_catch_all() {
		assert!(matches!(
			parse("{*rest?}"),
			Err(TemplateError::OptionalCatchAll(_))
		));
	}

	#[test]
	fn test_parse_rejects_optional_in_complex_segment() {
		assert!(matches!(
			parse("file.{ext?}"),
			Err(TemplateError::OptionalInMultiPartSegment)
		));
	}

	#[rstest]
	#[case("{1id}")]
	#[case("{id$}")]
	#[case("{?}")]
	fn test_parse_rejects_invalid_parameter_names(#[case] template: &str) {
		assert!(matches!(
			parse(template),
			Err(TemplateError::InvalidSegment { .. })
		));
	}

	#[test]
	fn test_parse_rejects_too_many_segments() {
		let template = vec!["a"; MAX_PATTERN_SEGMENTS + 1].join("/");
		assert!(matches!(
			parse(&template),
			Err(TemplateError::TooManySegments { .. })
		));
	}

	#[test]
	fn test_parse_accepts_maximum_segment_count() {
		let template = vec!["a"; MAX_PATTERN_SEGMENTS].join("/");
		assert!(parse(&template).is_ok());
	}
}
