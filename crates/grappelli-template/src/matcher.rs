//! Per-template path matching.
//!
//! A [`TemplateMatcher`] is built once per registered route from the parsed
//! pattern, the route's default values and its resolved constraints. At
//! lookup time it re-validates a full path against the template: structural
//! match first, then default filling, then constraint evaluation. The
//! matching tree only narrows the candidate set; the matcher is the
//! authority on whether a candidate actually matches.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::constraint::Constraint;
use crate::pattern::{ParameterPart, Part, RoutePattern};
use crate::values::RouteValues;

/// Splits a request path into segments.
///
/// Leading and trailing `/` characters are ignored; the root path yields no
/// segments. Interior empty segments (from `//`) are preserved and will only
/// match parameters that carry a default.
pub fn split_path(path: &str) -> Vec<&str> {
	let trimmed = path.trim_matches('/');
	if trimmed.is_empty() {
		Vec::new()
	} else {
		trimmed.split('/').collect()
	}
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
	left.to_lowercase() == right.to_lowercase()
}

/// Rightmost case-insensitive occurrence of `needle` in `text` whose end
/// does not exceed `search_end`. Returns the byte offset of the occurrence.
fn rfind_ignore_case(text: &str, needle: &str, search_end: usize) -> Option<usize> {
	if needle.is_empty() || needle.len() > search_end {
		return None;
	}
	let mut position = search_end - needle.len();
	loop {
		if text.is_char_boundary(position) {
			if let Some(candidate) = text.get(position..position + needle.len()) {
				if eq_ignore_case(candidate, needle) {
					return Some(position);
				}
			}
		}
		if position == 0 {
			return None;
		}
		position -= 1;
	}
}

/// Validates a path against one route template and extracts its values.
#[derive(Debug)]
pub struct TemplateMatcher {
	pattern: RoutePattern,
	defaults: RouteValues,
	constraints: HashMap<String, Vec<Arc<dyn Constraint>>>,
}

impl TemplateMatcher {
	/// Builds a matcher from a parsed pattern, the route's defaults and its
	/// resolved constraints.
	pub fn new(
		pattern: RoutePattern,
		defaults: RouteValues,
		constraints: HashMap<String, Vec<Arc<dyn Constraint>>>,
	) -> Self {
		Self {
			pattern,
			defaults,
			constraints,
		}
	}

	/// The template this matcher validates against.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Attempts to match `path` against the template.
	///
	/// On success returns the extracted route values: captured segments,
	/// then defaults for every parameter the path elided, then any extra
	/// defaults the route declared. Failure is an ordinary `None`.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_template::{parse, RouteValues, TemplateMatcher};
	///
	/// let pattern = parse("customer/{action=index}/{id?}").unwrap();
	/// let matcher = TemplateMatcher::new(pattern, RouteValues::from_iter([("action", "index")]), Default::default());
	///
	/// let values = matcher.try_match("/Customer").unwrap();
	/// assert_eq!(values.get("action"), Some("index"));
	/// assert_eq!(values.get("id"), None);
	/// ```
	pub fn try_match(&self, path: &str) -> Option<RouteValues> {
		let segments = split_path(path);
		let template_segments = self.pattern.segments();
		let mut values = RouteValues::new();
		let mut saw_catch_all = false;

		for (index, segment) in template_segments.iter().enumerate() {
			if segment.is_simple() {
				let part = match segment.parts() {
					[part] => part,
					_ => unreachable!("simple segment without exactly one part"),
				};
				match part {
					Part::Literal(text) => match segments.get(index) {
						Some(candidate) if eq_ignore_case(candidate, text) => {}
						_ => return None,
					},
					Part::Parameter(parameter) => {
						if parameter.is_catch_all() {
							if index < segments.len() {
								values.insert(parameter.name(), segments[index..].join("/"));
							} else if let Some(default) = parameter.default() {
								values.insert(parameter.name(), default);
							}
							saw_catch_all = true;
							break;
						}
						match segments.get(index) {
							Some(candidate) if !candidate.is_empty() => {
								values.insert(parameter.name(), *candidate);
							}
							Some(_) => {
								// Empty segment, e.g. from `a//b`.
								let default = parameter.default()?;
								values.insert(parameter.name(), default);
							}
							None => {
								// Path is shorter than the template; the rest
								// of the template must be elidable.
								if !parameter.is_elidable() {
									return None;
								}
								if let Some(default) = parameter.default() {
									values.insert(parameter.name(), default);
								}
							}
						}
					}
				}
			} else {
				let candidate = segments.get(index)?;
				if !match_complex_segment(segment.parts(), candidate, &mut values) {
					return None;
				}
			}
		}

		if !saw_catch_all && segments.len() > template_segments.len() {
			return None;
		}

		for (key, value) in self.defaults.iter() {
			if !values.contains_key(key) {
				values.insert(key, value);
			}
		}

		for (name, constraints) in &self.constraints {
			if let Some(value) = values.get(name) {
				for constraint in constraints {
					if !constraint.is_match(value) {
						trace!(
							parameter = %name,
							constraint = %constraint.name(),
							value = %value,
							"constraint rejected value"
						);
						return None;
					}
				}
			}
		}

		Some(values)
	}
}

/// Matches a multi-part segment (e.g. `{major}.{minor}` or `v{version}`)
/// against one path segment, binding parameter values.
///
/// Parts are matched right to left: literals are located with a reverse
/// case-insensitive search (the final literal anchored at the segment end,
/// the first part anchored at the start) and each parameter captures the
/// non-empty text between its neighbouring literals.
fn match_complex_segment(parts: &[Part], text: &str, values: &mut RouteValues) -> bool {
	let mut remaining_end = text.len();
	let mut pending: Option<(&ParameterPart, usize)> = None;

	for (index, part) in parts.iter().enumerate().rev() {
		match part {
			Part::Literal(literal) => {
				let found = if let Some((_, value_end)) = pending {
					// Leave at least one character for the parameter on the
					// right of this literal.
					match rfind_ignore_case(text, literal, value_end.saturating_sub(1)) {
						Some(found) => found,
						None => return false,
					}
				} else {
					// No parameter pending: the literal must sit flush
					// against the unmatched boundary.
					if remaining_end < literal.len() {
						return false;
					}
					let start = remaining_end - literal.len();
					if !text.is_char_boundary(start)
						|| !eq_ignore_case(&text[start..remaining_end], literal)
					{
						return false;
					}
					start
				};
				let literal_end = found + literal.len();
				if let Some((parameter, value_end)) = pending.take() {
					values.insert(parameter.name(), &text[literal_end..value_end]);
				}
				if index == 0 && found != 0 {
					return false;
				}
				remaining_end = found;
			}
			Part::Parameter(parameter) => {
				pending = Some((parameter, remaining_end));
			}
		}
	}

	if let Some((parameter, value_end)) = pending {
		if value_end == 0 {
			return false;
		}
		values.insert(parameter.name(), &text[..value_end]);
	}
	true
}
