//! Parsed route template representation.
//!
//! A template such as `blog/{year:int}/{*slug}` parses into a [`RoutePattern`]:
//! an ordered list of [`Segment`]s, each holding one or more [`Part`]s. A
//! segment with a single part is "simple"; a segment concatenating several
//! parts (`{a}-{b}`, `v{version}`) is "complex". Patterns are immutable once
//! built and are shared freely between the matcher and the tree.

use std::fmt;

/// A parsed, immutable route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
	raw: String,
	segments: Vec<Segment>,
}

impl RoutePattern {
	pub(crate) fn new(raw: impl Into<String>, segments: Vec<Segment>) -> Self {
		Self {
			raw: raw.into(),
			segments,
		}
	}

	/// The template text as originally written.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// The `/`-separated segments of the template, in order.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Names of every parameter in the template, in declaration order.
	pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
		self.segments
			.iter()
			.flat_map(|segment| segment.parts())
			.filter_map(|part| part.as_parameter())
			.map(ParameterPart::name)
	}
}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.raw)
	}
}

/// One `/`-delimited portion of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	parts: Vec<Part>,
}

impl Segment {
	pub(crate) fn new(parts: Vec<Part>) -> Self {
		Self { parts }
	}

	/// The literal and parameter parts making up this segment.
	pub fn parts(&self) -> &[Part] {
		&self.parts
	}

	/// Whether the segment consists of exactly one part.
	pub fn is_simple(&self) -> bool {
		self.parts.len() == 1
	}

	/// Whether a shorter path can skip this segment entirely: true only for
	/// a simple parameter segment that is optional, catch-all, or defaulted.
	pub fn is_elidable(&self) -> bool {
		match self.parts.as_slice() {
			[Part::Parameter(parameter)] => parameter.is_elidable(),
			_ => false,
		}
	}
}

/// A piece of a segment: literal text or a `{parameter}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
	/// Literal text matched verbatim (case-insensitively).
	Literal(String),
	/// A named placeholder capturing part of the path.
	Parameter(ParameterPart),
}

impl Part {
	/// Whether this part is literal text.
	pub fn is_literal(&self) -> bool {
		matches!(self, Part::Literal(_))
	}

	/// Whether this part is a parameter.
	pub fn is_parameter(&self) -> bool {
		matches!(self, Part::Parameter(_))
	}

	/// The parameter, if this part is one.
	pub fn as_parameter(&self) -> Option<&ParameterPart> {
		match self {
			Part::Parameter(parameter) => Some(parameter),
			Part::Literal(_) => None,
		}
	}
}

/// How a parameter binds against the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
	/// Must consume exactly one path segment.
	Standard,
	/// May be absent when it is part of an elidable tail (`{id?}`).
	Optional,
	/// Absorbs all remaining path segments as one value (`{*rest}`).
	CatchAll,
}

/// A parameter part: name, binding kind, inline constraint specs and an
/// optional default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterPart {
	name: String,
	kind: ParameterKind,
	constraints: Vec<ConstraintSpec>,
	default: Option<String>,
}

impl ParameterPart {
	pub(crate) fn new(
		name: impl Into<String>,
		kind: ParameterKind,
		constraints: Vec<ConstraintSpec>,
		default: Option<String>,
	) -> Self {
		Self {
			name: name.into(),
			kind,
			constraints,
			default,
		}
	}

	/// The parameter name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The binding kind.
	pub fn kind(&self) -> ParameterKind {
		self.kind
	}

	/// Whether this parameter absorbs the rest of the path.
	pub fn is_catch_all(&self) -> bool {
		self.kind == ParameterKind::CatchAll
	}

	/// Whether this parameter may be absent from a matching path.
	pub fn is_optional(&self) -> bool {
		self.kind == ParameterKind::Optional
	}

	/// Whether the parameter carries at least one inline constraint.
	pub fn has_constraints(&self) -> bool {
		!self.constraints.is_empty()
	}

	/// The inline constraint specs, as written.
	pub fn constraints(&self) -> &[ConstraintSpec] {
		&self.constraints
	}

	/// The default value, if one was declared.
	pub fn default(&self) -> Option<&str> {
		self.default.as_deref()
	}

	/// Whether a shorter path can leave this parameter unbound.
	pub fn is_elidable(&self) -> bool {
		self.is_optional() || self.is_catch_all() || self.default.is_some()
	}
}

/// An inline constraint as written in the template: a name plus an optional
/// argument, e.g. `int` or `length(1,20)`. Resolution into an executable
/// constraint happens separately, at route-registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSpec {
	name: String,
	argument: Option<String>,
}

impl ConstraintSpec {
	pub(crate) fn new(name: impl Into<String>, argument: Option<impl Into<String>>) -> Self {
		Self {
			name: name.into(),
			argument: argument.map(Into::into),
		}
	}

	/// The constraint name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The raw argument text between the parentheses, if any.
	pub fn argument(&self) -> Option<&str> {
		self.argument.as_deref()
	}
}
