//! Route template error types.

use thiserror::Error;

/// Errors raised while parsing a route template or resolving its inline
/// constraints.
///
/// All of these indicate a malformed template handed in by the caller;
/// they are reported at route-registration time, never during lookup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TemplateError {
	/// Unbalanced or nested braces.
	#[error("mismatched braces in route template '{0}'")]
	MismatchedBraces(String),

	/// A `{}` with no parameter name inside.
	#[error("empty parameter name in route template '{0}'")]
	EmptyParameterName(String),

	/// A segment that does not parse as a sequence of literals and parameters.
	#[error("invalid segment '{segment}' in route template '{template}'")]
	InvalidSegment {
		/// The offending segment text.
		segment: String,
		/// The full template.
		template: String,
	},

	/// The same parameter name used more than once in one template.
	#[error("parameter '{0}' appears more than once")]
	RepeatedParameter(String),

	/// Two `/` separators with nothing between them.
	#[error("consecutive separators in route template '{0}'")]
	ConsecutiveSeparators(String),

	/// Two parameters in one segment with no separating literal.
	#[error("a segment cannot contain two consecutive parameters")]
	ConsecutiveParameters,

	/// A catch-all parameter somewhere other than the last segment.
	#[error("a catch-all parameter can only appear as the last segment")]
	CatchAllMustBeLast,

	/// A catch-all parameter mixed with other parts in one segment.
	#[error("a catch-all parameter cannot be part of a multi-part segment")]
	CatchAllInMultiPartSegment,

	/// A catch-all parameter carrying the optional marker.
	#[error("a catch-all parameter cannot be marked optional")]
	OptionalCatchAll(String),

	/// A parameter that is both optional and defaulted, e.g. `{id=1?}`.
	#[error("an optional parameter cannot have a default value: '{0}'")]
	OptionalWithDefault(String),

	/// An optional parameter inside a multi-part segment.
	#[error("optional parameters are only allowed in single-part segments")]
	OptionalInMultiPartSegment,

	/// More segments than the matcher supports.
	#[error("route template has {count} segments, exceeding the maximum of {limit}")]
	TooManySegments {
		/// Segments found in the template.
		count: usize,
		/// Maximum supported segment count.
		limit: usize,
	},

	/// An inline constraint name with no registered resolver.
	#[error("unknown constraint '{0}'")]
	UnknownConstraint(String),

	/// An inline constraint whose argument could not be interpreted.
	#[error("invalid argument '{argument}' for constraint '{name}'")]
	InvalidConstraintArgument {
		/// Constraint name.
		name: String,
		/// The argument text as written in the template.
		argument: String,
	},
}
