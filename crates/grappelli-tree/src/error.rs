//! Router error types.

use thiserror::Error;

/// Errors raised by name-based reverse resolution.
///
/// These are distinct from lookup failure: an unmatched path is an ordinary
/// `None`, while reverse resolution failures describe a caller mistake and
/// carry enough context to report it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReverseError {
	/// No route registered under the requested name.
	#[error("no route named '{0}'")]
	UnknownRoute(String),

	/// A required parameter was neither supplied nor defaulted.
	#[error("missing value for parameter '{parameter}' in route '{route}'")]
	MissingParameter {
		/// The route name.
		route: String,
		/// The unbound parameter.
		parameter: String,
	},

	/// A supplied value failed one of the parameter's constraints.
	#[error("value '{value}' for parameter '{parameter}' rejected by constraint '{constraint}'")]
	ConstraintViolation {
		/// The parameter name.
		parameter: String,
		/// The rejected value.
		value: String,
		/// The constraint that rejected it.
		constraint: String,
	},
}
