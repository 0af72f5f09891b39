//! # grappelli-template
//!
//! Route template parsing, matching and precedence scoring for the
//! grappelli router.
//!
//! A route template is a URL pattern such as `blog/{year:int}/{*slug}`:
//! literal segments, `{parameter}` placeholders with optional inline
//! constraints, defaults, optional markers and catch-alls. This crate turns
//! template text into an immutable [`RoutePattern`], scores patterns for
//! specificity ([`compute_inbound`]) and validates concrete paths against
//! them ([`TemplateMatcher`]).
//!
//! The matching tree in `grappelli-tree` builds on these pieces: it narrows
//! candidates structurally and delegates final validation and value
//! extraction to a [`TemplateMatcher`] per route.

pub mod constraint;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod precedence;
pub mod values;

pub use constraint::{Constraint, ConstraintResolver};
pub use error::TemplateError;
pub use matcher::{TemplateMatcher, split_path};
pub use parser::{MAX_PATTERN_SEGMENTS, parse};
pub use pattern::{ConstraintSpec, ParameterKind, ParameterPart, Part, RoutePattern, Segment};
pub use precedence::compute_inbound;
pub use values::RouteValues;
