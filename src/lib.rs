//! # grappelli
//!
//! A tree-based URL route matcher with template precedence.
//!
//! grappelli indexes route templates (literal segments, `{parameter}`
//! placeholders, inline constraints, defaults, optional markers and
//! `{*catch-all}`s) in a forest of tries so that an incoming path resolves
//! to the most specific matching route with deterministic tie-breaking,
//! however the templates overlap.
//!
//! The crate is a pure in-memory data structure: no server, no middleware,
//! no I/O. Handlers are an opaque payload type chosen by the caller, so the
//! router slots under any dispatch layer.
//!
//! ## Quick example
//!
//! ```
//! use grappelli::prelude::*;
//!
//! let router = TreeRouter::builder()
//! 	.route("customer/index/{id}", "customer-index")?
//! 	.route("{controller}/{action=index}/{id?}", "mvc-fallback")?
//! 	.build();
//!
//! let matched = router.resolve("/Customer/Index/42").unwrap();
//! assert_eq!(*matched.handler(), "customer-index");
//! assert_eq!(matched.values().get("id"), Some("42"));
//!
//! let matched = router.resolve("/Blog").unwrap();
//! assert_eq!(*matched.handler(), "mvc-fallback");
//! assert_eq!(matched.values().get("action"), Some("index"));
//! # Ok::<(), grappelli::TemplateError>(())
//! ```

pub use grappelli_template::{
	Constraint, ConstraintResolver, ConstraintSpec, ParameterKind, ParameterPart, Part,
	RoutePattern, RouteValues, Segment, TemplateError, TemplateMatcher, compute_inbound, parse,
	split_path,
};
pub use grappelli_tree::{
	BranchKind, Decimal, InboundMatch, MatchNode, MatchTree, ReverseError, RouteEntry, RouteMatch,
	TreeRouter, TreeRouterBuilder,
};

/// The types most callers need.
pub mod prelude {
	pub use crate::{
		ReverseError, RouteEntry, RouteMatch, RouteValues, TemplateError, TreeRouter,
		TreeRouterBuilder,
	};
}
