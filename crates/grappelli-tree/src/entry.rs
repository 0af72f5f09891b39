//! Route entries.
//!
//! A [`RouteEntry`] is one registered route: its ordering keys, parsed
//! pattern, constraints, defaults and an opaque handler payload. Entries are
//! immutable once inserted into a tree and are shared between every node
//! that records them as a candidate.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use grappelli_template::{
	Constraint, ConstraintResolver, Part, RoutePattern, RouteValues, TemplateError,
	TemplateMatcher, compute_inbound, parse,
};

/// One registered route.
///
/// `H` is the handler payload: whatever the caller wants back when the route
/// matches. The router never inspects it.
#[derive(Debug)]
pub struct RouteEntry<H> {
	order: i32,
	precedence: Decimal,
	name: Option<String>,
	pattern: RoutePattern,
	defaults: RouteValues,
	constraints: HashMap<String, Vec<Arc<dyn Constraint>>>,
	handler: H,
}

impl<H> RouteEntry<H> {
	/// Parses `template` and builds an entry with order 0, collecting the
	/// template's inline defaults and resolving its inline constraints with
	/// the built-in resolver.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_tree::RouteEntry;
	///
	/// let entry = RouteEntry::new("blog/{year:int}/{slug}", "blog-detail")
	/// 	.unwrap()
	/// 	.with_order(1)
	/// 	.with_name("blog-detail");
	/// assert_eq!(entry.order(), 1);
	/// assert_eq!(entry.name(), Some("blog-detail"));
	/// ```
	pub fn new(template: &str, handler: H) -> Result<Self, TemplateError> {
		Self::parse_with(template, handler, &ConstraintResolver::new())
	}

	/// Like [`RouteEntry::new`], resolving inline constraints with the given
	/// resolver (for custom constraint registrations).
	pub fn parse_with(
		template: &str,
		handler: H,
		resolver: &ConstraintResolver,
	) -> Result<Self, TemplateError> {
		let pattern = parse(template)?;
		let precedence = compute_inbound(&pattern);

		let mut defaults = RouteValues::new();
		let mut constraints: HashMap<String, Vec<Arc<dyn Constraint>>> = HashMap::new();
		for segment in pattern.segments() {
			for parameter in segment.parts().iter().filter_map(Part::as_parameter) {
				if let Some(default) = parameter.default() {
					defaults.insert(parameter.name(), default);
				}
				for spec in parameter.constraints() {
					constraints
						.entry(parameter.name().to_string())
						.or_default()
						.push(resolver.resolve(spec)?);
				}
			}
		}

		Ok(Self {
			order: 0,
			precedence,
			name: None,
			pattern,
			defaults,
			constraints,
			handler,
		})
	}

	/// Sets the order bucket. Lower orders are tried before higher ones,
	/// regardless of precedence.
	pub fn with_order(mut self, order: i32) -> Self {
		self.order = order;
		self
	}

	/// Names the route for reverse resolution.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Adds a default value on top of those declared inline in the template.
	pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.defaults.insert(key, value);
		self
	}

	/// The order bucket.
	pub fn order(&self) -> i32 {
		self.order
	}

	/// The computed specificity score; lower is tried first within a node.
	pub fn precedence(&self) -> Decimal {
		self.precedence
	}

	/// The route name, if any.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// The parsed pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Default values, inline and explicit.
	pub fn defaults(&self) -> &RouteValues {
		&self.defaults
	}

	/// Resolved constraints per parameter name.
	pub fn constraints(&self) -> &HashMap<String, Vec<Arc<dyn Constraint>>> {
		&self.constraints
	}

	/// The handler payload.
	pub fn handler(&self) -> &H {
		&self.handler
	}

	/// Builds this entry's template matcher. Called once per entry at
	/// insertion time; every terminal node the entry reaches shares the
	/// result.
	pub(crate) fn build_matcher(&self) -> TemplateMatcher {
		TemplateMatcher::new(
			self.pattern.clone(),
			self.defaults.clone(),
			self.constraints.clone(),
		)
	}
}

/// A route candidate recorded at one tree node: the entry plus its shared
/// matcher. A single entry produces one of these per terminal depth it can
/// end at.
#[derive(Debug)]
pub struct InboundMatch<H> {
	entry: Arc<RouteEntry<H>>,
	matcher: Arc<TemplateMatcher>,
}

impl<H> InboundMatch<H> {
	pub(crate) fn new(entry: Arc<RouteEntry<H>>, matcher: Arc<TemplateMatcher>) -> Self {
		Self { entry, matcher }
	}

	/// The route entry.
	pub fn entry(&self) -> &Arc<RouteEntry<H>> {
		&self.entry
	}

	/// The per-template matcher.
	pub fn matcher(&self) -> &TemplateMatcher {
		&self.matcher
	}
}

impl<H> Clone for InboundMatch<H> {
	fn clone(&self) -> Self {
		Self {
			entry: Arc::clone(&self.entry),
			matcher: Arc::clone(&self.matcher),
		}
	}
}
