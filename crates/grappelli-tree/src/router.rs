//! The route forest and path resolution.
//!
//! A [`TreeRouter`] holds one [`MatchTree`] per distinct order value,
//! ascending. Resolution walks the trees in order; within a tree a
//! depth-synchronized walk visits branches in a fixed priority (literals,
//! then constrained parameters, parameters, constrained catch-alls and
//! catch-alls) and every candidate list encountered is tried in its sorted
//! order. The first candidate whose matcher accepts the full path wins.

use std::collections::{BTreeMap, HashMap, hash_map};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use grappelli_template::{
	ConstraintResolver, Part, RouteValues, Segment, TemplateError, split_path,
};

use crate::entry::RouteEntry;
use crate::error::ReverseError;
use crate::node::{BranchKind, MatchNode};
use crate::tree::MatchTree;

/// A successful resolution: the matched entry and its extracted values.
#[derive(Debug)]
pub struct RouteMatch<H> {
	entry: Arc<RouteEntry<H>>,
	values: RouteValues,
}

impl<H> RouteMatch<H> {
	/// The matched route entry.
	pub fn entry(&self) -> &Arc<RouteEntry<H>> {
		&self.entry
	}

	/// The handler payload of the matched route.
	pub fn handler(&self) -> &H {
		self.entry.handler()
	}

	/// Extracted route values: captures, then filled defaults.
	pub fn values(&self) -> &RouteValues {
		&self.values
	}
}

/// Accumulates route entries and builds a [`TreeRouter`].
pub struct TreeRouterBuilder<H> {
	entries: Vec<RouteEntry<H>>,
	resolver: ConstraintResolver,
}

impl<H> TreeRouterBuilder<H> {
	/// An empty builder with the built-in constraint set.
	pub fn new() -> Self {
		Self {
			entries: Vec::new(),
			resolver: ConstraintResolver::new(),
		}
	}

	/// Replaces the constraint resolver used by [`route`](Self::route);
	/// lets templates reference custom constraint names.
	pub fn constraint_resolver(mut self, resolver: ConstraintResolver) -> Self {
		self.resolver = resolver;
		self
	}

	/// Parses `template` and registers it with order 0.
	pub fn route(mut self, template: &str, handler: H) -> Result<Self, TemplateError> {
		let entry = RouteEntry::parse_with(template, handler, &self.resolver)?;
		self.entries.push(entry);
		Ok(self)
	}

	/// Registers a pre-built entry (for orders, names, extra defaults).
	pub fn entry(mut self, entry: RouteEntry<H>) -> Self {
		self.entries.push(entry);
		self
	}

	/// Builds the router: one tree per distinct order, ascending.
	pub fn build(self) -> TreeRouter<H> {
		let route_count = self.entries.len();
		let mut trees: BTreeMap<i32, MatchTree<H>> = BTreeMap::new();
		let mut named: HashMap<String, Arc<RouteEntry<H>>> = HashMap::new();

		for entry in self.entries {
			let entry = Arc::new(entry);
			if let Some(name) = entry.name() {
				match named.entry(name.to_string()) {
					hash_map::Entry::Occupied(_) => {
						warn!(route = %name, "duplicate route name ignored")
					}
					hash_map::Entry::Vacant(vacant) => {
						vacant.insert(Arc::clone(&entry));
					}
				}
			}
			trees
				.entry(entry.order())
				.or_insert_with(|| MatchTree::new(entry.order()))
				.insert(Arc::clone(&entry));
		}

		let trees: Vec<_> = trees.into_values().collect();
		debug!(routes = route_count, trees = trees.len(), "built route forest");
		TreeRouter { trees, named }
	}
}

impl<H> Default for TreeRouterBuilder<H> {
	fn default() -> Self {
		Self::new()
	}
}

/// An ascending-order forest of match trees.
///
/// Built once, then read-only: resolution takes `&self` and the router is
/// freely shareable behind an `Arc` once construction is done.
///
/// # Examples
///
/// ```
/// use grappelli_tree::TreeRouter;
///
/// let router = TreeRouter::builder()
/// 	.route("customer/index/{id}", "customer")?
/// 	.route("{controller}/{action}/{*rest}", "fallback")?
/// 	.build();
///
/// let matched = router.resolve("/Customer/Index/42").unwrap();
/// assert_eq!(*matched.handler(), "customer");
/// assert_eq!(matched.values().get("id"), Some("42"));
///
/// let matched = router.resolve("/Blog/List/a/b/c").unwrap();
/// assert_eq!(*matched.handler(), "fallback");
/// assert_eq!(matched.values().get("rest"), Some("a/b/c"));
/// # Ok::<(), grappelli_template::TemplateError>(())
/// ```
#[derive(Debug)]
pub struct TreeRouter<H> {
	trees: Vec<MatchTree<H>>,
	named: HashMap<String, Arc<RouteEntry<H>>>,
}

impl<H> TreeRouter<H> {
	/// Starts building a router.
	pub fn builder() -> TreeRouterBuilder<H> {
		TreeRouterBuilder::new()
	}

	/// The match trees, ascending by order, for diagnostics and enumeration.
	pub fn trees(&self) -> &[MatchTree<H>] {
		&self.trees
	}

	/// Resolves `path` to the most specific matching route.
	///
	/// An unmatched path is an ordinary `None`, not an error; an empty
	/// router simply never matches.
	pub fn resolve(&self, path: &str) -> Option<RouteMatch<H>> {
		let segments = split_path(path);
		for tree in &self.trees {
			let walker = TreeWalker::new(tree.root(), &segments);
			for node in walker {
				for candidate in node.matches() {
					trace!(
						template = %candidate.entry().pattern(),
						order = tree.order(),
						"trying candidate route"
					);
					if let Some(values) = candidate.matcher().try_match(path) {
						debug!(
							path = %path,
							template = %candidate.entry().pattern(),
							"resolved path"
						);
						return Some(RouteMatch {
							entry: Arc::clone(candidate.entry()),
							values,
						});
					}
				}
			}
		}
		None
	}

	/// Builds the path for the named route from `values` and the route's
	/// defaults. Unsupplied optional and catch-all parameters are elided
	/// from the end of the path; anything else unbound is an error.
	pub fn url_for(&self, name: &str, values: &RouteValues) -> Result<String, ReverseError> {
		let entry = self
			.named
			.get(name)
			.ok_or_else(|| ReverseError::UnknownRoute(name.to_string()))?;

		let segments = entry.pattern().segments();
		let mut rendered: Vec<Option<String>> = Vec::with_capacity(segments.len());
		for segment in segments {
			rendered.push(render_segment(name, entry, segment, values)?);
		}
		while matches!(rendered.last(), Some(None)) {
			rendered.pop();
		}

		let mut pieces = Vec::with_capacity(rendered.len());
		for (index, piece) in rendered.iter().enumerate() {
			match piece {
				Some(text) => pieces.push(text.as_str()),
				// An elided parameter in the middle of the path leaves a
				// hole the URL cannot express.
				None => {
					return Err(ReverseError::MissingParameter {
						route: name.to_string(),
						parameter: first_parameter_name(&segments[index]).to_string(),
					});
				}
			}
		}
		Ok(format!("/{}", pieces.join("/")))
	}
}

fn first_parameter_name(segment: &Segment) -> &str {
	segment
		.parts()
		.iter()
		.filter_map(Part::as_parameter)
		.map(|parameter| parameter.name())
		.next()
		.unwrap_or_default()
}

/// Renders one template segment for reverse resolution. `Ok(None)` means the
/// segment was elided (an unbound optional or catch-all parameter).
fn render_segment<H>(
	route: &str,
	entry: &RouteEntry<H>,
	segment: &Segment,
	values: &RouteValues,
) -> Result<Option<String>, ReverseError> {
	let mut text = String::new();
	for part in segment.parts() {
		match part {
			Part::Literal(literal) => text.push_str(literal),
			Part::Parameter(parameter) => {
				let value = values
					.get(parameter.name())
					.or_else(|| entry.defaults().get(parameter.name()));
				match value {
					Some(value) => {
						validate_reverse_value(entry, parameter.name(), value)?;
						text.push_str(value);
					}
					None if parameter.is_elidable() => return Ok(None),
					None => {
						return Err(ReverseError::MissingParameter {
							route: route.to_string(),
							parameter: parameter.name().to_string(),
						});
					}
				}
			}
		}
	}
	Ok(Some(text))
}

fn validate_reverse_value<H>(
	entry: &RouteEntry<H>,
	parameter: &str,
	value: &str,
) -> Result<(), ReverseError> {
	if let Some(constraints) = entry.constraints().get(parameter) {
		for constraint in constraints {
			if !constraint.is_match(value) {
				return Err(ReverseError::ConstraintViolation {
					parameter: parameter.to_string(),
					value: value.to_string(),
					constraint: constraint.name().to_string(),
				});
			}
		}
	}
	Ok(())
}

/// Iterator over the nodes of one tree that may hold a match for a path:
/// nodes at exactly the path's depth, plus catch-all nodes reached along
/// the way. Children are pushed in reverse priority so that the
/// highest-priority branch is visited first.
struct TreeWalker<'a, H> {
	segments: &'a [&'a str],
	stack: Vec<&'a MatchNode<H>>,
}

impl<'a, H> TreeWalker<'a, H> {
	fn new(root: &'a MatchNode<H>, segments: &'a [&'a str]) -> Self {
		Self {
			segments,
			stack: vec![root],
		}
	}
}

impl<'a, H> Iterator for TreeWalker<'a, H> {
	type Item = &'a MatchNode<H>;

	fn next(&mut self) -> Option<Self::Item> {
		while let Some(node) = self.stack.pop() {
			if node.is_catch_all() && !node.matches().is_empty() {
				// A catch-all absorbs however many segments remain.
				return Some(node);
			}
			if node.depth() == self.segments.len() {
				if !node.matches().is_empty() {
					return Some(node);
				}
				continue;
			}
			if node.depth() < self.segments.len() {
				for kind in BranchKind::PRIORITY.iter().rev() {
					if let Some(child) = node.branch(*kind) {
						self.stack.push(child);
					}
				}
				if let Some(child) = node.literal(self.segments[node.depth()]) {
					self.stack.push(child);
				}
			}
		}
		None
	}
}
