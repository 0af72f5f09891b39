//! Per-order match trees.
//!
//! A [`MatchTree`] is one trie over every route sharing an order value.
//! Insertion threads an entry's segments through the tree, creating branch
//! nodes on demand and recording the entry as a candidate at every node
//! where it can terminate. A route terminates at more than one depth when
//! its trailing segments can all be elided (optional, catch-all or
//! defaulted), because a shorter path can still satisfy the template.

use std::sync::Arc;

use tracing::debug;

use grappelli_template::{Part, Segment};

use crate::entry::{InboundMatch, RouteEntry};
use crate::node::{BranchKind, MatchNode};

/// The match tree for one order bucket.
#[derive(Debug)]
pub struct MatchTree<H> {
	order: i32,
	root: MatchNode<H>,
}

impl<H> MatchTree<H> {
	/// Creates an empty tree for `order` with an eager root at depth 0.
	pub fn new(order: i32) -> Self {
		Self {
			order,
			root: MatchNode::new(0),
		}
	}

	/// The order bucket this tree serves.
	pub fn order(&self) -> i32 {
		self.order
	}

	/// The root node, for diagnostics and enumeration.
	pub fn root(&self) -> &MatchNode<H> {
		&self.root
	}

	/// Threads `entry` into the tree.
	///
	/// Child nodes are shared between entries with common prefixes, so
	/// inserting overlapping templates reuses branches instead of
	/// duplicating them. Branch choice depends only on each segment's own
	/// shape; insertion never backtracks.
	pub fn insert(&mut self, entry: Arc<RouteEntry<H>>) {
		let matcher = Arc::new(entry.build_matcher());
		let segments = entry.pattern().segments();
		let mut current = &mut self.root;

		for (index, segment) in segments.iter().enumerate() {
			if !segment.is_simple() {
				// A multi-part segment is matched as an opaque constrained
				// parameter; its parts are only re-examined by the matcher.
				current = current.branch_or_create(BranchKind::ConstrainedParameter, index + 1);
				continue;
			}

			let part = match segment.parts() {
				[part] => part,
				_ => unreachable!("simple segment without exactly one part"),
			};
			match part {
				Part::Literal(text) => {
					current = current.literal_or_create(text, index + 1);
				}
				Part::Parameter(parameter) => {
					// A shorter path can end here if everything from this
					// segment on can be elided.
					if remaining_are_elidable(&segments[index..]) {
						current.add_match(InboundMatch::new(Arc::clone(&entry), Arc::clone(&matcher)));
					}
					let kind =
						BranchKind::classify(parameter.has_constraints(), parameter.is_catch_all());
					current = current.branch_or_create(kind, index + 1);
				}
			}
		}

		debug!(
			template = %entry.pattern(),
			order = self.order,
			depth = segments.len(),
			"inserted route"
		);
		current.add_match(InboundMatch::new(entry, matcher));
	}
}

fn remaining_are_elidable(segments: &[Segment]) -> bool {
	segments.iter().all(Segment::is_elidable)
}
