//! # grappelli-tree
//!
//! The URL-matching tree: a per-order forest of tries that resolves an
//! incoming path to the most specific registered route in better-than-linear
//! time, with deterministic tie-breaking among overlapping templates.
//!
//! Matching is two-phase. The tree narrows candidates structurally: one
//! node per consumed path segment, branches classified as literal,
//! constrained parameter, parameter, constrained catch-all or catch-all.
//! Each surviving candidate then re-validates the full path through its
//! [`TemplateMatcher`](grappelli_template::TemplateMatcher), which checks
//! constraints and fills defaults.
//!
//! The forest is built once (a sequence of insertions from one thread) and
//! read-only afterwards; resolution never blocks, never allocates a lock
//! and never fails with an error. An unmatched path is an ordinary `None`.

pub mod entry;
pub mod error;
pub mod node;
pub mod router;
pub mod tree;

pub use entry::{InboundMatch, RouteEntry};
pub use error::ReverseError;
pub use node::{BranchKind, MatchNode};
pub use router::{RouteMatch, TreeRouter, TreeRouterBuilder};
pub use rust_decimal::Decimal;
pub use tree::MatchTree;
