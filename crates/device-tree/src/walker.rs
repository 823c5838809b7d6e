use serde::Serialize;
use tracing::trace;

use crate::{
	identity::DeviceIdentity,
	pattern::AncestorPattern,
	tree::{DeviceEntry, DeviceTreeSnapshot},
};

/// The nearest ancestor whose identity matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorMatch {
	pub identity: DeviceIdentity,
	/// Levels above the target, the immediate parent being 1.
	pub depth: usize,
}

/// Lazy sequence of the ancestors of a device, nearest first, ending at the tree root.
pub struct Ancestors<'s, S: DeviceTreeSnapshot> {
	snapshot: &'s S,
	current: Option<S::Handle>,
	depth: usize,
}

impl<'s, S: DeviceTreeSnapshot> Ancestors<'s, S> {
	pub fn new(snapshot: &'s S, start: S::Handle) -> Self {
		Self {
			snapshot,
			current: Some(start),
			depth: 0,
		}
	}
}

impl<S: DeviceTreeSnapshot> Iterator for Ancestors<'_, S> {
	/// Distance from the starting device, and the ancestor itself.
	type Item = (usize, DeviceEntry<S::Handle>);

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.current.take()?;
		let parent = self.snapshot.parent(current)?;

		self.depth += 1;
		self.current = Some(parent.handle);

		Some((self.depth, parent))
	}
}

impl<S: DeviceTreeSnapshot> std::iter::FusedIterator for Ancestors<'_, S> {}

/// Outcome of one walk; a walk always ends in one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
	Found(AncestorMatch),
	/// The root was reached without a match.
	Exhausted { depth: usize },
}

/// Ascends from a device one parent at a time until an ancestor's identity matches
/// the pattern. The walker borrows the snapshot, so it cannot outlive it.
pub struct AncestorWalker<'s, S: DeviceTreeSnapshot> {
	snapshot: &'s S,
	pattern: &'s AncestorPattern,
}

impl<'s, S: DeviceTreeSnapshot> AncestorWalker<'s, S> {
	pub fn new(snapshot: &'s S, pattern: &'s AncestorPattern) -> Self {
		Self { snapshot, pattern }
	}

	pub fn walk(&self, start: S::Handle) -> WalkOutcome {
		let mut deepest = 0;

		for (depth, ancestor) in Ancestors::new(self.snapshot, start) {
			deepest = depth;

			if self.pattern.is_match(&ancestor.identity) {
				trace!(depth, identity = %ancestor.identity, "Ancestor matches;");
				return WalkOutcome::Found(AncestorMatch {
					identity: ancestor.identity,
					depth,
				});
			}

			trace!(
				depth,
				identity = %ancestor.identity,
				"Ancestor does not match, ascending;",
			);
		}

		trace!(depth = deepest, "Reached tree root without a match;");

		WalkOutcome::Exhausted { depth: deepest }
	}
}
