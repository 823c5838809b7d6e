use tracing::{debug, instrument};

use crate::{
	class::ClassFilter,
	enumerator::find_target,
	error::{Error, Result},
	pattern::AncestorPattern,
	tree::{DeviceTree, DeviceTreeSnapshot},
	walker::{AncestorMatch, AncestorWalker, WalkOutcome},
};

/// One ancestor lookup: which devices may be the target, and what the wanted
/// ancestor looks like.
#[derive(Debug, Clone)]
pub struct ParentSearch {
	filter: ClassFilter,
	pattern: AncestorPattern,
}

impl ParentSearch {
	pub fn new(pattern: AncestorPattern) -> Self {
		Self {
			filter: ClassFilter::default(),
			pattern,
		}
	}

	#[must_use]
	pub fn with_class(mut self, filter: ClassFilter) -> Self {
		self.filter = filter;
		self
	}

	/// Opens a snapshot of `tree`, finds the device identified by `search_key` and
	/// returns its nearest ancestor matching the pattern.
	///
	/// The snapshot is closed before this returns, whatever the outcome.
	#[instrument(
		skip(self, tree),
		fields(class = %self.filter, pattern = %self.pattern),
		err(level = "debug")
	)]
	pub fn run<T: DeviceTree>(&self, tree: &T, search_key: &str) -> Result<AncestorMatch> {
		let snapshot = tree.open(self.filter)?;
		self.run_in(&snapshot, search_key)
	}

	/// Same as [`ParentSearch::run`] on a snapshot the caller already holds.
	pub fn run_in<S: DeviceTreeSnapshot>(
		&self,
		snapshot: &S,
		search_key: &str,
	) -> Result<AncestorMatch> {
		let target = find_target(snapshot, search_key)?;

		match AncestorWalker::new(snapshot, &self.pattern).walk(target.handle) {
			WalkOutcome::Found(found) => {
				debug!(ancestor = %found.identity, depth = found.depth, "Found matching ancestor;");
				Ok(found)
			}
			WalkOutcome::Exhausted { depth } => {
				debug!(depth, "No ancestor matched;");
				Err(Error::AncestorNotFound {
					target: target.identity,
					pattern: self.pattern.as_str().to_owned(),
				})
			}
		}
	}
}

/// Finds the nearest ancestor of the disk drive `search_key` whose Device Instance ID
/// matches `pattern` in full.
///
/// The pattern is compiled before the device tree is touched, so a malformed pattern
/// is reported as [`Error::InvalidPattern`] without opening anything.
pub fn find_parent_device<T: DeviceTree>(
	tree: &T,
	search_key: &str,
	pattern: &str,
) -> Result<AncestorMatch> {
	ParentSearch::new(AncestorPattern::new(pattern)?).run(tree, search_key)
}
