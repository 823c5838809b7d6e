use tracing::debug;

use crate::{
	error::{Error, Result},
	tree::{DeviceEntry, DeviceTreeSnapshot},
};

/// Finds the device whose identity equals `search_key`, ignoring case.
///
/// This is an exact comparison, unlike the pattern used for ancestors: the target is
/// always known literally. When the snapshot lists the same identity more than once,
/// the first one in enumeration order is returned.
pub fn find_target<S: DeviceTreeSnapshot>(
	snapshot: &S,
	search_key: &str,
) -> Result<DeviceEntry<S::Handle>> {
	let mut inspected = 0;

	for entry in snapshot.devices() {
		inspected += 1;

		if entry.identity.matches_key(search_key) {
			debug!(
				handle = ?entry.handle,
				identity = %entry.identity,
				inspected,
				"Found target device;",
			);
			return Ok(entry);
		}
	}

	debug!(inspected, search_key, "Target device not enumerated;");

	Err(Error::TargetNotFound {
		search_key: search_key.to_string(),
		inspected,
	})
}
