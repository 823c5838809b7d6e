use std::{
	fmt,
	hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// A Device Instance ID, e.g. `USB\VID_05E3&PID_0727\000000000207`.
///
/// The token is opaque: it is only ever compared, never parsed. Comparison and
/// hashing ignore case, since the host reports the same instance with varying case
/// depending on which API is asked. The original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentity(Box<str>);

impl DeviceIdentity {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Case-insensitive equality against a raw string.
	pub fn matches_key(&self, key: &str) -> bool {
		eq_ignore_case(&self.0, key)
	}
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
	if a.is_ascii() && b.is_ascii() {
		return a.eq_ignore_ascii_case(b);
	}

	a.chars()
		.flat_map(char::to_lowercase)
		.eq(b.chars().flat_map(char::to_lowercase))
}

impl PartialEq for DeviceIdentity {
	fn eq(&self, other: &Self) -> bool {
		eq_ignore_case(&self.0, &other.0)
	}
}

impl Eq for DeviceIdentity {}

impl PartialEq<str> for DeviceIdentity {
	fn eq(&self, other: &str) -> bool {
		self.matches_key(other)
	}
}

impl PartialEq<&str> for DeviceIdentity {
	fn eq(&self, other: &&str) -> bool {
		self.matches_key(other)
	}
}

impl Hash for DeviceIdentity {
	fn hash<H: Hasher>(&self, state: &mut H) {
		for c in self.0.chars().flat_map(char::to_lowercase) {
			c.hash(state);
		}
	}
}

impl fmt::Display for DeviceIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for DeviceIdentity {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<String> for DeviceIdentity {
	fn from(id: String) -> Self {
		Self(id.into_boxed_str())
	}
}

impl From<&str> for DeviceIdentity {
	fn from(id: &str) -> Self {
		Self(id.into())
	}
}

impl From<DeviceIdentity> for String {
	fn from(id: DeviceIdentity) -> Self {
		id.0.into_string()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn equality_ignores_case() {
		let upper = DeviceIdentity::from(r"USB\VID_05E3&PID_0727\000000000207");
		let lower = DeviceIdentity::from(r"usb\vid_05e3&pid_0727\000000000207");

		assert_eq!(upper, lower);
		assert!(upper.matches_key(r"Usb\Vid_05e3&Pid_0727\000000000207"));
		assert!(!upper.matches_key(r"USB\VID_05E3&PID_0727\000000000208"));
		assert_eq!(upper.to_string(), r"USB\VID_05E3&PID_0727\000000000207");
	}

	#[test]
	fn equality_ignores_case_outside_ascii() {
		let id = DeviceIdentity::from(r"SWD\ÄÖÜ\1");
		assert!(id.matches_key(r"swd\äöü\1"));
	}

	#[test]
	fn hash_agrees_with_eq() {
		let mut seen = HashSet::new();
		seen.insert(DeviceIdentity::from(r"PCI\VEN_8086"));
		assert!(!seen.insert(DeviceIdentity::from(r"pci\ven_8086")));
	}

	#[test]
	fn serializes_as_plain_string() {
		let id = DeviceIdentity::from(r"USB\ROOT_HUB30\4&1");
		assert_eq!(
			serde_json::to_string(&id).unwrap(),
			r#""USB\\ROOT_HUB30\\4&1""#
		);
	}
}
