use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::{
	error::{Error, Result},
	identity::DeviceIdentity,
};

/// Regular expression describing the Device Instance ID of a wanted ancestor.
///
/// Matching is always against the whole identity, never a substring of it: `ROOT_HUB`
/// does not match `USB\ROOT_HUB30\4&1`, `.*ROOT_HUB.*` does.
///
/// The syntax is that of the `regex` crate, which has no look-around and no
/// backreferences. Such patterns are rejected as [`Error::InvalidPattern`].
#[derive(Clone)]
pub struct AncestorPattern {
	source: String,
	anchored: Regex,
}

impl AncestorPattern {
	pub fn new(pattern: impl Into<String>) -> Result<Self> {
		Self::build(pattern.into(), false)
	}

	/// Same as [`AncestorPattern::new`], but letters match regardless of case.
	pub fn case_insensitive(pattern: impl Into<String>) -> Result<Self> {
		Self::build(pattern.into(), true)
	}

	fn build(source: String, ignore_case: bool) -> Result<Self> {
		// Validated on its own first: an unbalanced `)` could otherwise close the
		// wrapping group and leave part of the pattern outside the anchors
		if let Err(e) = Regex::new(&source) {
			return Err(Error::InvalidPattern {
				pattern: source,
				source: e,
			});
		}

		let built = RegexBuilder::new(&format!(r"\A(?:{source})\z"))
			.case_insensitive(ignore_case)
			.build();

		match built {
			Ok(anchored) => Ok(Self { source, anchored }),
			Err(e) => Err(Error::InvalidPattern {
				pattern: source,
				source: e,
			}),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.source
	}

	pub fn is_match(&self, identity: &DeviceIdentity) -> bool {
		self.anchored.is_match(identity.as_str())
	}
}

impl fmt::Debug for AncestorPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("AncestorPattern").field(&self.source).finish()
	}
}

impl fmt::Display for AncestorPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn id(s: &str) -> DeviceIdentity {
		DeviceIdentity::from(s)
	}

	#[test]
	fn matches_whole_identity_only() {
		let pattern = AncestorPattern::new("ROOT_HUB").unwrap();
		assert!(!pattern.is_match(&id(r"USB\ROOT_HUB30\4&1")));

		let pattern = AncestorPattern::new(r".*\\ROOT_HUB.*").unwrap();
		assert!(pattern.is_match(&id(r"USB\ROOT_HUB30\4&1")));
		assert!(!pattern.is_match(&id(r"USB\VID_05E3&PID_0727\000000000207")));
	}

	#[test]
	fn alternation_stays_anchored() {
		let pattern = AncestorPattern::new("USB|PCI").unwrap();
		assert!(pattern.is_match(&id("PCI")));
		assert!(!pattern.is_match(&id(r"USB\VID_05E3")));
		assert!(!pattern.is_match(&id(r"ACPI\PCI")));
	}

	#[test]
	fn case_sensitivity_is_opt_out() {
		let identity = id(r"usb\vid_05e3&pid_0727\1");

		let strict = AncestorPattern::new(r"USB\\VID_.*").unwrap();
		assert!(!strict.is_match(&identity));

		let relaxed = AncestorPattern::case_insensitive(r"USB\\VID_.*").unwrap();
		assert!(relaxed.is_match(&identity));
	}

	#[test]
	fn captures_in_pattern_are_allowed() {
		let pattern = AncestorPattern::new(r"USB\\VID_(\w+)&PID_(\w+)\\(\w+)").unwrap();
		assert!(pattern.is_match(&id(r"USB\VID_05E3&PID_0727\000000000207")));
	}

	#[test]
	fn malformed_pattern_is_rejected() {
		let err = AncestorPattern::new(r"USB\\(VID").unwrap_err();
		assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == r"USB\\(VID"));
	}

	#[test]
	fn unbalanced_group_cannot_escape_anchors() {
		for source in [r"X)|(VID_", r"NOPE)|(ROOT_HUB30\\4&1"] {
			let err = AncestorPattern::new(source).unwrap_err();
			assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == source));
		}
	}

	#[test]
	fn look_around_is_rejected_but_has_a_plain_equivalent() {
		// Serial numbers of whole USB devices carry neither `&` nor `_`
		let with_lookahead = r"USB\\VID_(\w+)&PID_(\w+)\\(?!.*[&_].*)(\w+)";
		assert!(matches!(
			AncestorPattern::new(with_lookahead),
			Err(Error::InvalidPattern { .. })
		));

		let plain = AncestorPattern::new(r"USB\\VID_(\w+)&PID_(\w+)\\([[:alnum:]]+)").unwrap();
		assert_eq!(plain.as_str(), r"USB\\VID_(\w+)&PID_(\w+)\\([[:alnum:]]+)");
		assert!(plain.is_match(&id(r"USB\VID_04E8&PID_6860\RF8M33XYZ")));
		assert!(!plain.is_match(&id(r"USB\VID_04E8&PID_6860&MI_00\7&1A2B3C4D&0&0000")));
	}
}
