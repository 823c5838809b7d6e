use std::io;

use thiserror::Error;

use crate::identity::DeviceIdentity;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	/// The host device-tree service could not be reached, usually because the
	/// device information set could not be opened.
	#[error("device tree is unavailable ({context}): {source}")]
	ComponentUnavailable {
		context: &'static str,
		#[source]
		source: io::Error,
	},
	#[error("no device with instance id '{search_key}' among {inspected} enumerated devices")]
	TargetNotFound { search_key: String, inspected: usize },
	#[error("invalid ancestor pattern '{pattern}'")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},
	#[error("no ancestor of '{target}' matches '{pattern}'")]
	AncestorNotFound {
		target: DeviceIdentity,
		pattern: String,
	},
}

impl Error {
	pub(crate) fn unavailable(context: &'static str, source: io::Error) -> Self {
		Self::ComponentUnavailable { context, source }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_inputs() {
		let err = Error::TargetNotFound {
			search_key: r"USBSTOR\DISK\0".to_string(),
			inspected: 3,
		};
		assert_eq!(
			err.to_string(),
			r"no device with instance id 'USBSTOR\DISK\0' among 3 enumerated devices"
		);

		let err = Error::AncestorNotFound {
			target: DeviceIdentity::from(r"USBSTOR\DISK\0"),
			pattern: ".*ROOT_HUB.*".to_string(),
		};
		assert_eq!(
			err.to_string(),
			r"no ancestor of 'USBSTOR\DISK\0' matches '.*ROOT_HUB.*'"
		);
	}

	#[test]
	fn unavailable_keeps_os_error_as_source() {
		use std::error::Error as _;

		let err = Error::unavailable("opening device information set", io::Error::other("boom"));
		assert!(err.to_string().starts_with("device tree is unavailable"));
		assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("boom"));
	}
}
