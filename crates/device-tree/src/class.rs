use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::{uuid, Uuid};

/// Setup class of disk drives, `GUID_DEVCLASS_DISKDRIVE`.
pub const DISK_DRIVE_CLASS: Uuid = uuid!("4d36e967-e325-11ce-bfc1-08002be10318");

/// Restricts which devices are enumerated when looking for the target device.
///
/// Only the target lookup is filtered; ancestors may belong to any class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClassFilter {
	/// Disk drives, which is where USB mass storage devices (`USBSTOR\...`) live.
	#[default]
	DiskDrive,
	/// Any other device setup class.
	Setup(Uuid),
	/// Every present device, whatever its class.
	AllClasses,
}

impl ClassFilter {
	/// Setup class GUID to filter on, `None` when every class is wanted.
	pub fn class_guid(&self) -> Option<Uuid> {
		match self {
			Self::DiskDrive => Some(DISK_DRIVE_CLASS),
			Self::Setup(guid) => Some(*guid),
			Self::AllClasses => None,
		}
	}
}

#[derive(Error, Debug)]
#[error("unknown device class '{0}', expected 'disk', 'all' or a setup class GUID")]
pub struct UnknownClassError(String);

impl FromStr for ClassFilter {
	type Err = UnknownClassError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"disk" | "diskdrive" => Ok(Self::DiskDrive),
			"all" => Ok(Self::AllClasses),
			other => {
				let guid = Uuid::parse_str(other.trim_matches(|c| c == '{' || c == '}'))
					.map_err(|_| UnknownClassError(s.to_string()))?;

				if guid == DISK_DRIVE_CLASS {
					Ok(Self::DiskDrive)
				} else {
					Ok(Self::Setup(guid))
				}
			}
		}
	}
}

impl TryFrom<String> for ClassFilter {
	type Error = UnknownClassError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		s.parse()
	}
}

impl From<ClassFilter> for String {
	fn from(filter: ClassFilter) -> Self {
		filter.to_string()
	}
}

impl fmt::Display for ClassFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DiskDrive => f.write_str("disk"),
			Self::AllClasses => f.write_str("all"),
			Self::Setup(guid) => write!(f, "{{{}}}", guid.hyphenated()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_keywords_and_guids() {
		assert_eq!("disk".parse::<ClassFilter>().unwrap(), ClassFilter::DiskDrive);
		assert_eq!("ALL".parse::<ClassFilter>().unwrap(), ClassFilter::AllClasses);
		assert_eq!(
			"{4D36E967-E325-11CE-BFC1-08002BE10318}"
				.parse::<ClassFilter>()
				.unwrap(),
			ClassFilter::DiskDrive
		);

		let usb = uuid!("36fc9e60-c465-11cf-8056-444553540000");
		assert_eq!(
			"36fc9e60-c465-11cf-8056-444553540000"
				.parse::<ClassFilter>()
				.unwrap(),
			ClassFilter::Setup(usb)
		);
		assert_eq!(ClassFilter::Setup(usb).class_guid(), Some(usb));
		assert_eq!(ClassFilter::AllClasses.class_guid(), None);
	}

	#[test]
	fn rejects_garbage() {
		assert!("floppy".parse::<ClassFilter>().is_err());
	}

	#[test]
	fn display_parses_back() {
		for filter in [
			ClassFilter::DiskDrive,
			ClassFilter::AllClasses,
			ClassFilter::Setup(uuid!("36fc9e60-c465-11cf-8056-444553540000")),
		] {
			assert_eq!(filter.to_string().parse::<ClassFilter>().unwrap(), filter);
		}
	}
}
