use std::process::ExitCode;

use gpd_device_tree::Error;

/// Process exit statuses, kept compatible with the original C tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
	Success = 0,
	BadArguments = 1,
	NoDevicesFound = 2,
	NoDeviceInfo = 3,
}

impl ExitStatus {
	pub fn of(error: &anyhow::Error) -> Self {
		match error.downcast_ref::<Error>() {
			Some(Error::InvalidPattern { .. }) => Self::BadArguments,
			Some(Error::ComponentUnavailable { .. } | Error::TargetNotFound { .. }) => {
				Self::NoDevicesFound
			}
			Some(Error::AncestorNotFound { .. }) => Self::NoDeviceInfo,
			// Anything else went wrong in our own glue, mostly config loading
			None => Self::BadArguments,
		}
	}
}

impl From<ExitStatus> for ExitCode {
	fn from(status: ExitStatus) -> Self {
		Self::from(status as u8)
	}
}
