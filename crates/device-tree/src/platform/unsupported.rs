use std::{io, iter};

use crate::{
	class::ClassFilter,
	error::{Error, Result},
	tree::{DeviceEntry, DeviceTree, DeviceTreeSnapshot},
};

/// Stand-in for hosts without a SetupAPI device manager; it never opens.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDeviceTree;

impl UnsupportedDeviceTree {
	pub fn new() -> Self {
		Self
	}
}

impl DeviceTree for UnsupportedDeviceTree {
	type Snapshot<'t> = NoSnapshot;

	fn open(&self, _filter: ClassFilter) -> Result<Self::Snapshot<'_>> {
		Err(Error::unavailable(
			"opening host device tree",
			io::Error::new(
				io::ErrorKind::Unsupported,
				"device tree queries are only available on Windows",
			),
		))
	}
}

/// A snapshot that can not exist.
#[derive(Debug)]
pub enum NoSnapshot {}

impl DeviceTreeSnapshot for NoSnapshot {
	type Handle = ();

	type Devices<'s> = iter::Empty<DeviceEntry<()>>;

	fn devices(&self) -> Self::Devices<'_> {
		match *self {}
	}

	fn parent(&self, _handle: ()) -> Option<DeviceEntry<()>> {
		match *self {}
	}
}
