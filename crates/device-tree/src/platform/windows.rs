//! SetupAPI / Configuration Manager backend.
//!
//! `SetupDiGetClassDevsW` gives us the device information set for a class, which is
//! the only place the inventory services expose `DEVINST` handles. Parent relations
//! are not part of that set: they come from `CM_Get_Parent`, which works on any
//! `DEVINST` while the set that produced it is alive.

use std::{ffi::OsString, io, mem, os::windows::ffi::OsStringExt, ptr};

use tracing::{debug, warn};
use windows_sys::{
	core::GUID,
	Win32::{
		Devices::DeviceAndDriverInstallation::{
			CM_Get_Device_IDW, CM_Get_Parent, SetupDiDestroyDeviceInfoList,
			SetupDiEnumDeviceInfo, SetupDiGetClassDevsW, SetupDiGetDeviceInstanceIdW,
			CR_NO_SUCH_DEVNODE, CR_SUCCESS, DIGCF_ALLCLASSES, DIGCF_PRESENT, HDEVINFO,
			SP_DEVINFO_DATA,
		},
		Foundation::{ERROR_NO_MORE_ITEMS, INVALID_HANDLE_VALUE},
	},
};

use crate::{
	class::ClassFilter,
	error::{Error, Result},
	identity::DeviceIdentity,
	tree::{DeviceEntry, DeviceTree, DeviceTreeSnapshot},
};

/// Device Instance IDs are at most 200 characters, terminator included.
const MAX_DEVICE_ID_LEN: usize = 200;

#[derive(Debug, Default, Clone, Copy)]
pub struct SetupApiDeviceTree;

impl SetupApiDeviceTree {
	pub fn new() -> Self {
		Self
	}
}

impl DeviceTree for SetupApiDeviceTree {
	type Snapshot<'t> = DeviceInfoSet;

	fn open(&self, filter: ClassFilter) -> Result<Self::Snapshot<'_>> {
		let class_guid = filter.class_guid().map(|uuid| GUID::from_u128(uuid.as_u128()));

		let (guid_ptr, flags) = match &class_guid {
			Some(guid) => (ptr::addr_of!(*guid), DIGCF_PRESENT),
			None => (ptr::null(), DIGCF_PRESENT | DIGCF_ALLCLASSES),
		};

		// SAFETY: `guid_ptr` is null or points at `class_guid`, which outlives the call
		let handle = unsafe { SetupDiGetClassDevsW(guid_ptr, ptr::null(), 0, flags) };

		if handle == INVALID_HANDLE_VALUE {
			return Err(Error::unavailable(
				"SetupDiGetClassDevsW",
				io::Error::last_os_error(),
			));
		}

		debug!(%filter, "Opened device information set;");

		Ok(DeviceInfoSet { handle, filter })
	}
}

/// An open device information set. Destroyed on drop.
#[derive(Debug)]
pub struct DeviceInfoSet {
	handle: HDEVINFO,
	filter: ClassFilter,
}

impl DeviceInfoSet {
	fn instance_id(&self, info: &SP_DEVINFO_DATA) -> io::Result<DeviceIdentity> {
		let mut buf = [0u16; MAX_DEVICE_ID_LEN];
		let mut required = 0u32;

		// SAFETY: `buf` is writable for the length we pass in
		let ok = unsafe {
			SetupDiGetDeviceInstanceIdW(
				self.handle,
				info,
				buf.as_mut_ptr(),
				buf.len() as u32,
				&mut required,
			)
		};

		if ok == 0 {
			return Err(io::Error::last_os_error());
		}

		Ok(from_wide_nul(&buf))
	}
}

impl Drop for DeviceInfoSet {
	fn drop(&mut self) {
		// SAFETY: the handle came from `SetupDiGetClassDevsW` and is destroyed only here
		if unsafe { SetupDiDestroyDeviceInfoList(self.handle) } == 0 {
			warn!(
				error = %io::Error::last_os_error(),
				"Failed to destroy device information set;",
			);
		} else {
			debug!(filter = %self.filter, "Closed device information set;");
		}
	}
}

impl DeviceTreeSnapshot for DeviceInfoSet {
	type Handle = u32;

	type Devices<'s> = DeviceInfoIter<'s>;

	fn devices(&self) -> Self::Devices<'_> {
		DeviceInfoIter {
			set: self,
			index: 0,
			done: false,
		}
	}

	fn parent(&self, handle: u32) -> Option<DeviceEntry<u32>> {
		let mut parent = 0u32;

		// SAFETY: plain out-parameter
		match unsafe { CM_Get_Parent(&mut parent, handle, 0) } {
			CR_SUCCESS => {}
			CR_NO_SUCH_DEVNODE => return None,
			code => {
				debug!(handle, code, "CM_Get_Parent failed, treating as tree root;");
				return None;
			}
		}

		let mut buf = [0u16; MAX_DEVICE_ID_LEN];

		// SAFETY: `buf` is writable for the length we pass in
		let code = unsafe { CM_Get_Device_IDW(parent, buf.as_mut_ptr(), buf.len() as u32, 0) };
		if code != CR_SUCCESS {
			debug!(parent, code, "CM_Get_Device_IDW failed, treating as tree root;");
			return None;
		}

		Some(DeviceEntry::new(parent, from_wide_nul(&buf)))
	}
}

/// Walks the members of a [`DeviceInfoSet`] by index until the set runs out.
pub struct DeviceInfoIter<'s> {
	set: &'s DeviceInfoSet,
	index: u32,
	done: bool,
}

impl Iterator for DeviceInfoIter<'_> {
	type Item = DeviceEntry<u32>;

	fn next(&mut self) -> Option<Self::Item> {
		while !self.done {
			let mut info = SP_DEVINFO_DATA {
				cbSize: mem::size_of::<SP_DEVINFO_DATA>() as u32,
				ClassGuid: GUID::from_u128(0),
				DevInst: 0,
				Reserved: 0,
			};

			// SAFETY: `info.cbSize` is initialized as the API requires
			if unsafe { SetupDiEnumDeviceInfo(self.set.handle, self.index, &mut info) } == 0 {
				let error = io::Error::last_os_error();
				if error.raw_os_error() != Some(ERROR_NO_MORE_ITEMS as i32) {
					warn!(index = self.index, %error, "Device enumeration stopped early;");
				}
				self.done = true;
				break;
			}

			let index = self.index;
			self.index += 1;

			match self.set.instance_id(&info) {
				Ok(identity) => return Some(DeviceEntry::new(info.DevInst, identity)),
				Err(error) => {
					warn!(index, %error, "Skipping device with unreadable instance id;");
				}
			}
		}

		None
	}
}

fn from_wide_nul(buf: &[u16]) -> DeviceIdentity {
	let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());

	OsString::from_wide(&buf[..len])
		.to_string_lossy()
		.into_owned()
		.into()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wide_strings_stop_at_terminator() {
		let mut buf = [0u16; 16];
		for (slot, c) in buf.iter_mut().zip(r"PCI\VEN_8086".encode_utf16()) {
			*slot = c;
		}

		assert_eq!(from_wide_nul(&buf).as_str(), r"PCI\VEN_8086");
	}

	#[test]
	#[ignore = "needs a Windows host with at least one disk drive"]
	fn every_disk_has_an_identity() {
		let set = SetupApiDeviceTree::new().open(ClassFilter::DiskDrive).unwrap();
		let disks = set.devices().collect::<Vec<_>>();

		assert!(!disks.is_empty());
		assert!(disks.iter().all(|d| !d.identity.as_str().is_empty()));
	}

	#[test]
	#[ignore = "needs a Windows host with at least one disk drive"]
	fn disks_have_parents() {
		let set = SetupApiDeviceTree::new().open(ClassFilter::DiskDrive).unwrap();
		let disk = set.devices().next().unwrap();

		assert!(set.parent(disk.handle).is_some());
	}
}
