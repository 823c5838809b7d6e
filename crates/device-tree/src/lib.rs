//! Finds the parent of a device in the host's device tree.
//!
//! Inventory services such as WMI report devices like
//! `USBSTOR\DISK&VEN_GENERIC&PROD_STORAGE_DEVICE&REV_0207\000000000207&0`, but not
//! which device they hang off. That relation is only known to the device tree, so this
//! crate enumerates a device class, picks the device with the given instance id and
//! ascends its parents until one's instance id matches a regular expression, e.g.
//! `USB\\VID_.*` for the USB device carrying vendor, product and serial number.
//!
//! ```
//! use gpd_device_tree::{find_parent_device, InMemoryDeviceTree};
//!
//! let mut tree = InMemoryDeviceTree::new();
//! let hub = tree.add_root(r"USB\ROOT_HUB30\4&2F4A5B6C&0&0");
//! let usb = tree.add_child(hub, r"USB\VID_05E3&PID_0727\000000000207");
//! tree.add_disk(usb, r"USBSTOR\DISK&VEN_GENERIC\000000000207&0");
//!
//! let found = find_parent_device(&tree, r"USBSTOR\DISK&VEN_GENERIC\000000000207&0", ".*")?;
//! assert_eq!(found.identity.as_str(), r"USB\VID_05E3&PID_0727\000000000207");
//! assert_eq!(found.depth, 1);
//! # Ok::<(), gpd_device_tree::Error>(())
//! ```
#![warn(
	clippy::all,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::unwrap_used,
	clippy::expect_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	unused_allocation,
	clippy::dbg_macro,
	deprecated
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod class;
pub mod enumerator;
pub mod error;
pub mod identity;
pub mod memory;
pub mod pattern;
pub mod platform;
pub mod search;
pub mod tree;
pub mod walker;

pub use class::{ClassFilter, DISK_DRIVE_CLASS};
pub use error::{Error, Result};
pub use identity::DeviceIdentity;
pub use memory::InMemoryDeviceTree;
pub use pattern::AncestorPattern;
pub use platform::HostDeviceTree;
pub use search::{find_parent_device, ParentSearch};
pub use tree::{DeviceEntry, DeviceTree, DeviceTreeSnapshot};
pub use walker::{AncestorMatch, AncestorWalker, Ancestors, WalkOutcome};
