//! Seams between the search algorithm and whatever answers device-tree queries.
//!
//! A [`DeviceTree`] opens [`DeviceTreeSnapshot`]s. A snapshot hands out
//! [`DeviceTreeSnapshot::Handle`]s that are only meaningful while it stays open, which
//! is why everything that walks the tree borrows the snapshot instead of owning handles
//! on their own. Closing the snapshot is the job of its `Drop` impl.

use std::fmt::Debug;

use crate::{class::ClassFilter, error::Result, identity::DeviceIdentity};

/// A device as seen through one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry<H> {
	pub handle: H,
	pub identity: DeviceIdentity,
}

impl<H> DeviceEntry<H> {
	pub fn new(handle: H, identity: impl Into<DeviceIdentity>) -> Self {
		Self {
			handle,
			identity: identity.into(),
		}
	}
}

pub trait DeviceTree {
	type Snapshot<'t>: DeviceTreeSnapshot
	where
		Self: 't;

	/// Opens a read-only view of the present devices matching `filter`.
	fn open(&self, filter: ClassFilter) -> Result<Self::Snapshot<'_>>;
}

pub trait DeviceTreeSnapshot {
	type Handle: Copy + Debug;

	type Devices<'s>: Iterator<Item = DeviceEntry<Self::Handle>>
	where
		Self: 's;

	/// All devices of the snapshot's class filter, in host order. The iterator is lazy
	/// and can only be consumed once.
	fn devices(&self) -> Self::Devices<'_>;

	/// Immediate parent of `handle`, or `None` when `handle` is a tree root.
	fn parent(&self, handle: Self::Handle) -> Option<DeviceEntry<Self::Handle>>;
}
