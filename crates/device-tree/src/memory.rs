//! A device tree held entirely in memory.
//!
//! Used to exercise the search on hosts without a device manager, and to replay
//! device layouts captured elsewhere. It also keeps count of open snapshots and
//! parent queries so callers can check what a search actually did.

use std::{cell::Cell, io};

use uuid::Uuid;

use crate::{
	class::{ClassFilter, DISK_DRIVE_CLASS},
	error::{Error, Result},
	identity::DeviceIdentity,
	tree::{DeviceEntry, DeviceTree, DeviceTreeSnapshot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
	identity: DeviceIdentity,
	parent: Option<NodeId>,
	class: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct InMemoryDeviceTree {
	nodes: Vec<Node>,
	unavailable: bool,
	open_snapshots: Cell<usize>,
	parent_queries: Cell<usize>,
}

impl InMemoryDeviceTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a device without parent and without setup class.
	pub fn add_root(&mut self, identity: impl Into<DeviceIdentity>) -> NodeId {
		self.push(identity.into(), None, None)
	}

	pub fn add_child(&mut self, parent: NodeId, identity: impl Into<DeviceIdentity>) -> NodeId {
		self.push(identity.into(), Some(parent), None)
	}

	pub fn add_device(
		&mut self,
		parent: Option<NodeId>,
		identity: impl Into<DeviceIdentity>,
		class: Uuid,
	) -> NodeId {
		self.push(identity.into(), parent, Some(class))
	}

	/// Adds a device of the disk drive setup class under `parent`.
	pub fn add_disk(&mut self, parent: NodeId, identity: impl Into<DeviceIdentity>) -> NodeId {
		self.add_device(Some(parent), identity, DISK_DRIVE_CLASS)
	}

	fn push(
		&mut self,
		identity: DeviceIdentity,
		parent: Option<NodeId>,
		class: Option<Uuid>,
	) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(Node {
			identity,
			parent,
			class,
		});
		id
	}

	/// Makes every following [`DeviceTree::open`] fail, like a host whose device
	/// manager cannot be reached.
	pub fn set_unavailable(&mut self, unavailable: bool) {
		self.unavailable = unavailable;
	}

	pub fn identity(&self, node: NodeId) -> Option<&DeviceIdentity> {
		self.nodes.get(node.0).map(|n| &n.identity)
	}

	/// Snapshots opened and not yet dropped.
	pub fn open_snapshots(&self) -> usize {
		self.open_snapshots.get()
	}

	/// Total number of parent lookups answered so far.
	pub fn parent_queries(&self) -> usize {
		self.parent_queries.get()
	}

	pub fn snapshot(&self, filter: ClassFilter) -> MemorySnapshot<'_> {
		self.open_snapshots.set(self.open_snapshots.get() + 1);
		MemorySnapshot { tree: self, filter }
	}

	pub fn snapshot_of_disks(&self) -> MemorySnapshot<'_> {
		self.snapshot(ClassFilter::DiskDrive)
	}
}

impl DeviceTree for InMemoryDeviceTree {
	type Snapshot<'t> = MemorySnapshot<'t>;

	fn open(&self, filter: ClassFilter) -> Result<Self::Snapshot<'_>> {
		if self.unavailable {
			return Err(Error::unavailable(
				"opening in-memory device tree",
				io::Error::new(io::ErrorKind::NotConnected, "device tree marked unavailable"),
			));
		}

		Ok(self.snapshot(filter))
	}
}

#[derive(Debug)]
pub struct MemorySnapshot<'t> {
	tree: &'t InMemoryDeviceTree,
	filter: ClassFilter,
}

impl Drop for MemorySnapshot<'_> {
	fn drop(&mut self) {
		let open = &self.tree.open_snapshots;
		open.set(open.get().saturating_sub(1));
	}
}

impl DeviceTreeSnapshot for MemorySnapshot<'_> {
	type Handle = NodeId;

	type Devices<'s> = Box<dyn Iterator<Item = DeviceEntry<NodeId>> + 's>
	where
		Self: 's;

	fn devices(&self) -> Self::Devices<'_> {
		let wanted = self.filter.class_guid();

		Box::new(
			self.tree
				.nodes
				.iter()
				.enumerate()
				.filter(move |(_, node)| match wanted {
					Some(class) => node.class == Some(class),
					None => true,
				})
				.map(|(idx, node)| DeviceEntry::new(NodeId(idx), node.identity.clone())),
		)
	}

	fn parent(&self, handle: NodeId) -> Option<DeviceEntry<NodeId>> {
		let queries = &self.tree.parent_queries;
		queries.set(queries.get() + 1);

		let parent = self.tree.nodes.get(handle.0)?.parent?;
		let node = self.tree.nodes.get(parent.0)?;

		Some(DeviceEntry::new(parent, node.identity.clone()))
	}
}
