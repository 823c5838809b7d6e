//! Access to the device tree of the machine we are running on.

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::{DeviceInfoSet, SetupApiDeviceTree as HostDeviceTree};

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
pub use self::unsupported::{NoSnapshot, UnsupportedDeviceTree as HostDeviceTree};
