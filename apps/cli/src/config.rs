//! CLI configuration: an optional JSON file, overridden by command line flags

use anyhow::{Context as _, Result};
use gpd_device_tree::ClassFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::output::OutputFormat;

/// Settings a config file may provide. Every field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
	/// Device class the target device is looked up in
	pub class: ClassFilter,
	/// Match the ancestor pattern regardless of case
	pub ignore_case: bool,
	/// How the found ancestor is printed
	pub format: OutputFormat,
}

impl CliConfig {
	/// Load the config file at `path`. The file is never created or written back.
	pub fn load(path: &Path) -> Result<Self> {
		let json = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read config file '{}'", path.display()))?;

		serde_json::from_str(&json)
			.with_context(|| format!("invalid config file '{}'", path.display()))
	}

	/// Apply command line overrides on top of the file values.
	pub fn merge(
		mut self,
		class: Option<ClassFilter>,
		ignore_case: bool,
		format: Option<OutputFormat>,
	) -> Self {
		if let Some(class) = class {
			self.class = class;
		}
		// A flag can only switch it on
		self.ignore_case |= ignore_case;
		if let Some(format) = format {
			self.format = format;
		}
		self
	}
}
