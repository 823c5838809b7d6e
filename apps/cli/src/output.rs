use std::io::Write;

use anyhow::Result;
use gpd_device_tree::AncestorMatch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	/// Just the ancestor's Device Instance ID
	#[default]
	Human,
	Json,
}

#[derive(Serialize)]
struct Report<'a> {
	target: &'a str,
	ancestor: &'a str,
	depth: usize,
}

pub fn write_match(
	out: &mut impl Write,
	format: OutputFormat,
	target: &str,
	found: &AncestorMatch,
) -> Result<()> {
	match format {
		OutputFormat::Human => writeln!(out, "{}", found.identity)?,
		OutputFormat::Json => {
			let report = Report {
				target,
				ancestor: found.identity.as_str(),
				depth: found.depth,
			};
			writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
		}
	}

	Ok(())
}
