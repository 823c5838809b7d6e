use std::{
	io::{self, Write},
	path::PathBuf,
	process::ExitCode,
};

use anyhow::Result;
use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use gpd_device_tree::{AncestorPattern, ClassFilter, DeviceTree, HostDeviceTree, ParentSearch};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod exit;
mod output;

use config::CliConfig;
use exit::ExitStatus;
use output::{write_match, OutputFormat};

const EXAMPLES: &str = r#"Examples:

Example 1. Get immediate parent:

	get-parent-device "USBSTOR\DISK&VEN_GENERIC&PROD_STORAGE_DEVICE&REV_0207\000000000207&0" ".*"

In this case the ".*" will cause first found parent to be returned.

Example 2. Get usb hub the device is connected to:

	get-parent-device "USBSTOR\DISK&VEN_GENERIC&PROD_STORAGE_DEVICE&REV_0207\000000000207&0" ".*\\ROOT_HUB.*"

The program will search "up" the device tree until it finds a parent with a matching Device Instance ID.
PATTERN must match the whole ID. Look-around and backreferences are not supported.

Exit codes: 0 found, 1 bad arguments, 2 no devices found, 3 no device info."#;

#[derive(Parser, Debug)]
#[command(
	name = "get-parent-device",
	version,
	about = "Finds the Device Instance ID of a device's parent",
	after_help = EXAMPLES
)]
struct Cli {
	/// Device Instance ID of the Device whose parent is to be found
	#[arg(value_name = "DII")]
	device_instance_id: String,

	/// Regular expression to match Parent's Device Instance ID
	#[arg(value_name = "PATTERN")]
	pattern: String,

	/// Device class the device is looked up in: `disk`, `all` or a setup class GUID
	#[arg(long, env = "GPD_CLASS")]
	class: Option<ClassFilter>,

	/// Match PATTERN regardless of case
	#[arg(long, default_value_t = false)]
	ignore_case: bool,

	/// Output format
	#[arg(long, value_enum)]
	format: Option<OutputFormat>,

	/// JSON config file providing defaults for the options above
	#[arg(long, env = "GPD_CONFIG")]
	config: Option<PathBuf>,

	/// Log more details to stderr, repeat for more
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	fn settings(&self) -> Result<CliConfig> {
		let file = match &self.config {
			Some(path) => CliConfig::load(path)?,
			None => CliConfig::default(),
		};

		Ok(file.merge(self.class, self.ignore_case, self.format))
	}
}

fn init_tracing(verbose: u8) {
	let default_filter = match verbose {
		0 => "warn",
		1 => "info,gpd_device_tree=debug",
		_ => "trace",
	};

	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
		)
		.with(fmt::layer().with_writer(io::stderr))
		.init();
}

/// Renders a parse error. A wrong number of arguments also gets the full usage text.
fn parse_error_message(e: &clap::Error) -> String {
	match e.kind() {
		ErrorKind::MissingRequiredArgument
		| ErrorKind::UnknownArgument
		| ErrorKind::TooManyValues
		| ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
			format!("{}\n{}", e.render(), Cli::command().render_long_help())
		}
		_ => e.render().to_string(),
	}
}

fn run<T: DeviceTree>(cli: &Cli, tree: &T, out: &mut impl Write) -> Result<()> {
	let settings = cli.settings()?;
	debug!(?settings, "Resolved settings;");

	let pattern = if settings.ignore_case {
		AncestorPattern::case_insensitive(cli.pattern.as_str())?
	} else {
		AncestorPattern::new(cli.pattern.as_str())?
	};

	let found = ParentSearch::new(pattern)
		.with_class(settings.class)
		.run(tree, &cli.device_instance_id)?;

	write_match(out, settings.format, &cli.device_instance_id, &found)
}

fn main() -> ExitCode {
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) => {
			// --help and --version also end up here
			if !e.use_stderr() {
				let _ = e.print();
				return ExitStatus::Success.into();
			}

			eprint!("{}", parse_error_message(&e));
			return ExitStatus::BadArguments.into();
		}
	};

	init_tracing(cli.verbose);

	match run(&cli, &HostDeviceTree::new(), &mut io::stdout().lock()) {
		Ok(()) => ExitStatus::Success.into(),
		Err(e) => {
			let status = ExitStatus::of(&e);
			debug!(?status, "Exiting;");
			eprintln!("Error: {e:#}");
			status.into()
		}
	}
}
