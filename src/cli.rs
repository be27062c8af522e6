use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dlldoc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Document the export table of a Windows DLL")]
#[command(
    long_about = "DLLDoc runs `dumpbin /EXPORTS` on a library, extracts the exported \
                  symbols and writes them to a markdown table or prints them to the console."
)]
#[command(after_help = "EXAMPLES:\n  \
    dlldoc C:\\libs\\sample.dll\n  \
    dlldoc C:\\libs\\sample.dll --console\n  \
    dlldoc build\\engine.dll --output docs\\engine.md\n  \
    dlldoc sample.dll --tool \"C:\\VS\\bin\\Hostx64\\x64\\dumpbin.exe\"")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to the dll to document
    #[arg(required_unless_present = "generate_config")]
    pub dll_path: Option<String>,

    /// Output file (defaults to out/<name>_exports.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the exports to the console instead of writing a file
    #[arg(short, long)]
    pub console: bool,

    /// Configuration file path
    #[arg(long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Inspection tool to run
    #[arg(long, env = "DLLDOC_TOOL", help = "dumpbin executable (default: dumpbin from PATH)")]
    pub tool: Option<String>,

    /// Tool timeout in seconds
    #[arg(long, help = "Seconds to wait for dumpbin to exit")]
    pub timeout: Option<u64>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_tool(self.tool.clone())
            .with_timeout(self.timeout)
    }

    /// Log filter for env_logger, unless RUST_LOG overrides it.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }

        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
