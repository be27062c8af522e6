pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod parser;
pub mod presenter;
pub mod runner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ToolConfig};
pub use error::{DllDocError, Result, UserFriendlyError};

// Core functionality re-exports
pub use library::LibraryName;
pub use parser::{parse_export_line, parse_exports, ExportList};
pub use presenter::{render_document, DocumentWriter};
pub use runner::{ToolOutput, ToolRunner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Where the export list ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Console,
    /// Markdown document; `None` means the default location.
    Document(Option<PathBuf>),
}

/// Result of one successful run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub library: LibraryName,
    pub exports: ExportList,
    pub document: Option<PathBuf>,
}

/// Main library interface for DLLDoc functionality
pub struct DllDoc {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl DllDoc {
    /// Create a new DllDoc instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create DllDoc instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;

        Ok(Self::new(
            config,
            cli_args.output_format.into(),
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Extract the exports of `dll_path` and present them.
    ///
    /// Nothing is written or printed unless the whole extraction succeeds.
    /// In console mode stdout carries only the export listing; status goes to stderr.
    pub fn run(&self, dll_path: &str, target: &OutputTarget) -> Result<RunOutcome> {
        let formatter = self
            .output_formatter
            .clone()
            .with_status_on_stderr(*target == OutputTarget::Console);
        let (library, exports) = self.extract(dll_path, &formatter)?;

        let document = match target {
            OutputTarget::Console => {
                formatter.print_exports(&library, &exports);
                None
            }
            OutputTarget::Document(explicit) => {
                let writer = DocumentWriter::new(self.config.output.directory.clone());
                let path = writer.write(&exports, &library, explicit.as_deref())?;
                formatter.print_document_written(&path, &exports);
                Some(path)
            }
        };

        Ok(RunOutcome {
            library,
            exports,
            document,
        })
    }

    /// Derive the library name, run the tool and parse its export table.
    pub fn collect_exports(&self, dll_path: &str) -> Result<(LibraryName, ExportList)> {
        self.extract(dll_path, &self.output_formatter)
    }

    fn extract(
        &self,
        dll_path: &str,
        formatter: &OutputFormatter,
    ) -> Result<(LibraryName, ExportList)> {
        let library = LibraryName::from_path(dll_path)?;
        formatter.debug(&format!("Library identifier: {}", library));

        let output = self.run_tool(dll_path)?;
        log::trace!("Raw tool output:\n{}", output.text);

        let exports = parse_exports(&output.text)?;
        formatter.info(&format!("Found {} exports in {}.dll", exports.len(), library));

        Ok((library, exports))
    }

    fn run_tool(&self, dll_path: &str) -> Result<ToolOutput> {
        let runner = ToolRunner::new()
            .with_program(self.config.tool.command.clone())
            .with_timeout(self.config.tool_timeout_duration());

        let spinner = self
            .progress_manager
            .create_spinner(&format!("Running {} on {}", runner.program(), dll_path));
        let started = std::time::Instant::now();

        let result = runner.run(dll_path);

        match result {
            Ok(ref output) => ui::progress::finish_progress_with_summary(
                &spinner,
                &format!("{} finished, {} bytes captured", runner.program(), output.bytes_read),
                started.elapsed(),
            ),
            Err(_) => spinner.finish_and_clear(),
        }

        result
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &DllDocError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extract the exports of a library with default settings, without presenting them.
pub fn extract_exports(dll_path: &str) -> Result<ExportList> {
    let dlldoc = DllDoc::new(Config::default(), OutputMode::Plain, 0, true);
    dlldoc.collect_exports(dll_path).map(|(_, exports)| exports)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
