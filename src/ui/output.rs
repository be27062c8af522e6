use crate::error::{DllDocError, UserFriendlyError};
use crate::library::LibraryName;
use crate::parser::ExportList;
use console::{style, Emoji, Term};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl From<crate::cli::OutputFormat> for OutputMode {
    fn from(format: crate::cli::OutputFormat) -> Self {
        match format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");

#[derive(Debug, Clone)]
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
    status_on_stderr: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
            status_on_stderr: false,
        }
    }

    /// Route status messages to stderr, leaving stdout to the export listing.
    pub fn with_status_on_stderr(mut self, on_stderr: bool) -> Self {
        self.status_on_stderr = on_stderr;
        self
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => self.print_status(&format!("SUCCESS: {}", message)),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => self.print_status(&format!("INFO: {}", message)),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        self.print_status(&format!("  {}", style(message).dim()));
                    } else {
                        self.print_status(&format!("  DEBUG: {}", message));
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => self.print_status(&format!("DEBUG: {}", message)),
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &DllDocError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    eprintln!(
                        "{}",
                        serde_json::json!({
                            "type": "suggestion",
                            "message": suggestion
                        })
                    );
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Console presentation of the export list.
    pub fn print_exports(&self, library: &LibraryName, exports: &ExportList) {
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("Found exports:").green());
                    for symbol in exports {
                        println!("{}", style(format!(" -> {}", symbol)).magenta());
                    }
                } else {
                    print!("{}", format_export_listing(exports));
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "library": library.as_str(),
                    "exports": exports,
                }));
            }
            OutputMode::Plain => print!("{}", format_export_listing(exports)),
        }
    }

    pub fn print_document_written(&self, path: &Path, exports: &ExportList) {
        match self.mode {
            OutputMode::Json => {
                if !self.quiet {
                    self.print_json_object(&serde_json::json!({
                        "type": "document",
                        "path": path.display().to_string(),
                        "exports": exports.len(),
                        "timestamp": chrono::Utc::now().to_rfc3339()
                    }));
                }
            }
            _ => self.success(&format!(
                "Wrote {} exports to {}",
                exports.len(),
                path.display()
            )),
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        let line = if self.use_colors {
            format!("{}{}", emoji, color_fn(message))
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Info => "i",
            };
            format!("{} {}", prefix, message)
        };

        match msg_type {
            MessageType::Error => eprintln!("{}", line),
            _ => self.print_status(&line),
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        let object = serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if level == "error" || self.status_on_stderr {
            eprintln!("{}", object);
        } else {
            self.print_json_object(&object);
        }
    }

    fn print_status(&self, line: &str) {
        if self.status_on_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Info,
}

/// Uncolored console listing, one ` -> name` line per export.
pub fn format_export_listing(exports: &ExportList) -> String {
    let mut listing = String::from("Found exports:\n");
    for symbol in exports {
        listing.push_str(" -> ");
        listing.push_str(symbol);
        listing.push('\n');
    }
    listing
}
