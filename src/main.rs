use clap::error::ErrorKind;
use clap::Parser;
use dlldoc::{Cli, DllDoc, DllDocError, OutputFormatter, OutputMode, OutputTarget, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
        }
    };

    setup_logging(&cli);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let Some(dll_path) = cli.dll_path.as_deref() else {
        eprintln!("error: the path of the dll to document is required");
        return 1;
    };

    let dlldoc = match DllDoc::from_cli(&cli) {
        Ok(dlldoc) => dlldoc,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    match dlldoc.run(dll_path, &output_target(&cli)) {
        Ok(_) => 0,
        Err(e) => {
            dlldoc.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn output_target(cli: &Cli) -> OutputTarget {
    if cli.console {
        OutputTarget::Console
    } else {
        OutputTarget::Document(cli.output.clone())
    }
}

fn exit_code_for(error: &DllDocError) -> i32 {
    match error {
        DllDocError::InvalidArgument { .. } => 2,
        DllDocError::NoExportsFound => 3,
        DllDocError::Io(_) => 4,
        DllDocError::Timeout { .. } => 5,
        DllDocError::Resource { .. }
        | DllDocError::Launch { .. }
        | DllDocError::Capture { .. }
        | DllDocError::Config { .. } => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "dlldoc.toml".to_string());

    match DllDoc::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  dlldoc <dll-path> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &DllDocError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    let env = env_logger::Env::default().default_filter_or(format!("dlldoc={}", cli.log_filter()));

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "dlldoc",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[tool]"));
    }

    #[test]
    fn test_output_target_selection() {
        let cli = Cli::try_parse_from(["dlldoc", "a.dll", "-c", "-o", "x.md"]).unwrap();
        assert_eq!(output_target(&cli), OutputTarget::Console);

        let cli = Cli::try_parse_from(["dlldoc", "a.dll", "-o", "x.md"]).unwrap();
        assert_eq!(
            output_target(&cli),
            OutputTarget::Document(Some("x.md".into()))
        );

        let cli = Cli::try_parse_from(["dlldoc", "a.dll"]).unwrap();
        assert_eq!(output_target(&cli), OutputTarget::Document(None));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&DllDocError::InvalidArgument {
                path: "a.txt".to_string()
            }),
            2
        );
        assert_eq!(exit_code_for(&DllDocError::NoExportsFound), 3);
        assert_eq!(
            exit_code_for(&DllDocError::Launch {
                command: "dumpbin".to_string(),
                code: 2,
                source: std::io::Error::from_raw_os_error(2),
            }),
            1
        );
        assert_eq!(
            exit_code_for(&DllDocError::Capture {
                source: std::io::Error::from(std::io::ErrorKind::BrokenPipe),
            }),
            1
        );
        assert_eq!(exit_code_for(&DllDocError::Timeout { seconds: 1 }), 5);
    }
}
