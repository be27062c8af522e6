use thiserror::Error;

#[derive(Error, Debug)]
pub enum DllDocError {
    #[error("Not a recognizable library path: {path}")]
    InvalidArgument { path: String },

    #[error("Pipe creation failed: {message}")]
    Resource {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not execute {command} (error code {code})")]
    Launch {
        command: String,
        code: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read tool output")]
    Capture {
        #[source]
        source: std::io::Error,
    },

    #[error("No exports found")]
    NoExportsFound,

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Inspection tool timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for DllDocError {
    fn user_message(&self) -> String {
        match self {
            DllDocError::InvalidArgument { path } => {
                format!("Provide a valid dll: {}", path)
            }
            DllDocError::Resource { message, source } => {
                format!(
                    "Failed to create pipe ({}). Error code: {}",
                    message,
                    source.raw_os_error().unwrap_or(-1)
                )
            }
            DllDocError::Launch { command, code, .. } => {
                format!("Could not execute {}. Error code: {}", command, code)
            }
            DllDocError::Capture { source } => {
                format!("Failed to read the dumpbin output: {}", source)
            }
            DllDocError::NoExportsFound => {
                "No exports found in the dumpbin output".to_string()
            }
            DllDocError::Io(e) => {
                format!("Failed to write exports file: {}", e)
            }
            DllDocError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            DllDocError::Timeout { seconds } => {
                format!("The inspection tool did not finish within {} seconds", seconds)
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            DllDocError::InvalidArgument { .. } => Some(
                "Pass the path of a .dll file (e.g., C:\\libs\\sample.dll)".to_string()
            ),
            DllDocError::Launch { .. } => Some(
                "Make sure to have Visual Studio installed and the dumpbin.exe directory in the PATH, or point --tool at it.".to_string()
            ),
            DllDocError::NoExportsFound => Some(
                "Check that the file is a valid DLL with an export table and that it is readable. Run with -vv to see the raw dumpbin output.".to_string()
            ),
            DllDocError::Io(_) => Some(
                "Ensure the output directory exists and you have write permission, or choose another file with --output.".to_string()
            ),
            DllDocError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            DllDocError::Timeout { .. } => Some(
                "Increase the limit with --timeout if the library is very large.".to_string()
            ),
            DllDocError::Resource { .. } | DllDocError::Capture { .. } => None,
        }
    }
}

impl From<toml::de::Error> for DllDocError {
    fn from(error: toml::de::Error) -> Self {
        DllDocError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DllDocError>;
