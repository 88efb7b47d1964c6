//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::Json { path, message } => {
                write!(f, "failed to parse JSON file '{}': {}", path.display(), message)
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::CommandExecution {
                command,
                args,
                message,
                exit_code,
            } => {
                let args_str = args.join(" ");
                match exit_code {
                    Some(code) => {
                        if args_str.is_empty() {
                            write!(
                                f,
                                "command '{command}' failed with exit code {code}: {message}"
                            )
                        } else {
                            write!(f, "command '{command} {args_str}' failed with exit code {code}: {message}")
                        }
                    }
                    None => {
                        if args_str.is_empty() {
                            write!(f, "command '{command}' failed: {message}")
                        } else {
                            write!(f, "command '{command} {args_str}' failed: {message}")
                        }
                    }
                }
            }
            Error::Timeout {
                operation,
                duration,
            } => {
                write!(f, "operation '{operation}' timed out after {duration:?}")
            }
            Error::SinkWrite { path, message } => {
                write!(
                    f,
                    "failed to append result to '{}': {}",
                    path.display(),
                    message
                )
            }
            Error::Internal { message } => {
                write!(f, "internal error: {message}")
            }
        }
    }
}
