//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    /// Checked data is inconsistent; the report was already printed
    #[error("{0}")]
    DataErr(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::DataErr(_) => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) | ApplicationError::Parse { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::ItemNotFound(_) | ApplicationError::FileNotFound(_) => {
                        crate::exitcode::NOINPUT
                    }
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_orphan_error_when_mapping_exit_code_then_data_error() {
        let err: CliError = ApplicationError::Domain(DomainError::OrphanedChild {
            id: 2,
            pid: None,
        })
        .into();

        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "orphaned child item 2: no group with id <none>");
    }

    #[test]
    fn given_missing_item_when_mapping_exit_code_then_no_input() {
        let err: CliError = ApplicationError::ItemNotFound(7).into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_missing_file_when_mapping_exit_code_then_no_input() {
        let err: CliError = ApplicationError::FileNotFound("items.json".into()).into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(err.to_string(), "file not found: items.json");
    }

    #[test]
    fn given_io_error_when_mapping_exit_code_then_io_error() {
        let err = CliError::Infra(InfraError::io(
            "write stdout",
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
        ));
        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
    }
}
