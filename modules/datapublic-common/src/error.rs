use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataPublicError>;

#[derive(Error, Debug)]
pub enum DataPublicError {
    #[error(
        "{var} environment variable is required. Create a GitHub personal access token \
         with `repo` scope and run `export {var}=<token>` (or add it to .env)"
    )]
    MissingCredential { var: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Update step '{step}' failed: {reason}")]
    StepAborted { step: String, reason: String },

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

impl From<github_dispatch::DispatchError> for DataPublicError {
    fn from(err: github_dispatch::DispatchError) -> Self {
        DataPublicError::Dispatch(err.to_string())
    }
}
