use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    /// Neither the primary nor the backup endpoint answered.
    #[error("{path} unreachable: primary: {primary}; backup: {backup}")]
    Unreachable {
        path: &'static str,
        primary: String,
        backup: String,
    },

    /// The service answered with an error status. Not retried.
    #[error("{path} returned {status}: {detail}")]
    Status {
        path: &'static str,
        status: u16,
        detail: String,
    },

    #[error("Invalid {path} response: {message}")]
    Decode { path: &'static str, message: String },

    #[error("Gate exceeded its {0}s deadline")]
    Deadline(u64),
}

pub type GateResult<T> = std::result::Result<T, GateError>;
