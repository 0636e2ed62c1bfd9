use thiserror::Error;

/// Errors that can occur while loading, mapping, or writing a model graph.
#[derive(Error, Debug)]
pub enum SysGraphError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("model error: {message}")]
    Model { message: String },

    #[error("address error: {message} (address: {address})")]
    Address { message: String, address: String },

    #[error("identity collision: '{key}' claimed by '{existing}' and '{incoming}'")]
    IdentityCollision {
        key: String,
        existing: String,
        incoming: String,
    },

    #[error("phase error: {message}")]
    Phase { message: String },

    #[error("write error: {message} (target: {target})")]
    Write { message: String, target: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `SysGraphError`.
pub type Result<T> = std::result::Result<T, SysGraphError>;
