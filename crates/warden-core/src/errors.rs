/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the dispatcher
/// can handle failures consistently (user-facing message vs logged detail).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// A well-formed refusal from the backend, already normalized for
    /// display ("User not found.").
    #[error("{0}")]
    Backend(String),

    /// Network or parse failure before a structured error envelope was
    /// reached. Shown to the user like a backend error, but logged in full.
    #[error("backend transport error: {0}")]
    Transport(String),

    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
