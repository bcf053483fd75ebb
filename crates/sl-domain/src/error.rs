/// Shared error type used across all skill-learning crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config: {0}")]
    Config(String),

    #[error("kv store: {0}")]
    Kv(String),

    #[error("message bus: {0}")]
    Bus(String),

    #[error("database: {0}")]
    Db(String),

    #[error("llm provider {provider}: {message}")]
    Llm { provider: String, message: String },

    #[error("lock not held: {0}")]
    LockNotHeld(String),

    #[error("tool {name} rejected: {message}")]
    Tool { name: String, message: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
