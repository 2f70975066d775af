use cardrush_core::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoplayError {
    #[error("factory error: {0}")]
    Factory(String),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("session drew an empty hand")]
    EmptyHand,
    #[error("policy picked card {index} from a hand of {len}")]
    InvalidChoice { index: usize, len: usize },
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for AutoplayError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AutoplayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
