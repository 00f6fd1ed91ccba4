use std::fmt;

#[derive(Debug)]
pub enum FlashError {
    /// The session slot holding the next bucket is a scalar.
    InvalidSlot { key: String, found: &'static str },
    /// A message could not be turned into a JSON value.
    Serialize(serde_json::Error),
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::InvalidSlot { key, found } => {
                write!(f, "session slot '{}' holds {}, expected a mapping or list", key, found)
            }
            FlashError::Serialize(e) => write!(f, "failed to serialize message: {}", e),
        }
    }
}

impl std::error::Error for FlashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlashError::Serialize(e) => Some(e),
            FlashError::InvalidSlot { .. } => None,
        }
    }
}

impl From<serde_json::Error> for FlashError {
    fn from(e: serde_json::Error) -> Self {
        FlashError::Serialize(e)
    }
}
