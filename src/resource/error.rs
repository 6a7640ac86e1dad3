use std::fmt;

/// Why a request for a resource did not produce data.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RequestError {
    Cancelled,
    Encoding { message: String },
    Transport { message: String },
    Status { code: u16 },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "request cancelled"),
            Self::Encoding { message } => write!(f, "request encoding failed: {message}"),
            Self::Transport { message } => write!(f, "transport failed: {message}"),
            Self::Status { code } => write!(f, "server responded with status {code}"),
        }
    }
}

impl std::error::Error for RequestError {}

#[cfg(test)]
mod tests {
    use super::RequestError;

    #[test]
    fn display() {
        assert_eq!(RequestError::Cancelled.to_string(), "request cancelled");
        assert_eq!(
            RequestError::Status { code: 404 }.to_string(),
            "server responded with status 404"
        );
        assert_eq!(
            RequestError::Transport {
                message: "connection reset".to_string()
            }
            .to_string(),
            "transport failed: connection reset"
        );
    }
}
