use norrisbot_db::RepositoryError;
use norrisbot_slack::{ClientError, TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("connection error: {0}")]
    Connection(#[from] TransportError),
    #[error("store query failed: {0}")]
    Store(#[from] RepositoryError),
    #[error("slack call failed: {0}")]
    Client(#[from] ClientError),
}

impl ControllerError {
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Connection and store failures are logged as errors; a failed Slack
    /// call only costs one reply and is logged as a warning.
    pub fn is_severe(&self) -> bool {
        !matches!(self, Self::Client(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Store(_) => "store_query",
            Self::Client(_) => "slack_client",
        }
    }
}

#[cfg(test)]
mod tests {
    use norrisbot_db::RepositoryError;
    use norrisbot_slack::{ClientError, TransportError};

    use super::ControllerError;

    #[test]
    fn classifies_error_sources() {
        let connection: ControllerError = TransportError::Connect("refused".to_owned()).into();
        let store: ControllerError = RepositoryError::Decode("bad row".to_owned()).into();
        let client: ControllerError =
            ClientError::Api { method: "chat.postMessage".to_owned(), error: "x".to_owned() }
                .into();

        assert!(connection.is_connection());
        assert!(connection.is_severe());
        assert!(!store.is_connection());
        assert!(store.is_severe());
        assert!(!client.is_severe());
        assert_eq!(store.kind(), "store_query");
        assert!(client.to_string().contains("chat.postMessage"));
    }
}
