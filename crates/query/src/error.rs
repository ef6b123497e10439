#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("request to {service} failed: {source}")]
    Http {
        service: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} answered with HTTP {status}")]
    Status { service: String, status: u16 },
    #[error("{service} reported error {code}: {message}")]
    Service {
        service: String,
        code: i64,
        message: String,
    },
    #[error("{service} returned an unreadable payload: {source}")]
    Payload {
        service: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Unavailable(String),
}
