use derive_more::Display;

/// Why a remote read produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FetchError {
    #[display(fmt = "network error: {}", _0)]
    Network(String),
    #[display(fmt = "HTTP {} {}", status, status_text)]
    Http { status: u16, status_text: String },
    #[display(fmt = "upstream error {}: {}", code, message)]
    Upstream { code: i64, message: String },
    #[display(fmt = "response carried no data")]
    MissingData,
    #[display(fmt = "failed to decode response: {}", _0)]
    Decode(String),
}

impl std::error::Error for FetchError {}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Faults outside the fetch path
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AppError {
    #[display(fmt = "Config Error: {}", _0)]
    Config(String),
}

impl std::error::Error for AppError {}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_message_is_readable() {
        let err = FetchError::Upstream { code: 404, message: "Not Found".into() };
        assert_eq!(err.to_string(), "upstream error 404: Not Found");
    }

    #[test]
    fn config_error_names_the_cause() {
        let err = AppError::Config("expected struct DashboardConfig".into());
        assert_eq!(err.to_string(), "Config Error: expected struct DashboardConfig");
    }
}
