use reqwest::StatusCode;
use thiserror::Error;

/// Text shown to the user whenever a city lookup fails, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "An error occurred while fetching data 😢";

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The request could not be sent or the body could not be read.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse weather JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Weather payload contained no forecast entries")]
    EmptyForecast,

    #[error("Forecast entry contained no weather condition")]
    MissingCondition,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    /// Message suitable for the user-facing notification. Error kinds are not distinguished.
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

/// Cut long response bodies down before putting them into errors or logs.
pub fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_the_same_user_message() {
        let errs = [
            DashboardError::EmptyForecast,
            DashboardError::MissingCondition,
            DashboardError::Config("bad".into()),
            DashboardError::Status {
                url: "http://x/api/weather".into(),
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            },
        ];
        for err in &errs {
            assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
        }
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
