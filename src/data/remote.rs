//! Remote fallback for the sales CSV.
//!
//! When the local file is absent we fetch the published copy of the dataset
//! instead of failing outright.

use reqwest::blocking::Client;

use crate::error::AppError;

/// Published copy of the automobile sales dataset.
pub const FALLBACK_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/d51iMGfp_t0QpO30Lym-dw/automobile-sales.csv";

pub struct RemoteCsv {
    client: Client,
    url: String,
}

impl RemoteCsv {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the CSV body as text.
    pub fn fetch(&self) -> Result<String, AppError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(3, format!("Failed to fetch '{}': {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::new(
                3,
                format!("Fetching '{}' returned HTTP {status}", self.url),
            ));
        }

        response
            .text()
            .map_err(|e| AppError::new(3, format!("Failed to read response body: {e}")))
    }
}
