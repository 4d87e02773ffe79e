use std::time::Duration;

use async_trait::async_trait;
use holidays_common::{error::Error, holiday::CountryCode, state::HolidaySource};
use tracing::debug;

const PUBLIC_HOLIDAYS_PATH: &str = "api/v3/PublicHolidays";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Nager.Date public holiday API.
#[derive(Debug, Clone)]
pub struct NagerClient {
    base_url: String,
    http: reqwest::Client,
}

impl NagerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn public_holidays_url(&self, year: i32, country: CountryCode) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url, PUBLIC_HOLIDAYS_PATH, year, country
        )
    }
}

#[async_trait]
impl HolidaySource for NagerClient {
    async fn fetch_public_holidays(
        &self,
        year: i32,
        country: CountryCode,
    ) -> Result<serde_json::Value, Error> {
        let url = self.public_holidays_url(year, country);

        debug!(%url, "Requesting public holidays");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("GET {url} returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("Failed to read body of GET {url}: {e}")))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_layout() {
        let client = NagerClient::new("https://date.nager.at/").unwrap();
        assert_eq!(
            client.public_holidays_url(2023, CountryCode::Ru),
            "https://date.nager.at/api/v3/PublicHolidays/2023/RU"
        );
    }

    #[tokio::test]
    async fn test_fetch_decodes_json_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v3/PublicHolidays/2023/BY")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"date": "2023-01-01", "countryCode": "BY", "global": true}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = NagerClient::new(server.url()).unwrap();
        let payload = client
            .fetch_public_holidays(2023, CountryCode::By)
            .await
            .unwrap();

        assert_eq!(payload[0]["countryCode"], "BY");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v3/PublicHolidays/2023/UA")
            .with_status(404)
            .create_async()
            .await;

        let client = NagerClient::new(server.url()).unwrap();
        let result = client.fetch_public_holidays(2023, CountryCode::Ua).await;

        assert!(matches!(result, Err(Error::Http(msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_malformed_json_is_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v3/PublicHolidays/2023/RU")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = NagerClient::new(server.url()).unwrap();
        let result = client.fetch_public_holidays(2023, CountryCode::Ru).await;

        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client = NagerClient::new("http://127.0.0.1:9").unwrap();
        let result = client.fetch_public_holidays(2023, CountryCode::Ru).await;

        assert!(matches!(result, Err(Error::Http(_))));
    }
}
