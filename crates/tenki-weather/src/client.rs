//! Authenticated HTTP client for the weather API.
//!
//! Stateless between calls: the bearer token is passed per request and
//! never stored here, so callers can honor the fresh-token-per-request
//! contract.

use tracing::instrument;

use crate::error::WeatherApiError;
use crate::types::{
    FetchResponse, HealthStatus, StatisticsResponse, WeatherRecord, WeatherStatistics,
    WeatherType, WeatherTypesResponse,
};

pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(api: &tenki_core::ApiConfig) -> Self {
        Self::new(api.base_url.clone())
    }

    fn auth_header(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Fetch the latest weather record for every city.
    ///
    /// Succeeds only on 2xx. A response without a `data` field yields an
    /// empty result set.
    #[instrument(skip(self, token), level = "info")]
    pub async fn fetch_weather(&self, token: &str) -> Result<Vec<WeatherRecord>, WeatherApiError> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", Self::auth_header(token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let body: FetchResponse = Self::handle_response(response).await?;
        Ok(body.data)
    }

    /// Ask the backend to generate a fresh record set for all cities.
    ///
    /// The backend answers 201 with the generated records; any 2xx counts
    /// as success and the body is not consumed.
    #[instrument(skip(self, token), level = "info")]
    pub async fn generate_weather(&self, token: &str) -> Result<(), WeatherApiError> {
        let url = format!("{}/weather/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", Self::auth_header(token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(WeatherApiError::Http {
                status: status.as_u16(),
            })
        }
    }

    /// Fetch the forecast record set.
    ///
    /// Same envelope as `fetch_weather`; the backend currently serves
    /// the latest records for this route as well.
    #[instrument(skip(self, token), level = "info")]
    pub async fn fetch_forecast(&self, token: &str) -> Result<Vec<WeatherRecord>, WeatherApiError> {
        let url = format!("{}/weather/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", Self::auth_header(token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let body: FetchResponse = Self::handle_response(response).await?;
        Ok(body.data)
    }

    /// Aggregate statistics over the current data set.
    #[instrument(skip(self, token), level = "info")]
    pub async fn fetch_statistics(
        &self,
        token: &str,
    ) -> Result<WeatherStatistics, WeatherApiError> {
        let url = format!("{}/weather/statistics", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", Self::auth_header(token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let body: StatisticsResponse = Self::handle_response(response).await?;
        Ok(body.data)
    }

    /// Master list of weather types. Public endpoint, no token required.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather_types(&self) -> Result<Vec<WeatherType>, WeatherApiError> {
        let url = format!("{}/weather/types", self.base_url);

        let response = self.client.get(&url).send().await?;

        let body: WeatherTypesResponse = Self::handle_response(response).await?;
        Ok(body.data)
    }

    /// Service health report. Public endpoint.
    #[instrument(skip(self), level = "info")]
    pub async fn health(&self) -> Result<HealthStatus, WeatherApiError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        Self::handle_response(response).await
    }

    /// Non-2xx statuses fail with the status; 2xx bodies must be valid
    /// JSON of the expected shape.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WeatherApiError> {
        let status = response.status();

        if !status.is_success() {
            return Err(WeatherApiError::Http {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| WeatherApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn weather_body() -> serde_json::Value {
        serde_json::json!({
            "success": true,
            "data": [
                {
                    "CityId": 13,
                    "CityName": "東京",
                    "WeatherId": 1,
                    "WeatherName": "晴れ",
                    "RainfallProbability": 10,
                    "timestamp": "2024-01-15T09:30:00"
                },
                {
                    "CityId": 27,
                    "CityName": "大阪",
                    "WeatherId": 3,
                    "WeatherName": "雨",
                    "RainfallProbability": 70,
                    "timestamp": "2024-01-15T09:30:00"
                }
            ],
            "count": 2
        })
    }

    #[tokio::test]
    async fn test_fetch_weather() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(header("Authorization", "Bearer test_token"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let records = client.fetch_weather("test_token").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].city_name, "東京");
        assert_eq!(records[1].rainfall_probability, 70);
    }

    #[tokio::test]
    async fn test_fetch_weather_empty_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "data": []})),
            )
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let records = client.fetch_weather("test_token").await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_weather_missing_data_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let records = client.fetch_weather("test_token").await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_weather_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let result = client.fetch_weather("test_token").await;

        assert!(matches!(result, Err(WeatherApiError::Http { status: 500 })));
    }

    #[tokio::test]
    async fn test_fetch_weather_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let result = client.fetch_weather("expired_token").await;

        assert!(matches!(result, Err(WeatherApiError::Http { status: 401 })));
    }

    #[tokio::test]
    async fn test_fetch_weather_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let result = client.fetch_weather("test_token").await;

        assert!(matches!(result, Err(WeatherApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_generate_weather() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/weather/generate"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true,
                "message": "天気データを生成しました",
                "count": 5
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        assert!(client.generate_weather("test_token").await.is_ok());
    }

    #[tokio::test]
    async fn test_generate_weather_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/weather/generate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let result = client.generate_weather("test_token").await;

        assert!(matches!(result, Err(WeatherApiError::Http { status: 500 })));
    }

    #[tokio::test]
    async fn test_fetch_forecast() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/forecast"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let records = client.fetch_forecast("test_token").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].city_name, "東京");
    }

    #[tokio::test]
    async fn test_fetch_forecast_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let result = client.fetch_forecast("test_token").await;

        assert!(matches!(result, Err(WeatherApiError::Http { status: 500 })));
    }

    #[tokio::test]
    async fn test_fetch_statistics() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/statistics"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {
                    "total_cities": 5,
                    "data_available": 5,
                    "weather_distribution": {"晴れ": 2, "くもり": 1, "雨": 2},
                    "average_rainfall": 42.8
                }
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let stats = client.fetch_statistics("test_token").await.unwrap();

        assert_eq!(stats.total_cities, 5);
        assert_eq!(stats.weather_distribution.get("晴れ"), Some(&2));
        assert!((stats.average_rainfall - 42.8).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_fetch_weather_types() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [
                    {"id": 1, "name": "晴れ"},
                    {"id": 2, "name": "くもり"},
                    {"id": 3, "name": "雨"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let types = client.fetch_weather_types().await.unwrap();

        assert_eq!(types.len(), 3);
        assert_eq!(types[2].name, "雨");
    }

    #[tokio::test]
    async fn test_health() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "service": "weather-api",
                "database": "connected"
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(mock_server.uri());
        let health = client.health().await.unwrap();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.database, "connected");
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let api = tenki_core::ApiConfig {
            base_url: "https://api.example.com/prod/".to_string(),
        };
        let client = WeatherClient::from_config(&api);
        assert_eq!(client.base_url, "https://api.example.com/prod");
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "service": "weather-api",
                "database": "connected"
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(format!("{}/", mock_server.uri()));
        assert!(client.health().await.is_ok());
    }
}
