//! NOAA geomagnetic calculator provider.
//!
//! Queries the World Magnetic Model through NOAA's public
//! `calculateDeclination` endpoint. A (free) API key is required.

use serde::Deserialize;

use super::http::HttpClient;
use super::provider::{validate_declination, DeclinationError, DeclinationProvider};
use crate::geo::GeoCoordinate;

/// Base URL of the NOAA declination calculator.
pub const NOAA_DECLINATION_URL: &str =
    "https://www.ngdc.noaa.gov/geomag-web/calculators/calculateDeclination";

#[derive(Debug, Deserialize)]
struct NoaaResponse {
    result: Vec<NoaaResult>,
}

#[derive(Debug, Deserialize)]
struct NoaaResult {
    declination: f64,
}

/// Declination provider backed by the NOAA web service.
pub struct NoaaDeclinationProvider<C: HttpClient> {
    http_client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClient> NoaaDeclinationProvider<C> {
    /// Create a provider using the public NOAA endpoint.
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: NOAA_DECLINATION_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, coord: &GeoCoordinate, year: i32) -> String {
        format!(
            "{}?lat1={:.6}&lon1={:.6}&key={}&startYear={}&resultFormat=json",
            self.base_url, coord.latitude, coord.longitude, self.api_key, year
        )
    }

    fn parse(body: &[u8]) -> Result<f64, DeclinationError> {
        let response: NoaaResponse =
            serde_json::from_slice(body).map_err(|e| DeclinationError::Parse(e.to_string()))?;
        let first = response
            .result
            .first()
            .ok_or_else(|| DeclinationError::Parse("empty result list".to_string()))?;
        validate_declination(first.declination)
    }
}

impl<C: HttpClient> DeclinationProvider for NoaaDeclinationProvider<C> {
    fn name(&self) -> &str {
        "NOAA WMM"
    }

    fn fetch(&self, coord: &GeoCoordinate, year: i32) -> Result<f64, DeclinationError> {
        if self.api_key.is_empty() {
            return Err(DeclinationError::Unavailable(
                "no NOAA API key configured".to_string(),
            ));
        }

        let url = self.request_url(coord, year);
        let body = self.http_client.get(&url)?;
        Self::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declination::http::tests::MockHttpClient;

    const SAMPLE_RESPONSE: &str = r#"{
        "result": [{
            "date": 2025.5,
            "elevation": 0,
            "declination": -12.87,
            "latitude": 40.7128,
            "longitude": -74.006,
            "declnation_sv": 0.02,
            "declination_uncertainty": 0.37
        }],
        "model": "WMM-2025",
        "units": {"elevation": "km", "declination": "degrees"}
    }"#;

    fn nyc() -> GeoCoordinate {
        GeoCoordinate::new(40.7128, -74.0060).unwrap()
    }

    #[test]
    fn test_fetch_parses_declination() {
        let provider = NoaaDeclinationProvider::new(MockHttpClient::ok(SAMPLE_RESPONSE), "KEY");
        assert_eq!(provider.fetch(&nyc(), 2025), Ok(-12.87));
    }

    #[test]
    fn test_request_url() {
        let provider = NoaaDeclinationProvider::new(MockHttpClient::ok(SAMPLE_RESPONSE), "KEY")
            .with_base_url("http://localhost/decl");
        provider.fetch(&nyc(), 2026).unwrap();

        let url = provider.http_client.last_url().unwrap();
        assert_eq!(
            url,
            "http://localhost/decl?lat1=40.712800&lon1=-74.006000&key=KEY&startYear=2026&resultFormat=json"
        );
    }

    #[test]
    fn test_missing_api_key() {
        let provider = NoaaDeclinationProvider::new(MockHttpClient::ok(SAMPLE_RESPONSE), "");
        assert!(matches!(
            provider.fetch(&nyc(), 2025),
            Err(DeclinationError::Unavailable(_))
        ));
        assert!(provider.http_client.last_url().is_none());
    }

    #[test]
    fn test_http_error_propagates() {
        let provider = NoaaDeclinationProvider::new(
            MockHttpClient::err(DeclinationError::Http("HTTP 500".to_string())),
            "KEY",
        );
        assert_eq!(
            provider.fetch(&nyc(), 2025),
            Err(DeclinationError::Http("HTTP 500".to_string()))
        );
    }

    #[test]
    fn test_malformed_body() {
        let provider = NoaaDeclinationProvider::new(MockHttpClient::ok("not json"), "KEY");
        assert!(matches!(
            provider.fetch(&nyc(), 2025),
            Err(DeclinationError::Parse(_))
        ));

        let provider = NoaaDeclinationProvider::new(MockHttpClient::ok(r#"{"result": []}"#), "KEY");
        assert!(matches!(
            provider.fetch(&nyc(), 2025),
            Err(DeclinationError::Parse(_))
        ));
    }

    #[test]
    fn test_out_of_range_value() {
        let provider = NoaaDeclinationProvider::new(
            MockHttpClient::ok(r#"{"result": [{"declination": 512.0}]}"#),
            "KEY",
        );
        assert!(matches!(
            provider.fetch(&nyc(), 2025),
            Err(DeclinationError::Parse(_))
        ));
    }
}
