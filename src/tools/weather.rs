use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{decode_arguments, Tool};
use crate::error::{Result, ToolcallError};

pub const NAME: &str = "getWeatherFromCoords";

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeatherArgs {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentWeather {
    /// Degrees Fahrenheit.
    pub temperature: f64,
    /// Miles per hour.
    pub windspeed: f64,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: Option<RawCurrentWeather>,
}

#[derive(Deserialize)]
struct RawCurrentWeather {
    temperature: Option<f64>,
    windspeed: Option<f64>,
}

pub fn format_weather(args: &WeatherArgs, weather: &CurrentWeather) -> String {
    format!(
        "The current temperature at {}, {} is {}°F with wind speed {} mph.",
        args.latitude, args.longitude, weather.temperature, weather.windspeed
    )
}

/// Current conditions from an Open-Meteo compatible forecast API.
pub struct WeatherTool {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherTool {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ToolcallError::Configuration(format!("Failed to build weather client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn current_weather(&self, args: &WeatherArgs) -> Result<CurrentWeather> {
        let url = format!("{}/v1/forecast", self.base_url);
        tracing::debug!(%url, latitude = args.latitude, longitude = args.longitude, "fetching current weather");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", args.latitude.to_string()),
                ("longitude", args.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("wind_speed_unit", "mph".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ToolcallError::execution(NAME, format!("Weather request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolcallError::execution(
                NAME,
                format!("Weather API returned status {}: {}", status.as_u16(), body),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ToolcallError::execution(NAME, format!("Failed to read weather response: {}", e)))?;

        let forecast: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ToolcallError::execution(NAME, format!("Malformed weather response: {}", e)))?;

        let current = forecast
            .current_weather
            .ok_or_else(|| ToolcallError::execution(NAME, "Weather response missing 'current_weather'"))?;

        let temperature = current.temperature.ok_or_else(|| {
            ToolcallError::execution(NAME, "Weather response missing 'current_weather.temperature'")
        })?;
        let windspeed = current.windspeed.ok_or_else(|| {
            ToolcallError::execution(NAME, "Weather response missing 'current_weather.windspeed'")
        })?;

        Ok(CurrentWeather {
            temperature,
            windspeed,
        })
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Get the current weather at a given latitude and longitude."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "latitude": {
                    "type": "number",
                    "minimum": -90,
                    "maximum": 90,
                    "description": "Latitude of the location"
                },
                "longitude": {
                    "type": "number",
                    "minimum": -180,
                    "maximum": 180,
                    "description": "Longitude of the location"
                }
            },
            "required": ["latitude", "longitude"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<String> {
        let args: WeatherArgs = decode_arguments(NAME, arguments)?;
        let weather = self.current_weather(&args).await?;
        Ok(format_weather(&args, &weather))
    }
}
