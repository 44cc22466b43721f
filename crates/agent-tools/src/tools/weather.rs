//! Weather tool returning simulated forecasts.
//!
//! No weather service is contacted: every call makes up a fresh forecast
//! from the injected random source, dated from the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ToolError;
use crate::schema::{FieldSpec, FieldType, ToolSchema};
use crate::source::{Clock, RandomSource, SystemClock};
use crate::tool::{Tool, ToolArgs, ToolOutput};
use crate::tools::datetime_query::TIMESTAMP_FORMAT;

/// Sky conditions a forecast day can report.
pub const CONDITIONS: [&str; 7] = [
    "Sunny",
    "Cloudy",
    "Overcast",
    "Light rain",
    "Moderate rain",
    "Heavy rain",
    "Snow",
];

pub const MAX_FORECAST_DAYS: i64 = 7;

/// One simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub condition: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

/// Simulated forecast for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub query_time: String,
    pub forecast: Vec<ForecastDay>,
}

/// Make up a forecast of `days` consecutive days starting today.
pub fn forecast(
    clock: &dyn Clock,
    source: &RandomSource,
    city: &str,
    days: i64,
) -> Result<Forecast, ToolError> {
    if !(1..=MAX_FORECAST_DAYS).contains(&days) {
        return Err(ToolError::invalid(
            "days",
            format!("must be between 1 and {}", MAX_FORECAST_DAYS),
        ));
    }

    let now = clock.now();
    let mut forecast = Vec::with_capacity(days as usize);

    for offset in 0..days {
        let date = now
            .checked_add_signed(Duration::days(offset))
            .ok_or_else(|| ToolError::invalid("days", "date out of range"))?;

        let day = source.with(|rng| {
            let condition = CONDITIONS.choose(rng).copied().unwrap_or(CONDITIONS[0]);
            ForecastDay {
                date: date.format("%Y-%m-%d").to_string(),
                condition: condition.to_string(),
                temperature: format!("{}°C", rng.gen_range(-10..=34)),
                humidity: format!("{}%", rng.gen_range(30..=90)),
                wind: format!("Level {}", rng.gen_range(1..=8)),
            }
        });
        forecast.push(day);
    }

    Ok(Forecast {
        city: city.to_string(),
        query_time: now.format(TIMESTAMP_FORMAT).to_string(),
        forecast,
    })
}

/// Weather forecast tool backed by simulated data.
///
/// # Parameters
///
/// - `city` (required): City name.
/// - `days` (optional): Number of days, 1 to 7. Defaults to 1.
///
/// # Examples
///
/// ```json
/// {"city": "Beijing"}
/// {"city": "London", "days": 3}
/// ```
pub struct WeatherStub {
    clock: Arc<dyn Clock>,
    source: RandomSource,
}

impl WeatherStub {
    pub fn new() -> Self {
        Self::with_sources(Arc::new(SystemClock), RandomSource::from_entropy())
    }

    /// Use the given clock and random source.
    pub fn with_sources(clock: Arc<dyn Clock>, source: RandomSource) -> Self {
        Self { clock, source }
    }
}

impl Default for WeatherStub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WeatherStub {
    fn name(&self) -> &str {
        "weather_query"
    }

    fn description(&self) -> &str {
        "Returns a weather forecast for a city covering 1 to 7 days: condition, temperature, \
         humidity and wind per day. The data is simulated, not fetched from a weather service."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required("city", FieldType::String, "City name"),
            FieldSpec::optional("days", FieldType::Integer, "Number of days to forecast")
                .with_default(1)
                .range(1, MAX_FORECAST_DAYS),
        ])
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let city = args.get_string("city")?;
        let days = args.get_integer_opt("days")?.unwrap_or(1);

        debug!("Simulating {}-day forecast for {}", days, city);

        let forecast = forecast(self.clock.as_ref(), &self.source, &city, days)?;
        Ok(ToolOutput::success(serde_json::to_string_pretty(&forecast)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixedClock;
    use chrono::NaiveDate;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2023, 12, 30)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    fn leading_number(text: &str) -> i64 {
        let digits: String = text
            .chars()
            .take_while(|c| *c == '-' || c.is_ascii_digit())
            .collect();
        digits.parse().unwrap()
    }

    #[test]
    fn test_forecast_shape() {
        let source = RandomSource::seeded(21);
        let result = forecast(&clock(), &source, "Oslo", 4).unwrap();

        assert_eq!(result.city, "Oslo");
        assert_eq!(result.query_time, "2023-12-30 09:00:00");
        let dates: Vec<&str> = result.forecast.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2023-12-30", "2023-12-31", "2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_forecast_values_in_range() {
        let source = RandomSource::seeded(8);
        for _ in 0..20 {
            let result = forecast(&clock(), &source, "Lima", 7).unwrap();
            for day in &result.forecast {
                assert!(CONDITIONS.contains(&day.condition.as_str()));

                assert!(day.temperature.ends_with("°C"));
                assert!((-10..=34).contains(&leading_number(&day.temperature)));

                assert!(day.humidity.ends_with('%'));
                assert!((30..=90).contains(&leading_number(&day.humidity)));

                let wind = day.wind.strip_prefix("Level ").unwrap();
                assert!((1..=8).contains(&leading_number(wind)));
            }
        }
    }

    #[test]
    fn test_days_out_of_range() {
        let source = RandomSource::seeded(1);
        for days in [0, 8, -1] {
            assert!(matches!(
                forecast(&clock(), &source, "Rome", days),
                Err(ToolError::InvalidParameter { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_execute_renders_json() {
        let tool = WeatherStub::with_sources(Arc::new(clock()), RandomSource::seeded(2));
        let args = ToolArgs::new(
            serde_json::from_value(json!({"city": "Beijing", "days": 2})).unwrap(),
        );

        let output = tool.execute(args).await.unwrap();
        assert!(output.success);
        assert!(output.content.contains('\n'));

        let parsed: Forecast = serde_json::from_str(&output.content).unwrap();
        assert_eq!(parsed.city, "Beijing");
        assert_eq!(parsed.forecast.len(), 2);
    }
}
