//! Built-in tool implementations.

mod calculator;
mod datetime_query;
mod random_generator;
mod text_processor;
mod unit_converter;
mod weather;

pub use calculator::{eval_number, evaluate, format_number, CalcError, Calculator};
pub use datetime_query::{format_timestamp, query, DateTimeQuery, TIMESTAMP_FORMAT};
pub use random_generator::{generate, random_uuid, RandomGenerator, RandomRequest};
pub use text_processor::{process, TextProcessor, TextStats};
pub use unit_converter::{convert, convert_value, UnitCategory, UnitConverter};
pub use weather::{forecast, Forecast, ForecastDay, WeatherStub, CONDITIONS, MAX_FORECAST_DAYS};
