//! Tool registry and built-in utility tools for the chat agent.
//!
//! This crate provides a [`ToolRegistry`] of named tools that a model can
//! call. Each tool declares an input schema; the registry validates call
//! arguments against it (rejecting unknown fields, filling defaults) before
//! the tool runs, and renders it as JSON Schema for the model.
//!
//! The [`RegistryToolExecutor`] adapter exposes a registry as a
//! `brain_core::ToolExecutor`, which is what a brain uses during its
//! tool-calling loop.
//!
//! # Built-in Tools
//!
//! - [`WeatherStub`] - Simulated multi-day weather forecast.
//! - [`Calculator`] - Arithmetic over a restricted grammar (no general evaluator).
//! - [`DateTimeQuery`] - Current time, strftime formatting, day offsets.
//! - [`TextProcessor`] - Counts, case changes, reversal and splitting.
//! - [`RandomGenerator`] - Random integers, floats, choices and UUIDs.
//! - [`UnitConverter`] - Length, weight, area and temperature conversion.
//!
//! Tools that read the clock or draw random values take a [`Clock`] or a
//! [`RandomSource`], so tests can pin both.
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_tools::default_registry;
//! use std::collections::HashMap;
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), agent_tools::ToolError> {
//!     let registry = default_registry()?;
//!
//!     let mut params = HashMap::new();
//!     params.insert("expression".to_string(), Value::String("2 + 3 * 4".to_string()));
//!
//!     let result = registry.execute("calculator", params).await?;
//!     println!("{}", result.content); // "2 + 3 * 4 = 14"
//!     Ok(())
//! }
//! ```

mod error;
mod executor;
mod registry;
mod schema;
mod source;
mod tool;
pub mod tools;

pub use error::ToolError;
pub use executor::{RegistryToolExecutor, ToolPolicy};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use schema::{FieldSpec, FieldType, ToolSchema, ToolSpec};
pub use source::{Clock, FixedClock, RandomSource, SystemClock};
pub use tool::{Tool, ToolArgs, ToolOutput};
pub use tools::{
    Calculator, DateTimeQuery, RandomGenerator, TextProcessor, UnitConverter, WeatherStub,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

/// Create a registry with all built-in tools, using the system clock and
/// entropy-seeded random sources.
///
/// Fails only if a built-in tool's schema is malformed or two tools share a
/// name, which callers should treat as fatal at startup.
pub fn default_registry() -> Result<ToolRegistry, ToolError> {
    Ok(ToolRegistry::builder()
        .register(WeatherStub::new())?
        .register(Calculator::new())?
        .register(DateTimeQuery::new())?
        .register(TextProcessor::new())?
        .register(RandomGenerator::new())?
        .register(UnitConverter::new())?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn params(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_registry_order() {
        let registry = default_registry().unwrap();
        assert_eq!(
            registry.list_tools(),
            vec![
                "weather_query",
                "calculator",
                "datetime_query",
                "text_processor",
                "random_generator",
                "unit_converter",
            ]
        );
    }

    #[test]
    fn test_definitions_are_function_schemas() {
        let registry = default_registry().unwrap();
        for definition in registry.definitions() {
            assert_eq!(definition.tool_type, "function");
            let parameters = &definition.function.parameters;
            assert_eq!(parameters["type"], "object");
            assert!(parameters["properties"].is_object());
            assert!(definition.function.description.is_some());
        }
    }

    #[tokio::test]
    async fn test_missing_required_field_for_every_tool() {
        let registry = default_registry().unwrap();
        let specs: Vec<ToolSpec> = registry.specs().cloned().collect();

        for spec in specs {
            for required in spec.schema.required_fields() {
                // Supply every other required field with a plausible value.
                let mut args = HashMap::new();
                for field in spec.schema.fields() {
                    if field.required && field.name != required {
                        let value = match field.field_type {
                            FieldType::String => json!("x"),
                            FieldType::Integer => json!(1),
                            FieldType::Number => json!(1.0),
                            FieldType::StringList => json!(["x"]),
                        };
                        args.insert(field.name.clone(), value);
                    }
                }

                let output = registry.invoke(&spec.name, args).await;
                assert!(!output.success, "{} ran without '{}'", spec.name, required);
                assert_eq!(
                    output.content,
                    format!("Error: Missing required parameter: {}", required)
                );
            }
        }
    }

    #[tokio::test]
    async fn test_engine_errors_reported_as_text() {
        let registry = default_registry().unwrap();

        let output = registry
            .invoke(
                "unit_converter",
                params(json!({"value": 1, "from_unit": "l", "to_unit": "ml", "category": "volume"})),
            )
            .await;
        assert_eq!(output.content, "Error: Unsupported category: volume");

        let output = registry
            .invoke("text_processor", params(json!({"text": "a", "operation": "shuffle"})))
            .await;
        assert_eq!(output.content, "Error: Unsupported operation: shuffle");

        let output = registry
            .invoke("random_generator", params(json!({"type": "choice", "choices": []})))
            .await;
        assert_eq!(output.content, "Error: No choices provided");
    }

    #[tokio::test]
    async fn test_weather_days_range_checked_by_schema() {
        let registry = default_registry().unwrap();
        let output = registry
            .invoke("weather_query", params(json!({"city": "Paris", "days": 10})))
            .await;
        assert!(!output.success);
        assert_eq!(
            output.content,
            "Error: Invalid parameter 'days': must be between 1 and 7"
        );
    }

    #[tokio::test]
    async fn test_random_defaults_apply() {
        let registry = default_registry().unwrap();
        let output = registry
            .invoke("random_generator", params(json!({"type": "int"})))
            .await;
        let n: i64 = output
            .content
            .strip_prefix("Random integer: ")
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=100).contains(&n));
    }
}
