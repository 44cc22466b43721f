//! Exercise every tool in the default registry. No network access needed.
//!
//! Run with: cargo run -p agent-tools --example test_tools

use agent_tools::{default_registry, ToolRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agent_tools=debug".parse()?),
        )
        .init();

    println!("=== Agent Tools Demo ===\n");

    let registry = default_registry()?;

    println!("Registered tools:");
    for (name, desc) in registry.get_descriptions() {
        println!("  - {}: {}", name, desc);
    }
    println!();

    run_cases(
        &registry,
        "calculator",
        &[
            (r#"{"expression": "2 + 3 * 4"}"#, "= 14"),
            (r#"{"expression": "sqrt(16) + sin(pi/2)"}"#, "= 5"),
            (r#"{"expression": "2^10"}"#, "= 1024"),
            (r#"{"expression": "round(10 / 3, 2)"}"#, "= 3.33"),
            (r#"{"expression": "1 / 0"}"#, "division by zero"),
            (r#"{"expression": "__import__('os')"}"#, "Error:"),
        ],
    )
    .await;

    run_cases(
        &registry,
        "unit_converter",
        &[
            (
                r#"{"value": 100, "from_unit": "cm", "to_unit": "m", "category": "length"}"#,
                "100 cm = 1.0000 m",
            ),
            (
                r#"{"value": 100, "from_unit": "C", "to_unit": "F", "category": "temperature"}"#,
                "100°C = 212.00°F",
            ),
            (
                r#"{"value": 1, "from_unit": "F", "to_unit": "K", "category": "temperature"}"#,
                "Unsupported unit conversion",
            ),
        ],
    )
    .await;

    run_cases(
        &registry,
        "text_processor",
        &[
            (r#"{"text": "Hello World", "operation": "count"}"#, "Words: 2"),
            (r#"{"text": "Hello World", "operation": "reverse"}"#, "dlroW olleH"),
            (
                r#"{"text": "a,b,c", "operation": "split", "separator": ","}"#,
                r#"["a","b","c"]"#,
            ),
        ],
    )
    .await;

    run_cases(
        &registry,
        "datetime_query",
        &[
            (r#"{"query_type": "current"}"#, "Current time: "),
            (
                r#"{"query_type": "format", "format_string": "%A, %B %d"}"#,
                "Formatted time: ",
            ),
            (r#"{"query_type": "calculate", "days_offset": -7}"#, "Calculated time: "),
        ],
    )
    .await;

    run_cases(
        &registry,
        "random_generator",
        &[
            (r#"{"type": "int", "min_value": 1, "max_value": 6}"#, "Random integer: "),
            (r#"{"type": "float"}"#, "Random float: "),
            (r#"{"type": "choice", "choices": ["red", "green"]}"#, "Random choice: "),
            (r#"{"type": "uuid"}"#, "UUID: "),
        ],
    )
    .await;

    run_cases(
        &registry,
        "weather_query",
        &[(r#"{"city": "Beijing", "days": 3}"#, "\"forecast\"")],
    )
    .await;

    println!("=== Demo completed ===");
    Ok(())
}

async fn run_cases(registry: &ToolRegistry, tool: &str, cases: &[(&str, &str)]) {
    println!("--- {} ---", tool);

    for (args, expected) in cases {
        let output = match registry.execute_json(tool, args).await {
            Ok(output) => output.content,
            Err(e) => format!("Error: {}", e),
        };

        let status = if output.contains(expected) { "PASS" } else { "FAIL" };
        println!("  [{}] {} => {}", status, args, output);
    }

    println!();
}
