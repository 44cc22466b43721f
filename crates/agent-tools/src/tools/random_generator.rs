//! Random value generator tool.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use uuid::{Builder, Uuid};

use crate::error::ToolError;
use crate::schema::{FieldSpec, FieldType, ToolSchema};
use crate::source::RandomSource;
use crate::tool::{Tool, ToolArgs, ToolOutput};

const KINDS: &[&str] = &["int", "float", "choice", "uuid"];

/// What to generate.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomRequest {
    Int { min: i64, max: i64 },
    Float { min: i64, max: i64 },
    Choice { choices: Vec<String> },
    Uuid,
}

impl RandomRequest {
    /// Build a request from the tool's loose parameters.
    pub fn from_parts(
        kind: &str,
        min: i64,
        max: i64,
        choices: Option<Vec<String>>,
    ) -> Result<Self, ToolError> {
        let request = match kind {
            "int" => RandomRequest::Int { min, max },
            "float" => RandomRequest::Float { min, max },
            "choice" => RandomRequest::Choice {
                choices: choices.unwrap_or_default(),
            },
            "uuid" => RandomRequest::Uuid,
            other => return Err(ToolError::UnsupportedOperation(other.to_string())),
        };
        Ok(request)
    }
}

fn check_range(min: i64, max: i64) -> Result<(), ToolError> {
    if min > max {
        return Err(ToolError::invalid(
            "min_value",
            format!("min_value ({}) must not exceed max_value ({})", min, max),
        ));
    }
    Ok(())
}

/// Version-4 UUID built from bytes drawn from `source`.
pub fn random_uuid(source: &RandomSource) -> Uuid {
    let bytes: [u8; 16] = source.with(|rng| rng.gen());
    Builder::from_random_bytes(bytes).into_uuid()
}

/// Generate a value and describe it as text.
pub fn generate(source: &RandomSource, request: &RandomRequest) -> Result<String, ToolError> {
    match request {
        RandomRequest::Int { min, max } => {
            check_range(*min, *max)?;
            let value: i64 = source.with(|rng| rng.gen_range(*min..=*max));
            Ok(format!("Random integer: {}", value))
        }
        RandomRequest::Float { min, max } => {
            check_range(*min, *max)?;
            let (low, high) = (*min as f64, *max as f64);
            let value: f64 = source.with(|rng| rng.gen_range(low..=high));
            Ok(format!("Random float: {:.2}", value))
        }
        RandomRequest::Choice { choices } => {
            let picked = source
                .with(|rng| choices.choose(rng).cloned())
                .ok_or(ToolError::EmptyChoiceSet)?;
            Ok(format!("Random choice: {}", picked))
        }
        RandomRequest::Uuid => Ok(format!("UUID: {}", random_uuid(source))),
    }
}

/// Random value generator tool.
///
/// # Parameters
///
/// - `type` (required): `int`, `float`, `choice` or `uuid`.
/// - `min_value` (optional): Lower bound for `int`/`float`. Defaults to 1.
/// - `max_value` (optional): Upper bound for `int`/`float`. Defaults to 100.
/// - `choices` (optional): Candidates for `choice`.
///
/// # Examples
///
/// ```json
/// {"type": "int", "min_value": 1, "max_value": 6}
/// {"type": "choice", "choices": ["apple", "banana", "orange"]}
/// {"type": "uuid"}
/// ```
pub struct RandomGenerator {
    source: RandomSource,
}

impl RandomGenerator {
    /// Create a generator seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_source(RandomSource::from_entropy())
    }

    pub fn with_source(source: RandomSource) -> Self {
        Self { source }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RandomGenerator {
    fn name(&self) -> &str {
        "random_generator"
    }

    fn description(&self) -> &str {
        "Generates random values: an integer or a float (2 decimals) within an inclusive \
         range, a random pick from a list of choices, or a UUID."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required("type", FieldType::String, "Kind of value to generate")
                .one_of(KINDS),
            FieldSpec::optional("min_value", FieldType::Integer, "Lower bound (int/float)")
                .with_default(1),
            FieldSpec::optional("max_value", FieldType::Integer, "Upper bound (int/float)")
                .with_default(100),
            FieldSpec::optional("choices", FieldType::StringList, "Candidates (choice)"),
        ])
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let kind = args.get_string("type")?;
        let min = args.get_integer_opt("min_value")?.unwrap_or(1);
        let max = args.get_integer_opt("max_value")?.unwrap_or(100);
        let choices = args.get_string_list_opt("choices")?;

        debug!("Generating random '{}' (range {}..={})", kind, min, max);

        let request = RandomRequest::from_parts(&kind, min, max, choices)?;
        generate(&self.source, &request).map(ToolOutput::success)
    }
}
