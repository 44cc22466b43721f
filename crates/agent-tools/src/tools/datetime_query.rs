//! Date and time tool: current time, custom formatting and day offsets.

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::error::ToolError;
use crate::schema::{FieldSpec, FieldType, ToolSchema};
use crate::source::{Clock, SystemClock};
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Timestamp layout used by `current` and `calculate`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const QUERY_TYPES: &[&str] = &["current", "format", "calculate"];

/// Apply a strftime format string, reporting malformed specifiers.
pub fn format_timestamp(at: NaiveDateTime, format: &str) -> Result<String, ToolError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ToolError::FormatError(format!(
            "invalid format string '{}'",
            format
        )));
    }

    let mut out = String::new();
    write!(out, "{}", at.format_with_items(items.into_iter()))
        .map_err(|_| ToolError::FormatError(format!("cannot apply format '{}'", format)))?;
    Ok(out)
}

/// Answer a date/time query against `clock`.
pub fn query(
    clock: &dyn Clock,
    query_type: &str,
    format_string: Option<&str>,
    days_offset: Option<i64>,
) -> Result<String, ToolError> {
    let now = clock.now();

    match query_type {
        "current" => Ok(format!("Current time: {}", now.format(TIMESTAMP_FORMAT))),
        "format" => {
            let format = format_string
                .filter(|f| !f.is_empty())
                .ok_or_else(|| ToolError::MissingParameter("format_string".to_string()))?;
            Ok(format!("Formatted time: {}", format_timestamp(now, format)?))
        }
        "calculate" => {
            let days =
                days_offset.ok_or_else(|| ToolError::MissingParameter("days_offset".to_string()))?;
            let target = Duration::try_days(days)
                .and_then(|offset| now.checked_add_signed(offset))
                .ok_or_else(|| ToolError::invalid("days_offset", "date out of range"))?;
            Ok(format!("Calculated time: {}", target.format(TIMESTAMP_FORMAT)))
        }
        other => Err(ToolError::UnsupportedOperation(other.to_string())),
    }
}

/// Date and time query tool.
///
/// # Parameters
///
/// - `query_type` (required): `current`, `format` or `calculate`.
/// - `format_string` (optional): strftime format, required by `format`.
/// - `days_offset` (optional): Days to add (negative for the past), required by `calculate`.
///
/// # Examples
///
/// ```json
/// {"query_type": "current"}
/// {"query_type": "format", "format_string": "%A, %B %d"}
/// {"query_type": "calculate", "days_offset": -7}
/// ```
pub struct DateTimeQuery {
    clock: Arc<dyn Clock>,
}

impl DateTimeQuery {
    /// Create a tool reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for DateTimeQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DateTimeQuery {
    fn name(&self) -> &str {
        "datetime_query"
    }

    fn description(&self) -> &str {
        "Answers date and time questions: the current local time, the current time in a \
         custom strftime format, or the date a number of days from now."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required("query_type", FieldType::String, "Kind of query")
                .one_of(QUERY_TYPES),
            FieldSpec::optional(
                "format_string",
                FieldType::String,
                "strftime format such as '%Y-%m-%d %H:%M:%S' (for 'format')",
            ),
            FieldSpec::optional(
                "days_offset",
                FieldType::Integer,
                "Days from now, negative for the past (for 'calculate')",
            ),
        ])
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let query_type = args.get_string("query_type")?;
        let format_string = args.get_string_opt("format_string");
        let days_offset = args.get_integer_opt("days_offset")?;

        debug!("Date/time query '{}'", query_type);

        query(
            self.clock.as_ref(),
            &query_type,
            format_string.as_deref(),
            days_offset,
        )
        .map(ToolOutput::success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 2, 27)
                .unwrap()
                .and_hms_opt(14, 5, 9)
                .unwrap(),
        )
    }

    #[test]
    fn test_current() {
        assert_eq!(
            query(&clock(), "current", None, None).unwrap(),
            "Current time: 2024-02-27 14:05:09"
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(
            query(&clock(), "format", Some("%d/%m/%Y"), None).unwrap(),
            "Formatted time: 27/02/2024"
        );
        assert_eq!(
            query(&clock(), "format", Some("%A %H:%M"), None).unwrap(),
            "Formatted time: Tuesday 14:05"
        );
    }

    #[test]
    fn test_format_missing_or_malformed() {
        assert!(matches!(
            query(&clock(), "format", None, None),
            Err(ToolError::MissingParameter(p)) if p == "format_string"
        ));
        assert!(matches!(
            query(&clock(), "format", Some("%Q"), None),
            Err(ToolError::FormatError(_))
        ));
    }

    #[test]
    fn test_calculate_crosses_leap_day() {
        assert_eq!(
            query(&clock(), "calculate", None, Some(3)).unwrap(),
            "Calculated time: 2024-03-01 14:05:09"
        );
        assert_eq!(
            query(&clock(), "calculate", None, Some(-27)).unwrap(),
            "Calculated time: 2024-01-31 14:05:09"
        );
    }

    #[test]
    fn test_calculate_missing_or_huge_offset() {
        assert!(matches!(
            query(&clock(), "calculate", None, None),
            Err(ToolError::MissingParameter(p)) if p == "days_offset"
        ));
        assert!(matches!(
            query(&clock(), "calculate", None, Some(i64::MAX)),
            Err(ToolError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unknown_query_type() {
        assert!(matches!(
            query(&clock(), "timezone", None, None),
            Err(ToolError::UnsupportedOperation(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_with_injected_clock() {
        let tool = DateTimeQuery::with_clock(Arc::new(clock()));
        let mut params = std::collections::HashMap::new();
        params.insert("query_type".to_string(), serde_json::json!("calculate"));
        params.insert("days_offset".to_string(), serde_json::json!(7));

        let result = tool.execute(ToolArgs::new(params)).await.unwrap();
        assert_eq!(result.content, "Calculated time: 2024-03-05 14:05:09");
    }
}
