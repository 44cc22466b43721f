//! Unit converter tool for length, weight, area and temperature.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ToolError;
use crate::schema::{FieldSpec, FieldType, ToolSchema};
use crate::tool::{Tool, ToolArgs, ToolOutput};

use super::format_number;

/// Length factors relative to one meter.
const LENGTH_UNITS: &[(&str, f64)] = &[
    ("mm", 0.001),
    ("cm", 0.01),
    ("m", 1.0),
    ("km", 1000.0),
    ("inch", 0.0254),
    ("ft", 0.3048),
    ("yard", 0.9144),
    ("mile", 1609.34),
];

/// Weight factors relative to one gram.
const WEIGHT_UNITS: &[(&str, f64)] = &[
    ("mg", 0.001),
    ("g", 1.0),
    ("kg", 1000.0),
    ("ton", 1_000_000.0),
    ("oz", 28.3495),
    ("lb", 453.592),
];

/// Area factors relative to one square meter.
const AREA_UNITS: &[(&str, f64)] = &[
    ("cm2", 0.0001),
    ("m2", 1.0),
    ("km2", 1_000_000.0),
    ("acre", 4046.86),
    ("hectare", 10000.0),
];

/// Conversion category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCategory {
    Length,
    Weight,
    Area,
    Temperature,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Temperature,
        UnitCategory::Area,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Weight => "weight",
            UnitCategory::Area => "area",
            UnitCategory::Temperature => "temperature",
        }
    }

    /// Factor table for the multiplicative categories.
    pub fn table(self) -> Option<&'static [(&'static str, f64)]> {
        match self {
            UnitCategory::Length => Some(LENGTH_UNITS),
            UnitCategory::Weight => Some(WEIGHT_UNITS),
            UnitCategory::Area => Some(AREA_UNITS),
            UnitCategory::Temperature => None,
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitCategory {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(UnitCategory::Length),
            "weight" => Ok(UnitCategory::Weight),
            "area" => Ok(UnitCategory::Area),
            "temperature" => Ok(UnitCategory::Temperature),
            _ => Err(ToolError::UnsupportedCategory(s.to_string())),
        }
    }
}

fn factor(table: &[(&str, f64)], unit: &str) -> Option<f64> {
    let unit = unit.trim().to_lowercase();
    table
        .iter()
        .find(|(symbol, _)| *symbol == unit)
        .map(|(_, factor)| *factor)
}

/// Temperature scale. Only four ordered pairs convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Scale {
    fn parse(unit: &str) -> Option<Self> {
        match unit.trim().to_uppercase().as_str() {
            "C" => Some(Scale::Celsius),
            "F" => Some(Scale::Fahrenheit),
            "K" => Some(Scale::Kelvin),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Scale::Celsius => "°C",
            Scale::Fahrenheit => "°F",
            Scale::Kelvin => "K",
        }
    }
}

fn convert_temperature(value: f64, from: Scale, to: Scale) -> Option<f64> {
    match (from, to) {
        (Scale::Celsius, Scale::Fahrenheit) => Some(value * 9.0 / 5.0 + 32.0),
        (Scale::Fahrenheit, Scale::Celsius) => Some((value - 32.0) * 5.0 / 9.0),
        (Scale::Celsius, Scale::Kelvin) => Some(value + 273.15),
        (Scale::Kelvin, Scale::Celsius) => Some(value - 273.15),
        _ => None,
    }
}

fn unsupported(from: &str, to: &str) -> ToolError {
    ToolError::UnsupportedUnit {
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// Convert a value, returning the unformatted result.
pub fn convert_value(
    value: f64,
    category: UnitCategory,
    from_unit: &str,
    to_unit: &str,
) -> Result<f64, ToolError> {
    let result = match category.table() {
        Some(table) => {
            let from = factor(table, from_unit).ok_or_else(|| unsupported(from_unit, to_unit))?;
            let to = factor(table, to_unit).ok_or_else(|| unsupported(from_unit, to_unit))?;
            value * from / to
        }
        None => {
            let from = Scale::parse(from_unit).ok_or_else(|| unsupported(from_unit, to_unit))?;
            let to = Scale::parse(to_unit).ok_or_else(|| unsupported(from_unit, to_unit))?;
            convert_temperature(value, from, to).ok_or_else(|| unsupported(from_unit, to_unit))?
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ToolError::invalid("value", "result out of range"))
    }
}

/// Convert a value and format it as `"<value> <from> = <result> <to>"`.
///
/// Length, weight and area results carry 4 decimals; temperatures carry 2.
pub fn convert(
    value: f64,
    category: &str,
    from_unit: &str,
    to_unit: &str,
) -> Result<String, ToolError> {
    let category: UnitCategory = category.parse()?;
    let result = convert_value(value, category, from_unit, to_unit)?;

    if category == UnitCategory::Temperature {
        // Both parse: convert_value succeeded.
        let from = Scale::parse(from_unit).map_or("", Scale::symbol);
        let to = Scale::parse(to_unit).map_or("", Scale::symbol);
        Ok(format!("{}{} = {:.2}{}", format_number(value), from, result, to))
    } else {
        Ok(format!(
            "{} {} = {:.4} {}",
            format_number(value),
            from_unit.trim(),
            result,
            to_unit.trim()
        ))
    }
}

/// Unit converter tool.
///
/// # Parameters
///
/// - `value` (required): The number to convert.
/// - `from_unit` (required): Source unit symbol.
/// - `to_unit` (required): Target unit symbol.
/// - `category` (required): One of `length`, `weight`, `temperature`, `area`.
///
/// Temperature supports only C→F, F→C, C→K and K→C.
///
/// # Examples
///
/// ```json
/// {"value": 100, "from_unit": "cm", "to_unit": "m", "category": "length"}
/// {"value": 32, "from_unit": "F", "to_unit": "C", "category": "temperature"}
/// ```
pub struct UnitConverter;

impl UnitConverter {
    /// Create a new unit converter tool.
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for UnitConverter {
    fn name(&self) -> &str {
        "unit_converter"
    }

    fn description(&self) -> &str {
        "Converts values between units. Categories: length (mm, cm, m, km, inch, ft, yard, mile), \
         weight (mg, g, kg, ton, oz, lb), area (cm2, m2, km2, acre, hectare) and temperature \
         (C->F, F->C, C->K, K->C)."
    }

    fn schema(&self) -> ToolSchema {
        let categories: Vec<&str> = UnitCategory::ALL.iter().map(|c| c.as_str()).collect();
        ToolSchema::new(vec![
            FieldSpec::required("value", FieldType::Number, "The value to convert"),
            FieldSpec::required("from_unit", FieldType::String, "Source unit, e.g. 'cm' or 'C'"),
            FieldSpec::required("to_unit", FieldType::String, "Target unit, e.g. 'm' or 'F'"),
            FieldSpec::required("category", FieldType::String, "Conversion category")
                .one_of(&categories),
        ])
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let value = args.get_number("value")?;
        let from_unit = args.get_string("from_unit")?;
        let to_unit = args.get_string("to_unit")?;
        let category = args.get_string("category")?;

        debug!("Converting {} {} to {} ({})", value, from_unit, to_unit, category);

        let text = convert(value, &category, &from_unit, &to_unit)?;
        Ok(ToolOutput::success(text))
    }
}
