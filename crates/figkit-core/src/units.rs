//! Physical length utilities
//!
//! Handles conversion between figure-fraction coordinates and physical
//! lengths (cm, mm, inch, typographic point). Figure sizes are always carried
//! in inches, the unit the plotting library uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnitError;

const CM_PER_INCH: f64 = 2.54;
const MM_PER_INCH: f64 = 25.4;
const PT_PER_INCH: f64 = 72.0;

/// Physical length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Centimeters
    #[default]
    Cm,
    /// Millimeters
    Mm,
    /// Inches
    Inch,
    /// Typographic points (1/72 inch)
    Pt,
}

impl LengthUnit {
    /// Converts a value expressed in this unit to inches.
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            Self::Cm => value / CM_PER_INCH,
            Self::Mm => value / MM_PER_INCH,
            Self::Inch => value,
            Self::Pt => value / PT_PER_INCH,
        }
    }

    /// Converts inches to a value expressed in this unit.
    pub fn from_inches(self, inches: f64) -> f64 {
        match self {
            Self::Cm => inches * CM_PER_INCH,
            Self::Mm => inches * MM_PER_INCH,
            Self::Inch => inches,
            Self::Pt => inches * PT_PER_INCH,
        }
    }

    /// Short label ("cm", "mm", "in", "pt")
    pub fn label(self) -> &'static str {
        match self {
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Inch => "in",
            Self::Pt => "pt",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LengthUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(Self::Cm),
            "mm" | "millimeter" | "millimeters" => Ok(Self::Mm),
            "in" | "inch" | "inches" | "\"" => Ok(Self::Inch),
            "pt" | "point" | "points" => Ok(Self::Pt),
            other => Err(UnitError::UnknownUnit(other.to_string())),
        }
    }
}

/// Format a length for display
///
/// * `inches` - Value in inches
/// * `unit` - Target unit
pub fn format_length(inches: f64, unit: LengthUnit) -> String {
    format!("{:.2} {}", unit.from_inches(inches), unit.label())
}

/// Parse a length string to inches
///
/// Accepts an optional unit suffix (`"2.5cm"`, `"1 in"`, `"12pt"`); without a
/// suffix the value is read in `default_unit`. An empty string is zero.
pub fn parse_length(input: &str, default_unit: LengthUnit) -> Result<f64, UnitError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    let split = input
        .find(|c: char| c.is_ascii_alphabetic() || c == '"')
        .unwrap_or(input.len());
    let (number, suffix) = input.split_at(split);
    let unit = if suffix.trim().is_empty() {
        default_unit
    } else {
        suffix.parse()?
    };

    let value = number
        .trim()
        .parse::<f64>()
        .map_err(|e| UnitError::InvalidLength {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
    Ok(unit.to_inches(value))
}

/// Converts a physical offset along one figure axis to a figure fraction.
///
/// Negative lengths are measured from the far edge (right or top), so
/// `-1 cm` on a 10 cm wide figure lands at 0.9.
pub fn length_to_fraction(
    value: f64,
    unit: LengthUnit,
    figure_extent_in: f64,
) -> Result<f64, UnitError> {
    if figure_extent_in <= 0.0 {
        return Err(UnitError::ZeroExtent(figure_extent_in));
    }
    let fraction = unit.to_inches(value) / figure_extent_in;
    Ok(if fraction < 0.0 { fraction + 1.0 } else { fraction })
}

/// Converts a physical extent (width or height) to a figure fraction.
pub fn extent_to_fraction(value: f64, unit: LengthUnit, figure_extent_in: f64) -> Result<f64, UnitError> {
    if figure_extent_in <= 0.0 {
        return Err(UnitError::ZeroExtent(figure_extent_in));
    }
    Ok(unit.to_inches(value) / figure_extent_in)
}

/// Converts a figure fraction along one axis to a physical length.
pub fn fraction_to_length(fraction: f64, unit: LengthUnit, figure_extent_in: f64) -> f64 {
    unit.from_inches(fraction * figure_extent_in)
}
