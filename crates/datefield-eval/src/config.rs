//! Date field mapping configuration

use crate::field::DateFieldType;
use crate::resolver::ValueResolver;
use datefield_diagnostics::{DateFieldError, Result};
use datefield_parser::{DATE_OPTIONAL_TIME, DisplayFormat};
use datefield_types::{DEFAULT_PRECISION_STEP, TimeUnit};
use serde::{Deserialize, Serialize};

/// Mapping type name for date fields
pub const FIELD_TYPE: &str = "solr_date";

/// Field mapping as written by the user
///
/// Every option is optional; [`DateFieldConfig::build`] applies defaults
/// and validates the combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateFieldConfig {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_resolution: Option<TimeUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_upper_inclusive: Option<bool>,
    /// Older name for `round_upper_inclusive`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_ceil: Option<bool>,
    /// Older name for `round_upper_inclusive`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_upper_inclusive: Option<bool>,
}

impl DateFieldConfig {
    /// Read a mapping from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DateFieldError::invalid_config(e.to_string()))
    }

    /// Read a mapping from an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| DateFieldError::invalid_config(e.to_string()))
    }

    /// Validate the mapping and compile it into a field type
    pub fn build(&self) -> Result<DateFieldType> {
        if let Some(field_type) = &self.field_type {
            if field_type != FIELD_TYPE {
                return Err(DateFieldError::invalid_config(format!(
                    "type must be [{FIELD_TYPE}], got [{field_type}]"
                )));
            }
        }

        let precision_step = self.precision_step.unwrap_or(DEFAULT_PRECISION_STEP);
        if !(1..=64).contains(&precision_step) {
            return Err(DateFieldError::invalid_config(format!(
                "precision_step must be between 1 and 64, got [{precision_step}]"
            )));
        }

        let round_flags = [
            ("round_upper_inclusive", self.round_upper_inclusive),
            ("round_ceil", self.round_ceil),
            ("parse_upper_inclusive", self.parse_upper_inclusive),
        ];
        let given: Vec<_> = round_flags.iter().filter(|(_, v)| v.is_some()).collect();
        if given.len() > 1 {
            let names: Vec<_> = given.iter().map(|(name, _)| *name).collect();
            return Err(DateFieldError::invalid_config(format!(
                "only one of [{}] may be set",
                names.join(", ")
            )));
        }
        let round_upper_inclusive = given.first().and_then(|(_, v)| *v).unwrap_or(true);

        let format = DisplayFormat::new(self.format.as_deref().unwrap_or(DATE_OPTIONAL_TIME))?;
        let resolver = ValueResolver::new(format, self.numeric_resolution.unwrap_or_default());

        Ok(DateFieldType::from_parts(
            resolver,
            self.null_value.clone(),
            precision_step,
            round_upper_inclusive,
        ))
    }
}
