//! Field loading shared by every command

use anyhow::{Context, Result};
use datefield_eval::{DateFieldConfig, DateFieldType, FieldInput, RequestContext, SystemClock};
use datefield_types::TimeUnit;
use log::debug;
use std::fs;
use std::path::PathBuf;

/// Options describing the field and the request "now"
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    /// JSON field mapping file
    pub mapping: Option<PathBuf>,
    /// Overrides the mapping's `format`
    pub format: Option<String>,
    /// Overrides the mapping's `numeric_resolution`
    pub numeric_resolution: Option<TimeUnit>,
    /// Pins "now"; resolved with the field against the system clock
    pub now: Option<String>,
}

impl FieldOptions {
    /// The mapping with command-line overrides applied
    pub fn config(&self) -> Result<DateFieldConfig> {
        let mut config = match &self.mapping {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
                DateFieldConfig::from_json(&json)
                    .with_context(|| format!("Failed to load mapping file: {}", path.display()))?
            }
            None => DateFieldConfig::default(),
        };
        if let Some(format) = &self.format {
            config.format = Some(format.clone());
        }
        if let Some(unit) = self.numeric_resolution {
            config.numeric_resolution = Some(unit);
        }
        Ok(config)
    }

    /// Build the field
    pub fn field(&self) -> Result<DateFieldType> {
        let field = self.config()?.build().context("Failed to build date field")?;
        debug!("Using field mapping {}", field.to_mapping(true));
        Ok(field)
    }

    /// Capture the request context for `field`
    pub fn context(&self, field: &DateFieldType) -> Result<RequestContext> {
        let system = RequestContext::capture(&SystemClock);
        match &self.now {
            Some(text) => {
                let now = field
                    .resolve(&FieldInput::from(text.as_str()), &system)
                    .with_context(|| format!("Failed to resolve --now '{text}'"))?;
                Ok(RequestContext::at(now))
            }
            None => Ok(system),
        }
    }

    /// Build the field and capture one context for it
    pub fn load(&self) -> Result<(DateFieldType, RequestContext)> {
        let field = self.field()?;
        let ctx = self.context(&field)?;
        Ok((field, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datefield_types::Instant;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_mapping() {
        let field = FieldOptions::default().field().unwrap();
        assert_eq!(field, DateFieldType::default());
    }

    #[test]
    fn test_flags_override_mapping() {
        let options = FieldOptions {
            format: Some("yyyy/MM/dd".into()),
            numeric_resolution: Some(TimeUnit::Seconds),
            ..Default::default()
        };
        let field = options.field().unwrap();
        assert_eq!(field.format().spec(), "yyyy/MM/dd");
        assert_eq!(field.time_unit(), TimeUnit::Seconds);
    }

    #[test]
    fn test_now_is_resolved_with_the_field() {
        let options = FieldOptions {
            numeric_resolution: Some(TimeUnit::Seconds),
            now: Some("1622505600".into()),
            ..Default::default()
        };
        let (_, ctx) = options.load().unwrap();
        assert_eq!(ctx.now(), Instant::from_millis(1_622_505_600_000));
    }

    #[test]
    fn test_missing_mapping_file() {
        let options = FieldOptions {
            mapping: Some(PathBuf::from("/nonexistent/mapping.json")),
            ..Default::default()
        };
        let err = options.field().unwrap_err();
        assert!(err.to_string().contains("Failed to read mapping file"));
    }

    #[test]
    fn test_bad_now() {
        let options = FieldOptions {
            now: Some("yesterday".into()),
            ..Default::default()
        };
        let field = options.field().unwrap();
        assert!(options.context(&field).is_err());
    }
}
