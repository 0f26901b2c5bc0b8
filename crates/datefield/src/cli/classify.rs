//! Classify command implementation

use super::output::{self, OutputFormat};
use anyhow::Result;
use datefield_eval::is_cache_unsafe;
use serde::Serialize;
use std::fmt;

/// Configuration for classify command
pub struct ClassifyConfig {
    pub expressions: Vec<String>,
    pub output_format: OutputFormat,
}

/// Cache safety of one query bound
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifyReport {
    pub expression: String,
    pub cacheable: bool,
}

impl ClassifyReport {
    pub fn new(expression: &str) -> Self {
        Self {
            expression: expression.to_string(),
            cacheable: !is_cache_unsafe(expression),
        }
    }
}

impl fmt::Display for ClassifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            output::verdict(self.cacheable, "cacheable", "not cacheable"),
            self.expression
        )
    }
}

pub fn run(config: ClassifyConfig) -> Result<()> {
    if config.expressions.is_empty() {
        anyhow::bail!("No expressions specified to classify");
    }
    let reports: Vec<_> = config.expressions.iter().map(|e| ClassifyReport::new(e)).collect();
    output::print_reports(&reports, config.output_format)
}
