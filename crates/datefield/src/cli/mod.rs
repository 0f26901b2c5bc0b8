//! CLI functionality for the datefield tool
//!
//! This module contains all CLI-related functionality including:
//! - Field loading from mappings and flags
//! - Value resolution and formatting
//! - Range, classification and fuzzy queries
//! - Output formatting

pub mod classify;
pub mod field;
pub mod format;
pub mod fuzzy;
pub mod output;
pub mod range;
pub mod resolve;
