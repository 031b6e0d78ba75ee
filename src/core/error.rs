//! Typed error handling for the list view engine
//!
//! Only two surfaces of the crate are fallible:
//!
//! - [`SchemaError`]: a page schema that references undeclared fields or
//!   declares a field twice
//! - [`ConfigError`]: a YAML page configuration that cannot be read or parsed
//!
//! Filtering, sorting, summarizing and the view controller are total
//! functions. A degenerate input (empty collection, unknown filter key,
//! unparsable date) produces a defined output instead of an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use listview::prelude::*;
//!
//! match ViewConfig::from_yaml_str(yaml).and_then(|c| c.build_schema()) {
//!     Ok(schema) => println!("{} fields", schema.fields().len()),
//!     Err(ViewError::Schema(SchemaError::UnknownField { field, .. })) => {
//!         eprintln!("config references unknown field {}", field);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Result alias used by the fallible parts of the crate
pub type Result<T> = std::result::Result<T, ViewError>;

/// The main error type for the list view engine
#[derive(Debug, Error)]
pub enum ViewError {
    /// Schema construction errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Configuration loading errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ViewError {
    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::Schema(e) => e.error_code(),
            ViewError::Config(e) => e.error_code(),
        }
    }
}

impl From<serde_yaml::Error> for ViewError {
    fn from(err: serde_yaml::Error) -> Self {
        ViewError::Config(ConfigError::Yaml(err))
    }
}

impl From<std::io::Error> for ViewError {
    fn from(err: std::io::Error) -> Self {
        ViewError::Config(ConfigError::Io(err))
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors raised while building a [`ViewSchema`](crate::core::ViewSchema)
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field was declared with an empty name
    #[error("field names must not be empty")]
    EmptyFieldName,

    /// The same field name was declared twice
    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    /// A summary, active rule or default sort references an undeclared field
    #[error("{context} references unknown field '{field}'")]
    UnknownField { context: String, field: String },

    /// Two summaries share the same output name
    #[error("summary '{name}' is declared more than once")]
    DuplicateSummary { name: String },
}

impl SchemaError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SchemaError::EmptyFieldName => "SCHEMA_EMPTY_FIELD_NAME",
            SchemaError::DuplicateField { .. } => "SCHEMA_DUPLICATE_FIELD",
            SchemaError::UnknownField { .. } => "SCHEMA_UNKNOWN_FIELD",
            SchemaError::DuplicateSummary { .. } => "SCHEMA_DUPLICATE_SUMMARY",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while loading a [`ViewConfig`](crate::config::ViewConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read view config: {0}")]
    Io(#[source] std::io::Error),

    /// The YAML document is malformed or does not match the config shape
    #[error("failed to parse view config: {0}")]
    Yaml(#[source] serde_yaml::Error),

    /// A semantic problem not covered by the schema checks
    #[error("invalid view config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "CONFIG_IO_ERROR",
            ConfigError::Yaml(_) => "CONFIG_PARSE_ERROR",
            ConfigError::Invalid { .. } => "CONFIG_INVALID",
        }
    }
}
