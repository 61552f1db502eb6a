//! Defines the ID type used for database records.

/// Alias for the integer type used for database primary keys.
pub type DatabaseId = i64;
