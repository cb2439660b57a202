//! Validation of user-supplied names
//!
//! Class names end up in PHP source and table names end up in catalog
//! queries, so both are checked against strict allow-lists before use.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static PHP_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*$").unwrap());

static SQL_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_$]+$").unwrap());

/// MySQL limit for table and schema names
const MAX_SQL_IDENTIFIER_LEN: usize = 64;

pub fn is_valid_php_identifier(segment: &str) -> bool {
    PHP_IDENTIFIER.is_match(segment)
}

pub fn is_valid_sql_identifier(name: &str) -> bool {
    name.len() <= MAX_SQL_IDENTIFIER_LEN && SQL_IDENTIFIER.is_match(name)
}

/// Check a raw class name argument such as `Blog/Post` or `App\Models\User`
pub fn validate_class_name(raw: &str) -> Result<()> {
    let trimmed = raw.trim().trim_start_matches(['\\', '/']);
    if trimmed.is_empty() {
        return Err(Error::invalid_input("class name must not be empty"));
    }

    for segment in trimmed.split(['\\', '/']) {
        if !is_valid_php_identifier(segment) {
            return Err(Error::invalid_input(format!(
                "'{}' is not a valid class name (bad segment '{}')",
                raw, segment
            )));
        }
    }

    Ok(())
}

/// Check the `--extend` argument; an empty value means "no parent given"
pub fn validate_extend_class(raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Ok(());
    }
    validate_class_name(raw)
}

/// Check a table or schema name before it reaches the catalog
pub fn validate_sql_identifier(kind: &str, name: &str) -> Result<()> {
    if is_valid_sql_identifier(name) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "{} name '{}' may only contain letters, digits, '_' and '$' (max {} characters)",
            kind, name, MAX_SQL_IDENTIFIER_LEN
        )))
    }
}
