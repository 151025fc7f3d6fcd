//! Environment variable helpers
//!
//! Blank values are treated the same as missing ones so that an empty
//! `STORAGE_ADDR=` line in a `.env` file does not override a config default.

use std::str::FromStr;

use tracing::warn;

/// Read a variable, returning `None` when it is unset or blank.
pub fn var_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable; unparsable values are logged and ignored.
pub fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = var_non_empty(key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(%key, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_missing() {
        std::env::set_var("COMMON_ENV_TEST_BLANK", "   ");
        assert_eq!(var_non_empty("COMMON_ENV_TEST_BLANK"), None);
        std::env::remove_var("COMMON_ENV_TEST_BLANK");
    }

    #[test]
    fn parse_var_reads_numbers_and_skips_garbage() {
        std::env::set_var("COMMON_ENV_TEST_PORT", " 8001 ");
        assert_eq!(parse_var::<u16>("COMMON_ENV_TEST_PORT"), Some(8001));
        std::env::set_var("COMMON_ENV_TEST_PORT", "eighty");
        assert_eq!(parse_var::<u16>("COMMON_ENV_TEST_PORT"), None);
        std::env::remove_var("COMMON_ENV_TEST_PORT");
    }
}
