//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a config value.
///
/// `${VAR}` must be set; `${VAR:-default}` falls back to `default`.
/// Values without any `${` are returned unchanged, so a secret such as
/// `s3cr$t` survives. Once a value contains `${`, bare `$VAR` references in
/// it are expanded too.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_token_from_env() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("C2B_EXPAND_TOKEN", "abc123");
        }
        let result = expand_env("${C2B_EXPAND_TOKEN}", "bookstack.token_id").unwrap();
        assert_eq!(result, "abc123");
        unsafe {
            std::env::remove_var("C2B_EXPAND_TOKEN");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("C2B_EXPAND_UNSET");
        }
        let result = expand_env(
            "${C2B_EXPAND_UNSET:-http://localhost:6875}",
            "bookstack.base_url",
        )
        .unwrap();
        assert_eq!(result, "http://localhost:6875");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("C2B_EXPAND_MISSING");
        }
        let err = expand_env("${C2B_EXPAND_MISSING}", "bookstack.token_secret").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("C2B_EXPAND_MISSING"));
        assert!(err.to_string().contains("bookstack.token_secret"));
    }

    #[test]
    fn test_expand_embedded_in_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("C2B_EXPAND_HOST", "wiki.example.com");
        }
        let result = expand_env("https://${C2B_EXPAND_HOST}", "bookstack.base_url").unwrap();
        assert_eq!(result, "https://wiki.example.com");
        unsafe {
            std::env::remove_var("C2B_EXPAND_HOST");
        }
    }

    #[test]
    fn test_bare_var_expanded_alongside_braced() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("C2B_EXPAND_ID", "id");
            std::env::set_var("C2B_EXPAND_SUFFIX", "-x");
        }
        let result = expand_env("${C2B_EXPAND_ID}$C2B_EXPAND_SUFFIX", "bookstack.token_id").unwrap();
        assert_eq!(result, "id-x");
        unsafe {
            std::env::remove_var("C2B_EXPAND_ID");
            std::env::remove_var("C2B_EXPAND_SUFFIX");
        }
    }

    #[test]
    fn test_bare_dollar_kept() {
        let result = expand_env("s3cr$t", "bookstack.token_secret").unwrap();
        assert_eq!(result, "s3cr$t");
    }
}
