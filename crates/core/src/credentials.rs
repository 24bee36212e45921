//! Fail-fast lookup of the text-generation service credential.

use crate::error::{ConfigError, Result};
use secrecy::SecretString;

/// Reads the credential named by `var` from the process environment.
///
/// Blank values count as unset.
///
/// # Errors
///
/// Returns [`ConfigError::MissingCredential`] if the variable is absent or blank.
pub fn require_credential(var: &str) -> Result<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => {
            tracing::info!(var, "Credential found");
            Ok(SecretString::from(value.trim().to_string()))
        }
        _ => Err(ConfigError::MissingCredential {
            var: var.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_missing_credential() {
        let err = require_credential("SALES_KPI_TEST_UNSET_CREDENTIAL").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { ref var } if var == "SALES_KPI_TEST_UNSET_CREDENTIAL"));
        assert!(err.to_string().contains("SALES_KPI_TEST_UNSET_CREDENTIAL"));
    }

    #[test]
    fn test_blank_credential_is_missing() {
        std::env::set_var("SALES_KPI_TEST_BLANK_CREDENTIAL", "   ");
        assert!(require_credential("SALES_KPI_TEST_BLANK_CREDENTIAL").is_err());
    }

    #[test]
    fn test_present_credential_is_trimmed() {
        std::env::set_var("SALES_KPI_TEST_PRESENT_CREDENTIAL", " sk-test \n");
        let secret = require_credential("SALES_KPI_TEST_PRESENT_CREDENTIAL").unwrap();
        assert_eq!(secret.expose_secret(), "sk-test");
    }
}
