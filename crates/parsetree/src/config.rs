//! Validator configuration.
//!
//! Loaded from the `[validate]` table of a `parsetree.toml` file:
//!
//! ```toml
//! [validate]
//! mode = "interactive"
//! check_nesting = false
//! ```
//!
//! Every field is optional and falls back to [`ValidateConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Where the tree came from, which decides whether directives are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseMode {
    /// Compiler input: directives are rejected.
    #[default]
    Batch,
    /// Interactive session input: directives are accepted.
    Interactive,
}

/// Which checks the validator runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    pub mode: PhraseMode,
    /// Spans must not end before they start and must not straddle files.
    pub check_spans: bool,
    /// Non-ghost child spans must lie inside their nearest non-ghost
    /// ancestor's span.
    pub check_nesting: bool,
    /// Reject `Assert` whose condition is the literal `false`.
    pub require_canonical_assert_false: bool,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        ValidateConfig {
            mode: PhraseMode::Batch,
            check_spans: true,
            check_nesting: true,
            require_canonical_assert_false: true,
        }
    }
}

/// Layout of `parsetree.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsetreeConfig {
    pub validate: ValidateConfig,
}

impl ValidateConfig {
    pub fn interactive() -> Self {
        ValidateConfig {
            mode: PhraseMode::Interactive,
            ..Self::default()
        }
    }

    /// Load the `[validate]` table from a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading validator configuration");
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ParsetreeConfig = toml::from_str(content)?;
        debug!(?config.validate, "validator configuration");
        Ok(config.validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_when_table_missing() {
        let config = ValidateConfig::from_toml_str("").unwrap();
        assert_eq!(config, ValidateConfig::default());
        assert_eq!(config.mode, PhraseMode::Batch);
    }

    #[test]
    fn test_partial_table() {
        let config = ValidateConfig::from_toml_str(
            r#"
[validate]
mode = "interactive"
check_nesting = false
"#,
        )
        .unwrap();
        assert_eq!(config.mode, PhraseMode::Interactive);
        assert!(!config.check_nesting);
        assert!(config.check_spans);
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let err = ValidateConfig::from_toml_str("[validate]\nmode = \"daemon\"\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("parsetree.toml");
        std::fs::write(&path, "[validate]\nrequire_canonical_assert_false = false\n")?;

        let config = ValidateConfig::load(&path)?;
        assert!(!config.require_canonical_assert_false);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ValidateConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
