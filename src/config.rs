use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::loader::{LoadOptions, MatrixLoader};
use crate::error::{MatrixError, Result};
use crate::resolve::RootedResolver;

/// Loader settings read from a JSON file:
///
/// ```json
/// {
///   "root": "/data/cross-sections",
///   "options": { "range": [300.0, 500.0], "derivatives": true, "reverse": true }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory that relative source identifiers are resolved against.
    pub root: Option<PathBuf>,
    pub options: LoadOptions,
}

impl LoaderConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config_error = |message: String| MatrixError::Config {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))
    }

    /// A loader resolving against `root` when one is configured.
    pub fn loader<'a>(&self) -> MatrixLoader<'a> {
        match &self.root {
            Some(root) => MatrixLoader::new().with_resolver(RootedResolver::new(root.clone())),
            None => MatrixLoader::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_read_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "root": "/xs", "options": {{ "min_cols": 2, "reverse": true }} }}"#
        )
        .unwrap();

        let config = LoaderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.root, Some(PathBuf::from("/xs")));
        assert_eq!(config.options, LoadOptions::new().min_cols(2).reverse(true));
    }

    #[test]
    fn test_missing_fields_default() {
        let config: LoaderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_bad_config_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = LoaderConfig::from_json_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
