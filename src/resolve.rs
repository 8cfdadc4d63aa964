use std::path::{Path, PathBuf};

/// Turns a source identifier into a readable location.
pub trait PathResolver {
    fn resolve(&self, source_id: &str) -> PathBuf;
}

/// Uses the identifier as a path unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectResolver;

impl PathResolver for DirectResolver {
    fn resolve(&self, source_id: &str) -> PathBuf {
        PathBuf::from(source_id)
    }
}

/// Resolves relative identifiers against a data directory; absolute ones
/// pass through.
#[derive(Debug, Clone)]
pub struct RootedResolver {
    root: PathBuf,
}

impl RootedResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RootedResolver { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for RootedResolver {
    fn resolve(&self, source_id: &str) -> PathBuf {
        let path = Path::new(source_id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_resolver() {
        let resolver = RootedResolver::new("/data/xs");
        assert_eq!(resolver.resolve("o3.xs"), PathBuf::from("/data/xs/o3.xs"));
        assert_eq!(resolver.resolve("/tmp/no2.xs"), PathBuf::from("/tmp/no2.xs"));
        assert_eq!(DirectResolver.resolve("a/b"), PathBuf::from("a/b"));
    }
}
