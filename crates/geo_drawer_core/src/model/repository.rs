//! Repository identity and its metadata row.

use std::path::{Path, PathBuf};

/// Extension of container files created by the bootstrapper.
pub const CONTAINER_EXTENSION: &str = "gpkg";

pub const REPO_NAME_COLUMN: &str = "repo_name";
pub const PATH_COLUMN: &str = "path";

/// Name and target directory of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    name: String,
    path: PathBuf,
}

impl RepositoryMetadata {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value stored in the `path` column of the metadata row.
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// `{name}.gpkg`
    pub fn container_file_name(&self) -> String {
        format!("{}.{CONTAINER_EXTENSION}", self.name)
    }

    /// `path / {name}.gpkg`
    pub fn container_path(&self) -> PathBuf {
        self.path.join(self.container_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::RepositoryMetadata;
    use std::path::Path;

    #[test]
    fn container_path_joins_name_and_extension() {
        let metadata = RepositoryMetadata::new("demo", "/tmp/repos");

        assert_eq!(metadata.container_file_name(), "demo.gpkg");
        assert_eq!(metadata.container_path(), Path::new("/tmp/repos/demo.gpkg"));
    }

    #[test]
    fn path_string_keeps_path_verbatim() {
        let metadata = RepositoryMetadata::new("café repo", "/data/geo");

        assert_eq!(metadata.name(), "café repo");
        assert_eq!(metadata.path_string(), "/data/geo");
    }
}
