//! Repository bootstrapper: creates the container and its default layers.
//!
//! # Responsibility
//! - Validate the target directory before any write.
//! - Create `{name}.gpkg` with its metadata row, then the default layers.
//!
//! # Invariants
//! - `add_default_layers` requires a container created by this instance.
//! - Writer failures are returned unchanged as `BootstrapError::IoWrite`.
//! - A container file whose metadata layer could not be written is removed.
//! - Default layers are written in ascending name order; the first failure
//!   stops the loop and layers already written stay in place.

use crate::container::{is_reserved_layer_name, Container, ContainerError, ExistingContainerPolicy};
use crate::model::default_layers::{default_layer_set, is_default_layer_name};
use crate::model::repository::RepositoryMetadata;
use crate::progress::{ProgressSink, StdoutProgress};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type BootstrapResult<T> = Result<T, BootstrapError>;

#[derive(Debug)]
pub enum BootstrapError {
    /// Target directory is missing (or is not a directory).
    PathNotFound(PathBuf),
    /// Repository name cannot be used as a file name inside the target directory.
    InvalidName(String),
    /// Container or layer write failed.
    IoWrite(ContainerError),
    /// `add_default_layers` was called before `create_container`.
    NoActiveRepository,
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound(path) => write!(f, "Path {} does not exist", path.display()),
            Self::InvalidName(name) => write!(f, "invalid repository name `{name}`"),
            Self::IoWrite(err) => write!(f, "write failed: {err}"),
            Self::NoActiveRepository => {
                write!(f, "no active repository; create the container first")
            }
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IoWrite(err) => Some(err),
            Self::PathNotFound(_) | Self::InvalidName(_) | Self::NoActiveRepository => None,
        }
    }
}

impl From<ContainerError> for BootstrapError {
    fn from(value: ContainerError) -> Self {
        Self::IoWrite(value)
    }
}

/// Owns one repository's identity and the handle of its container file.
pub struct RepositoryBootstrapper<P = StdoutProgress> {
    metadata: RepositoryMetadata,
    current_repository: Option<PathBuf>,
    default_layers: BTreeSet<&'static str>,
    on_existing: ExistingContainerPolicy,
    progress: P,
}

impl RepositoryBootstrapper {
    /// Stores `name` and `path` verbatim without touching the filesystem.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            metadata: RepositoryMetadata::new(name, path),
            current_repository: None,
            default_layers: default_layer_set(),
            on_existing: ExistingContainerPolicy::default(),
            progress: StdoutProgress,
        }
    }

    /// Builds a bootstrapper from configuration values, failing fast on a bad target.
    ///
    /// # Errors
    /// - `PathNotFound` when `path` is not an existing directory.
    /// - `InvalidName` when `name` is blank, contains a path separator, uses a
    ///   reserved `gpkg_`/`sqlite_` prefix or equals a default layer name (any case).
    ///
    /// The path is normalized (`dir/` and `dir/./` become `dir`) before it is stored.
    pub fn from_config(name: impl Into<String>, path: impl Into<PathBuf>) -> BootstrapResult<Self> {
        let name = name.into();
        let path: PathBuf = path.into().components().collect();

        if !is_valid_repository_name(&name) {
            warn!("event=repo_config module=bootstrap status=error error_code=invalid_name");
            return Err(BootstrapError::InvalidName(name));
        }
        if !path.is_dir() {
            warn!(
                "event=repo_config module=bootstrap status=error error_code=path_not_found path={}",
                path.display()
            );
            return Err(BootstrapError::PathNotFound(path));
        }

        Ok(Self::new(name, path))
    }
}

impl<P: ProgressSink> RepositoryBootstrapper<P> {
    /// Replaces the progress receiver.
    pub fn with_progress<Q: ProgressSink>(self, progress: Q) -> RepositoryBootstrapper<Q> {
        RepositoryBootstrapper {
            metadata: self.metadata,
            current_repository: self.current_repository,
            default_layers: self.default_layers,
            on_existing: self.on_existing,
            progress,
        }
    }

    pub fn with_existing_policy(mut self, on_existing: ExistingContainerPolicy) -> Self {
        self.on_existing = on_existing;
        self
    }

    pub fn metadata(&self) -> &RepositoryMetadata {
        &self.metadata
    }

    /// Container written by `create_container`, if any.
    pub fn current_repository(&self) -> Option<&Path> {
        self.current_repository.as_deref()
    }

    pub fn default_layers(&self) -> &BTreeSet<&'static str> {
        &self.default_layers
    }

    pub fn existing_policy(&self) -> ExistingContainerPolicy {
        self.on_existing
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// Creates `{name}.gpkg` in the target directory with the metadata row.
    ///
    /// # Side effects
    /// - Sets the current container handle on success.
    /// - Reports one confirmation line naming the file and its path.
    pub fn create_container(&mut self) -> BootstrapResult<PathBuf> {
        let file_name = self.metadata.container_file_name();
        let full_path = self.metadata.container_path();

        let container = Container::create(&full_path, self.on_existing)?;
        let written = container.write_metadata_layer(&self.metadata);
        drop(container);
        if let Err(err) = written {
            discard_container(&full_path);
            return Err(err.into());
        }

        self.current_repository = Some(full_path.clone());
        info!(
            "event=repo_create module=bootstrap status=ok repo={} path={}",
            self.metadata.name(),
            full_path.display()
        );
        self.progress.report(&format!(
            "Geopackage repository '{file_name}' created at {}",
            full_path.display()
        ));

        Ok(full_path)
    }

    /// Writes one placeholder layer per default layer name.
    ///
    /// # Errors
    /// - `NoActiveRepository` before `create_container` succeeded; nothing is written.
    /// - `IoWrite` for the first layer that cannot be written.
    pub fn add_default_layers(&mut self) -> BootstrapResult<()> {
        let container_path = self
            .current_repository
            .clone()
            .ok_or(BootstrapError::NoActiveRepository)?;

        let container = Container::open(&container_path)?;
        for layer in &self.default_layers {
            container.write_placeholder_layer(layer)?;
            self.progress.report(&format!(
                "{layer} is created in {} repository",
                container_path.display()
            ));
        }

        info!(
            "event=default_layers module=bootstrap status=ok layers={} path={}",
            self.default_layers.len(),
            container_path.display()
        );
        Ok(())
    }
}

/// The name becomes both the file stem and the metadata layer name.
fn is_valid_repository_name(name: &str) -> bool {
    !(name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
        || is_reserved_layer_name(name)
        || is_default_layer_name(name))
}

fn discard_container(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => warn!(
            "event=container_discard module=bootstrap status=ok path={}",
            path.display()
        ),
        Err(err) => error!(
            "event=container_discard module=bootstrap status=error path={} error={}",
            path.display(),
            err
        ),
    }
}
