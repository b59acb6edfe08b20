//! GeoPackage container files, written through `rusqlite-gpkg`.
//!
//! # Responsibility
//! - Create or open `.gpkg` files under an explicit existing-file policy.
//! - Write the repository metadata layer and the placeholder layers.
//!
//! # Invariants
//! - Layer names are unique ignoring ASCII case; existing layers are never
//!   edited, replaced or dropped.
//! - Names with a reserved `gpkg_`/`sqlite_` prefix are rejected before any write.

use crate::model::default_layers::{placeholder_point, GEOMETRY_COLUMN, ID_COLUMN, PLACEHOLDER_ID};
use crate::model::repository::{RepositoryMetadata, PATH_COLUMN, REPO_NAME_COLUMN};
use geo_types::GeometryCollection;
use log::{error, info, warn};
use rusqlite_gpkg::{params, ColumnSpec, ColumnType, Dimension, GeometryType, Gpkg, GpkgError};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Table name prefixes owned by SQLite and the GeoPackage schema.
pub const RESERVED_PREFIXES: [&str; 2] = ["gpkg_", "sqlite_"];

pub type ContainerResult<T> = Result<T, ContainerError>;

#[derive(Debug)]
pub enum ContainerError {
    Gpkg(GpkgError),
    Io(std::io::Error),
    AlreadyExists(PathBuf),
    NotFound(PathBuf),
    LayerExists(String),
    InvalidLayerName(String),
}

impl Display for ContainerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gpkg(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::AlreadyExists(path) => {
                write!(f, "container `{}` already exists", path.display())
            }
            Self::NotFound(path) => write!(f, "container `{}` does not exist", path.display()),
            Self::LayerExists(name) => write!(f, "layer `{name}` already exists"),
            Self::InvalidLayerName(name) => write!(f, "invalid layer name `{name}`"),
        }
    }
}

impl Error for ContainerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gpkg(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::AlreadyExists(_)
            | Self::NotFound(_)
            | Self::LayerExists(_)
            | Self::InvalidLayerName(_) => None,
        }
    }
}

impl From<GpkgError> for ContainerError {
    fn from(value: GpkgError) -> Self {
        Self::Gpkg(value)
    }
}

impl From<std::io::Error> for ContainerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// What `Container::create` does when the target file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingContainerPolicy {
    /// Refuse with `ContainerError::AlreadyExists` and leave the file untouched.
    #[default]
    Fail,
    /// Delete the existing file and start from an empty container.
    Overwrite,
}

/// `true` for empty names and names starting with a reserved prefix (any case).
pub fn is_reserved_layer_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    name.trim().is_empty()
        || RESERVED_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}

/// Open GeoPackage file.
///
/// The underlying connection is closed when the value is dropped.
pub struct Container {
    gpkg: Gpkg,
    path: PathBuf,
}

impl Container {
    /// Creates a new container file.
    ///
    /// # Side effects
    /// - Removes an existing file at `path` under `ExistingContainerPolicy::Overwrite`.
    /// - Emits `container_create` logging events with duration and status.
    pub fn create(
        path: impl AsRef<Path>,
        on_existing: ExistingContainerPolicy,
    ) -> ContainerResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        info!(
            "event=container_create module=container status=start path={}",
            path.display()
        );

        match create_file(path, on_existing) {
            Ok(gpkg) => {
                info!(
                    "event=container_create module=container status=ok path={} duration_ms={}",
                    path.display(),
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    gpkg,
                    path: path.to_path_buf(),
                })
            }
            Err(err) => {
                error!(
                    "event=container_create module=container status=error path={} duration_ms={} error_code=container_create_failed error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Opens an existing container for writing new layers.
    ///
    /// # Errors
    /// - `NotFound` when no file exists at `path`.
    pub fn open(path: impl AsRef<Path>) -> ContainerResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            error!(
                "event=container_open module=container status=error path={} error_code=not_found",
                path.display()
            );
            return Err(ContainerError::NotFound(path.to_path_buf()));
        }

        let gpkg = Gpkg::open(path)?;
        info!(
            "event=container_open module=container status=ok path={}",
            path.display()
        );
        Ok(Self {
            gpkg,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gpkg(&self) -> &Gpkg {
        &self.gpkg
    }

    /// Registered layer names, sorted.
    pub fn layer_names(&self) -> ContainerResult<Vec<String>> {
        let mut names = self.gpkg.list_layers()?;
        names.sort();
        Ok(names)
    }

    pub fn layer_exists(&self, name: &str) -> ContainerResult<bool> {
        Ok(self
            .gpkg
            .list_layers()?
            .iter()
            .any(|layer| layer.eq_ignore_ascii_case(name)))
    }

    /// Writes the single `{repo_name, path}` row as a layer named after the repository.
    ///
    /// The row carries an empty geometry collection; only its attributes matter.
    pub fn write_metadata_layer(&self, metadata: &RepositoryMetadata) -> ContainerResult<()> {
        let name = metadata.name();
        let path = metadata.path_string();

        self.write_layer_logged(name, |gpkg| {
            let columns = vec![
                ColumnSpec {
                    name: REPO_NAME_COLUMN.to_string(),
                    column_type: ColumnType::Varchar,
                },
                ColumnSpec {
                    name: PATH_COLUMN.to_string(),
                    column_type: ColumnType::Varchar,
                },
            ];
            let layer = gpkg.create_layer(
                name,
                GEOMETRY_COLUMN,
                GeometryType::GeometryCollection,
                Dimension::Xy,
                // srs_id 0: undefined geographic CRS, none is configured.
                0,
                &columns,
            )?;
            layer.insert(GeometryCollection::<f64>(Vec::new()), params![name, path])?;
            Ok(())
        })
    }

    /// Writes a POINT layer holding the placeholder feature `{id: 1, geom: POINT(0 0)}`.
    pub fn write_placeholder_layer(&self, name: &str) -> ContainerResult<()> {
        self.write_layer_logged(name, |gpkg| {
            let columns = vec![ColumnSpec {
                name: ID_COLUMN.to_string(),
                column_type: ColumnType::Integer,
            }];
            let layer = gpkg.create_layer(
                name,
                GEOMETRY_COLUMN,
                GeometryType::Point,
                Dimension::Xy,
                0,
                &columns,
            )?;
            layer.insert(placeholder_point(), params![PLACEHOLDER_ID])?;
            Ok(())
        })
    }

    fn write_layer_logged(
        &self,
        name: &str,
        write: impl FnOnce(&Gpkg) -> Result<(), GpkgError>,
    ) -> ContainerResult<()> {
        let started_at = Instant::now();

        let result = self
            .check_new_layer(name)
            .and_then(|()| write(&self.gpkg).map_err(ContainerError::from));
        match &result {
            Ok(()) => info!(
                "event=layer_write module=container status=ok layer={} duration_ms={}",
                name,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=layer_write module=container status=error layer={} duration_ms={} error_code=layer_write_failed error={}",
                name,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn check_new_layer(&self, name: &str) -> ContainerResult<()> {
        if is_reserved_layer_name(name) {
            return Err(ContainerError::InvalidLayerName(name.to_string()));
        }
        if self.layer_exists(name)? {
            return Err(ContainerError::LayerExists(name.to_string()));
        }
        Ok(())
    }
}

fn create_file(path: &Path, on_existing: ExistingContainerPolicy) -> ContainerResult<Gpkg> {
    if path.exists() {
        match on_existing {
            ExistingContainerPolicy::Fail => {
                return Err(ContainerError::AlreadyExists(path.to_path_buf()));
            }
            ExistingContainerPolicy::Overwrite => {
                warn!(
                    "event=container_overwrite module=container status=start path={}",
                    path.display()
                );
                std::fs::remove_file(path)?;
            }
        }
    }

    Ok(Gpkg::open(path)?)
}
