use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{FishkeyError, FishkeyResult};

pub const DATA_DIR_ENV: &str = "FISHKEY_DATA_DIR";
pub const HOME_DATA_DIR: &str = ".fishkey/reference";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    Bundled,
    Directory(PathBuf),
}

impl ReferenceSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled".to_string(),
            Self::Directory(path) => path.display().to_string(),
        }
    }
}

/// Picks where reference tables come from: explicit override, then
/// `FISHKEY_DATA_DIR`, then `~/.fishkey/reference` when present, then the
/// tables compiled into the crate.
pub fn resolve_reference_source(data_dir: Option<&Path>) -> FishkeyResult<ReferenceSource> {
    resolve_from(
        data_dir,
        std::env::var_os(DATA_DIR_ENV),
        home::home_dir(),
    )
}

fn resolve_from(
    data_dir: Option<&Path>,
    env_value: Option<OsString>,
    home_dir: Option<PathBuf>,
) -> FishkeyResult<ReferenceSource> {
    if let Some(path) = data_dir {
        let absolute = absolutize(path)?;
        if !absolute.is_dir() {
            return Err(FishkeyError::reference_data_unreadable(
                &absolute,
                "directory does not exist",
            ));
        }
        return Ok(ReferenceSource::Directory(absolute));
    }

    if let Some(value) = env_value.filter(|value| !value.is_empty()) {
        let absolute = absolutize(Path::new(&value))?;
        if absolute.is_dir() {
            return Ok(ReferenceSource::Directory(absolute));
        }
        tracing::warn!(
            path = %absolute.display(),
            "{DATA_DIR_ENV} does not point at a directory; ignoring it"
        );
    }

    if let Some(home) = home_dir {
        let candidate = home.join(HOME_DATA_DIR);
        if candidate.is_dir() {
            return Ok(ReferenceSource::Directory(candidate));
        }
    }

    Ok(ReferenceSource::Bundled)
}

fn absolutize(path: &Path) -> FishkeyResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| FishkeyError::reference_data_unreadable(path, &error.to_string()))
}
