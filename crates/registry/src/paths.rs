use std::fs::{self, DirBuilder, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, Result};

pub const CONFIG_DIR_NAME: &str = ".config";
pub const APP_DIR_NAME: &str = "qrd";
pub const REGISTRY_FILE_NAME: &str = "registry";

/// `<home>/.config/qrd/registry`
#[must_use]
pub fn registry_path_for_home(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR_NAME)
        .join(APP_DIR_NAME)
        .join(REGISTRY_FILE_NAME)
}

/// Registry path under the current user's home, if one can be determined.
#[must_use]
pub fn default_registry_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| registry_path_for_home(&home))
}

/// Creates the registry's parent directories and an empty registry file when
/// they do not exist yet. Existing content is never truncated.
pub fn ensure_registry(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .map_err(|err| RegistryError::io("create", path, err))?;
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(RegistryError::io(
            "use",
            dir,
            io::Error::new(io::ErrorKind::Other, "exists and is not a directory"),
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut builder = DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(0o700);
            }
            log::debug!("Creating {}", dir.display());
            builder
                .create(dir)
                .map_err(|err| RegistryError::io("create", dir, err))
        }
        Err(err) => Err(RegistryError::io("stat", dir, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_layout_lives_under_dot_config() {
        assert_eq!(
            registry_path_for_home(Path::new("/home/me")),
            PathBuf::from("/home/me/.config/qrd/registry")
        );
    }

    #[test]
    fn creates_directories_and_empty_file() {
        let home = TempDir::new().unwrap();
        let path = registry_path_for_home(home.path());

        ensure_registry(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(fs::read(&path).unwrap(), b"");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn existing_registry_is_kept_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry");
        fs::write(&path, "pdf:a:/a;\n").unwrap();

        ensure_registry(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pdf:a:/a;\n");
    }

    #[test]
    fn parent_that_is_a_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("qrd");
        fs::write(&blocker, "").unwrap();

        let err = ensure_registry(&blocker.join("registry")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { op: "use", .. }));
    }
}
