use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::CreateError;
use crate::host::{Resource, ResourceCreator};
use crate::vault::path::{basename, escapes_vault, note_path};

/// Creates person notes on disk under the vault root.
#[derive(Debug, Clone)]
pub struct VaultCreator {
    root: PathBuf,
}

impl VaultCreator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceCreator for VaultCreator {
    fn create(&self, folder: &str, name: &str) -> Result<Resource, CreateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CreateError::EmptyName);
        }

        let relative = note_path(folder, name);
        if escapes_vault(&relative) {
            return Err(CreateError::OutsideVault(relative));
        }
        let path = self.root.join(&relative);
        let io_err = |source| CreateError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(CreateError::AlreadyExists(path.clone()));
            }
            Err(err) => return Err(io_err(err)),
        };

        let title = basename(&relative);
        file.write_all(format!("# {title}\n\n").as_bytes())
            .map_err(io_err)?;

        tracing::info!("created person note {}", path.display());
        Ok(Resource::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_note_and_missing_folders() {
        let dir = tempfile::tempdir().unwrap();
        let creator = VaultCreator::new(dir.path());

        let resource = creator.create("People/Team", "Zoe").unwrap();

        assert_eq!(resource.path, dir.path().join("People/Team/Zoe.md"));
        assert_eq!(resource.stem(), "Zoe");
        let contents = std::fs::read_to_string(&resource.path).unwrap();
        assert_eq!(contents, "# Zoe\n\n");
    }

    #[test]
    fn existing_note_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let creator = VaultCreator::new(dir.path());
        creator.create("", "Bob.md").unwrap();

        let err = creator.create("", "Bob").unwrap_err();
        assert!(matches!(err, CreateError::AlreadyExists(_)));
    }

    #[test]
    fn parent_segments_cannot_leave_the_vault() {
        let dir = tempfile::tempdir().unwrap();
        let vault = dir.path().join("vault");
        let creator = VaultCreator::new(&vault);

        for (folder, name) in [("People", "../../escaped"), ("../outside", "Zoe")] {
            assert!(matches!(
                creator.create(folder, name),
                Err(CreateError::OutsideVault(_))
            ));
        }
        assert!(!dir.path().join("escaped.md").exists());
        assert!(!dir.path().join("outside").exists());
        assert!(!vault.exists());
    }

    #[test]
    fn blank_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let creator = VaultCreator::new(dir.path());
        assert!(matches!(
            creator.create("People", "  "),
            Err(CreateError::EmptyName)
        ));
    }
}
