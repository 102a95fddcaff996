use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;
use crate::record::CredentialRecord;

const CREDENTIALS_FILE_NAME: &str = "credentials.json";
const APP_DIR_NAME: &str = "waypost";

/// Overrides the platform configuration directory when set and non-empty.
pub const CONFIG_DIR_ENV_VAR: &str = "WAYPOST_CONFIG_DIR";

/// Single-record credential store backed by one JSON file.
///
/// The directory is created with owner-only access (`0700`) and the file is
/// written with owner-only access (`0600`). Writes go to a temp file first and
/// are renamed into place, so readers see either the old record or the new
/// one, never a partial file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    /// Open the store at the platform-default location.
    ///
    /// Resolution order: `WAYPOST_CONFIG_DIR` env override, then the OS
    /// configuration directory (`~/.config/waypost` on Linux, the application
    /// support / roaming equivalents elsewhere).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StorageWrite` if the directory cannot be created,
    /// or `AuthError::Other` if the platform has no configuration directory.
    pub fn open_default() -> Result<Self, AuthError> {
        Self::open_at(default_store_dir()?)
    }

    /// Open the store at an explicit directory. Tests use this with a temp dir.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StorageWrite` if the directory cannot be created.
    pub fn open_at(dir: PathBuf) -> Result<Self, AuthError> {
        ensure_private_dir(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the credential file (whether or not it exists yet).
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE_NAME)
    }

    /// Persist `record`, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StorageWrite` on any I/O failure.
    pub fn save(&self, record: &CredentialRecord) -> Result<(), AuthError> {
        let path = self.path();
        let tmp = self.dir.join(format!("{CREDENTIALS_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| AuthError::StorageWrite(format!("serialize credential: {e}")))?;
        fs::write(&tmp, json)
            .map_err(|e| AuthError::StorageWrite(format!("write {}: {e}", tmp.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| AuthError::StorageWrite(format!("chmod {}: {e}", tmp.display())))?;
        }

        fs::rename(&tmp, &path)
            .map_err(|e| AuthError::StorageWrite(format!("rename {}: {e}", path.display())))
    }

    /// Load the stored record, if any.
    ///
    /// A missing file is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StorageCorrupt` if the file exists but does not
    /// parse, and `AuthError::StorageWrite` on other read failures.
    pub fn load(&self) -> Result<Option<CredentialRecord>, AuthError> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AuthError::StorageWrite(format!(
                    "read {}: {e}",
                    path.display()
                )));
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| AuthError::StorageCorrupt(format!("{}: {e}", path.display())))
    }

    /// Remove the stored record. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StorageWrite` on any failure other than the file
    /// not existing.
    pub fn delete(&self) -> Result<(), AuthError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::StorageWrite(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }

    /// True iff a record is present and parseable.
    #[must_use]
    pub fn exists(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}

fn default_store_dir() -> Result<PathBuf, AuthError> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::config_dir()
        .map(|p| p.join(APP_DIR_NAME))
        .ok_or_else(|| {
            AuthError::Other("no configuration directory on this platform".into())
        })
}

fn ensure_private_dir(dir: &Path) -> Result<(), AuthError> {
    fs::create_dir_all(dir)
        .map_err(|e| AuthError::StorageWrite(format!("mkdir {}: {e}", dir.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
            .map_err(|e| AuthError::StorageWrite(format!("chmod {}: {e}", dir.display())))?;
    }

    Ok(())
}
