//! Bearer token and cached profile storage
//!
//! Each command runs in its own process, so a login must outlive the process
//! that performed it. The token is cached in memory and persisted to an
//! owner-readable token file next to the profile JSON under the platform
//! config directory. Both are cleared together on logout or when the backend
//! rejects the token.

use std::path::PathBuf;
use std::sync::RwLock;

use directories::ProjectDirs;

use crate::api::types::User;
use crate::error::{QuizmateError, Result};

/// Where the cached profile lives.
#[derive(Debug)]
enum ProfileBacking {
    /// JSON file under the platform config directory
    Disk(PathBuf),
    /// In-memory slot, used by tests and ephemeral sessions
    Memory(RwLock<Option<User>>),
}

/// Shared storage for the bearer token and the cached user profile
///
/// All methods take `&self`; interior locking makes the store safe to share
/// behind an `Arc` between the API client, the auth guard, and commands.
#[derive(Debug)]
pub struct CredentialStore {
    token: RwLock<Option<String>>,
    token_path: Option<PathBuf>,
    profile: ProfileBacking,
}

impl CredentialStore {
    /// Open the store backed by the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Storage`] when no config directory can be
    /// determined for the current user.
    pub fn open() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "quizmate", "quizmate").ok_or_else(|| {
            QuizmateError::Storage("could not determine a config directory".to_string())
        })?;
        Ok(Self::at_path(dirs.config_dir().join("profile.json")))
    }

    /// Open the store with an explicit profile file path.
    ///
    /// The token file lives next to the profile as a sibling named `token`.
    pub fn at_path(path: PathBuf) -> Self {
        let token_path = path.with_file_name("token");
        Self {
            token: RwLock::new(None),
            token_path: Some(token_path),
            profile: ProfileBacking::Disk(path),
        }
    }

    /// Create a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            token_path: None,
            profile: ProfileBacking::Memory(RwLock::new(None)),
        }
    }

    /// Replace the cached bearer token without touching disk.
    pub fn set_token(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
    }

    /// The current bearer token, if any.
    ///
    /// Falls back to the persisted token file when the cache is cold, so a
    /// token stored by a previous invocation is picked up here.
    pub fn token(&self) -> Option<String> {
        if let Some(token) = self.token.read().ok().and_then(|slot| slot.clone()) {
            return Some(token);
        }
        let loaded = self.load_token_file()?;
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(loaded.clone());
        }
        Some(loaded)
    }

    /// `true` when a bearer token is present in the cache or on disk.
    ///
    /// Presence only; validity is checked by
    /// [`AuthGuard`](crate::auth::AuthGuard) against the backend.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn load_token_file(&self) -> Option<String> {
        let path = self.token_path.as_ref()?;
        let contents = std::fs::read_to_string(path).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            return None;
        }
        Some(token.to_string())
    }

    /// Write the token file with owner-only permissions.
    fn persist_token(&self, token: &str) -> Result<()> {
        let Some(path) = &self.token_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(QuizmateError::Io)?;
        }
        std::fs::write(path, token).map_err(QuizmateError::Io)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(QuizmateError::Io)?;
        }
        tracing::debug!("Saved token to {}", path.display());
        Ok(())
    }

    /// Persist the cached user profile.
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Io`] or [`QuizmateError::Serialization`] on
    /// write failures for disk-backed stores.
    pub fn save_profile(&self, user: &User) -> Result<()> {
        match &self.profile {
            ProfileBacking::Disk(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(QuizmateError::Io)?;
                }
                let json = serde_json::to_string_pretty(user).map_err(QuizmateError::Serialization)?;
                std::fs::write(path, json).map_err(QuizmateError::Io)?;
                tracing::debug!("Saved profile for {} to {}", user.email, path.display());
                Ok(())
            }
            ProfileBacking::Memory(slot) => {
                if let Ok(mut guard) = slot.write() {
                    *guard = Some(user.clone());
                }
                Ok(())
            }
        }
    }

    /// Load the cached user profile.
    ///
    /// Returns `Ok(None)` when no profile has been saved, so callers can
    /// distinguish "never signed in" from a genuine storage error.
    pub fn load_profile(&self) -> Result<Option<User>> {
        match &self.profile {
            ProfileBacking::Disk(path) => {
                if !path.exists() {
                    return Ok(None);
                }
                let contents = std::fs::read_to_string(path).map_err(QuizmateError::Io)?;
                let user = serde_json::from_str(&contents).map_err(QuizmateError::Serialization)?;
                Ok(Some(user))
            }
            ProfileBacking::Memory(slot) => {
                Ok(slot.read().ok().and_then(|guard| guard.clone()))
            }
        }
    }

    /// Store a fresh login: token and profile together.
    ///
    /// The token is persisted next to the profile so the next invocation
    /// starts signed in.
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Io`] or [`QuizmateError::Serialization`] on
    /// write failures for disk-backed stores.
    pub fn store_login(&self, token: &str, user: &User) -> Result<()> {
        self.set_token(token);
        self.persist_token(token)?;
        self.save_profile(user)
    }

    /// Clear the token and the cached profile together.
    ///
    /// Called on logout and on detecting an invalid/expired token. Idempotent;
    /// missing files are not an error.
    pub fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        if let Some(path) = &self.token_path {
            if path.exists() {
                std::fs::remove_file(path).map_err(QuizmateError::Io)?;
                tracing::debug!("Removed token at {}", path.display());
            }
        }
        match &self.profile {
            ProfileBacking::Disk(path) => {
                if path.exists() {
                    std::fs::remove_file(path).map_err(QuizmateError::Io)?;
                    tracing::debug!("Removed cached profile at {}", path.display());
                }
                Ok(())
            }
            ProfileBacking::Memory(slot) => {
                if let Ok(mut guard) = slot.write() {
                    *guard = None;
                }
                Ok(())
            }
        }
    }
}
