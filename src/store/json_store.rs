use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::Serialize;

use crate::store::schema::ProfileData;

const PROFILE_FILE: &str = "profile.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("readwise");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        tracing::debug!("saved {}", path.display());
        Ok(())
    }

    /// Load and deserialize the reader profile. Returns None if the file
    /// exists but cannot be parsed (schema mismatch / corruption).
    pub fn load_profile(&self) -> Option<ProfileData> {
        let path = self.file_path(PROFILE_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            match serde_json::from_str(&content) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    tracing::warn!("unreadable profile at {}: {err}", path.display());
                    None
                }
            }
        } else {
            // No file yet: a fresh profile, not a schema mismatch
            Some(ProfileData::default())
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }

    pub fn has_profile(&self) -> bool {
        self.file_path(PROFILE_FILE).exists()
    }

    /// Replace the stored profile with one parsed from `json`, refusing
    /// payloads from another schema version.
    pub fn import_profile_json(&self, json: &str) -> Result<ProfileData> {
        let profile: ProfileData = serde_json::from_str(json)?;
        if profile.needs_reset() {
            bail!(
                "Unsupported profile schema version: {} (expected {})",
                profile.schema_version,
                crate::store::schema::SCHEMA_VERSION
            );
        }
        self.save_profile(&profile)?;
        Ok(profile)
    }
}
