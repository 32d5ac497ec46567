//! RON profile loader
//!
//! One RON document per profile, named `<profile>.ron` under the user's
//! profile directory. Each document is parsed, validated against the
//! catalog and appended in load order; a broken document is recorded as a
//! failure and does not take the remaining profiles down with it.

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::validate::validate_profile;
use lootsieve_core::{Catalog, GameData, Profile};
use std::fs;
use std::path::Path;

/// A profile document that could not be loaded, with the reason
#[derive(Debug)]
pub struct LoadFailure {
    pub profile: String,
    pub error: Error,
}

/// Loader for RON filter profiles
///
/// Profiles are accumulated in call order, which becomes the registry
/// order and with it the rule precedence.
pub struct Loader<'c> {
    catalog: &'c dyn Catalog,
    profiles: Vec<Profile>,
    failures: Vec<LoadFailure>,
}

impl<'c> Loader<'c> {
    /// Create a loader that validates against the given catalog
    pub fn new(catalog: &'c dyn Catalog) -> Self {
        Self {
            catalog,
            profiles: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Parse and validate one profile document
    ///
    /// `name` names the profile when the document itself does not.
    pub fn load_str(&mut self, name: &str, content: &str) -> Result<()> {
        let mut profile: Profile = ron::from_str(content)?;
        if profile.name.is_empty() {
            profile.name = name.to_owned();
        }
        if self.profiles.iter().any(|p| p.name == profile.name) {
            return Err(Error::DuplicateProfile(profile.name));
        }
        validate_profile(&profile, self.catalog)?;
        self.profiles.push(profile);
        Ok(())
    }

    /// Load one profile file, named after its file stem
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let content = fs::read_to_string(path)?;
        self.load_str(name, &content)
    }

    /// Load the named profiles from a directory, in the given order
    ///
    /// Failures are recorded per profile; the remaining ones still load.
    pub fn load_profiles(&mut self, dir: impl AsRef<Path>, names: &[String]) {
        let dir = dir.as_ref();
        for name in names {
            let path = dir.join(name).with_extension("ron");
            if let Err(error) = self.load_file(&path) {
                self.failures.push(LoadFailure {
                    profile: name.clone(),
                    error,
                });
            }
        }
    }

    /// Profiles loaded so far, in order
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Finish loading and publish the registry plus any recorded failures
    pub fn finish(self) -> (Registry, Vec<LoadFailure>) {
        (Registry::new(self.profiles), self.failures)
    }
}

/// Load the game-data catalog tables from a RON file
pub fn load_game_data(path: impl AsRef<Path>) -> Result<GameData> {
    let content = fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}
