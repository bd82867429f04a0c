use skybook_shared::{Country, Location, Region};
use std::path::Path;
use tracing::info;

use crate::{CoreError, CoreResult};

const BUILTIN_DIRECTORY: &str = include_str!("../data/locations.json");

/// Read-only country → region → location table.
///
/// Loaded once at start-up and shared by `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct LocationDirectory {
    countries: Vec<Country>,
}

impl LocationDirectory {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// The directory shipped with the crate.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(BUILTIN_DIRECTORY)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        let countries: Vec<Country> =
            serde_json::from_str(json).map_err(|e| CoreError::DirectoryError(e.to_string()))?;
        Ok(Self::new(countries))
    }

    pub fn from_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::DirectoryError(format!("{}: {}", path.display(), e)))?;
        let directory = Self::from_json(&json)?;
        info!(
            "Loaded location directory from {} ({} locations)",
            path.display(),
            directory.len()
        );
        Ok(directory)
    }

    /// Load from `path` when given, otherwise fall back to the built-in table.
    pub fn load(path: Option<&str>) -> CoreResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn country(&self, name: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.name == name)
    }

    /// Regions of a country, empty when the country is unknown.
    pub fn regions(&self, country: &str) -> &[Region] {
        self.country(country).map(|c| c.regions.as_slice()).unwrap_or(&[])
    }

    /// First location carrying `code`, compared case-insensitively.
    pub fn find_by_code(&self, code: &str) -> Option<&Location> {
        self.iter().find(|l| l.code.eq_ignore_ascii_case(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.countries
            .iter()
            .flat_map(|c| c.regions.iter())
            .flat_map(|r| r.locations.iter())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
