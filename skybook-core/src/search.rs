//! Incremental location search and the origin/destination selection it feeds.

use serde::{Deserialize, Serialize};
use skybook_shared::{Location, Region};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::directory::LocationDirectory;
use crate::timer::Debouncer;
use crate::{CoreError, CoreResult};

pub const DEFAULT_COUNTRY: &str = "Việt Nam";
pub const DEFAULT_ORIGIN: &str = "SGN";
pub const DEFAULT_DESTINATION: &str = "HAN";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_country")]
    pub default_country: String,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_country: default_country(),
        }
    }
}

/// Lowercase, strip combining marks after canonical decomposition, fold `đ` to `d`.
/// "Hà Nội" becomes "ha noi".
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect()
}

#[derive(Debug, Clone)]
pub struct LocationQuery {
    lowered: String,
    normalized: String,
}

impl LocationQuery {
    /// Surrounding whitespace is ignored, so a blank term is an empty query.
    pub fn new(term: &str) -> Self {
        let term = term.trim();
        Self {
            lowered: term.to_lowercase(),
            normalized: normalize(term),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }

    /// Substring match on city, code, or the accent-free city name.
    pub fn matches(&self, location: &Location) -> bool {
        location.city.to_lowercase().contains(&self.lowered)
            || location.code.to_lowercase().contains(&self.lowered)
            || normalize(&location.city).contains(&self.normalized)
    }
}

/// Lazy matches in directory order. Clone it to restart from the top.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    query: LocationQuery,
    regions: std::slice::Iter<'a, Region>,
    current: std::slice::Iter<'a, Location>,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Location;

    fn next(&mut self) -> Option<&'a Location> {
        loop {
            if let Some(location) = self.current.next() {
                if self.query.matches(location) {
                    return Some(location);
                }
                continue;
            }
            let region = self.regions.next()?;
            self.current = region.locations.iter();
        }
    }
}

/// Matches for `term` within one country. An empty term yields nothing.
pub fn search<'a>(directory: &'a LocationDirectory, country: &str, term: &str) -> Matches<'a> {
    let query = LocationQuery::new(term);
    let regions: &'a [Region] = if query.is_empty() {
        &[]
    } else {
        directory.regions(country)
    };
    Matches {
        query,
        regions: regions.iter(),
        current: Default::default(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Origin,
    Destination,
}

/// Origin and destination, plus which of the two the picker is editing.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSelection {
    origin: Location,
    destination: Location,
    active: Option<Slot>,
}

impl RouteSelection {
    pub fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
            active: None,
        }
    }

    /// Hồ Chí Minh → Hà Nội.
    pub fn with_defaults(directory: &LocationDirectory) -> CoreResult<Self> {
        let lookup = |code: &str| {
            directory
                .find_by_code(code)
                .cloned()
                .ok_or_else(|| CoreError::DirectoryError(format!("default location {} missing", code)))
        };
        Ok(Self::new(lookup(DEFAULT_ORIGIN)?, lookup(DEFAULT_DESTINATION)?))
    }

    pub fn origin(&self) -> &Location {
        &self.origin
    }

    pub fn destination(&self) -> &Location {
        &self.destination
    }

    pub fn active(&self) -> Option<Slot> {
        self.active
    }

    pub fn open(&mut self, slot: Slot) {
        self.active = Some(slot);
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    /// Assign to the slot being edited and close the picker. Origin may equal
    /// destination. Returns the slot that was filled, `None` if no picker was open.
    pub fn select(&mut self, location: Location) -> Option<Slot> {
        let slot = self.active.take()?;
        match slot {
            Slot::Origin => self.origin = location,
            Slot::Destination => self.destination = location,
        }
        Some(slot)
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchView<'a> {
    /// No input: the whole country grouped by region.
    Idle(&'a [Region]),
    /// Input present: matches for the last settled term.
    Results(Vec<&'a Location>),
}

/// Debounced search box over the directory, scoped to one country at a time.
#[derive(Debug)]
pub struct LocationSearchWidget {
    directory: Arc<LocationDirectory>,
    country: String,
    term: String,
    settled: watch::Receiver<String>,
    publisher: Arc<watch::Sender<String>>,
    debouncer: Debouncer,
}

impl LocationSearchWidget {
    pub fn new(directory: Arc<LocationDirectory>, settings: &SearchSettings) -> Self {
        let (publisher, settled) = watch::channel(String::new());
        Self {
            directory,
            country: settings.default_country.clone(),
            term: String::new(),
            settled,
            publisher: Arc::new(publisher),
            debouncer: Debouncer::new(Duration::from_millis(settings.debounce_ms)),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Switch the country scope. Unknown names are ignored.
    pub fn select_country(&mut self, name: &str) -> bool {
        if self.directory.country(name).is_none() {
            return false;
        }
        self.country = name.to_string();
        true
    }

    /// Record a keystroke. The match set is recomputed only after the input
    /// has been quiet for the debounce delay; a newer keystroke cancels the
    /// pending recompute. Must be called inside a Tokio runtime.
    pub fn input(&mut self, term: impl Into<String>) {
        self.term = term.into();
        let publisher = self.publisher.clone();
        let settled = self.term.clone();
        self.debouncer.call(async move {
            debug!("Search term settled: {:?}", settled);
            publisher.send_replace(settled);
        });
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn settled_term(&self) -> String {
        self.settled.borrow().clone()
    }

    pub fn is_settled(&self) -> bool {
        *self.settled.borrow() == self.term
    }

    /// Wait until the debounced term catches up with the latest input.
    pub async fn settle(&mut self) {
        loop {
            if *self.settled.borrow_and_update() == self.term {
                return;
            }
            if self.settled.changed().await.is_err() {
                return;
            }
        }
    }

    pub fn view(&self) -> SearchView<'_> {
        if self.term.trim().is_empty() {
            return SearchView::Idle(self.directory.regions(&self.country));
        }
        let term = self.settled.borrow().clone();
        SearchView::Results(search(&self.directory, &self.country, &term).collect())
    }

    /// Clear the box and drop any pending recompute.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.term.clear();
        self.publisher.send_replace(String::new());
    }
}
