//! The search form: trip type, dates, passengers, route pickers, and the
//! query it submits to the results page.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use skybook_shared::{FlightType, Location, PassengerCounts, PassengerKind, Step};
use std::sync::Arc;
use tracing::{debug, info};

use crate::directory::LocationDirectory;
use crate::geo::{self, FlightEstimate};
use crate::search::{LocationSearchWidget, RouteSelection, SearchSettings, Slot};
use crate::CoreResult;

/// Dates travel as `dd/MM/yyyy`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub const RESULTS_PATH: &str = "/tim-chuyen-bay";

/// Where a pointer-down landed, relative to the open pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRegion {
    PassengerPicker,
    LocationPicker,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Compact,
    Wide,
}

impl Viewport {
    pub const WIDE_MIN_PX: u32 = 640;

    pub fn from_width(px: u32) -> Self {
        if px >= Self::WIDE_MIN_PX {
            Viewport::Wide
        } else {
            Viewport::Compact
        }
    }
}

/// A submitted search. Built once, never edited; a new submission builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuery {
    from: Location,
    to: Location,
    departure_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    passengers: PassengerCounts,
    flight_type: FlightType,
    distance_km: Option<u32>,
    duration: Option<String>,
}

impl FlightQuery {
    /// A round trip without a return date is submitted as one-way, and a
    /// one-way query never carries a return date.
    pub fn build(
        from: Location,
        to: Location,
        departure_date: Option<NaiveDate>,
        return_date: Option<NaiveDate>,
        passengers: PassengerCounts,
        flight_type: FlightType,
    ) -> Self {
        let (flight_type, return_date) = match (flight_type, return_date) {
            (FlightType::RoundTrip, Some(date)) => (FlightType::RoundTrip, Some(date)),
            (FlightType::RoundTrip, None) => {
                debug!("Round trip without return date, submitting as one-way");
                (FlightType::OneWay, None)
            }
            (FlightType::OneWay, _) => (FlightType::OneWay, None),
        };
        let estimate = geo::estimate(&from, &to);

        Self {
            from,
            to,
            departure_date,
            return_date,
            passengers,
            flight_type,
            distance_km: estimate.as_ref().map(|e| e.distance_km),
            duration: estimate.map(|e| e.duration),
        }
    }

    pub fn from(&self) -> &Location {
        &self.from
    }

    pub fn to(&self) -> &Location {
        &self.to
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn passengers(&self) -> PassengerCounts {
        self.passengers
    }

    pub fn flight_type(&self) -> FlightType {
        self.flight_type
    }

    pub fn distance_km(&self) -> Option<u32> {
        self.distance_km
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    /// URL parameters in the order the results page expects them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let format_date = |d: NaiveDate| d.format(DATE_FORMAT).to_string();

        let mut params = vec![
            ("from", self.from.to_string()),
            ("to", self.to.to_string()),
            ("departureDate", self.departure_date.map(format_date).unwrap_or_default()),
        ];
        if let Some(date) = self.return_date {
            params.push(("returnDate", format_date(date)));
        }
        params.push((
            "passengers",
            serde_json::to_string(&self.passengers).unwrap_or_default(),
        ));
        params.push(("flightType", self.flight_type.to_string()));
        params.push((
            "distance",
            self.distance_km.map(|d| d.to_string()).unwrap_or_default(),
        ));
        params.push(("duration", self.duration.clone().unwrap_or_default()));
        params
    }

    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params())
            .finish()
    }

    /// Results-page link, e.g. `/tim-chuyen-bay?from=...`.
    pub fn results_path(&self) -> String {
        format!("{}?{}", RESULTS_PATH, self.to_query_string())
    }
}

/// State behind the search form.
///
/// Nothing here talks to the network and there is no error state: invalid
/// edits are refused in place and the form stays as it was.
#[derive(Debug)]
pub struct BookingForm {
    flight_type: FlightType,
    departure_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    passengers: PassengerCounts,
    passenger_picker_open: bool,
    route: RouteSelection,
    location_search: LocationSearchWidget,
}

impl BookingForm {
    /// One-way, one adult, departing the day after `today`, Hồ Chí Minh → Hà Nội.
    pub fn new(directory: Arc<LocationDirectory>, settings: &SearchSettings, today: NaiveDate) -> CoreResult<Self> {
        let route = RouteSelection::with_defaults(&directory)?;
        Ok(Self {
            flight_type: FlightType::OneWay,
            departure_date: today.checked_add_days(Days::new(1)),
            return_date: None,
            passengers: PassengerCounts::default(),
            passenger_picker_open: false,
            route,
            location_search: LocationSearchWidget::new(directory, settings),
        })
    }

    pub fn flight_type(&self) -> FlightType {
        self.flight_type
    }

    /// Switching to one-way locks the return date but keeps its value.
    pub fn set_flight_type(&mut self, flight_type: FlightType) {
        self.flight_type = flight_type;
    }

    pub fn return_date_enabled(&self) -> bool {
        self.flight_type == FlightType::RoundTrip
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure_date
    }

    pub fn set_departure_date(&mut self, date: Option<NaiveDate>) {
        self.departure_date = date;
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// Refused while the trip is one-way.
    pub fn set_return_date(&mut self, date: Option<NaiveDate>) -> bool {
        if !self.return_date_enabled() {
            return false;
        }
        self.return_date = date;
        true
    }

    pub fn passengers(&self) -> PassengerCounts {
        self.passengers
    }

    pub fn adjust_passengers(&mut self, kind: PassengerKind, step: Step) -> bool {
        self.passengers.adjust(kind, step)
    }

    /// Replace the picker state wholesale, e.g. when restoring a submitted search.
    pub fn set_passengers(&mut self, passengers: PassengerCounts) {
        self.passengers = passengers;
    }

    pub fn passenger_picker_open(&self) -> bool {
        self.passenger_picker_open
    }

    pub fn toggle_passenger_picker(&mut self) {
        self.passenger_picker_open = !self.passenger_picker_open;
    }

    pub fn route(&self) -> &RouteSelection {
        &self.route
    }

    pub fn location_picker(&self) -> Option<Slot> {
        self.route.active()
    }

    pub fn open_location_picker(&mut self, slot: Slot) {
        self.route.open(slot);
    }

    pub fn close_location_picker(&mut self) {
        self.route.close();
    }

    pub fn location_search(&self) -> &LocationSearchWidget {
        &self.location_search
    }

    pub fn location_search_mut(&mut self) -> &mut LocationSearchWidget {
        &mut self.location_search
    }

    pub fn search_input(&mut self, term: impl Into<String>) {
        self.location_search.input(term);
    }

    pub fn select_country(&mut self, name: &str) -> bool {
        self.location_search.select_country(name)
    }

    /// Fill the slot being edited, close the picker and clear the search box.
    pub fn choose_location(&mut self, location: Location) -> Option<Slot> {
        let slot = self.route.select(location);
        self.location_search.reset();
        slot
    }

    pub fn swap_locations(&mut self) {
        self.route.swap();
    }

    /// Close pickers the pointer landed outside of. On compact screens the
    /// location picker is full-screen and only closes explicitly.
    pub fn pointer_down(&mut self, target: FocusRegion, viewport: Viewport) {
        if target != FocusRegion::PassengerPicker {
            self.passenger_picker_open = false;
        }
        if target != FocusRegion::LocationPicker && viewport == Viewport::Wide {
            self.route.close();
        }
    }

    pub fn flight_info(&self) -> Option<FlightEstimate> {
        geo::estimate(self.route.origin(), self.route.destination())
    }

    /// Submit the form.
    pub fn search(&self) -> FlightQuery {
        let query = FlightQuery::build(
            self.route.origin().clone(),
            self.route.destination().clone(),
            self.departure_date,
            self.return_date,
            self.passengers,
            self.flight_type,
        );
        info!(
            "Search submitted: {} -> {} ({})",
            query.from().code,
            query.to().code,
            query.flight_type()
        );
        query
    }
}
