//! Great-circle distance and flight duration estimates between airports.

use serde::Serialize;
use skybook_shared::{Coordinates, Location};
use std::fmt;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average cruise speed used for duration estimates.
pub const CRUISE_SPEED_KMH: f64 = 800.0;

/// Fixed taxi/takeoff/landing allowance added to every flight.
pub const GROUND_ALLOWANCE_HOURS: f64 = 0.5;

/// Haversine distance in whole kilometres.
pub fn distance(from: &Coordinates, to: &Coordinates) -> u32 {
    let delta_lat = (to.latitude() - from.latitude()).to_radians();
    let delta_lon = (to.longitude() - from.longitude()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + from.latitude().to_radians().cos()
            * to.latitude().to_radians().cos()
            * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_KM * c).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlightTime {
    pub hours: u32,
    pub minutes: u32,
}

/// Estimated block time for a distance. Minutes always land in `0..=59`.
pub fn flight_time(distance_km: u32) -> FlightTime {
    let total_hours = f64::from(distance_km) / CRUISE_SPEED_KMH + GROUND_ALLOWANCE_HOURS;

    let mut hours = total_hours.floor() as u32;
    let mut minutes = ((total_hours - total_hours.floor()) * 60.0).round() as u32;
    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }

    FlightTime { hours, minutes }
}

/// `45m`, `2h`, or `2h 5m`.
pub fn format(time: &FlightTime) -> String {
    time.to_string()
}

impl fmt::Display for FlightTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours == 0 {
            write!(f, "{}m", self.minutes)
        } else if self.minutes > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}h", self.hours)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEstimate {
    pub distance_km: u32,
    pub duration: String,
}

/// Distance and formatted duration, when both ends have coordinates.
pub fn estimate(from: &Location, to: &Location) -> Option<FlightEstimate> {
    let (a, b) = (from.coordinates.as_ref()?, to.coordinates.as_ref()?);
    let distance_km = distance(a, b);
    Some(FlightEstimate {
        distance_km,
        duration: format(&flight_time(distance_km)),
    })
}
