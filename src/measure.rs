use crate::feature::Feature;
use crate::geometry::{Coordinate, DrawnGeometry};
use geo::{ChamberlainDuquetteArea, HaversineLength, LineString, Polygon};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeasureError {
    #[error("At least {needed} coordinates are required, got {got}")]
    TooFewCoordinates { needed: usize, got: usize },
    #[error("First and last coordinates of a polygon ring must be equal")]
    RingNotClosed,
    #[error("Cannot measure a {0} geometry")]
    UnsupportedGeometry(&'static str),
}

/// Displays a blocking, dismissible message to the user
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Notifier that writes messages to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&mut self, message: &str) {
        log::info!("{}", message);
    }
}

/// Result of a measurement, lengths in kilometres and areas in square metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Distance { kilometers: f64 },
    Area { square_meters: f64, perimeter_km: f64 },
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance { kilometers } => write!(f, "Distance: {:.2} km", kilometers),
            Self::Area {
                square_meters,
                perimeter_km,
            } => write!(
                f,
                "Area: {:.2} m², perimeter: {:.2} km",
                square_meters, perimeter_km
            ),
        }
    }
}

fn length_km(coordinates: &[Coordinate]) -> f64 {
    LineString::from(coordinates.to_vec()).haversine_length() / 1000.0
}

/// Great-circle length of the line through `coordinates`, reported through `notifier`
pub fn calculate_distance(
    coordinates: &[Coordinate],
    notifier: &mut dyn Notifier,
) -> Result<Measurement, MeasureError> {
    if coordinates.len() < 2 {
        return Err(MeasureError::TooFewCoordinates {
            needed: 2,
            got: coordinates.len(),
        });
    }

    let measurement = Measurement::Distance {
        kilometers: length_km(coordinates),
    };
    notifier.alert(&measurement.to_string());
    Ok(measurement)
}

/// Spherical area of the closed ring `coordinates` plus the length of the ring
/// treated as a line, reported through `notifier`
pub fn calculate_area(
    coordinates: &[Coordinate],
    notifier: &mut dyn Notifier,
) -> Result<Measurement, MeasureError> {
    if coordinates.len() < 4 {
        return Err(MeasureError::TooFewCoordinates {
            needed: 4,
            got: coordinates.len(),
        });
    }
    if coordinates.first() != coordinates.last() {
        return Err(MeasureError::RingNotClosed);
    }

    let polygon = Polygon::new(LineString::from(coordinates.to_vec()), Vec::new());
    let measurement = Measurement::Area {
        square_meters: polygon.chamberlain_duquette_unsigned_area(),
        perimeter_km: length_km(coordinates),
    };
    notifier.alert(&measurement.to_string());
    Ok(measurement)
}

/// Measure a drawn feature: lines by length, polygons by the area of their exterior ring
pub fn measure_feature(
    feature: &Feature,
    notifier: &mut dyn Notifier,
) -> Result<Measurement, MeasureError> {
    match &feature.geometry {
        DrawnGeometry::LineString(line) => calculate_distance(&line.0, notifier),
        DrawnGeometry::Polygon(polygon) => calculate_area(&polygon.exterior().0, notifier),
        other => Err(MeasureError::UnsupportedGeometry(other.kind())),
    }
}
