use std::fmt;
use thiserror::Error;

use crate::vehicle::Category;

/// Key a release or lookup was attempted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Ticket(u64),
    Plate(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Ticket(id) => write!(f, "ticket ID {}", id),
            Lookup::Plate(plate) => write!(f, "license plate {}", plate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParkingError {
    /// The category has no free places left.
    #[error("parking lot is full for {0}")]
    CapacityExceeded(Category),

    /// Nothing is parked under the given ticket or plate.
    #[error("vehicle with {0} is not found in the parking lot")]
    NotFound(Lookup),

    #[error("invalid vehicle type: {0}")]
    InvalidCategory(String),

    #[error("invalid parking duration: {0}")]
    InvalidDuration(f64),

    #[error("license plate must not be empty")]
    InvalidPlate,

    /// The registry task has stopped and can no longer answer.
    #[error("parking registry is no longer running")]
    RegistryClosed,
}
