pub mod audit;
pub mod error;
pub mod fee;
pub mod vehicle;

pub use error::{Lookup, ParkingError};
pub use vehicle::{Category, VehicleDescriptor};
