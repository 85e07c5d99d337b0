use std::fmt;
use std::str::FromStr;

use crate::error::ParkingError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Category {
    Car,
    Motorcycle,
    Bus,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Car, Category::Motorcycle, Category::Bus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Car => "Car",
            Category::Motorcycle => "Motorcycle",
            Category::Bus => "Bus",
        }
    }

    /// Map the numeric menu selector (1 car, 2 motorcycle, 3 bus) to a category.
    pub fn from_selector(selector: u8) -> Result<Category, ParkingError> {
        match selector {
            1 => Ok(Category::Car),
            2 => Ok(Category::Motorcycle),
            3 => Ok(Category::Bus),
            other => Err(ParkingError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(Category::Car),
            "motorcycle" => Ok(Category::Motorcycle),
            "bus" => Ok(Category::Bus),
            _ => Err(ParkingError::InvalidCategory(s.to_string())),
        }
    }
}

/// A vehicle presented at the gate. Fields are fixed once constructed.
#[derive(Debug, PartialEq, Clone)]
pub struct VehicleDescriptor {
    license_plate: String,
    category: Category,
    parking_duration: f64,
}

impl VehicleDescriptor {
    pub fn new(
        license_plate: impl Into<String>,
        category: Category,
        parking_duration: f64,
    ) -> Result<Self, ParkingError> {
        let license_plate = license_plate.into();
        if license_plate.trim().is_empty() {
            return Err(ParkingError::InvalidPlate);
        }
        if !parking_duration.is_finite() || parking_duration < 0.0 {
            return Err(ParkingError::InvalidDuration(parking_duration));
        }
        Ok(VehicleDescriptor {
            license_plate,
            category,
            parking_duration,
        })
    }

    pub fn license_plate(&self) -> &str {
        &self.license_plate
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Hours the vehicle stays, used for the charge at exit.
    pub fn parking_duration(&self) -> f64 {
        self.parking_duration
    }
}

/// Build a vehicle from a numeric selector, as the interactive menu does.
pub fn create(
    selector: u8,
    license_plate: impl Into<String>,
    parking_duration: f64,
) -> Result<VehicleDescriptor, ParkingError> {
    let category = Category::from_selector(selector)?;
    VehicleDescriptor::new(license_plate, category, parking_duration)
}
