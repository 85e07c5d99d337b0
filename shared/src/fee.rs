//! Tiered hourly pricing: a flat first hour, then a per-hour rate for the rest.

use crate::error::ParkingError;
use crate::vehicle::Category;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Rate {
    pub first_hour: f64,
    pub subsequent_hour: f64,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FeePolicy {
    pub car: Rate,
    pub motorcycle: Rate,
    pub bus: Rate,
}

impl Default for FeePolicy {
    fn default() -> Self {
        FeePolicy {
            car: Rate {
                first_hour: 2.0,
                subsequent_hour: 1.0,
            },
            motorcycle: Rate {
                first_hour: 1.0,
                subsequent_hour: 0.5,
            },
            bus: Rate {
                first_hour: 5.0,
                subsequent_hour: 3.0,
            },
        }
    }
}

impl FeePolicy {
    pub fn rate(&self, category: Category) -> Rate {
        match category {
            Category::Car => self.car,
            Category::Motorcycle => self.motorcycle,
            Category::Bus => self.bus,
        }
    }

    /// Any started first hour is charged in full; time past it is billed pro rata.
    pub fn charge(&self, category: Category, duration: f64) -> f64 {
        let rate = self.rate(category);
        rate.first_hour + (duration - 1.0).max(0.0) * rate.subsequent_hour
    }

    pub fn charge_for(&self, category: &str, duration: f64) -> Result<f64, ParkingError> {
        let category: Category = category.parse()?;
        Ok(self.charge(category, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_table() {
        let fees = FeePolicy::default();
        assert_eq!(fees.charge(Category::Car, 1.0), 2.0);
        assert_eq!(fees.charge(Category::Car, 2.5), 3.5);
        assert_eq!(fees.charge(Category::Motorcycle, 0.5), 1.0);
        assert_eq!(fees.charge(Category::Bus, 4.0), 14.0);
    }

    #[test]
    fn test_first_hour_is_minimum() {
        let fees = FeePolicy::default();
        for category in Category::ALL {
            assert_eq!(
                fees.charge(category, 0.0),
                fees.rate(category).first_hour
            );
        }
        assert_eq!(fees.charge(Category::Motorcycle, 1.5), 1.25);
    }

    #[test]
    fn test_charge_by_name() {
        let fees = FeePolicy::default();
        assert_eq!(fees.charge_for("bus", 2.0), Ok(8.0));
        assert_eq!(
            fees.charge_for("tram", 2.0),
            Err(ParkingError::InvalidCategory(String::from("tram")))
        );
    }
}
