use futures::future::join_all;
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

use registry::audit::{self, AuditHandle, FileSink, NullSink};
use registry::{
    Capacities, Category, ParkOutcome, ParkingError, Receipt, RegistryFacade, RegistryHandle,
};
use shared::fee::FeePolicy;
use shared::vehicle;

pub struct DemoOptions {
    pub capacities: Capacities,
    pub workers: usize,
    pub log_file: Option<PathBuf>,
    pub seed: u64,
}

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub parked: usize,
    pub already_parked: usize,
    pub rejected: usize,
    pub released: usize,
    pub collected: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parked: {}, already parked: {}, rejected: {}, released: {}, collected: ${:.2}",
            self.parked, self.already_parked, self.rejected, self.released, self.collected
        )
    }
}

enum Arrival {
    Parked(String),
    AlreadyParked,
    Rejected,
}

fn plural(category: Category) -> &'static str {
    match category {
        Category::Car => "Cars",
        Category::Motorcycle => "Motorcycles",
        Category::Bus => "Buses",
    }
}

async fn arrive(registry: RegistryHandle, worker: usize, seed: u64) -> Arrival {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64));
    let number: u32 = rng.gen_range(0..1000);

    // Even workers bring cars, odd workers motorcycles
    let created = if worker % 2 == 0 {
        vehicle::create(1, format!("CAR{}", number), 2.0)
    } else {
        vehicle::create(2, format!("MOTO{}", number), 1.5)
    };
    let vehicle = match created {
        Ok(v) => v,
        Err(e) => {
            error!("Error: {}", e);
            return Arrival::Rejected;
        }
    };
    let plate = vehicle.license_plate().to_string();
    let category = vehicle.category();

    match registry.park(vehicle).await {
        Ok(ParkOutcome::Parked(ticket_id)) => {
            println!(
                "{} with license plate {} parked. Ticket ID: {}",
                category, plate, ticket_id
            );
            // Hold the gate a moment as a real entry would
            sleep(Duration::from_millis(100)).await;
            Arrival::Parked(plate)
        }
        Ok(ParkOutcome::AlreadyParked) => {
            println!("{} with license plate {} is already parked.", category, plate);
            Arrival::AlreadyParked
        }
        Err(e) => {
            error!("Error: {}", e);
            Arrival::Rejected
        }
    }
}

async fn open_audit(log_file: Option<PathBuf>) -> io::Result<AuditHandle> {
    match log_file {
        Some(path) => {
            info!("Writing entry/exit log to {}", path.display());
            Ok(audit::spawn(FileSink::open(path).await?))
        }
        None => Ok(audit::spawn(NullSink)),
    }
}

/// Returns the plate that left, if any.
fn record_release(
    summary: &mut Summary,
    result: Result<Receipt, ParkingError>,
) -> Option<String> {
    match result {
        Ok(receipt) => {
            println!(
                "{} with license plate {} released. Charge: ${:.2}",
                receipt.vehicle.category(),
                receipt.vehicle.license_plate(),
                receipt.charge
            );
            summary.released += 1;
            summary.collected += receipt.charge;
            Some(receipt.vehicle.license_plate().to_string())
        }
        Err(e) => {
            error!("Error: {}", e);
            None
        }
    }
}

/// First car in worker order that has not already left.
fn car_still_parked<'a>(parked_cars: &'a [String], released: Option<&str>) -> Option<&'a str> {
    parked_cars
        .iter()
        .map(String::as_str)
        .find(|plate| Some(*plate) != released)
}

/// Park `workers` vehicles concurrently, report free places, then run a few
/// sample releases including one for a plate that was never parked.
pub async fn run(options: DemoOptions) -> io::Result<Summary> {
    let audit = open_audit(options.log_file).await?;
    let facade = RegistryFacade::new(FeePolicy::default(), audit);
    let registry = facade.instance(options.capacities);

    let arrivals = (0..options.workers).map(|worker| {
        let registry = registry.clone();
        let seed = options.seed;
        tokio::spawn(async move { arrive(registry, worker, seed).await })
    });

    let mut summary = Summary::default();
    let mut parked_cars = vec![];
    for joined in join_all(arrivals).await {
        match joined {
            Ok(Arrival::Parked(plate)) => {
                summary.parked += 1;
                if plate.starts_with("CAR") {
                    parked_cars.push(plate);
                }
            }
            Ok(Arrival::AlreadyParked) => summary.already_parked += 1,
            Ok(Arrival::Rejected) => summary.rejected += 1,
            Err(e) => error!("Worker failed: {}", e),
        }
    }

    match registry.availability().await {
        Ok(slots) => {
            for slot in slots {
                println!(
                    "Available {} slots: {} out of {}",
                    plural(slot.category),
                    slot.available,
                    slot.capacity
                );
            }
        }
        Err(e) => error!("Error: {}", e),
    }

    let by_ticket = record_release(&mut summary, registry.release_by_ticket(3).await);
    if let Some(plate) = car_still_parked(&parked_cars, by_ticket.as_deref()) {
        debug!("Releasing car {} by plate", plate);
        record_release(&mut summary, registry.release_by_plate(plate).await);
    }
    record_release(&mut summary, registry.release_by_plate("NONEXIST").await);

    facade.audit().flush().await;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plates(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_car_still_parked_skips_released_plate() {
        let cars = plates(&["CAR209", "CAR514"]);
        assert_eq!(car_still_parked(&cars, Some("CAR209")), Some("CAR514"));
        assert_eq!(car_still_parked(&cars, Some("MOTO77")), Some("CAR209"));
        assert_eq!(car_still_parked(&cars, None), Some("CAR209"));
    }

    #[test]
    fn test_car_still_parked_none_left() {
        let cars = plates(&["CAR209"]);
        assert_eq!(car_still_parked(&cars, Some("CAR209")), None);
        assert_eq!(car_still_parked(&[], None), None);
    }

    #[test]
    fn test_record_release_reports_plate() {
        let mut summary = Summary::default();
        let vehicle = vehicle::create(3, "BUS1", 4.0).unwrap();
        let receipt = Receipt {
            ticket_id: 3,
            vehicle,
            charge: 14.0,
        };

        assert_eq!(
            record_release(&mut summary, Ok(receipt)),
            Some(String::from("BUS1"))
        );
        assert_eq!(
            record_release(
                &mut summary,
                Err(ParkingError::NotFound(registry::Lookup::Ticket(3)))
            ),
            None
        );
        assert_eq!(summary.released, 1);
        assert_eq!(summary.collected, 14.0);
    }
}
