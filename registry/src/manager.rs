use log::{debug, info};
use std::collections::HashMap;
use tokio::sync::mpsc::Receiver;
use tokio::sync::oneshot;

use shared::audit::{Action, AuditEvent};
use shared::fee::FeePolicy;
use shared::{Category, Lookup, ParkingError, VehicleDescriptor};

use crate::audit::AuditHandle;
use crate::config::Capacities;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParkOutcome {
    Parked(u64), // ticket id
    AlreadyParked,
}

/// What a release hands back to the caller.
#[derive(Debug, PartialEq, Clone)]
pub struct Receipt {
    pub ticket_id: u64,
    pub vehicle: VehicleDescriptor,
    pub charge: f64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Availability {
    pub category: Category,
    pub capacity: usize,
    pub occupied: usize,
    pub available: usize,
}

pub struct ParkedEntry {
    pub vehicle: VehicleDescriptor,
    pub ticket_id: u64,
}

pub enum RegistryCommand {
    Park(VehicleDescriptor, oneshot::Sender<Result<ParkOutcome, ParkingError>>),
    ReleaseByTicket(u64, oneshot::Sender<Result<Receipt, ParkingError>>),
    ReleaseByPlate(String, oneshot::Sender<Result<Receipt, ParkingError>>),
    Available(Category, oneshot::Sender<usize>),
    TicketFor(String, oneshot::Sender<Result<u64, ParkingError>>), // Plate to look up
    Availability(oneshot::Sender<Vec<Availability>>),
}

/// Occupancy table. Owned by the manager task, so every method runs to
/// completion before the next command is looked at.
pub struct Occupancy {
    parked: HashMap<String, ParkedEntry>,
    capacity: Capacities,
    count: HashMap<Category, usize>,
    next_ticket: u64,
    fees: FeePolicy,
    audit: AuditHandle,
}

impl Occupancy {
    pub fn new(capacity: Capacities, fees: FeePolicy, audit: AuditHandle) -> Self {
        Occupancy {
            parked: HashMap::new(),
            capacity,
            count: HashMap::new(),
            next_ticket: 1,
            fees,
            audit,
        }
    }

    fn occupied(&self, category: Category) -> usize {
        self.count.get(&category).copied().unwrap_or(0)
    }

    fn allocate_ticket(&mut self) -> u64 {
        let ticket_id = self.next_ticket;
        self.next_ticket += 1;
        ticket_id
    }

    pub fn park(&mut self, vehicle: VehicleDescriptor) -> Result<ParkOutcome, ParkingError> {
        let category = vehicle.category();
        if self.parked.contains_key(vehicle.license_plate()) {
            debug!(
                "{} with license plate {} is already parked",
                category,
                vehicle.license_plate()
            );
            return Ok(ParkOutcome::AlreadyParked);
        }

        if self.occupied(category) >= self.capacity.get(category) {
            info!("Parking lot is full for {}", category);
            return Err(ParkingError::CapacityExceeded(category));
        }

        let ticket_id = self.allocate_ticket();
        let plate = vehicle.license_plate().to_string();
        *self.count.entry(category).or_default() += 1;
        self.parked
            .insert(plate.clone(), ParkedEntry { vehicle, ticket_id });

        info!(
            "{} with license plate {} parked. Ticket ID: {}",
            category, plate, ticket_id
        );
        self.audit.record(AuditEvent {
            action: Action::Entry,
            ticket_id,
            category,
            license_plate: plate,
        });

        Ok(ParkOutcome::Parked(ticket_id))
    }

    pub fn release_by_ticket(&mut self, ticket_id: u64) -> Result<Receipt, ParkingError> {
        let plate = self
            .parked
            .iter()
            .find(|(_, entry)| entry.ticket_id == ticket_id)
            .map(|(plate, _)| plate.clone())
            .ok_or(ParkingError::NotFound(Lookup::Ticket(ticket_id)))?;

        self.release_by_plate(&plate)
    }

    pub fn release_by_plate(&mut self, plate: &str) -> Result<Receipt, ParkingError> {
        let Some(entry) = self.parked.remove(plate) else {
            return Err(ParkingError::NotFound(Lookup::Plate(plate.to_string())));
        };

        let category = entry.vehicle.category();
        let charge = self
            .fees
            .charge(category, entry.vehicle.parking_duration());
        if let Some(count) = self.count.get_mut(&category) {
            *count = count.saturating_sub(1);
        }

        info!(
            "{} with license plate {} released. Charge: ${:.2}",
            category, plate, charge
        );
        self.audit.record(AuditEvent {
            action: Action::Exit,
            ticket_id: entry.ticket_id,
            category,
            license_plate: plate.to_string(),
        });

        Ok(Receipt {
            ticket_id: entry.ticket_id,
            vehicle: entry.vehicle,
            charge,
        })
    }

    pub fn available(&self, category: Category) -> usize {
        self.capacity
            .get(category)
            .saturating_sub(self.occupied(category))
    }

    pub fn ticket_id_for(&self, plate: &str) -> Result<u64, ParkingError> {
        self.parked
            .get(plate)
            .map(|entry| entry.ticket_id)
            .ok_or_else(|| ParkingError::NotFound(Lookup::Plate(plate.to_string())))
    }

    pub fn availability(&self) -> Vec<Availability> {
        Category::ALL
            .iter()
            .map(|&category| Availability {
                category,
                capacity: self.capacity.get(category),
                occupied: self.occupied(category),
                available: self.available(category),
            })
            .collect()
    }
}

pub async fn manager(mut rx: Receiver<RegistryCommand>, mut occupancy: Occupancy) {
    while let Some(command) = rx.recv().await {
        // A caller that stopped waiting does not undo the command, so send errors are ignored
        match command {
            RegistryCommand::Park(vehicle, reply) => {
                debug!("Park request for {}", vehicle.license_plate());
                let _ = reply.send(occupancy.park(vehicle));
            }
            RegistryCommand::ReleaseByTicket(ticket_id, reply) => {
                debug!("Release request for ticket {}", ticket_id);
                let _ = reply.send(occupancy.release_by_ticket(ticket_id));
            }
            RegistryCommand::ReleaseByPlate(plate, reply) => {
                debug!("Release request for plate {}", plate);
                let _ = reply.send(occupancy.release_by_plate(&plate));
            }
            RegistryCommand::Available(category, reply) => {
                let _ = reply.send(occupancy.available(category));
            }
            RegistryCommand::TicketFor(plate, reply) => {
                let _ = reply.send(occupancy.ticket_id_for(&plate));
            }
            RegistryCommand::Availability(reply) => {
                let _ = reply.send(occupancy.availability());
            }
        }
    }
    debug!("All registry handles dropped, stopping manager");
}
