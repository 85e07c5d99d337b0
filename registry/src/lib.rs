//! Concurrent occupancy registry for a capacity-bounded parking lot.
//!
//! The table of parked vehicles is owned by a single manager task. A
//! [`RegistryHandle`] is a cloneable front for that task: every call becomes a
//! command on the manager's mailbox and waits for the reply, so park, release
//! and query calls from any number of tasks are applied one at a time.

use log::info;
use tokio::sync::mpsc::{self, Sender};
use tokio::sync::oneshot;

pub mod audit;
pub mod config;
pub mod facade;
mod manager;

pub use audit::{AuditHandle, AuditSink, FileSink, MemorySink, NullSink};
pub use config::{Capacities, RegistryConfig};
pub use facade::RegistryFacade;
pub use manager::{Availability, ParkOutcome, Receipt};
pub use shared::{Category, Lookup, ParkingError, VehicleDescriptor};

use crate::manager::{Occupancy, RegistryCommand, manager};

#[derive(Clone)]
pub struct RegistryHandle {
    tx: Sender<RegistryCommand>,
    capacities: Capacities,
}

/// Start a registry task and return the first handle to it.
///
/// Must be called from within a tokio runtime. The task stops once every
/// handle has been dropped.
pub fn spawn(config: RegistryConfig, audit: AuditHandle) -> RegistryHandle {
    let (tx, rx) = mpsc::channel::<RegistryCommand>(config.mailbox.max(1));
    let occupancy = Occupancy::new(config.capacities, config.fees, audit);

    tokio::spawn(async move {
        manager(rx, occupancy).await;
    });

    info!(
        "Parking registry started with capacity cars: {}, motorcycles: {}, buses: {}",
        config.capacities.car, config.capacities.motorcycle, config.capacities.bus
    );

    RegistryHandle {
        tx,
        capacities: config.capacities,
    }
}

impl RegistryHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RegistryCommand,
    ) -> Result<T, ParkingError> {
        let (reply_tx, reply_rx) = oneshot::channel::<T>();
        self.tx
            .send(command(reply_tx))
            .await
            .map_err(|_| ParkingError::RegistryClosed)?;
        reply_rx.await.map_err(|_| ParkingError::RegistryClosed)
    }

    /// Park a vehicle. A plate that is already inside yields
    /// [`ParkOutcome::AlreadyParked`]; a full category yields
    /// [`ParkingError::CapacityExceeded`].
    pub async fn park(&self, vehicle: VehicleDescriptor) -> Result<ParkOutcome, ParkingError> {
        self.request(|reply| RegistryCommand::Park(vehicle, reply))
            .await?
    }

    pub async fn release_by_ticket(&self, ticket_id: u64) -> Result<Receipt, ParkingError> {
        self.request(|reply| RegistryCommand::ReleaseByTicket(ticket_id, reply))
            .await?
    }

    pub async fn release_by_plate(&self, plate: &str) -> Result<Receipt, ParkingError> {
        let plate = plate.to_string();
        self.request(|reply| RegistryCommand::ReleaseByPlate(plate, reply))
            .await?
    }

    /// Free places left for `category`.
    pub async fn query_available(&self, category: Category) -> Result<usize, ParkingError> {
        self.request(|reply| RegistryCommand::Available(category, reply))
            .await
    }

    pub async fn ticket_id_for(&self, plate: &str) -> Result<u64, ParkingError> {
        let plate = plate.to_string();
        self.request(|reply| RegistryCommand::TicketFor(plate, reply))
            .await?
    }

    /// Capacity, occupancy and free places of every category, read in one step.
    pub async fn availability(&self) -> Result<Vec<Availability>, ParkingError> {
        self.request(RegistryCommand::Availability).await
    }

    pub fn capacities(&self) -> Capacities {
        self.capacities
    }

    /// True when both handles talk to the same registry task.
    pub fn same_registry(&self, other: &RegistryHandle) -> bool {
        self.tx.same_channel(&other.tx)
    }
}
