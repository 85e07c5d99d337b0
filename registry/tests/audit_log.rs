use std::io;
use std::sync::Once;
use tokio_stream::StreamExt;
use tokio_util::codec::FramedRead;

use registry::audit::{self, AuditSink, FileSink};
use registry::{Capacities, Category, ParkOutcome, RegistryConfig, VehicleDescriptor, spawn};
use shared::audit::{Action, AuditDecoder, AuditEvent};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder().is_test(true).init();
    });
}

struct BrokenDisk;

impl AuditSink for BrokenDisk {
    async fn record(&mut self, _event: AuditEvent) -> io::Result<()> {
        Err(io::Error::other("no space left on device"))
    }
}

#[tokio::test]
async fn test_file_sink_appends_lines() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parking_log.txt");

    let audit = audit::spawn(FileSink::open(&path).await.unwrap());
    let registry = spawn(RegistryConfig::default(), audit.clone());

    let car = VehicleDescriptor::new("CAR123", Category::Car, 2.0).unwrap();
    let ticket_id = match registry.park(car).await.unwrap() {
        ParkOutcome::Parked(id) => id,
        ParkOutcome::AlreadyParked => panic!("CAR123 was not parked yet"),
    };
    registry.release_by_ticket(ticket_id).await.unwrap();
    audit.flush().await;

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(
        contents,
        "Entry: Ticket ID 1, Car with license plate CAR123\n\
Exit: Ticket ID 1, Car with license plate CAR123\n"
    );

    let file = tokio::fs::File::open(&path).await.unwrap();
    let mut reader = FramedRead::new(file, AuditDecoder {});
    let mut events = vec![];
    while let Some(event) = reader.next().await {
        events.push(event.unwrap());
    }
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].action, Action::Exit);
}

#[tokio::test]
async fn test_file_sink_keeps_existing_lines() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parking_log.txt");
    tokio::fs::write(&path, "Entry: Ticket ID 7, Bus with license plate OLD1\n")
        .await
        .unwrap();

    let audit = audit::spawn(FileSink::open(&path).await.unwrap());
    let registry = spawn(RegistryConfig::default(), audit.clone());
    registry
        .park(VehicleDescriptor::new("MOTO1", Category::Motorcycle, 1.0).unwrap())
        .await
        .unwrap();
    audit.flush().await;

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(contents.starts_with("Entry: Ticket ID 7, Bus with license plate OLD1\n"));
    assert!(contents.ends_with("Entry: Ticket ID 1, Motorcycle with license plate MOTO1\n"));
}

#[tokio::test]
async fn test_failing_sink_does_not_fail_operations() {
    init_logger();
    let audit = audit::spawn(BrokenDisk);
    let registry = spawn(
        RegistryConfig::with_capacities(Capacities::new(1, 1, 1)),
        audit.clone(),
    );

    let bus = VehicleDescriptor::new("BUS1", Category::Bus, 4.0).unwrap();
    assert_eq!(registry.park(bus).await.unwrap(), ParkOutcome::Parked(1));
    let receipt = registry.release_by_plate("BUS1").await.unwrap();
    assert_eq!(receipt.charge, 14.0);
    audit.flush().await;

    assert_eq!(registry.query_available(Category::Bus).await.unwrap(), 1);
}
