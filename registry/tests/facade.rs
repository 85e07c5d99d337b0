use futures::future::join_all;
use std::sync::{Arc, Once};

use registry::audit::{self, NullSink};
use registry::{Capacities, Category, RegistryFacade};
use shared::fee::FeePolicy;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder().is_test(true).init();
    });
}

#[tokio::test]
async fn test_instance_returns_same_registry() {
    init_logger();
    let facade = RegistryFacade::new(FeePolicy::default(), audit::spawn(NullSink));
    assert!(facade.get().is_none());

    let first = facade.instance(Capacities::default());
    let second = facade.instance(Capacities::new(20, 30, 10));

    assert!(first.same_registry(&second));
    assert!(facade.get().unwrap().same_registry(&first));
}

#[tokio::test]
async fn test_first_capacities_win() {
    init_logger();
    let facade = RegistryFacade::new(FeePolicy::default(), audit::spawn(NullSink));

    let first = facade.instance(Capacities::new(200, 200, 200));
    let second = facade.instance(Capacities::new(1, 2, 3));

    assert_eq!(first.capacities(), second.capacities());
    assert_eq!(second.capacities(), Capacities::new(200, 200, 200));
    assert_eq!(second.query_available(Category::Bus).await.unwrap(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_first_calls_build_one_registry() {
    init_logger();
    let facade = Arc::new(RegistryFacade::new(
        FeePolicy::default(),
        audit::spawn(NullSink),
    ));

    let tasks = (0..8).map(|i| {
        let facade = facade.clone();
        tokio::spawn(async move { facade.instance(Capacities::new(i + 1, i + 1, i + 1)) })
    });
    let handles: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winner = handles[0].capacities();
    for handle in &handles {
        assert!(handle.same_registry(&handles[0]));
        assert_eq!(handle.capacities(), winner);
    }
    assert_eq!(
        handles[3].query_available(Category::Car).await.unwrap(),
        winner.car
    );
}
