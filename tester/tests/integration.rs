//! Full simulations against the real company, producers and solver

use std::io::Write;
use std::time::Duration;

use tester::{run_simulation, SimulationConfig};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_default_simulation_is_clean() {
    let config = SimulationConfig::default();
    let expected = config.total_orders();

    let report = run_simulation(config).await.unwrap();

    assert!(report.is_clean(), "unexpected report: {report:?}");
    assert_eq!(report.orders_issued, expected);
    assert_eq!(report.orders_completed, expected);
    // a 1x1 base sheet is always quoted, so every item can be assembled
    assert_eq!(report.orders_fully_priced, expected);
    assert!(report.total_cost > 0.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_only_producers_with_repeats() {
    let config = SimulationConfig::builder()
        .customers(6)
        .sync_producers(0)
        .async_producers(3)
        .async_repeat(3)
        .async_delay(Duration::from_millis(2))
        .orders_per_customer(8)
        .workers(2)
        .build();

    let report = run_simulation(config).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.orders_completed, 48);
    // three producers asked once per order
    assert_eq!(report.quote_requests, 48 * 3);
    assert_eq!(report.async_deliveries, 48 * 3 * 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_seed_same_cost() {
    let config = SimulationConfig::builder().seed(1234).customers(3).orders_per_customer(5).build();

    let first = run_simulation(config.clone()).await.unwrap();
    let second = run_simulation(config).await.unwrap();

    assert!((first.total_cost - second.total_cost).abs() < 1e-6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_customers_is_a_clean_noop() {
    let config = SimulationConfig::builder().customers(0).build();

    let report = run_simulation(config).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.orders_issued, 0);
    assert_eq!(report.quote_requests, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_config_file_drives_simulation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "customers": 2,
            "orders_per_customer": 4,
            "materials": 2,
            "workers": 1,
            "company": {{ "readiness_timeout": 5000, "stall_warning_interval": 1000 }}
        }}"#
    )
    .unwrap();

    let config = SimulationConfig::from_json_file(file.path()).unwrap();
    let report = run_simulation(config).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.orders_completed, 8);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = SimulationConfig::builder().workers(0).build();
    assert!(run_simulation(config).await.is_err());
}
