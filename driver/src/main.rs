use clap::Parser;
use log::{debug, error};
use std::path::PathBuf;

use driver::{DemoOptions, run};
use registry::Capacities;
use registry::audit::DEFAULT_LOG_FILE;

#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
struct Args {
    /// Places for cars
    #[arg(long, default_value_t = 10)]
    car_capacity: usize,

    /// Places for motorcycles
    #[arg(long, default_value_t = 15)]
    motorcycle_capacity: usize,

    /// Places for buses
    #[arg(long, default_value_t = 5)]
    bus_capacity: usize,

    /// Number of concurrent vehicles arriving at the gate
    #[arg(short = 'w', long, default_value_t = 10)]
    workers: usize,

    /// File entry and exit records are appended to
    #[arg(short = 'l', long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Do not write the entry/exit log
    #[arg(long)]
    no_audit: bool,

    /// Offset added to each worker's plate seed
    #[arg(short = 's', long, default_value_t = 0)]
    seed: u64,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();
    debug!("{:?}", args);

    let options = DemoOptions {
        capacities: Capacities::new(args.car_capacity, args.motorcycle_capacity, args.bus_capacity),
        workers: args.workers,
        log_file: (!args.no_audit).then_some(args.log_file),
        seed: args.seed,
    };

    match run(options).await {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            error!("Demo failed: {}", e);
            std::process::exit(1);
        }
    }
}
