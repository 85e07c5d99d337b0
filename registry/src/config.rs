use shared::Category;
use shared::fee::FeePolicy;

/// Size of the command mailbox in front of the registry task.
pub const DEFAULT_MAILBOX: usize = 100;

/// Maximum number of vehicles of each category parked at the same time.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Capacities {
    pub car: usize,
    pub motorcycle: usize,
    pub bus: usize,
}

impl Capacities {
    pub fn new(car: usize, motorcycle: usize, bus: usize) -> Self {
        Capacities {
            car,
            motorcycle,
            bus,
        }
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Car => self.car,
            Category::Motorcycle => self.motorcycle,
            Category::Bus => self.bus,
        }
    }
}

impl Default for Capacities {
    fn default() -> Self {
        Capacities::new(10, 15, 5)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    pub capacities: Capacities,
    pub fees: FeePolicy,
    pub mailbox: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            capacities: Capacities::default(),
            fees: FeePolicy::default(),
            mailbox: DEFAULT_MAILBOX,
        }
    }
}

impl RegistryConfig {
    pub fn with_capacities(capacities: Capacities) -> Self {
        RegistryConfig {
            capacities,
            ..RegistryConfig::default()
        }
    }
}
