use log::{debug, info};
use std::sync::OnceLock;

use shared::fee::FeePolicy;

use crate::audit::AuditHandle;
use crate::config::{Capacities, DEFAULT_MAILBOX, RegistryConfig};
use crate::{RegistryHandle, spawn};

/// Hands out the one registry shared by everything that holds this facade.
///
/// The capacities passed to the first [`instance`](RegistryFacade::instance)
/// call are the ones the registry keeps for its whole life; later calls get
/// the same registry whatever they pass.
pub struct RegistryFacade {
    fees: FeePolicy,
    mailbox: usize,
    audit: AuditHandle,
    instance: OnceLock<RegistryHandle>,
}

impl RegistryFacade {
    pub fn new(fees: FeePolicy, audit: AuditHandle) -> Self {
        RegistryFacade {
            fees,
            mailbox: DEFAULT_MAILBOX,
            audit,
            instance: OnceLock::new(),
        }
    }

    pub fn with_mailbox(mut self, mailbox: usize) -> Self {
        self.mailbox = mailbox;
        self
    }

    /// Must be called from within a tokio runtime the first time.
    pub fn instance(&self, capacities: Capacities) -> RegistryHandle {
        let handle = self.instance.get_or_init(|| {
            info!("Creating shared parking registry");
            spawn(
                RegistryConfig {
                    capacities,
                    fees: self.fees,
                    mailbox: self.mailbox,
                },
                self.audit.clone(),
            )
        });

        if handle.capacities() != capacities {
            debug!(
                "Registry already configured with {:?}, ignoring {:?}",
                handle.capacities(),
                capacities
            );
        }
        handle.clone()
    }

    pub fn get(&self) -> Option<RegistryHandle> {
        self.instance.get().cloned()
    }

    pub fn audit(&self) -> &AuditHandle {
        &self.audit
    }
}
