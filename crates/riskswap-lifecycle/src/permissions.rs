//! Capability checks consulted by the controller.

use std::collections::HashSet;

use riskswap_types::{Address, Result, RiskswapError};

/// Who may do what. Role management itself lives outside the core.
pub trait Permissions {
    /// May rotate the trusted quote signer.
    fn is_admin(&self, who: &Address) -> bool;
    /// May propose, activate and cancel swaps.
    fn is_broker(&self, who: &Address) -> bool;
}

/// In-memory role table: one admin, any number of brokers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    admin: Address,
    brokers: HashSet<Address>,
}

impl RoleTable {
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            brokers: HashSet::new(),
        }
    }

    /// Builder-style broker grant for setup code.
    #[must_use]
    pub fn with_broker(mut self, broker: Address) -> Self {
        self.brokers.insert(broker);
        self
    }

    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// # Errors
    /// [`RiskswapError::Unauthorized`] unless `caller` is the admin.
    pub fn grant_broker(&mut self, caller: &Address, broker: Address) -> Result<()> {
        self.require_admin(caller)?;
        if self.brokers.insert(broker) {
            tracing::info!(broker = %broker, "Broker granted");
        }
        Ok(())
    }

    /// # Errors
    /// [`RiskswapError::Unauthorized`] unless `caller` is the admin.
    pub fn revoke_broker(&mut self, caller: &Address, broker: &Address) -> Result<()> {
        self.require_admin(caller)?;
        if self.brokers.remove(broker) {
            tracing::info!(broker = %broker, "Broker revoked");
        }
        Ok(())
    }

    fn require_admin(&self, caller: &Address) -> Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(RiskswapError::Unauthorized {
                caller: *caller,
                capability: "admin",
            })
        }
    }
}

impl Permissions for RoleTable {
    fn is_admin(&self, who: &Address) -> bool {
        !who.is_zero() && *who == self.admin
    }

    fn is_broker(&self, who: &Address) -> bool {
        self.brokers.contains(who)
    }
}
