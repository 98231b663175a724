use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::types::{CustomerId, Role};

/// verified identity of the user making a request
///
/// Produced by whatever authenticates the request and passed into every
/// ledger operation explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn new(user_id: Uuid, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    /// bank staff identity
    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, vec![Role::Admin])
    }

    /// customer acting on their own account
    pub fn customer(customer_id: CustomerId) -> Self {
        Self::new(customer_id, vec![Role::Customer])
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// allow admins and the owning customer
    pub fn authorize(&self, owner_id: CustomerId) -> Result<()> {
        if self.is_admin() || self.user_id == owner_id {
            return Ok(());
        }
        warn!(user_id = %self.user_id, owner_id = %owner_id, "access denied to foreign record");
        Err(LedgerError::Forbidden {
            user_id: self.user_id,
        })
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }
        warn!(user_id = %self.user_id, "admin role required");
        Err(LedgerError::Forbidden {
            user_id: self.user_id,
        })
    }
}
