//! Role checks for guarded operations.

use mintsale_types::{AccountId, Result, Role, SaleError, SaleRoles};

/// Identities allowed to perform administrator and factory operations.
///
/// Fixed at construction. A missing owner denies every administrator
/// operation; a missing factory denies every factory mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority {
    owner: Option<AccountId>,
    factory: Option<AccountId>,
}

impl Authority {
    #[must_use]
    pub fn new(roles: SaleRoles) -> Self {
        Self {
            owner: roles.owner,
            factory: roles.factory,
        }
    }

    /// Whether `caller` holds `role`.
    #[must_use]
    pub fn has_role(&self, caller: AccountId, role: Role) -> bool {
        let holder = match role {
            Role::Administrator => self.owner,
            Role::Factory => self.factory,
        };
        holder == Some(caller)
    }

    /// Fail with `NotAuthorized` unless `caller` holds `role`.
    pub fn require(&self, caller: AccountId, role: Role) -> Result<()> {
        if self.has_role(caller, role) {
            Ok(())
        } else {
            Err(SaleError::NotAuthorized { required: role })
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<AccountId> {
        self.owner
    }

    #[must_use]
    pub fn factory(&self) -> Option<AccountId> {
        self.factory
    }

    #[must_use]
    pub fn roles(&self) -> SaleRoles {
        SaleRoles {
            owner: self.owner,
            factory: self.factory,
        }
    }
}
