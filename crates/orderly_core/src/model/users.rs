//! Back-office users and roles
//!
//! Only identity and authorization live here. Credentials are not stored:
//! signing in is handled outside this crate.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::UserId;
use crate::error::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    /// Confirmation agent working the order queue
    #[default]
    Agent,
    Viewer,
}

/// Actions a role may be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ViewOrders,
    EditOrders,
    ManageProducts,
    ViewFinance,
    ManageSettings,
    ManageUsers,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Permission::ViewOrders,
        Permission::EditOrders,
        Permission::ManageProducts,
        Permission::ViewFinance,
        Permission::ManageSettings,
        Permission::ManageUsers,
    ];
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Agent, Role::Viewer];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Agent => "Agent",
            Self::Viewer => "Viewer",
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Self::Admin => true,
            Self::Manager => !matches!(permission, ManageUsers | ManageSettings),
            Self::Agent => matches!(permission, ViewOrders | EditOrders),
            Self::Viewer => matches!(permission, ViewOrders),
        }
    }

    pub fn permissions(&self) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| self.allows(*p))
            .collect()
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "agent" | "confirmation agent" => Ok(Self::Agent),
            "viewer" | "read-only" => Ok(Self::Viewer),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Inactive users keep their record but lose every permission
    pub fn can(&self, permission: Permission) -> bool {
        self.active && self.role.allows(permission)
    }
}
