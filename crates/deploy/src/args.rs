//! Constructor argument values.

use std::fmt;

use alloy_core::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::DeploymentName;

/// A single constructor argument of a deployment descriptor.
///
/// `Pending` marks a slot that must be filled with the deployed address of another
/// component of the same run. The patch table of a descriptor is derived from these slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConstructorArg {
    Address(Address),
    Uint(U256),
    String(String),
    Pending(DeploymentName),
}

impl ConstructorArg {
    pub fn zero_address() -> Self {
        Self::Address(Address::ZERO)
    }

    /// The name this slot waits on, if any.
    pub fn pending_on(&self) -> Option<DeploymentName> {
        match self {
            Self::Pending(name) => Some(*name),
            _ => None,
        }
    }
}

impl From<Address> for ConstructorArg {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<DeploymentName> for ConstructorArg {
    fn from(name: DeploymentName) -> Self {
        Self::Pending(name)
    }
}

impl From<U256> for ConstructorArg {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<u64> for ConstructorArg {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<u32> for ConstructorArg {
    fn from(value: u32) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<&str> for ConstructorArg {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConstructorArg {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Pending(name) => write!(f, "<pending:{name}>"),
        }
    }
}
