//! Resolution of pending constructor arguments against deployed addresses.

use std::collections::BTreeMap;

use alloy_core::primitives::{Address, U256};
use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};

use crate::{ConstructorArg, DeploymentDescriptor, DeploymentName, PlanError};

/// Addresses of the components deployed so far, keyed by registered name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, From)]
pub struct AddressBook(BTreeMap<DeploymentName, Address>);

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the address of a deployed component, returning the previous one if any.
    pub fn record(&mut self, name: DeploymentName, address: Address) -> Option<Address> {
        self.0.insert(name, address)
    }

    pub fn address_of(&self, name: DeploymentName) -> Option<Address> {
        self.0.get(&name).copied()
    }
}

impl FromIterator<(DeploymentName, Address)> for AddressBook {
    fn from_iter<I: IntoIterator<Item = (DeploymentName, Address)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A constructor argument with every pending slot filled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResolvedArg {
    Address(Address),
    Uint(U256),
    String(String),
}

/// A descriptor ready to be deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDescriptor {
    pub name: DeploymentName,
    pub contract: String,
    pub args: Vec<ResolvedArg>,
    pub size_limit: Option<usize>,
}

impl DeploymentDescriptor {
    /// Fill every pending slot with the address recorded in `book`.
    pub fn resolve(&self, book: &AddressBook) -> Result<ResolvedDescriptor, PlanError> {
        let args = self
            .args
            .iter()
            .map(|arg| match arg {
                ConstructorArg::Address(address) => Ok(ResolvedArg::Address(*address)),
                ConstructorArg::Uint(value) => Ok(ResolvedArg::Uint(*value)),
                ConstructorArg::String(value) => Ok(ResolvedArg::String(value.clone())),
                ConstructorArg::Pending(dependency) => book
                    .address_of(*dependency)
                    .map(ResolvedArg::Address)
                    .ok_or(PlanError::Unresolved {
                        name: self.name,
                        dependency: *dependency,
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedDescriptor {
            name: self.name,
            contract: self.contract.clone(),
            args,
            size_limit: self.size_limit,
        })
    }
}
