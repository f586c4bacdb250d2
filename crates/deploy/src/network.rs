//! Network context for a deployment run.

use alloy_core::primitives::Address;
use serde::{Deserialize, Serialize};

/// Chains the pre-LBP stack is known to deploy on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum KnownChain {
    Ethereum,
    Sepolia,
    Arbitrum,
    ArbitrumSepolia,
    Optimism,
    OptimismSepolia,
    Base,
    BaseSepolia,
}

impl KnownChain {
    pub fn chain_id(&self) -> u64 {
        match self {
            KnownChain::Ethereum => 1,
            KnownChain::Sepolia => 11155111,
            KnownChain::Arbitrum => 42161,
            KnownChain::ArbitrumSepolia => 421614,
            KnownChain::Optimism => 10,
            KnownChain::OptimismSepolia => 11155420,
            KnownChain::Base => 8453,
            KnownChain::BaseSepolia => 84532,
        }
    }

    /// LayerZero v2 endpoint id of the chain.
    pub fn lz_chain_id(&self) -> u32 {
        match self {
            KnownChain::Ethereum => 30101,
            KnownChain::Sepolia => 40161,
            KnownChain::Arbitrum => 30110,
            KnownChain::ArbitrumSepolia => 40231,
            KnownChain::Optimism => 30111,
            KnownChain::OptimismSepolia => 40232,
            KnownChain::Base => 30184,
            KnownChain::BaseSepolia => 40245,
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(
            self,
            KnownChain::Sepolia
                | KnownChain::ArbitrumSepolia
                | KnownChain::OptimismSepolia
                | KnownChain::BaseSepolia
        )
    }

    /// Arbitrum hosts the protocol; every other chain is a satellite.
    pub fn is_host_chain(&self) -> bool {
        matches!(self, KnownChain::Arbitrum | KnownChain::ArbitrumSepolia)
    }

    /// Look up a known chain by its chain id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|chain| chain.chain_id() == chain_id)
    }
}

/// Read-only description of the network a plan is built for.
///
/// Only `is_testnet` influences which descriptor variants end up in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkContext {
    pub chain_id: u64,
    /// LayerZero endpoint id, passed to the Cluster constructor.
    pub lz_chain_id: u32,
    pub is_testnet: bool,
    pub is_host_chain: bool,
    /// Multicall address that owns every deployed component.
    pub owner: Address,
    /// Deployment tag the run is recorded under.
    pub tag: String,
}

impl NetworkContext {
    /// Build the context of a known chain.
    pub fn for_chain(chain: KnownChain, owner: Address, tag: impl Into<String>) -> Self {
        Self {
            chain_id: chain.chain_id(),
            lz_chain_id: chain.lz_chain_id(),
            is_testnet: chain.is_testnet(),
            is_host_chain: chain.is_host_chain(),
            owner,
            tag: tag.into(),
        }
    }

    /// Build the context of a chain that is not in [`KnownChain`].
    ///
    /// Custom chains default to mainnet, satellite semantics.
    pub fn custom(chain_id: u64, lz_chain_id: u32, owner: Address, tag: impl Into<String>) -> Self {
        Self {
            chain_id,
            lz_chain_id,
            is_testnet: false,
            is_host_chain: false,
            owner,
            tag: tag.into(),
        }
    }

    pub fn testnet(mut self, is_testnet: bool) -> Self {
        self.is_testnet = is_testnet;
        self
    }

    pub fn host_chain(mut self, is_host_chain: bool) -> Self {
        self.is_host_chain = is_host_chain;
        self
    }
}
