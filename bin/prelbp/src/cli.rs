use std::{fmt, path::PathBuf, str::FromStr};

use alloy_core::primitives::Address;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use prelbp_deploy::{KnownChain, NetworkContext};
use tracing::level_filters::LevelFilter;

/// The chain to plan for: a known chain name or a raw chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainArg {
    Known(KnownChain),
    Custom(u64),
}

impl FromStr for ChainArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(chain) = KnownChain::from_str(s) {
            return Ok(ChainArg::Known(chain));
        }
        let chain_id: u64 = s
            .parse()
            .context(format!("'{s}' is neither a known chain nor a chain id"))?;
        Ok(KnownChain::from_chain_id(chain_id)
            .map(ChainArg::Known)
            .unwrap_or(ChainArg::Custom(chain_id)))
    }
}

impl fmt::Display for ChainArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainArg::Known(chain) => write!(f, "{chain}"),
            ChainArg::Custom(chain_id) => write!(f, "{chain_id}"),
        }
    }
}

#[derive(Parser)]
#[command(name = "prelbp")]
#[command(
    author,
    version,
    about = "Plan and simulate the pre-LBP contract stack deployment"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "PRELBP_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// Path to a Prelbp.toml configuration file, or a directory containing one.
    #[arg(long, alias = "conf", env = "PRELBP_CONFIG")]
    pub config: Option<PathBuf>,

    #[clap(flatten)]
    pub network: NetworkArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Network the plan is built for.
#[derive(Debug, Clone, Args)]
pub struct NetworkArgs {
    /// The target chain (name or chain id).
    #[arg(long, env = "PRELBP_CHAIN", default_value = "arbitrum-sepolia")]
    pub chain: ChainArg,

    /// LayerZero endpoint id. Required for chains that are not known.
    #[arg(long, env = "PRELBP_LZ_CHAIN_ID")]
    pub lz_chain_id: Option<u32>,

    /// Force testnet (mock) or mainnet (production) variants.
    #[arg(long, env = "PRELBP_TESTNET")]
    pub testnet: Option<bool>,

    /// Owner of every deployed component (the multicall address). Required by `plan` and `simulate`.
    #[arg(long, env = "PRELBP_OWNER")]
    pub owner: Option<Address>,

    /// Deployment tag.
    #[arg(long, env = "PRELBP_TAG", default_value = "default")]
    pub tag: String,
}

impl NetworkArgs {
    pub fn to_context(&self) -> anyhow::Result<NetworkContext> {
        let owner = self
            .owner
            .context("--owner is required to build the deployment plan")?;

        let mut network = match self.chain {
            ChainArg::Known(chain) => {
                let mut network = NetworkContext::for_chain(chain, owner, self.tag.clone());
                if let Some(lz_chain_id) = self.lz_chain_id {
                    network.lz_chain_id = lz_chain_id;
                }
                network
            }
            ChainArg::Custom(chain_id) => {
                let lz_chain_id = self
                    .lz_chain_id
                    .context(format!("--lz-chain-id is required for custom chain {chain_id}"))?;
                NetworkContext::custom(chain_id, lz_chain_id, owner, self.tag.clone())
            }
        };

        if let Some(testnet) = self.testnet {
            network = network.testnet(testnet);
        }

        Ok(network)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the deployment plan and print it.
    Plan(PlanArgs),
    /// Run the plan against the in-process simulated deployer.
    Simulate,
    /// Write a default configuration file.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Export the plan to this directory for the external deployer.
    #[arg(long, alias = "outdata", env = "PRELBP_OUT")]
    pub out: Option<PathBuf>,

    /// Rewrite the exported plan even if it is unchanged.
    #[arg(long, env = "PRELBP_FORCE", default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Clone, Args)]
pub struct InitConfigArgs {
    /// Where to write the configuration file.
    #[arg(long, default_value = prelbp_deploy::CONFIG_FILENAME)]
    pub path: PathBuf,
}
