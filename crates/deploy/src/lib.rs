//! prelbp-deploy - Deployment planning for the pre-LBP contract stack.
//!
//! This crate builds the ordered list of contract deployments that make up the pre-LBP stack,
//! records which constructor arguments wait on the address of an earlier deployment, and hands
//! the resulting plan to a deployer in one piece.
//!
//! # Example
//!
//! ```no_run
//! use alloy_core::primitives::Address;
//! use prelbp_deploy::{KnownChain, NetworkContext, PreLbpStackTask, SimulatedVm, TaskConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let network = NetworkContext::for_chain(KnownChain::ArbitrumSepolia, Address::ZERO, "dev");
//! let mut vm = SimulatedVm::from_config(&TaskConfig::default().simulation)?;
//! let outcome = PreLbpStackTask::default().run(&network, &mut vm).await?;
//! # Ok(())
//! # }
//! ```

mod args;
pub use args::ConstructorArg;

mod config;
pub use config::{
    CONFIG_FILENAME, DEFAULT_BYTECODE_SIZE_LIMIT, DEV_MNEMONIC, SimulationConfig, TaskConfig,
    ZERO_X_EXCHANGE_PROXY,
};

mod descriptor;
pub use descriptor::{
    BuildContext, DependencyPatch, DeploymentDescriptor, build_cluster, build_magnetar,
    build_magnetar_collateral_module, build_magnetar_helper, build_magnetar_mint_module,
    build_magnetar_option_module, build_magnetar_yieldbox_module, build_pearlmit,
    build_toe_helper, build_zero_x_swapper, build_zero_x_swapper_mock,
};

mod error;
pub use error::PlanError;

mod names;
pub use names::DeploymentName;

mod network;
pub use network::{KnownChain, NetworkContext};

mod plan;
pub use plan::{DeploymentPlan, PLAN_FILENAME, PlanEntry};

mod plan_version;
pub use plan_version::{PLAN_VERSION_FILENAME, PlanVersion};

mod resolve;
pub use resolve::{AddressBook, ResolvedArg, ResolvedDescriptor};

mod task;
pub use task::{PreLbpStackTask, TaskOutcome, TaskState};

mod vm;
pub use vm::{DeployerVm, PlanExporter, SimulatedDeployment, SimulatedVm};
