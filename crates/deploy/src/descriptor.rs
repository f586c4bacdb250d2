//! Deployment descriptors and the builders that produce them.
//!
//! A descriptor states what to deploy and with which constructor arguments. Arguments that
//! depend on another component's address are left as [`ConstructorArg::Pending`] and are
//! only resolved once that component has been deployed.

use serde::{Deserialize, Serialize};

use crate::{ConstructorArg, DeploymentName, NetworkContext};

/// Instruction to overwrite a constructor argument with a deployed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyPatch {
    /// Index into the descriptor's constructor arguments.
    pub arg_position: usize,
    /// The component whose deployed address fills the slot.
    pub dependency: DeploymentName,
}

/// Declarative record of a single contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
    /// Registered name, unique within a plan.
    pub name: DeploymentName,
    /// Artifact name of the contract to deploy.
    pub contract: String,
    /// Ordered constructor arguments.
    pub args: Vec<ConstructorArg>,
    /// Bytecode size ceiling in bytes, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<usize>,
}

impl DeploymentDescriptor {
    pub fn new(name: DeploymentName, contract: impl Into<String>, args: Vec<ConstructorArg>) -> Self {
        Self {
            name,
            contract: contract.into(),
            args,
            size_limit: None,
        }
    }

    pub fn with_size_limit(mut self, size_limit: Option<usize>) -> Self {
        self.size_limit = size_limit;
        self
    }

    /// Patch table of the descriptor, one entry per pending slot in ascending position order.
    pub fn patches(&self) -> Vec<DependencyPatch> {
        self.args
            .iter()
            .enumerate()
            .filter_map(|(arg_position, arg)| {
                arg.pending_on().map(|dependency| DependencyPatch {
                    arg_position,
                    dependency,
                })
            })
            .collect()
    }

    /// Distinct names this descriptor depends on, in first-use order.
    pub fn dependencies(&self) -> Vec<DeploymentName> {
        let mut dependencies = Vec::new();
        for name in self.args.iter().filter_map(ConstructorArg::pending_on) {
            if !dependencies.contains(&name) {
                dependencies.push(name);
            }
        }
        dependencies
    }
}

/// Inputs shared by every descriptor builder.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub network: &'a NetworkContext,
    pub bytecode_size_limit: Option<usize>,
}

impl<'a> BuildContext<'a> {
    pub fn new(network: &'a NetworkContext, bytecode_size_limit: Option<usize>) -> Self {
        Self {
            network,
            bytecode_size_limit,
        }
    }

    fn describe(
        &self,
        name: DeploymentName,
        contract: &str,
        args: Vec<ConstructorArg>,
    ) -> DeploymentDescriptor {
        tracing::trace!(
            %name,
            contract,
            chain_id = self.network.chain_id,
            args = args.len(),
            "Built deployment descriptor"
        );
        DeploymentDescriptor::new(name, contract, args).with_size_limit(self.bytecode_size_limit)
    }
}

pub fn build_pearlmit(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "Pearlmit", args)
}

pub fn build_cluster(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "Cluster", args)
}

pub fn build_toe_helper(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "TapiocaOmnichainEngineHelper", args)
}

pub fn build_magnetar_collateral_module(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "MagnetarCollateralModule", args)
}

pub fn build_magnetar_mint_module(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "MagnetarMintModule", args)
}

pub fn build_magnetar_option_module(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "MagnetarOptionModule", args)
}

pub fn build_magnetar_yieldbox_module(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "MagnetarYieldBoxModule", args)
}

pub fn build_magnetar(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "Magnetar", args)
}

pub fn build_magnetar_helper(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "MagnetarHelper", args)
}

/// Production swapper routing through the 0x exchange proxy.
pub fn build_zero_x_swapper(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "ZeroXSwapper", args)
}

/// Testnet swapper; registered under the same name as the production one.
pub fn build_zero_x_swapper_mock(
    ctx: &BuildContext<'_>,
    name: DeploymentName,
    args: Vec<ConstructorArg>,
) -> DeploymentDescriptor {
    ctx.describe(name, "ZeroXSwapperMock", args)
}
