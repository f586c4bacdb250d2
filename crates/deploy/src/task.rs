//! The pre-LBP stack deployment task.
//!
//! Deploys, in order:
//! - Pearlmit
//! - Cluster
//! - ToeHelper
//! - MagnetarCollateralModule
//! - MagnetarMintModule
//! - MagnetarOptionModule
//! - MagnetarYieldBoxModule
//! - Magnetar
//! - MagnetarHelper
//! - ZeroXSwapper (mock on testnets)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    AddressBook, BuildContext, ConstructorArg, DeployerVm, DeploymentDescriptor, DeploymentName,
    DeploymentPlan, NetworkContext, TaskConfig, build_cluster, build_magnetar,
    build_magnetar_collateral_module, build_magnetar_helper, build_magnetar_mint_module,
    build_magnetar_option_module, build_magnetar_yieldbox_module, build_pearlmit,
    build_toe_helper, build_zero_x_swapper, build_zero_x_swapper_mock,
};

/// Stages of a task run. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum TaskState {
    Init,
    BuildPlan,
    SelectVariant,
    Submit,
    Done,
}

impl TaskState {
    /// The stage following this one, `None` once done.
    pub fn next(self) -> Option<TaskState> {
        match self {
            TaskState::Init => Some(TaskState::BuildPlan),
            TaskState::BuildPlan => Some(TaskState::SelectVariant),
            TaskState::SelectVariant => Some(TaskState::Submit),
            TaskState::Submit => Some(TaskState::Done),
            TaskState::Done => None,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub plan: DeploymentPlan,
    /// Addresses reported by the deployer. Empty when the plan was only exported.
    pub addresses: AddressBook,
    pub digest: String,
}

/// Orchestrates the pre-LBP stack: builds the plan and submits it once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreLbpStackTask {
    pub config: TaskConfig,
    state: Option<TaskState>,
}

impl PreLbpStackTask {
    pub fn new(config: TaskConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// The stage the last run reached.
    pub fn state(&self) -> Option<TaskState> {
        self.state
    }

    fn advance(&mut self, to: TaskState) {
        let from = self.state.unwrap_or(TaskState::Init);
        debug_assert!(
            from == to || from.next() == Some(to),
            "invalid task transition {from} -> {to}"
        );
        tracing::debug!(%from, %to, "Task state transition");
        self.state = Some(to);
    }

    /// Build the plan for `network` without submitting it.
    pub fn build_plan(&self, network: &NetworkContext) -> Result<DeploymentPlan> {
        let mut plan = self.build_core(network)?;
        plan.add(self.swapper(network))
            .context("Failed to add swapper to the plan")?;
        Ok(plan)
    }

    /// Every component that does not depend on the network type.
    fn build_core(&self, network: &NetworkContext) -> Result<DeploymentPlan> {
        let ctx = BuildContext::new(network, self.config.size_limit());
        let owner = ConstructorArg::from(network.owner);

        let mut plan = DeploymentPlan::new(network.tag.clone(), network.chain_id);

        plan.add(build_pearlmit(
            &ctx,
            DeploymentName::Pearlmit,
            vec![
                self.config.pearlmit_name.as_str().into(),
                self.config.pearlmit_version.as_str().into(),
                owner.clone(),
                0u64.into(),
            ],
        ))?
        .add(build_cluster(
            &ctx,
            DeploymentName::Cluster,
            vec![network.lz_chain_id.into(), owner.clone()],
        ))?
        .add(build_toe_helper(&ctx, DeploymentName::ToeHelper, vec![]))?
        .add(build_magnetar_collateral_module(
            &ctx,
            DeploymentName::MagnetarCollateralModule,
            module_args(),
        ))?
        .add(build_magnetar_mint_module(
            &ctx,
            DeploymentName::MagnetarMintModule,
            module_args(),
        ))?
        .add(build_magnetar_option_module(
            &ctx,
            DeploymentName::MagnetarOptionModule,
            module_args(),
        ))?
        .add(build_magnetar_yieldbox_module(
            &ctx,
            DeploymentName::MagnetarYieldBoxModule,
            module_args(),
        ))?
        .add(magnetar(&ctx, owner))?
        .add(build_magnetar_helper(
            &ctx,
            DeploymentName::MagnetarHelper,
            vec![],
        ))?;

        Ok(plan)
    }

    /// The swapper variant for the network. The other variant is never built.
    fn swapper(&self, network: &NetworkContext) -> DeploymentDescriptor {
        let ctx = BuildContext::new(network, self.config.size_limit());
        let owner = ConstructorArg::from(network.owner);

        if network.is_testnet {
            build_zero_x_swapper_mock(
                &ctx,
                DeploymentName::ZeroXSwapper,
                vec![DeploymentName::Cluster.into(), owner],
            )
        } else {
            build_zero_x_swapper(
                &ctx,
                DeploymentName::ZeroXSwapper,
                vec![self.config.zero_x_proxy.into(), owner],
            )
        }
    }

    /// Build the plan and hand it to `vm`.
    ///
    /// Nothing reaches the deployer unless the whole plan was assembled and validated.
    pub async fn run<V: DeployerVm>(
        &mut self,
        network: &NetworkContext,
        vm: &mut V,
    ) -> Result<TaskOutcome> {
        self.state = None;
        self.advance(TaskState::Init);

        tracing::info!(
            chain_id = network.chain_id,
            tag = %network.tag,
            is_testnet = network.is_testnet,
            is_host_chain = network.is_host_chain,
            owner = %network.owner,
            "Building pre-LBP stack plan..."
        );

        self.advance(TaskState::BuildPlan);
        let mut plan = self
            .build_core(network)
            .context("Failed to build pre-LBP stack plan")?;

        self.advance(TaskState::SelectVariant);
        let swapper = self.swapper(network);
        tracing::info!(
            contract = %swapper.contract,
            is_testnet = network.is_testnet,
            "Selected swapper variant"
        );
        plan.add(swapper)
            .context("Failed to add swapper to the plan")?;
        plan.validate()
            .context("Assembled plan failed validation")?;
        let digest = plan.digest()?;

        self.advance(TaskState::Submit);
        tracing::info!(
            vm = V::VM_NAME,
            entries = plan.len(),
            %digest,
            "Submitting plan..."
        );
        let addresses = vm
            .execute(&plan)
            .await
            .context(format!("Deployer '{}' failed to execute plan", V::VM_NAME))?;

        self.advance(TaskState::Done);
        tracing::info!(deployed = addresses.len(), "✓ Pre-LBP stack task complete");

        Ok(TaskOutcome {
            plan,
            addresses,
            digest,
        })
    }
}

/// Magnetar modules are deployed with two zero addresses and no patches.
fn module_args() -> Vec<ConstructorArg> {
    vec![ConstructorArg::zero_address(), ConstructorArg::zero_address()]
}

fn magnetar(ctx: &BuildContext<'_>, owner: ConstructorArg) -> DeploymentDescriptor {
    build_magnetar(
        ctx,
        DeploymentName::Magnetar,
        vec![
            DeploymentName::Cluster.into(),
            owner,
            DeploymentName::MagnetarCollateralModule.into(),
            DeploymentName::MagnetarMintModule.into(),
            DeploymentName::MagnetarOptionModule.into(),
            DeploymentName::MagnetarYieldBoxModule.into(),
            DeploymentName::Pearlmit.into(),
            DeploymentName::ToeHelper.into(),
        ],
    )
}
