//! Boundary with the deployer that executes a plan.
//!
//! The plan is handed over once, after it has been fully assembled. The deployer walks it in
//! order, fills every pending argument with an address deployed earlier in the same run and
//! records the resulting addresses.

use std::future::Future;
use std::path::PathBuf;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};

use crate::{
    AddressBook, DeploymentPlan, PLAN_FILENAME, PLAN_VERSION_FILENAME, PlanVersion,
    ResolvedDescriptor, SimulationConfig,
};

/// Executes a deployment plan.
pub trait DeployerVm: Send {
    /// A short name for logging.
    const VM_NAME: &'static str;

    /// Execute `plan`, returning the addresses deployed by this run.
    fn execute<'a>(
        &'a mut self,
        plan: &'a DeploymentPlan,
    ) -> impl Future<Output = Result<AddressBook>> + Send + 'a;
}

/// A deployment performed by [`SimulatedVm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedDeployment {
    pub descriptor: ResolvedDescriptor,
    pub address: Address,
    pub nonce: u64,
}

/// In-process dry run of a plan.
///
/// Each deployment gets the CREATE address of the deployer at the next nonce, which is what a
/// fresh account deploying the plan sequentially would obtain.
#[derive(Debug, Clone)]
pub struct SimulatedVm {
    deployer: Address,
    nonce: u64,
    book: AddressBook,
    deployments: Vec<SimulatedDeployment>,
}

impl SimulatedVm {
    pub fn new(deployer: Address, start_nonce: u64) -> Self {
        Self {
            deployer,
            nonce: start_nonce,
            book: AddressBook::new(),
            deployments: Vec::new(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let deployer = config
            .deployer_address()
            .context("Failed to determine simulation deployer")?;
        Ok(Self::new(deployer, config.start_nonce))
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Nonce the next deployment will use.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Every deployment simulated so far, across runs.
    pub fn deployments(&self) -> &[SimulatedDeployment] {
        &self.deployments
    }

    /// Addresses known to the simulator, across runs.
    pub fn address_book(&self) -> &AddressBook {
        &self.book
    }
}

impl DeployerVm for SimulatedVm {
    const VM_NAME: &'static str = "simulated";

    async fn execute<'a>(&'a mut self, plan: &'a DeploymentPlan) -> Result<AddressBook> {
        let mut deployed = AddressBook::new();

        for entry in plan.iter() {
            let descriptor = entry
                .descriptor
                .resolve(&self.book)
                .context(format!("Failed to resolve {}", entry.name()))?;

            let address = self.deployer.create(self.nonce);

            tracing::info!(
                name = %descriptor.name,
                contract = %descriptor.contract,
                nonce = self.nonce,
                %address,
                "Simulated deployment"
            );

            self.book.record(descriptor.name, address);
            deployed.record(descriptor.name, address);
            self.deployments.push(SimulatedDeployment {
                descriptor,
                address,
                nonce: self.nonce,
            });
            self.nonce += 1;
        }

        Ok(deployed)
    }
}

/// Writes the plan to disk for an external deployer to execute.
///
/// Addresses are unknown until that deployer has run, so the returned book is empty.
#[derive(Debug, Clone)]
pub struct PlanExporter {
    /// Directory the plan is written to.
    pub outdata: PathBuf,
    /// Overwrite an existing export even if its contents are unchanged.
    pub force: bool,
}

impl PlanExporter {
    pub fn new(outdata: impl Into<PathBuf>) -> Self {
        Self {
            outdata: outdata.into(),
            force: false,
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn plan_path(&self) -> PathBuf {
        self.outdata.join(PLAN_FILENAME)
    }

    pub fn version_path(&self) -> PathBuf {
        self.outdata.join(PLAN_VERSION_FILENAME)
    }

    /// Whether the export directory already holds this exact plan.
    fn is_current(&self, version: &PlanVersion) -> bool {
        if !self.plan_path().exists() {
            return false;
        }
        match PlanVersion::load_from_file(&self.version_path()) {
            Ok(existing) => existing.matches(version),
            Err(err) => {
                tracing::debug!(err = ?err, "No usable plan version metadata");
                false
            }
        }
    }
}

impl DeployerVm for PlanExporter {
    const VM_NAME: &'static str = "export";

    async fn execute<'a>(&'a mut self, plan: &'a DeploymentPlan) -> Result<AddressBook> {
        tokio::fs::create_dir_all(&self.outdata)
            .await
            .context(format!(
                "Failed to create output directory {}",
                self.outdata.display()
            ))?;

        let version = PlanVersion::for_plan(plan)?;

        if !self.force && self.is_current(&version) {
            tracing::info!(
                path = %self.plan_path().display(),
                digest = %version.plan_digest,
                "Plan unchanged since last export, skipping"
            );
            return Ok(AddressBook::new());
        }

        plan.save_to_file(&self.plan_path())?;
        version.save_to_file(&self.version_path())?;

        tracing::info!(
            path = %self.plan_path().display(),
            digest = %version.plan_digest,
            "Plan exported for the external deployer"
        );

        Ok(AddressBook::new())
    }
}
