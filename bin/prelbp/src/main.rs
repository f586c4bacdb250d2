//! prelbp plans the pre-LBP contract stack deployment and hands it to a deployer.

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use cli::{Cli, Command};
use prelbp_deploy::{
    AddressBook, DeploymentPlan, PlanExporter, PreLbpStackTask, SimulatedVm, TaskConfig,
};

/// Layer the task configuration: defaults, then the TOML file, then `PRELBP_TASK_*` variables.
fn load_config(path: Option<&Path>) -> Result<TaskConfig> {
    let mut figment = Figment::from(Serialized::defaults(TaskConfig::default()));

    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("Configuration file or directory not found: {}", path.display());
        }
        let config_path = TaskConfig::resolve_path(path);
        tracing::info!(path = %config_path.display(), "Loading configuration file...");
        figment = figment.merge(Toml::file(config_path));
    }

    figment
        .merge(Env::prefixed("PRELBP_TASK_").split("__"))
        .extract()
        .context("Failed to load task configuration")
}

fn plan_table(plan: &DeploymentPlan, addresses: &AddressBook) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Contract", "Arguments", "Patches", "Address"]);

    for (position, entry) in plan.iter().enumerate() {
        let args = entry
            .descriptor
            .args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let patches = entry
            .patches
            .iter()
            .map(|patch| format!("[{}] <- {}", patch.arg_position, patch.dependency))
            .collect::<Vec<_>>()
            .join("\n");
        let address = addresses
            .address_of(entry.name())
            .map(|address| address.to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            position.to_string(),
            entry.name().to_string(),
            entry.descriptor.contract.clone(),
            args,
            patches,
            address,
        ]);
    }

    table
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    if let Command::InitConfig(args) = &cli.command {
        TaskConfig::default().save_to_file(&args.path)?;
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    let network = cli.network.to_context()?;
    let mut task = PreLbpStackTask::new(config);

    match cli.command {
        Command::Plan(args) => {
            let (plan, addresses) = match args.out {
                Some(out) => {
                    let mut exporter = PlanExporter::new(out).force(args.force);
                    let outcome = task.run(&network, &mut exporter).await?;
                    (outcome.plan, outcome.addresses)
                }
                None => (task.build_plan(&network)?, AddressBook::new()),
            };
            let digest = plan.digest()?;
            tracing::info!(%digest, "Plan digest");
            println!("{}", plan_table(&plan, &addresses));
        }
        Command::Simulate => {
            let mut vm = SimulatedVm::from_config(&task.config.simulation)?;
            tracing::info!(
                deployer = %vm.deployer(),
                start_nonce = vm.nonce(),
                "Simulating deployment..."
            );
            let outcome = task.run(&network, &mut vm).await?;
            println!("{}", plan_table(&outcome.plan, &outcome.addresses));
        }
        Command::InitConfig(_) => {}
    }

    Ok(())
}
