use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::DeploymentPlan;

/// The name of the metadata file written next to an exported plan.
pub const PLAN_VERSION_FILENAME: &str = ".plan-version.json";

/// Metadata stored alongside an exported plan.
///
/// Used to detect whether a freshly built plan differs from the one already handed to the
/// external deployer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanVersion {
    /// SHA-256 digest of the exported plan
    pub plan_digest: String,
    /// Deployment tag of the exported plan
    pub tag: String,
    /// Chain the exported plan targets
    pub chain_id: u64,
    /// Unix timestamp of the export
    pub exported_at: i64,
    /// prelbp version that exported the plan
    pub prelbp_version: String,
}

impl PlanVersion {
    /// Describe `plan`, stamped with the current time and crate version.
    pub fn for_plan(plan: &DeploymentPlan) -> Result<Self> {
        Ok(Self {
            plan_digest: plan.digest()?,
            tag: plan.tag.clone(),
            chain_id: plan.chain_id,
            exported_at: chrono::Utc::now().timestamp(),
            prelbp_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Whether this metadata describes the same plan contents.
    pub fn matches(&self, other: &PlanVersion) -> bool {
        self.plan_digest == other.plan_digest
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize plan version")?;

        std::fs::write(path, json).context(format!(
            "Failed to write plan version to {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Returns an error if the file doesn't exist, is malformed, or cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Plan version file does not exist: {}", path.display());
        }

        let content = std::fs::read_to_string(path).context(format!(
            "Failed to read plan version from {}",
            path.display()
        ))?;

        serde_json::from_str(&content).context("Failed to parse plan version JSON")
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::{DeploymentDescriptor, DeploymentName};

    fn plan(tag: &str) -> DeploymentPlan {
        let mut plan = DeploymentPlan::new(tag, 421614);
        plan.add(DeploymentDescriptor::new(
            DeploymentName::ToeHelper,
            "TapiocaOmnichainEngineHelper",
            vec![],
        ))
        .unwrap();
        plan
    }

    #[test]
    fn test_for_plan() {
        let version = PlanVersion::for_plan(&plan("v1")).unwrap();
        assert_eq!(version.tag, "v1");
        assert_eq!(version.chain_id, 421614);
        assert_eq!(version.plan_digest.len(), 64);
        assert!(version.exported_at > 0);
    }

    #[test]
    fn test_matches_ignores_timestamp() {
        let mut first = PlanVersion::for_plan(&plan("v1")).unwrap();
        let second = PlanVersion::for_plan(&plan("v1")).unwrap();
        first.exported_at = 0;
        assert!(first.matches(&second));

        let other = PlanVersion::for_plan(&plan("v2")).unwrap();
        assert!(!first.matches(&other), "Different tags should change the digest");
    }

    #[test]
    fn test_version_save_and_load() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join(PLAN_VERSION_FILENAME);

        let original = PlanVersion {
            plan_digest: "a7f3c2b1d8e5f4a9b2c3d4e5f6a7b8c9".to_string(),
            tag: "v1".to_string(),
            chain_id: 42161,
            exported_at: 1737316800,
            prelbp_version: "0.1.0".to_string(),
        };

        original.save_to_file(&path).expect("Failed to save version");
        let loaded = PlanVersion::load_from_file(&path).expect("Failed to load version");

        assert_eq!(original, loaded, "Loaded version should match original");
    }

    #[test]
    fn test_version_load_corrupted_file() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join(PLAN_VERSION_FILENAME);

        std::fs::write(&path, "{ invalid json }").expect("Failed to write corrupted file");

        assert!(
            PlanVersion::load_from_file(&path).is_err(),
            "Loading corrupted file should return error"
        );
    }
}
