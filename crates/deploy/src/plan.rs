//! Ordered deployment plan.
//!
//! A plan is the full, ordered set of descriptors of one run. Entries are only accepted if
//! every name they depend on is already in the plan, so walking the plan front to back never
//! needs an address that has not been deployed yet.

use std::path::Path;

use anyhow::{Context, Result};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{DependencyPatch, DeploymentDescriptor, DeploymentName, PlanError};

/// The default name of an exported plan file.
pub const PLAN_FILENAME: &str = "plan.json";

/// A descriptor together with its patch table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub descriptor: DeploymentDescriptor,
    pub patches: Vec<DependencyPatch>,
}

impl PlanEntry {
    pub fn new(descriptor: DeploymentDescriptor) -> Self {
        let patches = descriptor.patches();
        Self {
            descriptor,
            patches,
        }
    }

    pub fn name(&self) -> DeploymentName {
        self.descriptor.name
    }
}

impl From<DeploymentDescriptor> for PlanEntry {
    fn from(descriptor: DeploymentDescriptor) -> Self {
        Self::new(descriptor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Deref)]
pub struct DeploymentPlan {
    /// Deployment tag of the run.
    pub tag: String,
    /// Chain the plan targets.
    pub chain_id: u64,
    #[deref]
    entries: Vec<PlanEntry>,
}

impl DeploymentPlan {
    pub fn new(tag: impl Into<String>, chain_id: u64) -> Self {
        Self {
            tag: tag.into(),
            chain_id,
            entries: Vec::new(),
        }
    }

    /// Rebuild a plan from loose entries, checking each one against the entries before it.
    pub fn from_entries(
        tag: impl Into<String>,
        chain_id: u64,
        entries: impl IntoIterator<Item = PlanEntry>,
    ) -> Result<Self, PlanError> {
        let mut plan = Self::new(tag, chain_id);
        for entry in entries {
            plan.push(entry)?;
        }
        Ok(plan)
    }

    /// Append a descriptor to the plan.
    pub fn add(&mut self, descriptor: DeploymentDescriptor) -> Result<&mut Self, PlanError> {
        self.push(PlanEntry::new(descriptor))?;
        Ok(self)
    }

    fn push(&mut self, entry: PlanEntry) -> Result<(), PlanError> {
        self.check_entry(&entry)?;
        tracing::debug!(
            name = %entry.name(),
            contract = %entry.descriptor.contract,
            patches = entry.patches.len(),
            position = self.entries.len(),
            "Added deployment to plan"
        );
        self.entries.push(entry);
        Ok(())
    }

    /// Check an entry against the entries already in the plan.
    fn check_entry(&self, entry: &PlanEntry) -> Result<(), PlanError> {
        let name = entry.name();
        if self.contains(name) {
            return Err(PlanError::DuplicateName(name));
        }

        let len = entry.descriptor.args.len();
        for patch in &entry.patches {
            if patch.arg_position >= len {
                return Err(PlanError::PatchOutOfRange {
                    name,
                    position: patch.arg_position,
                    len,
                });
            }
        }

        let expected = entry.descriptor.patches();
        if let Some(position) = first_difference(&entry.patches, &expected) {
            return Err(PlanError::PatchMismatch { name, position });
        }

        for patch in &entry.patches {
            if patch.dependency == name {
                return Err(PlanError::SelfReference(name));
            }
            if !self.contains(patch.dependency) {
                return Err(PlanError::DanglingReference {
                    name,
                    dependency: patch.dependency,
                });
            }
        }

        Ok(())
    }

    /// Re-run the construction checks over every entry.
    pub fn validate(&self) -> Result<(), PlanError> {
        Self::from_entries(self.tag.clone(), self.chain_id, self.entries.iter().cloned())
            .map(|_| ())
    }

    pub fn contains(&self, name: DeploymentName) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: DeploymentName) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name() == name)
    }

    pub fn get(&self, name: DeploymentName) -> Option<&PlanEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn names(&self) -> Vec<DeploymentName> {
        self.entries.iter().map(PlanEntry::name).collect()
    }

    pub fn into_entries(self) -> Vec<PlanEntry> {
        self.entries
    }

    /// SHA-256 of the plan's JSON form, hex-encoded.
    ///
    /// Building the same plan twice yields the same digest.
    pub fn digest(&self) -> Result<String> {
        let json = serde_json::to_vec(self).context("Failed to serialize deployment plan")?;
        Ok(hex::encode(Sha256::digest(&json)))
    }

    /// Save the plan as formatted JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize deployment plan")?;
        std::fs::write(path, json)
            .context(format!("Failed to write deployment plan to {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = self.entries.len(), "Deployment plan saved");
        Ok(())
    }

    /// Load a plan from a file, or from `plan.json` inside a directory.
    ///
    /// The loaded plan is validated before it is returned.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Deployment plan not found: {}", path.display());
        }

        let plan_path = if path.is_dir() {
            path.join(PLAN_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(&plan_path).context(format!(
            "Failed to read deployment plan from {}",
            plan_path.display()
        ))?;
        let plan: Self =
            serde_json::from_str(&content).context("Failed to parse deployment plan JSON")?;
        plan.validate()
            .context(format!("Invalid deployment plan in {}", plan_path.display()))?;

        Ok(plan)
    }
}

fn first_difference(actual: &[DependencyPatch], expected: &[DependencyPatch]) -> Option<usize> {
    if actual == expected {
        return None;
    }
    actual
        .iter()
        .zip(expected)
        .find(|(a, e)| a != e)
        .map(|(a, _)| a.arg_position)
        .or_else(|| {
            // One table is a prefix of the other; report the first extra patch.
            let extra = if actual.len() > expected.len() {
                &actual[expected.len()]
            } else {
                &expected[actual.len()]
            };
            Some(extra.arg_position)
        })
}

#[cfg(test)]
mod tests {
    use alloy_core::primitives::{Address, address};
    use tempdir::TempDir;

    use super::*;
    use crate::ConstructorArg;

    const OWNER: Address = address!("1000000000000000000000000000000000000001");

    fn leaf(name: DeploymentName) -> DeploymentDescriptor {
        DeploymentDescriptor::new(name, name.as_str(), vec![OWNER.into()])
    }

    fn dependent(name: DeploymentName, deps: &[DeploymentName]) -> DeploymentDescriptor {
        let args = deps.iter().copied().map(ConstructorArg::from).collect();
        DeploymentDescriptor::new(name, name.as_str(), args)
    }

    #[test]
    fn test_add_in_dependency_order() {
        let mut plan = DeploymentPlan::new("test", 421614);
        plan.add(leaf(DeploymentName::Pearlmit))
            .unwrap()
            .add(leaf(DeploymentName::ToeHelper))
            .unwrap()
            .add(dependent(
                DeploymentName::MagnetarMintModule,
                &[DeploymentName::Pearlmit, DeploymentName::ToeHelper],
            ))
            .unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.position(DeploymentName::MagnetarMintModule), Some(2));
        assert_eq!(plan[2].patches.len(), 2);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut plan = DeploymentPlan::new("test", 1);
        plan.add(leaf(DeploymentName::Cluster)).unwrap();

        let err = plan.add(leaf(DeploymentName::Cluster)).unwrap_err();
        assert_eq!(err, PlanError::DuplicateName(DeploymentName::Cluster));
        assert_eq!(plan.len(), 1, "Rejected entry must not be queued");
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let mut plan = DeploymentPlan::new("test", 1);
        let err = plan
            .add(dependent(DeploymentName::ZeroXSwapper, &[DeploymentName::Cluster]))
            .unwrap_err();

        assert_eq!(
            err,
            PlanError::DanglingReference {
                name: DeploymentName::ZeroXSwapper,
                dependency: DeploymentName::Cluster,
            }
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let mut plan = DeploymentPlan::new("test", 1);
        let err = plan
            .add(dependent(DeploymentName::Magnetar, &[DeploymentName::Magnetar]))
            .unwrap_err();
        assert_eq!(err, PlanError::SelfReference(DeploymentName::Magnetar));
    }

    #[test]
    fn test_patch_out_of_range_is_rejected() {
        let mut entry = PlanEntry::new(leaf(DeploymentName::Cluster));
        entry.patches.push(DependencyPatch {
            arg_position: 5,
            dependency: DeploymentName::Pearlmit,
        });

        let err = DeploymentPlan::from_entries("test", 1, [entry]).unwrap_err();
        assert_eq!(
            err,
            PlanError::PatchOutOfRange {
                name: DeploymentName::Cluster,
                position: 5,
                len: 1,
            }
        );
    }

    #[test]
    fn test_patch_mismatch_is_rejected() {
        let pearlmit = PlanEntry::new(leaf(DeploymentName::Pearlmit));
        let mut cluster = PlanEntry::new(leaf(DeploymentName::Cluster));
        // Position 0 holds the owner, not a pending slot.
        cluster.patches.push(DependencyPatch {
            arg_position: 0,
            dependency: DeploymentName::Pearlmit,
        });

        let err = DeploymentPlan::from_entries("test", 1, [pearlmit, cluster]).unwrap_err();
        assert_eq!(
            err,
            PlanError::PatchMismatch {
                name: DeploymentName::Cluster,
                position: 0,
            }
        );
    }

    #[test]
    fn test_removed_prerequisite_is_detected() {
        let mut plan = DeploymentPlan::new("test", 1);
        plan.add(leaf(DeploymentName::Pearlmit))
            .unwrap()
            .add(dependent(DeploymentName::Cluster, &[DeploymentName::Pearlmit]))
            .unwrap();
        assert!(plan.validate().is_ok());

        let remaining: Vec<_> = plan
            .clone()
            .into_entries()
            .into_iter()
            .filter(|entry| entry.name() != DeploymentName::Pearlmit)
            .collect();

        let err = DeploymentPlan::from_entries("test", 1, remaining).unwrap_err();
        assert!(matches!(err, PlanError::DanglingReference { .. }));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let build = || {
            let mut plan = DeploymentPlan::new("test", 1);
            plan.add(leaf(DeploymentName::Pearlmit)).unwrap();
            plan
        };

        let digest = build().digest().unwrap();
        assert_eq!(digest, build().digest().unwrap());
        assert_eq!(digest.len(), 64, "SHA-256 digest should be 64 hex characters");

        let mut other = build();
        other.tag = "other".to_string();
        assert_ne!(digest, other.digest().unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");

        let mut plan = DeploymentPlan::new("test", 1);
        plan.add(leaf(DeploymentName::Pearlmit))
            .unwrap()
            .add(dependent(DeploymentName::Cluster, &[DeploymentName::Pearlmit]))
            .unwrap();

        let path = temp_dir.path().join(PLAN_FILENAME);
        plan.save_to_file(&path).expect("Failed to save plan");

        let loaded = DeploymentPlan::load_from_file(temp_dir.path()).expect("Failed to load plan");
        assert_eq!(plan, loaded);
    }

    #[test]
    fn test_load_rejects_invalid_plan() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join(PLAN_FILENAME);

        let mut plan = DeploymentPlan::new("test", 1);
        plan.add(leaf(DeploymentName::Pearlmit))
            .unwrap()
            .add(dependent(DeploymentName::Cluster, &[DeploymentName::Pearlmit]))
            .unwrap();

        // Drop the prerequisite from the serialized form only.
        let mut json = serde_json::to_value(&plan).unwrap();
        json["entries"].as_array_mut().unwrap().remove(0);
        std::fs::write(&path, json.to_string()).unwrap();

        assert!(DeploymentPlan::load_from_file(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new("prelbp-test").expect("Failed to create temp dir");
        let result = DeploymentPlan::load_from_file(&temp_dir.path().join("nonexistent.json"));
        assert!(result.is_err(), "Loading missing file should return error");
    }
}
