//! Plan construction and resolution errors.

use thiserror::Error;

use crate::DeploymentName;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("{0} is already registered in the plan")]
    DuplicateName(DeploymentName),
    #[error("{name} depends on {dependency}, which is not deployed earlier in the plan")]
    DanglingReference {
        name: DeploymentName,
        dependency: DeploymentName,
    },
    #[error("{0} cannot depend on its own address")]
    SelfReference(DeploymentName),
    #[error("{name} patches argument {position} but only has {len} arguments")]
    PatchOutOfRange {
        name: DeploymentName,
        position: usize,
        len: usize,
    },
    #[error("patch of {name} at argument {position} does not match its pending slots")]
    PatchMismatch { name: DeploymentName, position: usize },
    #[error("{name} needs the address of {dependency}, which has not been deployed")]
    Unresolved {
        name: DeploymentName,
        dependency: DeploymentName,
    },
}
