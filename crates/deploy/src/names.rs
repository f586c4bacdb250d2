//! Registered deployment names.
//!
//! Every component deployed by the pre-LBP stack is identified by one of these names.
//! The string form is the key under which the deployed address is recorded, and the key
//! that pending constructor arguments are resolved by.

use serde::{Deserialize, Serialize};

/// The closed set of component identities deployed by the pre-LBP stack.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum DeploymentName {
    Pearlmit,
    Cluster,
    ToeHelper,
    MagnetarCollateralModule,
    MagnetarMintModule,
    MagnetarOptionModule,
    MagnetarYieldBoxModule,
    Magnetar,
    MagnetarHelper,
    ZeroXSwapper,
}

impl DeploymentName {
    /// All names, in declaration order.
    pub fn all() -> impl Iterator<Item = DeploymentName> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    /// The canonical string form of the name.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
