//! Cluster control-plane resource: desired rotation and observed status.

use serde::{Deserialize, Serialize};

use crate::runtime::Runtime;

/// Operator request to rotate certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateCertificates {
    /// Bumped by the operator to request another rotation.
    pub generation: i64,
    /// Certificate services to rotate; empty rotates everything.
    /// Order becomes `-s` flag order on the node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneSpec {
    pub kubernetes_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_certificates: Option<RotateCertificates>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneStatus {
    /// Set once the first control plane node is up.
    #[serde(default)]
    pub initialized: bool,
    /// Last generation applied to every node.
    #[serde(default)]
    pub certificate_rotation_generation: i64,
}

/// The cluster-level resource the orchestrator reconciles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlane {
    pub name: String,
    pub spec: ControlPlaneSpec,
    #[serde(default)]
    pub status: ControlPlaneStatus,
}

impl ControlPlane {
    pub fn runtime(&self) -> Runtime {
        Runtime::from_kubernetes_version(&self.spec.kubernetes_version)
    }
}
