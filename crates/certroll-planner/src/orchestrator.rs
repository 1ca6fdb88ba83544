//! Drives a certificate rotation pass across every node of a cluster.
//!
//! Nodes are processed one at a time. Each plan must converge before the
//! next node is touched and the first failure ends the pass with cluster
//! status unchanged. Only after every node converged is the new generation
//! written back. A failed pass is retried in full by the caller; nodes that
//! already rotated see a matching marker and skip the rotate command.

use std::sync::Arc;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::builder::build_plan;
use crate::cluster::ControlPlane;
use crate::error::RotationError;
use crate::gate::pending_rotation;
use crate::node::{ClusterPlan, Node, RoleFilter};
use crate::plan::{ConvergencePolicy, NodePlan};

/// Delivers a plan to a node and waits for it to be applied.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlanSubmitter: Send + Sync {
    /// Assign `plan` to `node` and block until its instructions ran.
    ///
    /// Returns `RotationError::Waiting` if the node has not converged yet
    /// and `RotationError::PlanFailed` if delivery or execution failed.
    async fn submit_and_converge(
        &self,
        label: &str,
        node: &Node,
        plan: &NodePlan,
        policy: ConvergencePolicy,
    ) -> Result<(), RotationError>;
}

/// Persists the status block of the control-plane resource.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusClient: Send + Sync {
    /// Single atomic status write. Returns the stored resource.
    async fn update_status(&self, control_plane: &ControlPlane)
        -> Result<ControlPlane, RotationError>;
}

/// Label attached to each node's rotation plan.
pub fn rotation_label(node: &Node) -> String {
    format!("[{}] certificate rotation", node.name)
}

pub struct CertificateRotation {
    submitter: Arc<dyn PlanSubmitter>,
    status: Arc<dyn StatusClient>,
}

impl CertificateRotation {
    pub fn new(submitter: Arc<dyn PlanSubmitter>, status: Arc<dyn StatusClient>) -> Self {
        Self { submitter, status }
    }

    /// Rotate certificates on every node if the recorded generation is stale.
    ///
    /// On success `control_plane` is replaced with the resource returned by
    /// the status write. On any error it is left exactly as passed in.
    pub async fn rotate_certificates(
        &self,
        control_plane: &mut ControlPlane,
        cluster: &ClusterPlan,
    ) -> Result<(), RotationError> {
        let Some(rotation) = pending_rotation(control_plane).cloned() else {
            tracing::debug!(
                cluster = %control_plane.name,
                "No certificate rotation pending"
            );
            return Ok(());
        };

        let nodes = cluster.collect(RoleFilter::Any);
        tracing::info!(
            cluster = %control_plane.name,
            from = control_plane.status.certificate_rotation_generation,
            to = rotation.generation,
            nodes = nodes.len(),
            "Starting certificate rotation"
        );

        for node in nodes {
            let plan = build_plan(control_plane, &rotation, node);
            let label = rotation_label(node);
            tracing::debug!(
                node = %node.name,
                shape = ?node.shape(),
                instructions = plan.instructions.len(),
                "Submitting rotation plan"
            );

            if let Err(e) = self
                .submitter
                .submit_and_converge(&label, node, &plan, ConvergencePolicy::STRICT)
                .await
            {
                if e.is_waiting() {
                    tracing::info!(node = %node.name, "{e}");
                } else {
                    tracing::warn!(node = %node.name, error = %e, "Certificate rotation aborted");
                }
                return Err(e);
            }
        }

        let mut desired = control_plane.clone();
        desired.status.certificate_rotation_generation = rotation.generation;
        let stored = self.status.update_status(&desired).await?;
        *control_plane = stored;

        tracing::info!(
            cluster = %control_plane.name,
            generation = rotation.generation,
            "Certificate rotation generation committed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ControlPlaneSpec, ControlPlaneStatus, RotateCertificates};
    use crate::node::NodeRoles;

    fn control_plane(initialized: bool, applied: i64, requested: Option<i64>) -> ControlPlane {
        ControlPlane {
            name: "prod".to_string(),
            spec: ControlPlaneSpec {
                kubernetes_version: "v1.28.3+rke2r1".to_string(),
                rotate_certificates: requested.map(|generation| RotateCertificates {
                    generation,
                    services: Vec::new(),
                }),
            },
            status: ControlPlaneStatus {
                initialized,
                certificate_rotation_generation: applied,
            },
        }
    }

    fn cluster() -> ClusterPlan {
        ClusterPlan::new(vec![
            Node::new(
                "cp-1",
                NodeRoles {
                    etcd: true,
                    control_plane: true,
                    worker: false,
                },
            ),
            Node::new(
                "worker-1",
                NodeRoles {
                    worker: true,
                    ..Default::default()
                },
            ),
        ])
    }

    fn echo_status() -> MockStatusClient {
        let mut status = MockStatusClient::new();
        status
            .expect_update_status()
            .returning(|cp| Ok(cp.clone()));
        status
    }

    #[tokio::test]
    async fn no_pending_rotation_touches_nothing() {
        let mut submitter = MockPlanSubmitter::new();
        submitter.expect_submit_and_converge().never();
        let mut status = MockStatusClient::new();
        status.expect_update_status().never();

        let rotation = CertificateRotation::new(Arc::new(submitter), Arc::new(status));
        let mut cp = control_plane(true, 4, Some(4));
        rotation.rotate_certificates(&mut cp, &cluster()).await.unwrap();

        let mut uninitialized = control_plane(false, 0, Some(1));
        rotation
            .rotate_certificates(&mut uninitialized, &cluster())
            .await
            .unwrap();
        assert_eq!(uninitialized.status.certificate_rotation_generation, 0);
    }

    #[tokio::test]
    async fn submits_every_node_with_label_and_strict_policy() {
        let mut submitter = MockPlanSubmitter::new();
        let mut seq = mockall::Sequence::new();
        submitter
            .expect_submit_and_converge()
            .withf(|label, node, plan, policy| {
                label == "[cp-1] certificate rotation"
                    && node.name == "cp-1"
                    && plan.instructions.len() == 2
                    && *policy == ConvergencePolicy::STRICT
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(()));
        submitter
            .expect_submit_and_converge()
            .withf(|label, node, plan, _| {
                label == "[worker-1] certificate rotation"
                    && node.name == "worker-1"
                    && plan.files.is_empty()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(()));

        let rotation = CertificateRotation::new(Arc::new(submitter), Arc::new(echo_status()));
        let mut cp = control_plane(true, 3, Some(4));
        rotation.rotate_certificates(&mut cp, &cluster()).await.unwrap();
        assert_eq!(cp.status.certificate_rotation_generation, 4);
    }

    #[tokio::test]
    async fn waiting_node_stops_the_pass_without_commit() {
        let mut submitter = MockPlanSubmitter::new();
        submitter
            .expect_submit_and_converge()
            .times(1)
            .returning(|_, node, _, _| {
                Err(RotationError::Waiting {
                    node: node.name.clone(),
                    reason: "plan applying".to_string(),
                })
            });
        let mut status = MockStatusClient::new();
        status.expect_update_status().never();

        let rotation = CertificateRotation::new(Arc::new(submitter), Arc::new(status));
        let mut cp = control_plane(true, 3, Some(4));
        let err = rotation
            .rotate_certificates(&mut cp, &cluster())
            .await
            .unwrap_err();
        assert!(err.is_waiting());
        assert_eq!(cp.status.certificate_rotation_generation, 3);
    }

    #[tokio::test]
    async fn status_write_failure_is_returned_and_resource_unchanged() {
        let mut submitter = MockPlanSubmitter::new();
        submitter
            .expect_submit_and_converge()
            .times(2)
            .returning(|_, _, _, _| Ok(()));
        let mut status = MockStatusClient::new();
        status
            .expect_update_status()
            .withf(|cp| cp.status.certificate_rotation_generation == 4)
            .times(1)
            .returning(|_| Err(RotationError::StatusUpdate("conflict".to_string())));

        let rotation = CertificateRotation::new(Arc::new(submitter), Arc::new(status));
        let mut cp = control_plane(true, 3, Some(4));
        let err = rotation
            .rotate_certificates(&mut cp, &cluster())
            .await
            .unwrap_err();
        assert!(matches!(err, RotationError::StatusUpdate(_)));
        assert_eq!(cp.status.certificate_rotation_generation, 3);
    }

    #[test]
    fn label_names_the_machine() {
        let node = Node::new("stone-01", NodeRoles::default());
        assert_eq!(rotation_label(&node), "[stone-01] certificate rotation");
    }
}
