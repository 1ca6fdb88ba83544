//! Certroll planner: certificate-rotation reconciliation core.
//!
//! Decides whether a cluster has a pending certificate-rotation generation,
//! builds a role-differentiated plan for every node, hands each plan to a
//! plan-distribution collaborator, and commits the new generation to cluster
//! status once every node has converged. Re-driving a pass is always safe:
//! the on-node script skips rotation when its marker already matches.

pub mod builder;
pub mod cluster;
pub mod error;
pub mod gate;
pub mod node;
pub mod orchestrator;
pub mod plan;
pub mod runtime;
pub mod script;

pub use builder::build_plan;
pub use cluster::{ControlPlane, ControlPlaneSpec, ControlPlaneStatus, RotateCertificates};
pub use error::RotationError;
pub use gate::should_rotate;
pub use node::{ClusterPlan, Node, NodeRoles, RoleFilter, RoleShape};
pub use orchestrator::{CertificateRotation, PlanSubmitter, StatusClient};
pub use plan::{ConvergencePolicy, File, NodePlan, OneTimeInstruction};
pub use runtime::Runtime;
