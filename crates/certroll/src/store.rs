//! File-backed plan delivery and status persistence.
//!
//! Plans are delivered into `<output>/<node>/plan.json` as a
//! [`DeliveredPlan`] envelope stamped with the rotation generation. A node
//! (or an operator acting for it) reports progress by copying the envelope
//! it applied to `<node>/applied.json`, or by writing a failure description
//! to `<node>/failed`. Worker plans are identical across generations, so
//! convergence is judged on the whole envelope, never on the bare plan.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use certroll_common::persist;
use certroll_planner::{
    ControlPlane, ConvergencePolicy, Node, NodePlan, PlanSubmitter, RotationError, StatusClient,
};

const PLAN_FILENAME: &str = "plan.json";
const APPLIED_FILENAME: &str = "applied.json";
const FAILED_FILENAME: &str = "failed";

/// Envelope written for each delivered plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveredPlan {
    pub label: String,
    pub node: String,
    pub generation: i64,
    pub policy: ConvergencePolicy,
    pub plan: NodePlan,
}

/// Delivers plans for one rotation generation into a directory tree.
pub struct DirectoryPlanStore {
    root: PathBuf,
    generation: i64,
    assume_converged: bool,
}

impl DirectoryPlanStore {
    pub fn new(root: impl Into<PathBuf>, generation: i64, assume_converged: bool) -> Self {
        Self {
            root: root.into(),
            generation,
            assume_converged,
        }
    }

    fn node_dir(&self, node: &Node) -> PathBuf {
        self.root.join(&node.name)
    }
}

#[async_trait]
impl PlanSubmitter for DirectoryPlanStore {
    async fn submit_and_converge(
        &self,
        label: &str,
        node: &Node,
        plan: &NodePlan,
        policy: ConvergencePolicy,
    ) -> Result<(), RotationError> {
        let dir = self.node_dir(node);
        let delivered = DeliveredPlan {
            label: label.to_string(),
            node: node.name.clone(),
            generation: self.generation,
            policy,
            plan: plan.clone(),
        };

        // Redelivering an identical envelope must not disturb a node mid-apply.
        let plan_path = dir.join(PLAN_FILENAME);
        let existing: Option<DeliveredPlan> = persist::read_json_if_exists(&plan_path)?;
        if existing.as_ref() != Some(&delivered) {
            persist::write_json_pretty(&plan_path, &delivered)?;
            let _ = std::fs::remove_file(dir.join(APPLIED_FILENAME));
            let _ = std::fs::remove_file(dir.join(FAILED_FILENAME));
            tracing::debug!(
                node = %node.name,
                generation = self.generation,
                path = %plan_path.display(),
                "Plan delivered"
            );
        }

        if self.assume_converged {
            return Ok(());
        }

        check_convergence(&dir, &delivered)
    }
}

fn check_convergence(dir: &Path, delivered: &DeliveredPlan) -> Result<(), RotationError> {
    let failed = dir.join(FAILED_FILENAME);
    if failed.exists() {
        let reason = std::fs::read_to_string(&failed)?;
        return Err(RotationError::PlanFailed {
            node: delivered.node.clone(),
            reason: reason.trim().to_string(),
        });
    }

    let applied: Option<DeliveredPlan> =
        persist::read_json_if_exists(&dir.join(APPLIED_FILENAME))?;
    match applied {
        Some(applied) if &applied == delivered => Ok(()),
        Some(applied) => Err(RotationError::Waiting {
            node: delivered.node.clone(),
            reason: format!(
                "node applied generation {}, waiting for {}",
                applied.generation, delivered.generation
            ),
        }),
        None => Err(RotationError::Waiting {
            node: delivered.node.clone(),
            reason: "plan delivered, not yet applied".to_string(),
        }),
    }
}

/// Persists status into the control-plane JSON document.
pub struct FileStatusClient {
    path: PathBuf,
}

impl FileStatusClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<ControlPlane, RotationError> {
        Ok(persist::read_json(&self.path)?)
    }
}

#[async_trait]
impl StatusClient for FileStatusClient {
    async fn update_status(
        &self,
        control_plane: &ControlPlane,
    ) -> Result<ControlPlane, RotationError> {
        // Only the status block is ours; keep whatever spec is on disk.
        let mut stored = self
            .load()
            .map_err(|e| RotationError::StatusUpdate(e.to_string()))?;
        stored.status = control_plane.status.clone();
        persist::write_json_pretty(&self.path, &stored)
            .map_err(|e| RotationError::StatusUpdate(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "Control-plane status written");
        Ok(stored)
    }
}
