//! Node plan wire types handed to the plan-distribution layer.

use serde::{Deserialize, Serialize};

/// A file the node agent writes before running instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: String,
    /// Standard base64 of the file bytes.
    pub content: String,
}

/// A command the node agent runs once per plan.
///
/// Delivery may repeat, so commands must be idempotent on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeInstruction {
    /// Human-readable label shown in plan status.
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodePlan {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<File>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<OneTimeInstruction>,
}

/// Failure tolerance forwarded to the distribution layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvergencePolicy {
    pub max_failures: u32,
    pub failure_threshold: u32,
}

impl ConvergencePolicy {
    /// No tolerated failures: any error aborts the pass.
    pub const STRICT: Self = Self {
        max_failures: 0,
        failure_threshold: 0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sections_are_omitted() {
        let plan = NodePlan {
            files: Vec::new(),
            instructions: vec![OneTimeInstruction {
                name: "restart".to_string(),
                command: "systemctl".to_string(),
                args: vec!["restart".to_string(), "rke2-agent".to_string()],
            }],
        };
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value.get("files").is_none());
        assert_eq!(value["instructions"][0]["command"], "systemctl");
    }

    #[test]
    fn strict_policy_tolerates_nothing() {
        assert_eq!(ConvergencePolicy::STRICT, ConvergencePolicy::default());
        assert_eq!(ConvergencePolicy::STRICT.max_failures, 0);
        assert_eq!(ConvergencePolicy::STRICT.failure_threshold, 0);
    }
}
