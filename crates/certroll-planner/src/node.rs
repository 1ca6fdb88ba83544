//! Cluster nodes, their roles, and role-filtered enumeration.

use serde::{Deserialize, Serialize};

/// Role flags carried by a node. A node may hold several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRoles {
    #[serde(default)]
    pub etcd: bool,
    #[serde(default)]
    pub control_plane: bool,
    #[serde(default)]
    pub worker: bool,
}

/// Plan shape a node receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleShape {
    /// Worker without etcd or controlplane: only restarts its agent.
    WorkerOnly,
    /// Anything else runs the rotation script and restarts the server.
    ControlPlaneOrEtcd,
}

/// A cluster member as seen by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Machine name, used in plan labels and logs.
    pub name: String,
    #[serde(flatten)]
    pub roles: NodeRoles,
}

impl Node {
    pub fn new(name: impl Into<String>, roles: NodeRoles) -> Self {
        Self {
            name: name.into(),
            roles,
        }
    }

    pub fn shape(&self) -> RoleShape {
        if self.roles.worker && !self.roles.etcd && !self.roles.control_plane {
            RoleShape::WorkerOnly
        } else {
            RoleShape::ControlPlaneOrEtcd
        }
    }
}

/// Predicate used when collecting nodes from a cluster plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFilter {
    Any,
    Etcd,
    ControlPlane,
    WorkerOnly,
}

impl RoleFilter {
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Any => true,
            Self::Etcd => node.roles.etcd,
            Self::ControlPlane => node.roles.control_plane,
            Self::WorkerOnly => node.shape() == RoleShape::WorkerOnly,
        }
    }
}

/// Every node known for a cluster, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterPlan {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl ClusterPlan {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Nodes matching `filter`, preserving discovery order.
    pub fn collect(&self, filter: RoleFilter) -> Vec<&Node> {
        self.nodes.iter().filter(|n| filter.matches(n)).collect()
    }

    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }
}
