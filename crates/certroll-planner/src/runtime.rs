//! Kubernetes runtime detection and service-unit naming.

use std::fmt;

/// Root under which every runtime keeps its node-local state.
const RANCHER_DATA_ROOT: &str = "/var/lib/rancher";

/// The node-local distribution that owns the certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    Rke2,
    K3s,
}

impl Runtime {
    /// Derive the runtime from a Kubernetes version such as
    /// `v1.27.4+rke2r1` or `v1.27.4+k3s1`. Anything that is not k3s is rke2.
    pub fn from_kubernetes_version(version: &str) -> Self {
        if version.contains("k3s") {
            Self::K3s
        } else {
            Self::Rke2
        }
    }

    /// Binary and directory name of the runtime.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rke2 => "rke2",
            Self::K3s => "k3s",
        }
    }

    /// Systemd unit running the server (etcd / controlplane) process.
    pub fn server_unit(&self) -> &'static str {
        match self {
            Self::Rke2 => "rke2-server",
            Self::K3s => "k3s",
        }
    }

    /// Systemd unit running the agent process on worker nodes.
    pub fn agent_unit(&self) -> &'static str {
        match self {
            Self::Rke2 => "rke2-agent",
            Self::K3s => "k3s-agent",
        }
    }

    pub fn data_root(&self) -> String {
        format!("{RANCHER_DATA_ROOT}/{}", self.name())
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k3s_versions_select_k3s() {
        assert_eq!(Runtime::from_kubernetes_version("v1.27.4+k3s1"), Runtime::K3s);
    }

    #[test]
    fn everything_else_selects_rke2() {
        assert_eq!(
            Runtime::from_kubernetes_version("v1.27.4+rke2r1"),
            Runtime::Rke2
        );
        assert_eq!(Runtime::from_kubernetes_version(""), Runtime::Rke2);
    }

    #[test]
    fn unit_names_per_runtime() {
        assert_eq!(Runtime::Rke2.server_unit(), "rke2-server");
        assert_eq!(Runtime::Rke2.agent_unit(), "rke2-agent");
        assert_eq!(Runtime::K3s.server_unit(), "k3s");
        assert_eq!(Runtime::K3s.agent_unit(), "k3s-agent");
    }

    #[test]
    fn data_root_is_namespaced_by_runtime() {
        assert_eq!(Runtime::Rke2.data_root(), "/var/lib/rancher/rke2");
        assert_eq!(Runtime::K3s.to_string(), "k3s");
    }
}
