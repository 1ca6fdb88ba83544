//! Decides whether a rotation pass has work to do.

use crate::cluster::{ControlPlane, RotateCertificates};

/// The rotation request still waiting to be applied, if any.
///
/// Nothing is pending until the control plane is initialized. Any
/// difference between the recorded and requested generation counts,
/// including a requested generation lower than the recorded one.
pub fn pending_rotation(control_plane: &ControlPlane) -> Option<&RotateCertificates> {
    if !control_plane.status.initialized {
        return None;
    }
    let rotation = control_plane.spec.rotate_certificates.as_ref()?;
    (control_plane.status.certificate_rotation_generation != rotation.generation)
        .then_some(rotation)
}

/// `true` if the cluster is initialized and its rotation generation is stale.
pub fn should_rotate(control_plane: &ControlPlane) -> bool {
    pending_rotation(control_plane).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ControlPlaneSpec, ControlPlaneStatus};

    fn control_plane(initialized: bool, applied: i64, requested: Option<i64>) -> ControlPlane {
        ControlPlane {
            name: "test".to_string(),
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

    #[test]
    fn uninitialized_never_rotates() {
        assert!(!should_rotate(&control_plane(false, 3, Some(4))));
        assert!(!should_rotate(&control_plane(false, 0, Some(0))));
    }

    #[test]
    fn missing_spec_never_rotates() {
        assert!(!should_rotate(&control_plane(true, 3, None)));
    }

    #[test]
    fn matching_generation_is_current() {
        assert!(!should_rotate(&control_plane(true, 4, Some(4))));
    }

    #[test]
    fn stale_generation_rotates() {
        assert!(should_rotate(&control_plane(true, 3, Some(4))));
    }

    #[test]
    fn decreased_generation_still_rotates() {
        assert!(should_rotate(&control_plane(true, 9, Some(2))));
    }

    #[test]
    fn pending_rotation_returns_the_request() {
        let cp = control_plane(true, 1, Some(2));
        assert_eq!(pending_rotation(&cp).map(|r| r.generation), Some(2));
    }
}
