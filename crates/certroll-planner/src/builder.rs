//! Builds the per-node certificate rotation plan.

use certroll_common::encoding::encode_content;

use crate::cluster::{ControlPlane, RotateCertificates};
use crate::node::{Node, RoleShape};
use crate::plan::{File, NodePlan, OneTimeInstruction};
use crate::script::{self, ROTATE_SCRIPT};

const ROTATE_INSTRUCTION: &str = "rotate certificates";
const RESTART_INSTRUCTION: &str = "restart";

/// Build the rotation plan for one node.
///
/// Workers only restart their agent so it picks up the refreshed
/// certificates. Every other node receives the rotation script, runs it,
/// and restarts the server unit. The output is a pure function of the
/// runtime, the rotation request and the node's role shape.
pub fn build_plan(
    control_plane: &ControlPlane,
    rotation: &RotateCertificates,
    node: &Node,
) -> NodePlan {
    let runtime = control_plane.runtime();

    match node.shape() {
        RoleShape::WorkerOnly => NodePlan {
            files: Vec::new(),
            instructions: vec![restart(runtime.agent_unit())],
        },
        RoleShape::ControlPlaneOrEtcd => {
            let script_path = script::script_path(runtime);
            NodePlan {
                files: vec![File {
                    path: script_path,
                    content: encode_content(ROTATE_SCRIPT.as_bytes()),
                }],
                instructions: vec![
                    OneTimeInstruction {
                        name: ROTATE_INSTRUCTION.to_string(),
                        command: "sh".to_string(),
                        args: script::invocation_args(
                            runtime,
                            rotation.generation,
                            &rotation.services,
                        ),
                    },
                    restart(runtime.server_unit()),
                ],
            }
        }
    }
}

fn restart(unit: &str) -> OneTimeInstruction {
    OneTimeInstruction {
        name: RESTART_INSTRUCTION.to_string(),
        command: "systemctl".to_string(),
        args: vec!["restart".to_string(), unit.to_string()],
    }
}
