//! Human-readable CLI output formatting.
//!
//! JSON output bypasses this module and serializes the planner types directly.

use certroll_common::encoding::decode_content_utf8;
use certroll_planner::{ControlPlane, NodePlan};

/// Print the rotation state of a control plane.
pub fn rotation_state(control_plane: &ControlPlane, pending: bool) {
    println!("{}", control_plane.name);
    println!("  Runtime:      {}", control_plane.runtime());
    println!("  Initialized:  {}", control_plane.status.initialized);
    println!(
        "  Applied:      {}",
        control_plane.status.certificate_rotation_generation
    );
    match &control_plane.spec.rotate_certificates {
        Some(rotation) => {
            println!("  Requested:    {}", rotation.generation);
            if !rotation.services.is_empty() {
                println!("  Services:     {}", rotation.services.join(", "));
            }
        }
        None => println!("  Requested:    -"),
    }
    println!(
        "  Rotation:     {}",
        if pending { "pending" } else { "up to date" }
    );
}

/// Print one node's plan. With `decode`, file contents are shown as text.
pub fn plan_detail(label: &str, plan: &NodePlan, decode: bool) {
    println!("{label}");
    for file in &plan.files {
        println!("  file {}", file.path);
        if decode {
            match decode_content_utf8(&file.content) {
                Ok(text) => {
                    for line in text.lines() {
                        println!("    | {line}");
                    }
                }
                Err(e) => println!("    ! {e}"),
            }
        }
    }
    for (i, instruction) in plan.instructions.iter().enumerate() {
        println!(
            "  {}. {}: {} {}",
            i + 1,
            instruction.name,
            instruction.command,
            instruction.args.join(" ")
        );
    }
}
