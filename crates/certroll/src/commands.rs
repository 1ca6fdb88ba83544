//! Subcommand handlers.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use certroll_common::persist;
use certroll_planner::gate::pending_rotation;
use certroll_planner::orchestrator::rotation_label;
use certroll_planner::script::ROTATE_SCRIPT;
use certroll_planner::{
    build_plan, should_rotate, CertificateRotation, ClusterPlan, ControlPlane, NodePlan,
    RoleFilter,
};

use crate::config::Config;
use crate::error::CliError;
use crate::format;
use crate::store::{DirectoryPlanStore, FileStatusClient};

fn load_control_plane(config: &Config) -> anyhow::Result<ControlPlane> {
    persist::read_json(&config.control_plane).with_context(|| {
        format!(
            "reading control plane from {}",
            config.control_plane.display()
        )
    })
}

fn load_cluster(config: &Config) -> anyhow::Result<ClusterPlan> {
    persist::read_json(&config.nodes)
        .with_context(|| format!("reading nodes from {}", config.nodes.display()))
}

pub fn check(config: &Config) -> anyhow::Result<()> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct CheckReport<'a> {
        cluster: &'a str,
        initialized: bool,
        applied_generation: i64,
        requested_generation: Option<i64>,
        pending: bool,
    }

    let control_plane = load_control_plane(config)?;
    let pending = should_rotate(&control_plane);

    if config.json {
        let report = CheckReport {
            cluster: &control_plane.name,
            initialized: control_plane.status.initialized,
            applied_generation: control_plane.status.certificate_rotation_generation,
            requested_generation: control_plane
                .spec
                .rotate_certificates
                .as_ref()
                .map(|r| r.generation),
            pending,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        format::rotation_state(&control_plane, pending);
    }
    Ok(())
}

pub fn plan(config: &Config, node: Option<&str>, decode: bool) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct PlannedNode<'a> {
        node: &'a str,
        label: String,
        plan: NodePlan,
    }

    let control_plane = load_control_plane(config)?;
    let cluster = load_cluster(config)?;
    let rotation = control_plane
        .spec
        .rotate_certificates
        .as_ref()
        .ok_or(CliError::NoRotationRequested)?;

    if pending_rotation(&control_plane).is_none() {
        tracing::info!(
            generation = rotation.generation,
            "Rotation is not pending; showing plans for the requested generation anyway"
        );
    }

    let nodes = match node {
        Some(name) => vec![cluster
            .find(name)
            .ok_or_else(|| CliError::NodeNotFound(name.to_string()))?],
        None => cluster.collect(RoleFilter::Any),
    };

    let planned: Vec<PlannedNode<'_>> = nodes
        .into_iter()
        .map(|n| PlannedNode {
            node: &n.name,
            label: rotation_label(n),
            plan: build_plan(&control_plane, rotation, n),
        })
        .collect();

    if config.json {
        println!("{}", serde_json::to_string_pretty(&planned)?);
    } else {
        for entry in &planned {
            format::plan_detail(&entry.label, &entry.plan, decode);
        }
    }
    Ok(())
}

pub fn script() -> anyhow::Result<()> {
    print!("{ROTATE_SCRIPT}");
    Ok(())
}

pub async fn rotate(config: &Config, assume_converged: bool) -> anyhow::Result<()> {
    let status = Arc::new(FileStatusClient::new(&config.control_plane));
    let mut control_plane = status.load()?;
    let generation = control_plane
        .spec
        .rotate_certificates
        .as_ref()
        .map(|r| r.generation)
        .unwrap_or_default();
    let submitter = Arc::new(DirectoryPlanStore::new(
        &config.output,
        generation,
        assume_converged,
    ));
    let cluster = load_cluster(config)?;
    let before = control_plane.status.certificate_rotation_generation;

    let rotation = CertificateRotation::new(submitter, status);
    rotation
        .rotate_certificates(&mut control_plane, &cluster)
        .await?;

    let after = control_plane.status.certificate_rotation_generation;
    if config.json {
        println!(
            "{}",
            serde_json::json!({
                "cluster": control_plane.name,
                "previousGeneration": before,
                "generation": after,
                "rotated": before != after,
            })
        );
    } else if before != after {
        println!(
            "{}: rotated certificates, generation {before} -> {after}",
            control_plane.name
        );
    } else {
        println!(
            "{}: nothing to rotate (generation {after})",
            control_plane.name
        );
    }
    Ok(())
}
