//! On-node idempotent rotation script.
//!
//! The script is delivered verbatim to every etcd / controlplane node and
//! invoked as:
//!
//! ```text
//! sh -xe <script> <runtime> <generation> [-s <service>]...
//! ```
//!
//! It keeps the last attempted generation in
//! `<data root>/certificate_rotation/generation`. When the marker already
//! holds the target generation the native rotate command is skipped, so the
//! same instruction can be delivered any number of times. The marker is
//! rewritten after every run that gets that far; under `-e` a failing rotate
//! command exits first and leaves the marker untouched.

use crate::runtime::Runtime;

/// Flags passed to `sh` ahead of the script path.
pub const SHELL_FLAGS: &str = "-xe";

/// Flag introducing each certificate service on the rotate command line.
pub const SERVICE_FLAG: &str = "-s";

pub const ROTATE_SCRIPT: &str = r#"#!/bin/sh

currentGeneration=""
targetGeneration=$2
runtime=$1
shift
shift

dataRoot="/var/lib/rancher/$runtime/certificate_rotation"
generationFile="$dataRoot/generation"

currentGeneration=$(cat "$generationFile" 2>/dev/null || echo "")

if [ "$currentGeneration" != "$targetGeneration" ]; then
  "$runtime" certificate rotate "$@"
else
  echo "certificates have already been rotated to the current generation."
fi

mkdir -p "$dataRoot"
echo "$targetGeneration" > "$generationFile"
"#;

/// Where the script lands on the node.
pub fn script_path(runtime: Runtime) -> String {
    format!("{}/certificate_rotation/bin/rotate.sh", runtime.data_root())
}

/// Arguments for `sh`, in wire order: flags, script, runtime, generation,
/// then one `-s <service>` pair per service.
pub fn invocation_args(runtime: Runtime, generation: i64, services: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(4 + services.len() * 2);
    args.push(SHELL_FLAGS.to_string());
    args.push(script_path(runtime));
    args.push(runtime.name().to_string());
    args.push(generation.to_string());
    for service in services {
        args.push(SERVICE_FLAG.to_string());
        args.push(service.clone());
    }
    args
}
