//! Runs the helm binary on behalf of an orchestration framework. Cluster connection settings
//! become helm environment variables and, where needed, a generated temporary kubeconfig.

/// Contains the shared tooling: constants, errors, files and regexes.
pub mod common;

/// The HelmClient. Runs helm commands and parses their output.
pub mod client;

/// Process-wide capabilities, detected once at startup.
pub mod context;

/// Builds the helm environment from the invocation parameters.
pub mod environment;

/// Connection parameters for helm invocations.
pub mod params;

/// Parses `helm plugin list` output.
pub mod plugin;

/// Runs command lines as child processes.
pub mod runner;

pub use client::HelmClient;
pub use common::error::{Error, Result};
pub use context::{Capabilities, HelmContext};
pub use environment::{EnvironmentOverrides, GeneratedKubeconfig, HelmEnvironment};
pub use params::{InvocationParameters, KubeconfigSource};
pub use plugin::{parse_helm_plugin_list, HelmPlugin};
pub use runner::{CommandResult, Runner, SystemRunner};
