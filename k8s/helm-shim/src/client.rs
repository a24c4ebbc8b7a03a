use crate::{
    common::{
        constants::{HELM_BINARY_NAME, HELM_NULL_VALUES, HELM_VERSION_REGEX},
        error::{BinaryNotFound, CommandFailure, CommandParse, Result, YamlParse},
        regex::Regex,
    },
    context::HelmContext,
    environment::{EnvironmentOverrides, HelmEnvironment},
    params::InvocationParameters,
    plugin::{parse_helm_plugin_list, HelmPlugin},
    runner::{CommandResult, Runner, SystemRunner},
};
use snafu::{ensure, ResultExt};
use std::{cell::RefCell, path::PathBuf};
use tempfile::TempPath;
use tracing::{debug, warn};

/// Runs helm commands with the connection settings of one set of InvocationParameters.
/// Temporary kubeconfig files written for its commands are removed when the client is dropped.
pub struct HelmClient<R = SystemRunner> {
    context: HelmContext,
    params: InvocationParameters,
    runner: R,
    cleanup_files: RefCell<Vec<TempPath>>,
}

impl HelmClient<SystemRunner> {
    /// Creates a client which runs helm as a child process.
    pub fn new(context: HelmContext, params: InvocationParameters) -> Self {
        Self::with_runner(context, params, SystemRunner)
    }
}

impl<R> HelmClient<R>
where
    R: Runner,
{
    pub fn with_runner(context: HelmContext, params: InvocationParameters, runner: R) -> Self {
        Self {
            context,
            params,
            runner,
            cleanup_files: RefCell::new(Vec::new()),
        }
    }

    pub fn params(&self) -> &InvocationParameters {
        &self.params
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Temporary files which will be deleted along with this client.
    pub fn pending_cleanup(&self) -> Vec<PathBuf> {
        self.cleanup_files
            .borrow()
            .iter()
            .map(|path| path.to_path_buf())
            .collect()
    }

    /// Runs a full helm command line, e.g. `/usr/bin/helm list -a`, with the environment built
    /// from the parameters. A non-zero exit code is an error if fails_on_error is set.
    pub fn run_helm(&self, command: &str, fails_on_error: bool) -> Result<CommandResult> {
        self.context.ensure_yaml()?;

        let (overrides, kubeconfig) = HelmEnvironment::prepare(&self.params)?.into_parts();
        if let Some(path) = kubeconfig {
            self.cleanup_files.borrow_mut().push(path);
        }

        debug!(%command, "Helm command");
        let result = self.runner.run(command, &overrides)?;

        ensure!(
            !fails_on_error || result.success(),
            CommandFailure {
                reason: "Failure when executing Helm command",
                command,
                rc: result.rc,
                stdout: result.stdout.clone(),
                stderr: result.stderr.clone(),
            }
        );

        Ok(result)
    }

    /// Runs `<command> get values --output=yaml <release_name>` and parses the user-supplied
    /// values of the release. A release without values gives an empty mapping.
    pub fn get_values(&self, command: &str, release_name: &str) -> Result<serde_yaml::Value> {
        self.context.ensure_yaml()?;

        let get_command = format!("{command} get values --output=yaml {release_name}");
        let result = self.run_helm(get_command.as_str(), true)?;

        // Helm 3 prints "null" when no values are set.
        if result.stdout.trim() == HELM_NULL_VALUES {
            return Ok(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
        }

        serde_yaml::from_str(result.stdout.as_str()).context(YamlParse {
            input_yaml: result.stdout.clone(),
        })
    }

    /// Runs `<helm_bin> plugin list`. Without a helm binary there is nothing to list, and None
    /// is returned without running anything.
    pub fn get_helm_plugin_list(&self, helm_bin: Option<&str>) -> Result<Option<CommandResult>> {
        let Some(helm_bin) = helm_bin.filter(|bin| !bin.is_empty()) else {
            return Ok(None);
        };

        let command = format!("{helm_bin} plugin list");
        let result = self.run_helm(command.as_str(), true)?;

        ensure!(
            result.success() && !(result.stdout.is_empty() && result.stderr.is_empty()),
            CommandFailure {
                reason: "Failed to get Helm plugin info",
                command,
                rc: result.rc,
                stdout: result.stdout.clone(),
                stderr: result.stderr.clone(),
            }
        );

        Ok(Some(result))
    }

    /// Lists the installed helm plugins.
    pub fn plugins(&self, helm_bin: Option<&str>) -> Result<Vec<HelmPlugin>> {
        match self.get_helm_plugin_list(helm_bin)? {
            Some(result) => parse_helm_plugin_list(result.stdout.lines()),
            None => Ok(Vec::new()),
        }
    }

    /// Runs `<helm_bin> version` and returns the version without the leading 'v', e.g. "3.12.1".
    /// Any failure to run the command or to find the version in its output gives None.
    pub fn get_helm_version(&self, helm_bin: &str) -> Result<Option<String>> {
        let regex = Regex::new(HELM_VERSION_REGEX)?;

        let command = format!("{helm_bin} version");
        // No kubeconfig or cluster settings are needed to print the version.
        let result = match self.runner.run(command.as_str(), &EnvironmentOverrides::new()) {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, %command, "Failed to run helm version command");
                return Ok(None);
            }
        };

        if !result.success() {
            debug!(rc = result.rc, stderr = %result.stderr, "Helm version command failed");
            return Ok(None);
        }

        Ok(regex
            .first_capture(result.stdout.as_str())
            .map(ToString::to_string))
    }

    /// The configured helm binary, else the helm found in $PATH.
    pub fn get_helm_binary(&self) -> Result<String> {
        if let Some(binary_path) = self.params.binary_path().filter(|path| !path.is_empty()) {
            return Ok(binary_path.to_string());
        }

        let path = which::which(HELM_BINARY_NAME).context(BinaryNotFound {
            binary: HELM_BINARY_NAME,
        })?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// The helm binary, quoted for use as the first word of a command line.
    pub fn command_prefix(&self) -> Result<String> {
        let binary = self.get_helm_binary()?;
        let quoted = shlex::try_quote(binary.as_str())
            .map_err(|_| {
                CommandParse {
                    command: binary.clone(),
                }
                .build()
            })?
            .into_owned();
        Ok(quoted)
    }
}
