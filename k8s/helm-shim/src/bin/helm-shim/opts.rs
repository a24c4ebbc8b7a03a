use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use helm_shim::{InvocationParameters, Result};
use std::path::PathBuf;

/// Formatting style for the logs.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum FmtStyle {
    Pretty,
    Compact,
}

/// The operations which can be run against helm.
#[derive(Subcommand)]
pub(crate) enum Operation {
    /// Print the user-supplied values of a release as YAML.
    GetValues {
        /// The name of the helm release.
        release_name: String,
    },
    /// List the installed helm plugins.
    Plugins,
    /// Print the version of the helm binary.
    Version,
    /// Run a helm command with the connection settings applied, e.g. `run -- list -a`.
    Run {
        /// Relay a non-zero helm exit code instead of failing.
        #[arg(long, default_value_t = false)]
        ignore_errors: bool,

        /// Arguments for the helm binary.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the environment variables which would be set for helm. A generated kubeconfig is
    /// kept on disk for use with the printed KUBECONFIG, remove it when done.
    Env,
}

/// These are the supported cli configuration options.
#[derive(Parser)]
#[command(name = "helm-shim", version)]
#[command(about = "Runs helm with generated Kubernetes credentials", long_about = None)]
pub(crate) struct CliArgs {
    #[command(subcommand)]
    operation: Operation,

    /// Path to a kubeconfig file.
    #[arg(long, env = "K8S_AUTH_KUBECONFIG", global = true)]
    kubeconfig: Option<String>,

    /// The kubeconfig context to use.
    #[arg(long, env = "K8S_AUTH_CONTEXT", global = true)]
    context: Option<String>,

    /// The Kubernetes Namespace of the helm release.
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Bearer token for the Kubernetes API server.
    #[arg(long, env = "K8S_AUTH_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// The Kubernetes API server address.
    #[arg(long, env = "K8S_AUTH_HOST", global = true)]
    host: Option<String>,

    /// Set to false to skip TLS verification of the Kubernetes API server.
    #[arg(long, env = "K8S_AUTH_VERIFY_SSL", global = true)]
    validate_certs: Option<bool>,

    /// Path to the CA certificate of the Kubernetes API server.
    #[arg(long, env = "K8S_AUTH_SSL_CA_CERT", global = true)]
    ca_cert: Option<String>,

    /// Path to the helm binary. Looked up in $PATH if not set.
    #[arg(long, env = "HELM_BINARY_PATH", global = true)]
    binary_path: Option<String>,

    /// YAML or JSON file with invocation parameters. Command line options take precedence.
    #[arg(long, value_name = "FILE", global = true)]
    params_file: Option<PathBuf>,

    /// Formatting style to be used while logging.
    #[arg(long, value_enum, default_value_t = FmtStyle::Pretty, global = true)]
    fmt_style: FmtStyle,

    /// Use ANSI colors for the logs.
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true)]
    ansi_colors: bool,
}

impl CliArgs {
    /// The operation to run.
    pub(crate) fn operation(&self) -> &Operation {
        &self.operation
    }

    /// This returns formatting style to be used.
    pub(crate) fn fmt_style(&self) -> FmtStyle {
        self.fmt_style
    }

    /// This returns ansi_colours arg.
    pub(crate) fn ansi_colours(&self) -> bool {
        self.ansi_colors
    }

    /// Builds the invocation parameters from the parameters file, if any, and the options.
    pub(crate) fn invocation_parameters(&self) -> Result<InvocationParameters> {
        let mut params = match self.params_file.as_ref() {
            Some(path) => InvocationParameters::from_file(path)?,
            None => InvocationParameters::default(),
        };

        if let Some(kubeconfig) = self.kubeconfig.as_ref() {
            params = params.with_kubeconfig_path(kubeconfig);
        }
        if let Some(context) = self.context.as_ref() {
            params = params.with_context(context);
        }
        if let Some(namespace) = self.namespace.as_ref() {
            params = params.with_release_namespace(namespace);
        }
        if let Some(api_key) = self.api_key.as_ref() {
            params = params.with_api_key(api_key);
        }
        if let Some(host) = self.host.as_ref() {
            params = params.with_host(host);
        }
        if let Some(validate_certs) = self.validate_certs {
            params = params.with_validate_certs(validate_certs);
        }
        if let Some(ca_cert) = self.ca_cert.as_ref() {
            params = params.with_ca_cert(ca_cert);
        }
        if let Some(binary_path) = self.binary_path.as_ref() {
            params = params.with_binary_path(binary_path);
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, Operation};
    use clap::{CommandFactory, Parser};
    use std::io::Write;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn options_override_params_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"release_namespace: from-file\nhost: https://file:6443\n")
            .unwrap();
        let params_file = file.path().to_string_lossy().into_owned();

        let opts = CliArgs::try_parse_from([
            "helm-shim",
            "--params-file",
            params_file.as_str(),
            "-n",
            "from-cli",
            "--validate-certs",
            "false",
            "get-values",
            "my-release",
        ])
        .unwrap();

        let params = opts.invocation_parameters().unwrap();
        assert_eq!(params.release_namespace(), Some("from-cli"));
        assert_eq!(params.host(), Some("https://file:6443"));
        assert_eq!(params.validate_certs(), Some(false));
        assert!(matches!(
            opts.operation(),
            Operation::GetValues { release_name } if release_name == "my-release"
        ));
    }

    #[test]
    fn run_takes_helm_flags() {
        let opts =
            CliArgs::try_parse_from(["helm-shim", "run", "--", "list", "-a", "--output", "yaml"])
                .unwrap();
        match opts.operation() {
            Operation::Run {
                ignore_errors,
                args,
            } => {
                assert!(!ignore_errors);
                assert_eq!(args, &["list", "-a", "--output", "yaml"]);
            }
            _ => panic!("expected the run operation"),
        }
    }
}
