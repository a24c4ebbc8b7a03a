use crate::opts::{CliArgs, FmtStyle, Operation};
use clap::Parser;
use helm_shim::{
    common::{
        constants::HELM_KUBETOKEN_ENV,
        error::{CommandParse, YamlSerialize},
    },
    HelmClient, HelmContext, HelmEnvironment, Result,
};
use snafu::ResultExt;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

mod opts;

fn main() {
    let opts = CliArgs::parse();
    init_logging(&opts);

    let exit_code = execute(&opts).unwrap_or_else(|error| {
        error!(%error, "Failed to run helm");
        error.exit_code()
    });
    std::process::exit(exit_code);
}

/// Initialize logging components -- tracing.
fn init_logging(opts: &CliArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(opts.ansi_colours())
        .with_writer(std::io::stderr);

    match opts.fmt_style() {
        FmtStyle::Pretty => builder.pretty().init(),
        FmtStyle::Compact => builder.compact().init(),
    }
}

/// Runs the requested operation and returns the exit code for the process. The helm client,
/// and with it any temporary kubeconfig, is dropped before this returns.
fn execute(opts: &CliArgs) -> Result<i32> {
    let client = HelmClient::new(HelmContext::new(), opts.invocation_parameters()?);

    match opts.operation() {
        Operation::GetValues { release_name } => {
            let helm = client.command_prefix()?;
            let values = client.get_values(helm.as_str(), release_name.as_str())?;
            print!("{}", serde_yaml::to_string(&values).context(YamlSerialize)?);
        }
        Operation::Plugins => {
            let helm = client.command_prefix()?;
            for plugin in client.plugins(Some(helm.as_str()))? {
                println!(
                    "{}\t{}\t{}",
                    plugin.name(),
                    plugin.version(),
                    plugin.description()
                );
            }
        }
        Operation::Version => {
            let helm = client.command_prefix()?;
            match client.get_helm_version(helm.as_str())? {
                Some(version) => println!("{version}"),
                None => {
                    warn!(%helm, "Could not determine the helm version");
                    return Ok(1);
                }
            }
        }
        Operation::Run {
            ignore_errors,
            args,
        } => {
            let helm = client.command_prefix()?;
            let args = shlex::try_join(args.iter().map(String::as_str)).map_err(|_| {
                CommandParse {
                    command: args.join(" "),
                }
                .build()
            })?;
            let result = client.run_helm(format!("{helm} {args}").as_str(), !ignore_errors)?;
            print!("{}", result.stdout);
            eprint!("{}", result.stderr);
            return Ok(result.rc);
        }
        Operation::Env => {
            let (overrides, kubeconfig) = HelmEnvironment::prepare(client.params())?.persist()?;
            if let Some(path) = kubeconfig {
                warn!(path = %path.display(), "Kept generated kubeconfig, remove it when done");
            }
            for (key, value) in &overrides {
                match key.as_str() {
                    HELM_KUBETOKEN_ENV => println!("{key}=<redacted>"),
                    _ => println!("{key}={value}"),
                }
            }
        }
    }

    Ok(0)
}
