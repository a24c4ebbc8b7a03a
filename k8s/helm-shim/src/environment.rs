use crate::{
    common::{
        constants::{
            GENERATED_CLUSTER_NAME, GENERATED_CONTEXT_NAME, HELM_KUBEAPISERVER_ENV,
            HELM_KUBECONTEXT_ENV, HELM_KUBETOKEN_ENV, HELM_NAMESPACE_ENV, KUBECONFIG_ENV,
        },
        error::{JsonSerialize, PersistTempFile, Result, YamlSerialize},
        file::write_to_tempfile,
    },
    params::{InvocationParameters, KubeconfigSource},
};
use serde::Serialize;
use snafu::ResultExt;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tempfile::TempPath;
use tracing::debug;

/// Environment variables which are set on the helm child process, on top of the ones it
/// inherits.
pub type EnvironmentOverrides = BTreeMap<String, String>;

/// A minimal kubeconfig with a single cluster and a single context pointing to it.
#[derive(Debug, Serialize)]
pub struct GeneratedKubeconfig {
    #[serde(rename = "apiVersion")]
    api_version: String,
    kind: String,
    clusters: Vec<NamedCluster>,
    contexts: Vec<NamedContext>,
    #[serde(rename = "current-context")]
    current_context: String,
}

#[derive(Debug, Serialize)]
struct NamedCluster {
    cluster: Cluster,
    name: String,
}

#[derive(Debug, Serialize)]
struct Cluster {
    server: Option<String>,
    #[serde(
        rename = "insecure-skip-tls-verify",
        skip_serializing_if = "Option::is_none"
    )]
    insecure_skip_tls_verify: Option<bool>,
    #[serde(
        rename = "certificate-authority",
        skip_serializing_if = "Option::is_none"
    )]
    certificate_authority: Option<String>,
}

#[derive(Debug, Serialize)]
struct NamedContext {
    context: ContextRef,
    name: String,
}

#[derive(Debug, Serialize)]
struct ContextRef {
    cluster: String,
}

impl GeneratedKubeconfig {
    /// Generates the kubeconfig for a server. TLS verification is switched off when
    /// validate_certs is false, and a non-empty ca_cert becomes the cluster's
    /// certificate-authority.
    pub fn new(server: Option<&str>, validate_certs: bool, ca_cert: Option<&str>) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Config".to_string(),
            clusters: vec![NamedCluster {
                cluster: Cluster {
                    server: server.map(ToString::to_string),
                    insecure_skip_tls_verify: (!validate_certs).then_some(true),
                    certificate_authority: ca_cert
                        .filter(|ca| !ca.is_empty())
                        .map(ToString::to_string),
                },
                name: GENERATED_CLUSTER_NAME.to_string(),
            }],
            contexts: vec![NamedContext {
                context: ContextRef {
                    cluster: GENERATED_CLUSTER_NAME.to_string(),
                },
                name: GENERATED_CONTEXT_NAME.to_string(),
            }],
            current_context: GENERATED_CONTEXT_NAME.to_string(),
        }
    }

    /// Serializes the kubeconfig as a YAML document.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context(YamlSerialize)
    }
}

/// The environment for one helm invocation. Holds on to the temporary kubeconfig, if one was
/// written, which is deleted once this (or the TempPath taken out of it) is dropped.
#[derive(Debug)]
pub struct HelmEnvironment {
    overrides: EnvironmentOverrides,
    kubeconfig: Option<TempPath>,
}

impl HelmEnvironment {
    /// Builds the environment overrides for the parameters. At most one temporary kubeconfig
    /// is written: a generated one if TLS validation is switched off or a CA certificate is
    /// set, otherwise the inline kubeconfig document, if any.
    pub fn prepare(params: &InvocationParameters) -> Result<Self> {
        let mut overrides = EnvironmentOverrides::new();

        if let Some(context) = params.context() {
            overrides.insert(HELM_KUBECONTEXT_ENV.to_string(), context.to_string());
        }
        let non_empty = [
            (HELM_NAMESPACE_ENV, params.release_namespace()),
            (HELM_KUBETOKEN_ENV, params.api_key()),
            (HELM_KUBEAPISERVER_ENV, params.host()),
        ];
        for (key, value) in non_empty {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                overrides.insert(key.to_string(), value.to_string());
            }
        }

        let generate = params.validate_certs() == Some(false)
            || params.ca_cert().is_some_and(|ca| !ca.is_empty());

        let kubeconfig = if generate {
            let kubeconfig = GeneratedKubeconfig::new(
                params.host(),
                params.validate_certs().unwrap_or(true),
                params.ca_cert(),
            );
            Some(write_to_tempfile(kubeconfig.to_yaml()?.as_bytes())?)
        } else if let Some(KubeconfigSource::Inline(document)) = params.kubeconfig() {
            let buf = serde_json::to_vec(document).context(JsonSerialize)?;
            Some(write_to_tempfile(buf.as_slice())?)
        } else {
            None
        };

        match (kubeconfig.as_ref(), params.kubeconfig()) {
            (Some(path), _) => {
                overrides.insert(
                    KUBECONFIG_ENV.to_string(),
                    path.to_string_lossy().into_owned(),
                );
            }
            (None, Some(KubeconfigSource::Path(path))) => {
                overrides.insert(KUBECONFIG_ENV.to_string(), path.clone());
            }
            _ => {}
        }

        debug!(
            variables = ?overrides.keys().collect::<Vec<_>>(),
            temporary_kubeconfig = kubeconfig.is_some(),
            "Prepared helm environment"
        );

        Ok(Self {
            overrides,
            kubeconfig,
        })
    }

    /// The environment variables to set on the helm process.
    pub fn overrides(&self) -> &EnvironmentOverrides {
        &self.overrides
    }

    /// The temporary kubeconfig written for this invocation, if any.
    pub fn kubeconfig_file(&self) -> Option<&Path> {
        self.kubeconfig.as_deref()
    }

    /// Keeps the temporary kubeconfig, if any, after this is dropped and returns its path. The
    /// caller becomes responsible for deleting the file.
    pub fn persist(self) -> Result<(EnvironmentOverrides, Option<PathBuf>)> {
        let kubeconfig = match self.kubeconfig {
            Some(path) => {
                let filepath = path.to_path_buf();
                Some(path.keep().context(PersistTempFile { filepath })?)
            }
            None => None,
        };
        Ok((self.overrides, kubeconfig))
    }

    /// Splits the environment into its overrides and the temporary kubeconfig's deletion guard.
    pub fn into_parts(self) -> (EnvironmentOverrides, Option<TempPath>) {
        (self.overrides, self.kubeconfig)
    }
}
