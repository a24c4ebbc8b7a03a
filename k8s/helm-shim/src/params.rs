use crate::common::error::{ParamsParse, ReadingFile, Result};
use serde::Deserialize;
use snafu::ResultExt;
use std::{fs, path::Path};

/// Where the kubeconfig for an invocation comes from.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum KubeconfigSource {
    /// A kubeconfig file which already exists on the filesystem.
    Path(String),
    /// A kubeconfig document given inline. It is written to a temporary file before use.
    Inline(serde_json::Map<String, serde_json::Value>),
}

/// Connection parameters for a single helm invocation. Every field is optional, unset fields
/// leave helm's own defaults in effect.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InvocationParameters {
    kubeconfig: Option<KubeconfigSource>,
    context: Option<String>,
    release_namespace: Option<String>,
    api_key: Option<String>,
    host: Option<String>,
    validate_certs: Option<bool>,
    ca_cert: Option<String>,
    binary_path: Option<String>,
}

impl InvocationParameters {
    /// Reads parameters from a YAML (or JSON) document.
    pub fn from_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let filepath = path.as_ref().to_path_buf();
        let buf = fs::read(filepath.as_path()).context(ReadingFile {
            filepath: filepath.clone(),
        })?;
        serde_yaml::from_slice(buf.as_slice()).context(ParamsParse { filepath })
    }

    /// Use a kubeconfig file at this path.
    #[must_use]
    pub fn with_kubeconfig_path<J>(mut self, path: J) -> Self
    where
        J: ToString,
    {
        self.kubeconfig = Some(KubeconfigSource::Path(path.to_string()));
        self
    }

    /// Use this inline kubeconfig document.
    #[must_use]
    pub fn with_inline_kubeconfig(
        mut self,
        document: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.kubeconfig = Some(KubeconfigSource::Inline(document));
        self
    }

    #[must_use]
    pub fn with_context<J>(mut self, context: J) -> Self
    where
        J: ToString,
    {
        self.context = Some(context.to_string());
        self
    }

    #[must_use]
    pub fn with_release_namespace<J>(mut self, ns: J) -> Self
    where
        J: ToString,
    {
        self.release_namespace = Some(ns.to_string());
        self
    }

    #[must_use]
    pub fn with_api_key<J>(mut self, api_key: J) -> Self
    where
        J: ToString,
    {
        self.api_key = Some(api_key.to_string());
        self
    }

    #[must_use]
    pub fn with_host<J>(mut self, host: J) -> Self
    where
        J: ToString,
    {
        self.host = Some(host.to_string());
        self
    }

    #[must_use]
    pub fn with_validate_certs(mut self, validate_certs: bool) -> Self {
        self.validate_certs = Some(validate_certs);
        self
    }

    /// The CA certificate (a filepath, as kubeconfig's `certificate-authority` expects).
    #[must_use]
    pub fn with_ca_cert<J>(mut self, ca_cert: J) -> Self
    where
        J: ToString,
    {
        self.ca_cert = Some(ca_cert.to_string());
        self
    }

    /// Use this helm binary instead of looking one up in $PATH.
    #[must_use]
    pub fn with_binary_path<J>(mut self, binary_path: J) -> Self
    where
        J: ToString,
    {
        self.binary_path = Some(binary_path.to_string());
        self
    }

    pub fn kubeconfig(&self) -> Option<&KubeconfigSource> {
        self.kubeconfig.as_ref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn release_namespace(&self) -> Option<&str> {
        self.release_namespace.as_deref()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// None when TLS validation was never configured, which means helm validates.
    pub fn validate_certs(&self) -> Option<bool> {
        self.validate_certs
    }

    pub fn ca_cert(&self) -> Option<&str> {
        self.ca_cert.as_deref()
    }

    pub fn binary_path(&self) -> Option<&str> {
        self.binary_path.as_deref()
    }
}
