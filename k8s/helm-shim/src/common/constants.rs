/// This is the name of the helm binary looked up in $PATH.
pub const HELM_BINARY_NAME: &str = "helm";

/// Environment variable carrying the kubeconfig context for helm.
pub const HELM_KUBECONTEXT_ENV: &str = "HELM_KUBECONTEXT";

/// Environment variable carrying the release namespace for helm.
pub const HELM_NAMESPACE_ENV: &str = "HELM_NAMESPACE";

/// Environment variable carrying the bearer token for helm.
pub const HELM_KUBETOKEN_ENV: &str = "HELM_KUBETOKEN";

/// Environment variable carrying the Kubernetes API server address for helm.
pub const HELM_KUBEAPISERVER_ENV: &str = "HELM_KUBEAPISERVER";

/// Environment variable carrying the kubeconfig filepath.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Cluster name used in generated kubeconfig files.
pub const GENERATED_CLUSTER_NAME: &str = "generated-cluster";

/// Context name used in generated kubeconfig files.
pub const GENERATED_CONTEXT_NAME: &str = "generated-context";

/// Helm 3 prints this instead of an empty document when a release has no user-supplied values.
pub const HELM_NULL_VALUES: &str = "null";

/// Header column which starts the first line of `helm plugin list`.
pub const PLUGIN_LIST_HEADER: &str = "NAME";

/// Matches the `helm version` output and captures the version without the leading 'v'.
pub const HELM_VERSION_REGEX: &str = r#"^version\.BuildInfo\{Version:"v([0-9.]*)","#;

/// The library whose availability every helm invocation depends on.
pub const YAML_LIBRARY: &str = "serde_yaml";
