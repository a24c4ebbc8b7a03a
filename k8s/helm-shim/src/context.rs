use crate::common::{
    constants::YAML_LIBRARY,
    error::{MissingDependency, Result},
};
use snafu::ensure;
use std::collections::BTreeMap;
use tracing::warn;

/// Libraries which helm invocations depend on, and whether they work in this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    yaml: bool,
}

impl Capabilities {
    /// Detects every capability once.
    pub fn detect() -> Self {
        Self { yaml: yaml_works() }
    }

    /// Use a fixed set of capabilities instead of detecting them.
    pub fn new(yaml: bool) -> Self {
        Self { yaml }
    }

    /// Is YAML serialization usable?
    pub fn yaml(&self) -> bool {
        self.yaml
    }
}

/// Serializes a small document and reads it back.
fn yaml_works() -> bool {
    let sample: BTreeMap<String, u32> = BTreeMap::from([("sample".to_string(), 1)]);
    let round_trip = serde_yaml::to_string(&sample)
        .and_then(|yaml| serde_yaml::from_str::<BTreeMap<String, u32>>(yaml.as_str()));

    match round_trip {
        Ok(decoded) => decoded == sample,
        Err(error) => {
            warn!(%error, "YAML round trip failed");
            false
        }
    }
}

/// Process-wide context which is set up once at startup and shared by helm clients.
#[derive(Clone, Debug)]
pub struct HelmContext {
    capabilities: Capabilities,
}

impl HelmContext {
    /// Creates a context after probing for the capabilities.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::detect())
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Fails if YAML support is missing.
    pub fn ensure_yaml(&self) -> Result<()> {
        ensure!(
            self.capabilities.yaml(),
            MissingDependency {
                library: YAML_LIBRARY.to_string()
            }
        );
        Ok(())
    }
}

impl Default for HelmContext {
    fn default() -> Self {
        Self::new()
    }
}
