use crate::common::{
    constants::PLUGIN_LIST_HEADER,
    error::{MalformedPluginLine, Result},
};
use serde::Serialize;

/// One row of `helm plugin list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HelmPlugin {
    name: String,
    version: String,
    description: String,
}

impl HelmPlugin {
    pub fn new<N, V, D>(name: N, version: V, description: D) -> Self
    where
        N: ToString,
        V: ToString,
        D: ToString,
    {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: description.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// Parses the lines of `helm plugin list` output. The header line is skipped, as are rows
/// without a name. Every other line must have the name, version and description columns
/// separated by tabs. A trailing fourth column is tolerated only if it is blank.
pub fn parse_helm_plugin_list<I, S>(lines: I) -> Result<Vec<HelmPlugin>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut plugins = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.starts_with(PLUGIN_LIST_HEADER) {
            continue;
        }

        let columns: Vec<&str> = line.splitn(4, '\t').collect();
        let (name, version, description) = match columns.as_slice() {
            [name, version, description] => (name, version, description),
            [name, version, description, rest] if rest.trim().is_empty() => {
                (name, version, description)
            }
            _ => {
                return MalformedPluginLine {
                    line: line.to_string(),
                }
                .fail()
            }
        };

        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        plugins.push(HelmPlugin::new(name, version.trim(), description.trim()));
    }

    Ok(plugins)
}
