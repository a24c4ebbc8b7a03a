use snafu::Snafu;
use std::path::PathBuf;

/// For use with multiple fallible operations which may fail for different reasons, but are
/// defined withing the same scope and must return to the outer scope (calling scope) using
/// the try operator -- '?'.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[snafu(context(suffix(false)))]
pub enum Error {
    /// Error for when a library which helm invocations rely on is unusable.
    #[snafu(display("Failed to find required library {}", library))]
    MissingDependency { library: String },

    /// Error for when a helm command exits with a non-zero exit code, or produces no output
    /// when some was expected.
    #[snafu(display(
        "{}. Exited {}.\ncommand: {},\nstdout: {}\nstderr: {}",
        reason,
        rc,
        command,
        stdout,
        stderr
    ))]
    CommandFailure {
        reason: String,
        command: String,
        rc: i32,
        stdout: String,
        stderr: String,
    },

    /// Error for when a line of `helm plugin list` output does not have the expected columns.
    #[snafu(display("Malformed helm plugin list line: {:?}", line))]
    MalformedPluginLine { line: String },

    /// Error for when the helm binary is neither configured nor present in $PATH.
    #[snafu(display("Failed to find binary '{}' in $PATH: {}", binary, source))]
    BinaryNotFound { source: which::Error, binary: String },

    /// Error for when a command line cannot be split into arguments.
    #[snafu(display("Failed to parse command line '{}'", command))]
    CommandParse { command: String },

    /// Error for when a command cannot be started.
    #[snafu(display("Failed to run command '{}': {}", command, source))]
    CommandSpawn {
        source: std::io::Error,
        command: String,
    },

    /// Error for when a temporary file cannot be kept past the end of the process.
    #[snafu(display("Failed to keep temporary file {}: {}", filepath.display(), source))]
    PersistTempFile {
        source: tempfile::PathPersistError,
        filepath: PathBuf,
    },

    /// Error for when a temporary file cannot be created.
    #[snafu(display("Failed to create temporary file: {}", source))]
    TempFileCreation { source: std::io::Error },

    /// Error for when writing to a temporary file fails.
    #[snafu(display("Failed to write to temporary file {}: {}", filepath.display(), source))]
    WriteToTempFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when yaml could not be parsed from a str.
    #[snafu(display("Failed to parse YAML {}: {}", input_yaml, source))]
    YamlParse {
        source: serde_yaml::Error,
        input_yaml: String,
    },

    /// Error for when a value could not be serialized to yaml.
    #[snafu(display("Failed to serialize to YAML: {}", source))]
    YamlSerialize { source: serde_yaml::Error },

    /// Error for when a value could not be serialized to json.
    #[snafu(display("Failed to serialize to JSON: {}", source))]
    JsonSerialize { source: serde_json::Error },

    /// Error for when regular expression parsing or compilation fails.
    #[snafu(display("Failed to compile regex {}: {}", expression, source))]
    RegexCompile {
        source: regex::Error,
        expression: String,
    },

    /// Error for when reading a file fails.
    #[snafu(display("Failed to read file {}: {}", filepath.display(), source))]
    ReadingFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when a parameters document cannot be deserialized.
    #[snafu(display("Failed to parse invocation parameters at {}: {}", filepath.display(), source))]
    ParamsParse {
        source: serde_yaml::Error,
        filepath: PathBuf,
    },
}

impl Error {
    /// The process exit code to use when this error ends the program. A failed helm command
    /// hands its own exit code through.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailure { rc, .. } if *rc != 0 => *rc,
            _ => 1,
        }
    }
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub type Result<T, E = Error> = std::result::Result<T, E>;
