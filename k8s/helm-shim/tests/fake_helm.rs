//! Drives the helm client against a shell script standing in for the helm binary.
#![cfg(unix)]

use helm_shim::{
    Capabilities, EnvironmentOverrides, Error, HelmClient, HelmContext, HelmPlugin,
    InvocationParameters, Runner, SystemRunner,
};
use maplit::btreemap;
use std::{fs, path::Path};
use tempfile::TempDir;

const FAKE_HELM: &str = r#"#!/bin/sh
case "$1" in
  version)
    echo 'version.BuildInfo{Version:"v3.13.2", GitCommit:"2a2fb3b98829f1e0be6fb18af2f6599e0f4e8243", GitTreeState:"clean", GoVersion:"go1.21.4"}'
    ;;
  plugin)
    printf 'NAME   \tVERSION\tDESCRIPTION\ndiff   \t3.9.4  \tPreview helm upgrade changes as a diff\n'
    ;;
  get)
    if [ "$4" = "empty" ]; then
      echo null
    else
      printf 'replicas: 3\nnamespace: %s\n' "$HELM_NAMESPACE"
    fi
    ;;
  env)
    echo "KUBECONFIG=$KUBECONFIG"
    cat "$KUBECONFIG"
    ;;
  fail)
    echo partial
    echo 'Error: boom' >&2
    exit 3
    ;;
esac
"#;

/// Writes the fake helm script and returns the command prefix which runs it. The script is run
/// through `sh` so it is never executed while a file handle to it may still be open.
fn fake_helm(dir: &Path) -> String {
    let script = dir.join("helm");
    fs::write(&script, FAKE_HELM).unwrap();
    format!("sh {}", script.display())
}

fn client(params: InvocationParameters) -> HelmClient {
    HelmClient::new(
        HelmContext::with_capabilities(Capabilities::new(true)),
        params,
    )
}

#[test]
fn runner_merges_environment() {
    let overrides: EnvironmentOverrides = btreemap! {
        "HELM_NAMESPACE".to_string() => "apps".to_string(),
    };
    let result = SystemRunner
        .run(r#"sh -c 'echo "$HELM_NAMESPACE:${PATH:+path}"'"#, &overrides)
        .unwrap();

    assert_eq!(result.rc, 0);
    assert_eq!(result.stdout, "apps:path\n");
    assert_eq!(result.stderr, "");
}

#[test]
fn runner_reports_exit_code() {
    let result = SystemRunner
        .run(
            r#"sh -c 'echo out; echo err >&2; exit 7'"#,
            &EnvironmentOverrides::new(),
        )
        .unwrap();

    assert_eq!(result.rc, 7);
    assert_eq!(result.stdout, "out\n");
    assert_eq!(result.stderr, "err\n");
}

#[test]
fn get_values() {
    let dir = TempDir::new().unwrap();
    let helm = fake_helm(dir.path());
    let client = client(InvocationParameters::default().with_release_namespace("apps"));

    let values = client.get_values(helm.as_str(), "web").unwrap();
    assert_eq!(values["replicas"].as_u64(), Some(3));
    assert_eq!(values["namespace"].as_str(), Some("apps"));

    let empty = client.get_values(helm.as_str(), "empty").unwrap();
    assert_eq!(empty, serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
}

#[test]
fn generated_kubeconfig_reaches_helm() {
    let dir = TempDir::new().unwrap();
    let helm = fake_helm(dir.path());
    let client = client(
        InvocationParameters::default()
            .with_host("https://10.0.0.1:6443")
            .with_validate_certs(false),
    );

    let result = client.run_helm(format!("{helm} env").as_str(), true).unwrap();
    let kubeconfig = client.pending_cleanup();
    assert_eq!(kubeconfig.len(), 1);
    assert!(result
        .stdout
        .starts_with(format!("KUBECONFIG={}\n", kubeconfig[0].display()).as_str()));
    assert!(result.stdout.contains("insecure-skip-tls-verify: true"));
    assert!(result.stdout.contains("server: https://10.0.0.1:6443"));

    drop(client);
    assert!(!kubeconfig[0].exists());
}

#[test]
fn failing_command() {
    let dir = TempDir::new().unwrap();
    let helm = fake_helm(dir.path());
    let client = client(InvocationParameters::default());
    let command = format!("{helm} fail");

    match client.run_helm(command.as_str(), true) {
        Err(error @ Error::CommandFailure { .. }) => {
            assert_eq!(error.exit_code(), 3);
            let message = error.to_string();
            assert!(message.starts_with("Failure when executing Helm command. Exited 3."));
            assert!(message.contains("stdout: partial"));
            assert!(message.contains("stderr: Error: boom"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let result = client.run_helm(command.as_str(), false).unwrap();
    assert_eq!(result.rc, 3);
}

#[test]
fn plugins_and_version() {
    let dir = TempDir::new().unwrap();
    let helm = fake_helm(dir.path());
    let client = client(InvocationParameters::default());

    assert_eq!(
        client.plugins(Some(helm.as_str())).unwrap(),
        vec![HelmPlugin::new(
            "diff",
            "3.9.4",
            "Preview helm upgrade changes as a diff"
        )]
    );
    assert_eq!(
        client.get_helm_version(helm.as_str()).unwrap(),
        Some("3.13.2".to_string())
    );
    assert_eq!(
        client
            .get_helm_version("/nonexistent/bin/helm")
            .unwrap(),
        None
    );
}

#[test]
fn undecodable_output_keeps_exit_code() {
    let client = client(InvocationParameters::default());

    let result = client
        .run_helm(r#"sh -c 'printf "caf\351\n" >&2; exit 4'"#, false)
        .unwrap();
    assert_eq!(result.rc, 4);
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "caf\u{FFFD}\n");

    match client.run_helm(r#"sh -c 'printf "caf\351\n" >&2; exit 4'"#, true) {
        Err(Error::CommandFailure { rc, stderr, .. }) => {
            assert_eq!(rc, 4);
            assert_eq!(stderr, "caf\u{FFFD}\n");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
