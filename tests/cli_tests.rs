use std::process::{Command, Output};

fn opgraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_opgraph"))
        .args(args)
        .env_remove("OPGRAPH_HOST")
        .env_remove("OPGRAPH_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run opgraph")
}

fn stdout_json(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("one JSON document per line"))
        .collect()
}

#[test]
fn compiles_the_example_cluster_by_default() {
    let output = opgraph(&[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let documents = stdout_json(&output);
    assert_eq!(documents.len(), 1);
    let members = documents[0]["/app/example"].as_object().unwrap();
    assert_eq!(
        members.keys().collect::<Vec<_>>(),
        vec!["bump", "current", "history", "rev"]
    );
}

#[test]
fn balance_prints_one_class_per_host() {
    let output = opgraph(&["balance", "--host", "http://10.1.1.1:7000"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let documents = stdout_json(&output);
    assert_eq!(documents.len(), 2);
    assert!(documents[0].get("http://10.1.1.1:7000/app/balance/left").is_some());
    assert!(documents[1].get("http://10.1.1.1:7001/app/balance/right").is_some());
}

#[test]
fn fingerprints_are_stable_across_runs() {
    let first = opgraph(&["example", "--fingerprint"]);
    let second = opgraph(&["example", "--fingerprint"]);
    assert!(first.status.success());

    let line = String::from_utf8_lossy(&first.stdout).trim_end().to_string();
    let (hex, link) = line.split_once("  ").unwrap();
    assert_eq!(hex.len(), 64);
    assert_eq!(link, "/app/example");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn invalid_host_fails_with_a_diagnostic() {
    let output = opgraph(&["balance", "--host", "not a link"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid link [E017]"), "{stderr}");
}
