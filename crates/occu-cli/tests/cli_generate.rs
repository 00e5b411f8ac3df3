use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_occusim"))
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("occusim_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn stdout_json(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "command failed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout should be valid JSON")
}

const SMALL: &[&str] = &[
    "generate",
    "--species",
    "2",
    "--sites",
    "3",
    "--covariates",
    "1",
    "--surveys",
    "4",
    "--fixed",
    "1",
    "--seed",
    "42",
];

#[test]
fn generate_small_dataset_has_engine_layout() {
    let v = stdout_json(&run(SMALL));
    assert_eq!(v["Nobs"].as_u64(), Some(6));
    let species: Vec<u64> =
        v["Species"].as_array().unwrap().iter().map(|x| x.as_u64().unwrap()).collect();
    assert_eq!(species, vec![1, 1, 1, 2, 2, 2]);
    assert!(v["J"].as_array().unwrap().iter().all(|x| x.as_u64() == Some(4)));
    let x = v["X"].as_array().unwrap();
    assert_eq!(x.len(), 6);
    assert_eq!(x[0..3], x[3..6]);
    for y in v["Y"].as_array().unwrap() {
        assert!(y.as_u64().unwrap() <= 4);
    }
}

#[test]
fn generate_is_deterministic() {
    let a = run(SMALL);
    let b = run(SMALL);
    assert!(a.status.success() && b.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn generate_rejects_bad_parameters() {
    let out = run(&["generate", "--species", "0"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("num_species"));

    let out = run(&["generate", "--covariates", "2", "--fixed", "3"]);
    assert!(!out.status.success());
}

#[test]
fn truth_roundtrips_through_validate_summarize_and_loglik() {
    let path = tmp_path("sim.json");
    let out = run(&[
        "generate",
        "--species",
        "5",
        "--sites",
        "20",
        "--covariates",
        "2",
        "--fixed",
        "2",
        "--seed",
        "9",
        "--include-truth",
        "-o",
        path.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let v = stdout_json(&run(&["validate", "-i", path.to_string_lossy().as_ref()]));
    assert_eq!(v["valid"].as_bool(), Some(true));
    assert_eq!(v["Nobs"].as_u64(), Some(100));

    let s = stdout_json(&run(&["summarize", "-i", path.to_string_lossy().as_ref()]));
    let per_species = s["species"].as_array().unwrap();
    assert_eq!(per_species.len(), 5);
    for sp in per_species {
        let naive = sp["naive_occupancy"].as_f64().unwrap();
        let truth = sp["true_occupancy"].as_f64().unwrap();
        assert!(naive <= truth);
    }

    let l = stdout_json(&run(&[
        "loglik",
        "-i",
        path.to_string_lossy().as_ref(),
        "--pointwise",
    ]));
    let total = l["log_likelihood"].as_f64().unwrap();
    assert!(total.is_finite() && total < 0.0);
    assert_eq!(l["pointwise"].as_array().unwrap().len(), 100);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn validate_and_summarize_reject_malformed_dataset() {
    let path = tmp_path("malformed.json");
    std::fs::write(
        &path,
        r#"{"Y":[0,1],"Species":[1,18446744073709551615],"X":[[0.0],[0.0]],"J":[2,2],"Nobs":2}"#,
    )
    .unwrap();

    for cmd in ["validate", "summarize"] {
        let out = run(&[cmd, "-i", path.to_string_lossy().as_ref()]);
        assert!(!out.status.success(), "{cmd} accepted an out-of-range species id");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("exceeds Nobs"), "{cmd} stderr={stderr}");
        assert!(!stderr.contains("panicked"), "{cmd} stderr={stderr}");
    }

    std::fs::write(
        &path,
        r#"{"Y":[5,0],"Species":[1,1],"X":[[0.0],[0.0]],"J":[2,2],"Nobs":2}"#,
    )
    .unwrap();
    let out = run(&["validate", "-i", path.to_string_lossy().as_ref()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeds J"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn generate_without_flags_matches_template_config() {
    let template = tmp_path("template.json");
    let out = run(&["config-template"]);
    assert!(out.status.success());
    std::fs::write(&template, &out.stdout).unwrap();

    let bare = run(&["generate"]);
    let from_file = run(&["generate", "-c", template.to_string_lossy().as_ref()]);
    assert!(bare.status.success() && from_file.status.success());
    assert_eq!(bare.stdout, from_file.stdout);
    let _ = std::fs::remove_file(&template);
}

#[test]
fn loglik_requires_truth() {
    let path = tmp_path("bare.json");
    let out = run(&[
        "generate",
        "--species",
        "2",
        "--sites",
        "3",
        "-o",
        path.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success());
    let out = run(&["loglik", "-i", path.to_string_lossy().as_ref()]);
    assert!(!out.status.success());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn yaml_config_with_flag_override() {
    let path = tmp_path("config.yaml");
    std::fs::write(
        &path,
        "num_species: 3\nnum_sites: 4\nnum_covariates: 2\nnum_surveys: 1\n\
         effects:\n  - covariate: 1\n    effect: fixed\n    slope: { mean: 0.5, sd: 0.0 }\n",
    )
    .unwrap();
    let out = run(&[
        "generate",
        "-c",
        path.to_string_lossy().as_ref(),
        "--sites",
        "6",
        "--include-truth",
    ]);
    let v = stdout_json(&out);
    assert_eq!(v["data"]["Nobs"].as_u64(), Some(18));
    assert!(v["data"]["Y"].as_array().unwrap().iter().all(|y| y.as_u64().unwrap() <= 1));
    for row in v["truth"]["effects"]["slopes"].as_array().unwrap() {
        assert_eq!(row[0].as_f64(), Some(0.5));
    }
    let _ = std::fs::remove_file(&path);
}

#[test]
fn replicates_use_consecutive_seeds() {
    let v = stdout_json(&run(&[
        "replicates",
        "--species",
        "2",
        "--sites",
        "3",
        "--seed",
        "100",
        "-n",
        "3",
        "--include-truth",
    ]));
    assert_eq!(v["n_replicates"].as_u64(), Some(3));
    let reps = v["replicates"].as_array().unwrap();
    let seeds: Vec<u64> = reps.iter().map(|r| r["config"]["seed"].as_u64().unwrap()).collect();
    assert_eq!(seeds, vec![100, 101, 102]);
}

#[test]
fn config_template_is_valid_config() {
    let v = stdout_json(&run(&["config-template"]));
    assert_eq!(v["num_surveys"].as_u64(), Some(4));
    assert_eq!(v["effects"][0]["effect"].as_str(), Some("fixed"));
}
