extern crate assert_cmd;
extern crate num_cpus;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn fractal() -> Command {
    Command::cargo_bin("fractal").unwrap()
}

fn data_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.starts_with('#')).collect()
}

#[test]
fn mandelbrot_color_writes_five_columns() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("mandel.txt");
    fractal()
        .args(&["mandelbrot", "--step", "0.1", "--precision", "20", "-o"])
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# re im r g b"));
    let lines = data_lines(&text);
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|l| l.split_whitespace().count() == 5));
}

#[test]
fn mandelbrot_bw_writes_two_columns() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("bw.txt");
    fractal()
        .args(&["mandelbrot", "--mode", "bw", "--step", "0.1", "-o"])
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    let lines = data_lines(&text);
    assert!(lines.contains(&"0 0"));
    assert!(lines.iter().all(|l| l.split_whitespace().count() == 2));
}

#[test]
fn mandelbrot_threads_do_not_change_the_output() {
    // The thread count is capped at the number of CPUs.
    let threads = num_cpus::get().to_string();
    let dir = tempdir().unwrap();
    for &mode in &["color", "bw"] {
        let single = dir.path().join(format!("{}-1.txt", mode));
        let multi = dir.path().join(format!("{}-n.txt", mode));
        for &(out, count) in &[(&single, "1"), (&multi, threads.as_str())] {
            fractal()
                .args(&["mandelbrot", "--mode", mode, "--step", "0.05", "--threads", count, "-o"])
                .arg(out)
                .assert()
                .success();
        }
        assert_eq!(
            fs::read_to_string(&single).unwrap(),
            fs::read_to_string(&multi).unwrap()
        );
    }
}

#[test]
fn bifurcation_seeded_runs_match() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.txt");
    let second = dir.path().join("b.txt");
    for out in &[&first, &second] {
        fractal()
            .args(&["bifurcation", "--step", "0.05", "--precision", "100", "--seed", "9", "-o"])
            .arg(out)
            .assert()
            .success();
    }
    let a = fs::read_to_string(&first).unwrap();
    let b = fs::read_to_string(&second).unwrap();
    assert_eq!(a, b);
    assert_eq!(data_lines(&a).len(), 51);
}

#[test]
fn bifurcation_from_negative_point() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("point.txt");
    fractal()
        .args(&["bifurcation", "--step", "0.5", "--point", "-3,4", "-o"])
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(data_lines(&text).len(), 6);
}

#[test]
fn oversized_sweep_is_refused() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("big.txt");
    fractal()
        .args(&["mandelbrot", "--step", "0.0001", "--precision", "1000", "-o"])
        .arg(&out)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("The limit is 250000"));
    assert!(!out.exists());
}

#[test]
fn zero_step_is_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("zero.txt");
    fractal()
        .args(&["mandelbrot", "--step", "0", "-o"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step must be a positive number"));
}

#[test]
fn missing_subcommand_fails() {
    fractal().assert().failure();
}
