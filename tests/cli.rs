use assert_cmd::prelude::*;
use once_cell::sync::Lazy;
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

static CUSTOM_CONTENT: Lazy<String> = Lazy::new(|| {
    r#"<portfolio>
  <name>Grace Example</name>
  <slogan>SHIP IT</slogan>
  <about>
    <summary>Compiler engineer &amp; mentor.</summary>
    <education>MSc Mathematics</education>
  </about>
  <projects>
    <project>
      <name>Tiny Lisp</name>
      <desc>A Lisp in a weekend.</desc>
      <tech>Rust</tech>
      <link>https://example.org/lisp</link>
    </project>
  </projects>
  <skills>
    <languages><item>Rust</item></languages>
  </skills>
  <contact>
    <email>grace@example.org</email>
    <linkedin>linkedin.com/in/grace</linkedin>
    <github>github.com/grace</github>
  </contact>
</portfolio>
"#
    .to_string()
});

fn portfolio() -> Command {
    Command::cargo_bin("crystal-portfolio").expect("binary exists")
}

fn content_file(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp content");
    tmp.write_all(xml.as_bytes()).expect("write content");
    tmp
}

#[test]
fn summary_lists_targets_and_idle_state() {
    portfolio()
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(contains("Loaded portfolio for YOUR NAME"))
        .stdout(contains(" - About Me\n - Projects\n - Skills & Experience\n - Contact\n"))
        .stdout(contains("Final state: idle"))
        .stdout(contains("No panel visible"));
}

#[test]
fn activation_opens_panel_after_warp() {
    portfolio()
        .args(["--activate", "Projects", "--wait", "999"])
        .assert()
        .success()
        .stdout(contains("activate \"Projects\" -> warping to Projects"))
        .stdout(contains("[  999 ms] wait 999 ms -> warping to Projects"))
        .stdout(contains("No panel visible"));

    portfolio()
        .args(["--activate", "Projects", "--wait", "1000"])
        .assert()
        .success()
        .stdout(contains("warp finished, panel Projects visible"))
        .stdout(contains("Final state: showing Projects"))
        .stdout(contains("== PROJECTS =="))
        .stdout(contains("* Vehicle Monitor: Real-time vehicle tracking"))
        .stdout(contains("https://example.com/projects/vehicle-monitor"));
}

#[test]
fn switching_targets_mid_warp_only_opens_the_latest() {
    portfolio()
        .args([
            "--activate",
            "Projects",
            "--wait",
            "500",
            "--activate",
            "Contact",
            "--wait",
            "500",
            "--wait",
            "500",
        ])
        .assert()
        .success()
        .stdout(contains("panel Projects visible").not())
        .stdout(contains("[ 1000 ms] wait 500 ms -> warping to Contact"))
        .stdout(contains("[ 1500 ms]   warp finished, panel Contact visible"))
        .stdout(contains("== CONTACT & LINKS =="))
        .stdout(contains("Email: you@example.com <mailto:you@example.com>"));
}

#[test]
fn activating_the_open_target_toggles_it_off() {
    portfolio()
        .args([
            "--activate",
            "Skills & Experience",
            "--wait",
            "1200",
            "--activate",
            "Skills & Experience",
        ])
        .assert()
        .success()
        .stdout(contains("showing Skills & Experience"))
        .stdout(contains("[ 1200 ms] activate \"Skills & Experience\" -> idle"))
        .stdout(contains("Final state: idle"));
}

#[test]
fn close_during_warp_cancels_the_panel() {
    portfolio()
        .args(["--activate", "About Me", "--wait", "300", "--close", "--wait", "2000"])
        .assert()
        .success()
        .stdout(contains("[  300 ms] close -> idle"))
        .stdout(contains("warp finished").not())
        .stdout(contains("Final state: idle"));
}

#[test]
fn longest_wait_returns_with_the_panel_open() {
    portfolio()
        .args(["--activate", "Contact", "--wait", "18446744073709551615"])
        .assert()
        .success()
        .stdout(contains("[ 1000 ms]   warp finished, panel Contact visible"))
        .stdout(contains("[18446744073709551615 ms] wait 18446744073709551615 ms"))
        .stdout(contains("Final state: showing Contact"));
}

#[test]
fn unknown_target_warps_but_renders_nothing() {
    portfolio()
        .args(["--activate", "Blog", "--wait", "1000"])
        .assert()
        .success()
        .stdout(contains("Final state: showing Blog"))
        .stdout(contains("No panel visible"));
}

#[test]
fn custom_content_file_replaces_builtin_content() {
    let file = content_file(&CUSTOM_CONTENT);
    portfolio()
        .arg("--content")
        .arg(file.path())
        .args(["--activate", "About Me", "--wait", "1000"])
        .assert()
        .success()
        .stdout(contains("Loaded portfolio for Grace Example"))
        .stdout(contains("== ABOUT ME =="))
        .stdout(contains("Compiler engineer & mentor."))
        .stdout(contains("MSc Mathematics"));
}

#[test]
fn invalid_content_file_is_reported() {
    let file = content_file("<portfolio><name>Nobody</name></portfolio>");
    portfolio()
        .arg("--content")
        .arg(file.path())
        .arg("--summary-only")
        .assert()
        .failure()
        .stderr(contains("failed to load content"));
}

#[test]
fn unknown_flag_prints_usage() {
    portfolio()
        .arg("--fly")
        .assert()
        .failure()
        .stderr(contains("Unknown argument: --fly"))
        .stderr(contains("Usage: crystal-portfolio"));
}
