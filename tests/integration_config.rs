//! Integration tests for option resolution across defaults, the config file,
//! the environment and the command line.

mod common;

use common::Sandbox;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_options_from_env_vars() {
    let sandbox = Sandbox::new();
    sandbox
        .pip()
        .env("PIP_NO_INDEX", "1")
        .args(["install", "-vvv", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nno_index = true\n"))
        .stdout(predicate::str::contains("\nverbose = 3\n"));
}

#[test]
fn test_command_line_options_override_env_vars() {
    let sandbox = Sandbox::new();
    sandbox
        .pip()
        .env("PIP_INDEX_URL", "http://b.pypi.python.org/simple/")
        .args(["install", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\nindex_url = http://b.pypi.python.org/simple/\n",
        ));

    sandbox
        .pip()
        .env("PIP_INDEX_URL", "http://b.pypi.python.org/simple/")
        .args(["install", "--index-url", "http://download.zope.org/ppix", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nindex_url = http://download.zope.org/ppix\n"))
        .stdout(predicate::str::contains("b.pypi.python.org").not());
}

#[test]
fn test_env_vars_override_config_file() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("[global]\nno-index = 1\n");

    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .args(["install", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nno_index = true\n"));

    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .env("PIP_NO_INDEX", "0")
        .args(["install", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nno_index = false\n"));
}

#[test]
fn test_config_file_override_stack() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("[global]\nindex-url = http://download.zope.org/ppix\n");
    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .args(["install", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nindex_url = http://download.zope.org/ppix\n"));

    let config = sandbox.write_config(
        "[global]\nindex-url = http://download.zope.org/ppix\n[install]\nindex-url = http://pypi.appspot.com/\n",
    );
    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .args(["install", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nindex_url = http://pypi.appspot.com/\n"));

    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .args(["install", "--index-url", "http://pypi.python.org/simple", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nindex_url = http://pypi.python.org/simple\n"))
        .stdout(predicate::str::contains("ppix").not())
        .stdout(predicate::str::contains("appspot").not());
}

#[test]
fn test_command_section_does_not_leak_into_other_commands() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("[install]\nno-index = yes\n");
    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .args(["bundle", "x.pybundle", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nno_index = false\n"));
}

#[test]
fn test_list_options_accumulate_across_layers() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config(
        "[global]\nfind-links =\n    http://config.one\n    http://config.two\n",
    );
    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .env("PIP_FIND_LINKS", "http://env.one http://env.two")
        .args(["install", "-f", "http://cli.one", "INITools"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"find_links = ["http://config.one","http://config.two","http://env.one","http://env.two","http://cli.one"]"#,
        ));
}

#[test]
fn test_counts_from_env_and_cli_add() {
    let sandbox = Sandbox::new();
    sandbox
        .pip()
        .env("PIP_VERBOSE", "1")
        .args(["-v", "freeze", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nverbose = 3\n"));
}

#[test]
fn test_conventional_config_location_is_searched() {
    let sandbox = Sandbox::new();
    let dir = sandbox.path().join(".pip");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("pip.conf"), "[global]\ntimeout = 60\n").unwrap();
    sandbox
        .pip()
        .arg("freeze")
        .assert()
        .success()
        .stdout(predicate::str::contains("\ntimeout = 60\n"));
}

#[test]
fn test_null_config_file_disables_configuration() {
    let sandbox = Sandbox::new();
    let dir = sandbox.path().join(".pip");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("pip.conf"), "[global]\ntimeout = 60\n").unwrap();
    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", "/dev/null")
        .arg("freeze")
        .assert()
        .success()
        .stdout(predicate::str::contains("\ntimeout = 15\n"));
}

#[test]
fn test_unreadable_config_override_is_fatal() {
    let sandbox = Sandbox::new();
    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", sandbox.path().join("missing.cfg"))
        .arg("freeze")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ERROR: Could not read configuration file"));
}

#[test]
fn test_malformed_config_is_fatal() {
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("index-url = http://nowhere\n");
    sandbox
        .pip()
        .env("PIP_CONFIG_FILE", &config)
        .arg("freeze")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File contains no section headers."));
}

#[test]
fn test_empty_flag_env_var_is_fatal() {
    let sandbox = Sandbox::new();
    sandbox
        .pip()
        .env("PIP_NO_INDEX", "")
        .args(["install", "INITools"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PIP_NO_INDEX"));
}

#[test]
fn test_log_file_no_directory() {
    let sandbox = Sandbox::new();
    sandbox
        .pip()
        .args(["--log", "testpip.log", "freeze"])
        .assert()
        .success();
    let content = fs::read_to_string(sandbox.path().join("testpip.log")).unwrap();
    assert!(content.contains("pip --log testpip.log freeze run on "));
}

#[test]
fn test_failed_command_is_stored_in_log_file() {
    let sandbox = Sandbox::new();
    sandbox
        .pip()
        .arg("completion")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Storing complete log in"));
    let content = fs::read_to_string(sandbox.failure_log()).unwrap();
    assert!(content.contains("You must pass --bash or --zsh"));
}
