use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Result<Command, Box<dyn Error>> {
    Ok(Command::cargo_bin("dropsort-cli")?)
}

#[test]
fn organize_moves_files_into_configured_folders() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let config_dir = workspace.path().join("config");
    let base = workspace.path().join("Organized");
    let inbox = workspace.path().join("inbox");
    fs::create_dir_all(&inbox)?;
    fs::write(inbox.join("talk.mp4"), "video")?;
    fs::write(inbox.join("scan.PDF"), "pdf")?;
    fs::write(inbox.join("mystery"), "???")?;

    cli()?
        .args([
            "--config-dir",
            config_dir.to_str().unwrap(),
            "setup",
            base.to_str().unwrap(),
        ])
        .assert()
        .success();

    cli()?
        .args([
            "--config-dir",
            config_dir.to_str().unwrap(),
            "organize",
            inbox.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Organized 3 of 3 files (0 failed)"));

    assert!(base.join("Videos/talk.mp4").exists());
    assert!(base.join("PDFs/scan.PDF").exists());
    assert!(base.join("Others/mystery").exists());
    assert_eq!(fs::read_dir(&inbox)?.count(), 0);

    Ok(())
}

#[test]
fn organize_reports_missing_files_without_aborting() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let base = workspace.path().join("Organized");
    let present = workspace.path().join("notes.md");
    let missing = workspace.path().join("gone.png");
    fs::write(&present, "# notes")?;
    fs::create_dir_all(base.join("Text"))?;
    fs::write(base.join("Text/notes.md"), "older notes")?;

    cli()?
        .args([
            "--config-dir",
            workspace.path().join("config").to_str().unwrap(),
            "organize",
            "--base",
            base.to_str().unwrap(),
            missing.to_str().unwrap(),
            present.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[fail] gone.png: source missing")
                .and(predicate::str::contains("notes_1.md"))
                .and(predicate::str::contains("Organized 1 of 2 files (1 failed)")),
        );

    assert_eq!(fs::read_to_string(base.join("Text/notes.md"))?, "older notes");
    assert_eq!(fs::read_to_string(base.join("Text/notes_1.md"))?, "# notes");
    Ok(())
}

#[test]
fn organize_requires_configuration_or_base() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let file = workspace.path().join("a.txt");
    fs::write(&file, "a")?;

    cli()?
        .args([
            "--config-dir",
            workspace.path().join("config").to_str().unwrap(),
            "organize",
            file.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));

    assert!(file.exists());
    Ok(())
}

#[test]
fn organize_recurses_only_when_asked() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let base = workspace.path().join("Organized");
    let inbox = workspace.path().join("inbox");
    fs::create_dir_all(inbox.join("nested"))?;
    fs::write(inbox.join("top.zip"), "zip")?;
    fs::write(inbox.join("nested/deep.wav"), "wav")?;
    let config_dir = workspace.path().join("config");

    cli()?
        .args([
            "--config-dir",
            config_dir.to_str().unwrap(),
            "organize",
            "--base",
            base.to_str().unwrap(),
            inbox.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Organized 1 of 1 files"));
    assert!(inbox.join("nested/deep.wav").exists());

    cli()?
        .args([
            "--config-dir",
            config_dir.to_str().unwrap(),
            "organize",
            "--recursive",
            "--base",
            base.to_str().unwrap(),
            inbox.to_str().unwrap(),
        ])
        .assert()
        .success();
    assert!(base.join("ZIP/top.zip").exists());
    assert!(base.join("Audio/deep.wav").exists());

    Ok(())
}

#[test]
fn organize_leaves_files_already_in_the_base_alone() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let base = workspace.path().join("Organized");
    fs::create_dir_all(base.join("Images"))?;
    fs::write(base.join("Images/photo.jpg"), "jpg")?;
    fs::write(workspace.path().join("loose.txt"), "txt")?;
    let config_dir = workspace.path().join("config");

    cli()?
        .args([
            "--config-dir",
            config_dir.to_str().unwrap(),
            "organize",
            "--recursive",
            "--base",
            base.to_str().unwrap(),
            base.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files to organize"));

    cli()?
        .args([
            "--config-dir",
            config_dir.to_str().unwrap(),
            "organize",
            "--recursive",
            "--base",
            base.to_str().unwrap(),
            workspace.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Organized 1 of 1 files (0 failed)"));

    assert_eq!(fs::read_to_string(base.join("Images/photo.jpg"))?, "jpg");
    assert!(!base.join("Images/photo_1.jpg").exists());
    assert!(base.join("Text/loose.txt").exists());
    Ok(())
}
