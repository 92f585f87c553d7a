use std::error::Error;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn classify_prints_default_categories() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    Command::cargo_bin("dropsort-cli")?
        .args([
            "--config-dir",
            workspace.path().to_str().unwrap(),
            "classify",
            "a.MP4",
            "noext",
            "file.unknownext",
            "sheet.xlsm",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("a.MP4 -> Videos\n")
                .and(predicate::str::contains("noext -> Others\n"))
                .and(predicate::str::contains("file.unknownext -> Others\n"))
                .and(predicate::str::contains("sheet.xlsm -> Excel\n")),
        );

    Ok(())
}
