use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command; // Run programs
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const SAM: &str = "I am Sam. Sam I am. I do not like this Sam I am.\n";

// Write the text into the temporary directory and return its path.
fn make_input(temp_dir: &tempfile::TempDir,name: &str,txt: &[u8]) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let path = temp_dir.path().join(name);
    std::fs::write(&path,txt)?;
    Ok(path)
}

#[test]
fn scan_reports_stats() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let mut cmd = Command::cargo_bin("lzxdict")?;
    cmd.arg("scan")
        .arg("-i").arg(&in_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("bytes:         49"))
        .stdout(predicate::str::contains("longest match: 10"));
    Ok(())
}

#[test]
fn scan_verifies() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let txt = SAM.repeat(200);
    let in_path = make_input(&temp_dir,"sam.txt",txt.as_bytes())?;
    let mut cmd = Command::cargo_bin("lzxdict")?;
    cmd.arg("scan")
        .arg("-i").arg(&in_path)
        .arg("-w").arg("64")
        .arg("-p").arg("4")
        .arg("--verify")
        .assert()
        .success()
        .stderr(predicate::str::contains("verified"));
    Ok(())
}

#[test]
fn bad_window_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let mut cmd = Command::cargo_bin("lzxdict")?;
    cmd.arg("scan")
        .arg("-i").arg(&in_path)
        .arg("-w").arg("1000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidWindowSize(1000)"));
    Ok(())
}

#[test]
fn tokens_listing() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"abc.txt","abcabcabcX".as_bytes())?;
    let out_path = temp_dir.path().join("abc.tok");
    let mut cmd = Command::cargo_bin("lzxdict")?;
    cmd.arg("tokens")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success();
    match std::fs::read_to_string(out_path) {
        Ok(listing) => assert_eq!(listing,"L 61\nL 62\nL 63\nM 6 3\nL 58\n"),
        _ => panic!("unable to read token listing")
    }
    Ok(())
}
