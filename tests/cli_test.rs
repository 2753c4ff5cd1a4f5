use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::Path;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const SAM: &str = "I am Sam. Sam I am. I do not like this Sam I am.\r\n\
Do you like green eggs and ham?\r\n\
I do not like them, Sam-I-am.\r\n\
I do not like green eggs and ham.\r\n";

fn compress(in_path: &Path,out_path: &Path,width: &str) -> STDRESULT {
    let mut cmd = Command::cargo_bin("statichuff")?;
    cmd.arg("compress")
        .arg("-i").arg(in_path)
        .arg("-o").arg(out_path)
        .arg("-w").arg(width)
        .assert()
        .success()
        .stderr(predicate::str::starts_with("compressed"));
    Ok(())
}

fn expand(in_path: &Path,out_path: &Path,width: &str) -> STDRESULT {
    let mut cmd = Command::cargo_bin("statichuff")?;
    cmd.arg("expand")
        .arg("-i").arg(in_path)
        .arg("-o").arg(out_path)
        .arg("-w").arg(width)
        .assert()
        .success()
        .stderr(predicate::str::starts_with("expanded"));
    Ok(())
}

fn round_trip(dat: &[u8],width: &str) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("sam.txt");
    let cmp_path = temp_dir.path().join("sam.huf");
    let out_path = temp_dir.path().join("sam_expanded.txt");
    std::fs::write(&in_path,dat)?;
    compress(&in_path,&cmp_path,width)?;
    let compressed = std::fs::read(&cmp_path)?;
    assert!(compressed.len() >= 256 * width.parse::<usize>()?);
    expand(&cmp_path,&out_path,width)?;
    assert_eq!(std::fs::read(&out_path)?,dat.to_vec());
    Ok(())
}

#[test]
fn text_round_trip() -> STDRESULT {
    round_trip(SAM.as_bytes(),"4")?;
    round_trip(SAM.as_bytes(),"2")?;
    round_trip(SAM.as_bytes(),"8")
}

#[test]
fn degenerate_round_trip() -> STDRESULT {
    round_trip(&[],"4")?;
    round_trip(&[0xff;100],"4")
}

#[test]
fn header_size() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("empty.txt");
    let out_path = temp_dir.path().join("empty.huf");
    std::fs::write(&in_path,b"")?;
    compress(&in_path,&out_path,"2")?;
    assert_eq!(std::fs::read(&out_path)?,vec![0;512]);
    Ok(())
}

#[test]
fn short_container_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("bad.huf");
    let out_path = temp_dir.path().join("bad.txt");
    std::fs::write(&in_path,[0u8;100])?;
    let mut cmd = Command::cargo_bin("statichuff")?;
    cmd.arg("expand")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("FileFormatMismatch"));
    Ok(())
}

#[test]
fn missing_input_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let mut cmd = Command::cargo_bin("statichuff")?;
    cmd.arg("compress")
        .arg("-i").arg(temp_dir.path().join("nothing_here.txt"))
        .arg("-o").arg(temp_dir.path().join("nothing_here.huf"))
        .assert()
        .failure();
    Ok(())
}

#[test]
fn code_listing() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("abc.txt");
    std::fs::write(&in_path,"aaabbc")?;
    let mut cmd = Command::cargo_bin("statichuff")?;
    cmd.arg("codes")
        .arg("-i").arg(&in_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("61          3 0\n"))
        .stdout(predicate::str::contains("62          2 11\n"))
        .stdout(predicate::str::contains("63          1 10\n"));
    Ok(())
}
