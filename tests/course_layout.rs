//! Integration tests for exercise/solution discovery and checks

use blockfund::config::CourseConfig;
use blockfund::course::{Course, LayoutIssue, Side};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const EXERCISE: &str = "//! # BillHash\n//!\n//! $ cargo run bill\n\nfn strengthen() {\n    // TODO 1\n}\n\nfn split() {\n    // TODO 2\n}\n\n#[cfg(test)]\nmod tests {}\n";

fn write_topic(root: &Path, tree: &str, topic: &str, source: &str) -> std::io::Result<()> {
    let dir = root.join(tree).join(topic).join("src");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("main.rs"), source)
}

fn config_for(root: &Path) -> CourseConfig {
    CourseConfig {
        root: root.to_path_buf(),
        ..CourseConfig::default()
    }
}

#[test]
fn test_paired_course_is_clean() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    for topic in ["3_hashing", "2_public_key_crypto", "4_basic_blockchain"] {
        write_topic(tmp.path(), "exercises", topic, EXERCISE)?;
        write_topic(tmp.path(), "solutions", topic, EXERCISE)?;
    }

    let course = Course::discover(&config_for(tmp.path()))?;
    let names: Vec<_> = course.topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["2_public_key_crypto", "3_hashing", "4_basic_blockchain"]);
    assert!(course.check()?.is_empty());
    Ok(())
}

#[test]
fn test_unpaired_topics_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_topic(tmp.path(), "exercises", "3_hashing", EXERCISE)?;
    write_topic(tmp.path(), "solutions", "5_merkle", EXERCISE)?;

    let issues = Course::discover(&config_for(tmp.path()))?.check()?;
    assert!(issues.contains(&LayoutIssue::MissingSolution {
        topic: "3_hashing".to_string()
    }));
    assert!(issues.contains(&LayoutIssue::MissingExercise {
        topic: "5_merkle".to_string()
    }));
    Ok(())
}

#[test]
fn test_missing_entry_point_and_bad_todo_order() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_topic(tmp.path(), "exercises", "3_hashing", "// TODO 2\n// TODO 1\n")?;
    fs::create_dir_all(tmp.path().join("solutions/3_hashing"))?;

    let issues = Course::discover(&config_for(tmp.path()))?.check()?;
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().any(|i| matches!(
        i,
        LayoutIssue::MissingEntryPoint { side: Side::Solution, .. }
    )));
    assert!(issues.iter().any(|i| matches!(i, LayoutIssue::TodoOrder { .. })));
    Ok(())
}

#[test]
fn test_report_for_topic() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_topic(tmp.path(), "exercises", "3_hashing", EXERCISE)?;
    write_topic(tmp.path(), "solutions", "3_hashing", EXERCISE)?;

    let course = Course::discover(&config_for(tmp.path()))?;
    let report = course.report("hashing", Side::Exercise)?;

    assert_eq!(report.header, "# BillHash\n\n$ cargo run bill");
    assert_eq!(report.todos.len(), 2);
    assert!(report.workflow.iter().any(|s| s == "cargo test"));
    assert!(report
        .workflow
        .iter()
        .any(|s| s.contains("TODO 1 through TODO 2")));
    assert!(course.report("9", Side::Exercise).is_err());
    Ok(())
}

#[test]
fn test_empty_root_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    assert!(Course::discover(&config_for(tmp.path())).is_err());
    Ok(())
}
