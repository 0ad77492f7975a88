/*!
 * Tests for file discovery and include/exclude patterns
 */

use anyhow::Result;
use annoflow::file_utils::{FileManager, FilePattern, PatternSet};
use crate::common;

/// Test that bare globs are includes and prefixed globs keep their kind
#[test]
fn test_filePattern_parse_shouldRecognizePrefixes() -> Result<()> {
    assert!(FilePattern::parse("[+]*.xmi")?.is_include());
    assert!(!FilePattern::parse("[-]*.tmp")?.is_include());
    assert!(FilePattern::parse("*.xmi")?.is_include());
    assert!(FilePattern::parse("[+]").is_err());
    Ok(())
}

/// Test that a single star does not cross directories
#[test]
fn test_patternSet_withSingleStar_shouldStayInTopLevel() -> Result<()> {
    let patterns = PatternSet::parse(&["[+]*.xmi"])?;

    assert!(patterns.matches("2465939.xmi"));
    assert!(!patterns.matches("nested/2465939.xmi"));
    assert!(!patterns.matches("2465939.txt"));
    Ok(())
}

/// Test that excludes win over includes
#[test]
fn test_patternSet_withExclude_shouldRejectMatch() -> Result<()> {
    let patterns = PatternSet::parse(&["[+]**/*.xmi", "[-]drafts/**"])?;

    assert!(patterns.matches("a.xmi"));
    assert!(patterns.matches("news/2015/b.xmi"));
    assert!(!patterns.matches("drafts/c.xmi"));
    Ok(())
}

/// Test that find_matching returns selected files sorted by relative path
#[test]
fn test_findMatching_shouldSelectAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b.xmi", "")?;
    common::create_test_file(root, "a.xmi", "")?;
    common::create_test_file(root, "notes.txt", "")?;
    common::create_test_file(root, "sub/c.xmi", "")?;

    let top_level = FileManager::find_matching(root, &PatternSet::parse(&["[+]*.xmi"])?)?;
    assert_eq!(top_level, vec![root.join("a.xmi"), root.join("b.xmi")]);

    let all = FileManager::find_matching(root, &PatternSet::parse(&["[+]**/*.xmi", "[-]b.xmi"])?)?;
    assert_eq!(all, vec![root.join("a.xmi"), root.join("sub").join("c.xmi")]);
    Ok(())
}

/// Test that find_matching on a missing directory is an error
#[test]
fn test_findMatching_withMissingDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = FileManager::find_matching(temp_dir.path().join("missing"), &PatternSet::parse(&["*.xmi"])?);

    assert!(result.is_err());
    Ok(())
}

/// Test that find_files matches extensions case-insensitively
#[test]
fn test_findFiles_shouldMatchExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "one.txt", "x")?;
    common::create_test_file(root, "deep/two.TXT", "y")?;
    common::create_test_file(root, "three.md", "z")?;

    let found = FileManager::find_files(root, ".txt")?;

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().is_some()));
    Ok(())
}

/// Test that output file names are sanitized
#[test]
fn test_outputFileName_shouldSanitizeIdentifier() {
    assert_eq!(FileManager::output_file_name("2465939"), "2465939.xmi");
    assert_eq!(FileManager::output_file_name("news/2015 vote"), "news_2015_vote.xmi");
    assert_eq!(FileManager::output_file_name(""), "document.xmi");
    assert_eq!(FileManager::output_file_name(".."), "document.xmi");
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_writeToFile_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.txt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}
