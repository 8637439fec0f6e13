/*!
 * Common test utilities for the tmreview test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use tmreview::memory::{MemoryIndex, TranslationUnit, build_index};

/// Route library logs to the test output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small English to French memory
pub fn sample_units() -> Vec<TranslationUnit> {
    vec![
        TranslationUnit::new("Hello world", "Bonjour le monde", "en", "fr").with_usage_count(12),
        TranslationUnit::new("Open the settings menu", "Ouvrez le menu des paramètres", "en", "fr").with_usage_count(3),
        TranslationUnit::new("Save the file", "Enregistrer le fichier", "en", "fr").with_usage_count(5),
        TranslationUnit::new("Save the file now", "Enregistrer le fichier maintenant", "en", "fr"),
        TranslationUnit::new("Hello world", "Hallo Welt", "en", "de"),
    ]
}

/// Shared index over [`sample_units`]
pub fn sample_index() -> Arc<MemoryIndex> {
    Arc::new(build_index(sample_units()).expect("sample corpus is well formed"))
}
