//! Path utilities for locating fixture capabilities documents.
//!
//! Fixtures live in `crates/wms-capabilities/testdata/`; a `TEST_DATA_DIR`
//! environment variable can point at an extra directory of real-world
//! documents.

use std::path::PathBuf;

/// Crate whose `testdata/` directory holds the shared fixtures.
const FIXTURE_CRATE: &str = "wms-capabilities";

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to the testdata directory for a specific crate.
///
/// # Arguments
///
/// * `crate_name` - The name of the crate (e.g., "wms-capabilities")
///
/// # Returns
///
/// The path to `crates/{crate_name}/testdata/`
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Path of a fixture document, whether or not it exists.
pub fn fixture_path(name: &str) -> PathBuf {
    crate_testdata_dir(FIXTURE_CRATE).join(name)
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. `crates/wms-capabilities/testdata/`
/// 3. `testdata/` at the workspace root
///
/// # Arguments
///
/// * `name` - The filename to search for (e.g., "wms_1_3_0.xml")
///
/// # Returns
///
/// `Some(PathBuf)` if the file is found, `None` otherwise.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Check environment variable first
    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    candidates.extend([
        fixture_path(name),
        workspace_root().join("testdata").join(name), // workspace-level testdata
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Reads a fixture document into memory.
///
/// Panics when the fixture is missing; fixtures are checked into the repo.
pub fn read_fixture(name: &str) -> Vec<u8> {
    let path = fixture_path(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        // Should contain Cargo.toml at workspace level
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_fixture_path() {
        let path = fixture_path("wms_1_3_0.xml");
        assert!(path.to_string_lossy().contains("wms-capabilities"));
        assert!(path.to_string_lossy().contains("testdata"));
        assert!(path.exists(), "fixture missing: {:?}", path);
    }

    #[test]
    fn test_missing_file_not_found() {
        assert!(find_test_file("does_not_exist.xml").is_none());
    }
}
