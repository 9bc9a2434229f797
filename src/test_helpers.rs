//! Shared test utilities for the kutty-site test suite.
//!
//! Sample documents and shells are the files under `fixtures/site/`, so unit
//! tests and the end-to-end build see the same data.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let state = GardenState::new(sample_plants());
//! let shell = Shell::new(GARDENING_SHELL);
//!
//! let tmp = setup_fixtures();
//! let report = generate(tmp.path(), out.path()).unwrap();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{PhotosDocument, PlantsDocument};

pub const GARDENING_SHELL: &str = include_str!("../fixtures/site/gardening.html");
pub const PHOTOGRAPHY_SHELL: &str = include_str!("../fixtures/site/photography.html");

/// Two categories (`veg`, `herb`) and three plants:
///
/// | # | id | category | images | video |
/// |---|----|----------|--------|-------|
/// | 0 | tomato | veg | 2 | YouTube watch URL |
/// | 1 | basil | herb | 0 | none |
/// | 2 | brinjal | veg | 1 | local mp4 |
pub fn sample_plants() -> PlantsDocument {
    serde_json::from_str(include_str!("../fixtures/site/plants-data.json"))
        .expect("fixture plants-data.json must parse")
}

/// Two albums, `monsoon-mornings` with three photos and `kerala-birds`
/// with two. The first photo has a thumbnail, camera, two settings,
/// composition tags and a youtu.be video; the second has none of these.
pub fn sample_photos() -> PhotosDocument {
    serde_json::from_str(include_str!("../fixtures/site/photos.json"))
        .expect("fixture photos.json must parse")
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
