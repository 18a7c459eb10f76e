// Shared benchmark helpers
// Functions here are used across different benchmark files
#![allow(dead_code)]

use release_tracker::model::PathSizeRecord;
use std::path::PathBuf;
use tempfile::TempDir;

/// Generate `num_files` records, roughly half of them under node_modules,
/// spread over `num_packages` packages
pub fn generate_records(num_files: usize, num_packages: usize) -> Vec<PathSizeRecord> {
    (0..num_files)
        .map(|i| {
            let path = if i % 2 == 0 {
                format!("package/node_modules/pkg_{}/lib/file_{}.js", i % num_packages, i)
            } else {
                format!("package/src/dir_{}/file_{}.js", i / 100, i)
            };
            PathSizeRecord::new(path, (i % 4096) as u64)
        })
        .collect()
}

/// Create a release directory with `num_files` small files on disk
pub fn create_bench_release(num_files: usize) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("package");

    for record in generate_records(num_files, 50) {
        let rel = record.path.trim_start_matches("package/");
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, vec![b'x'; record.size as usize]).unwrap();
    }

    (dir, root)
}
