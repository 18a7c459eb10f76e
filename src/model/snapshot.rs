use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::layout::DependencyLayout;

/// Size of a single scanned file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSizeRecord {
    pub path: String,
    pub size: u64,
}

impl PathSizeRecord {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self { path: path.into(), size }
    }
}

/// Total size of all files belonging to one installed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageGroup {
    pub module_name: String,
    pub size: u64,
}

/// One complete measurement of a release directory.
///
/// Field names serialize in camelCase to match entries already stored
/// under the release-tracking database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSnapshot {
    pub total_node_module_size: u64,
    pub total_project_size: u64,
    pub total_size: u64,
    pub project_stats: Vec<PathSizeRecord>,
    pub node_module_stats: Vec<PackageGroup>,
}

/// Accumulator for the dependency side of the fold.
/// Indexes into `groups` keep first-seen order without a second pass.
#[derive(Default)]
struct PackageFold {
    index: FxHashMap<String, usize>,
    groups: Vec<PackageGroup>,
}

impl PackageFold {
    fn add(mut self, name: &str, size: u64) -> Self {
        match self.index.get(name) {
            Some(&i) => {
                let group = &mut self.groups[i];
                group.size = group.size.saturating_add(size);
            }
            None => {
                self.index.insert(name.to_string(), self.groups.len());
                self.groups.push(PackageGroup { module_name: name.to_string(), size });
            }
        }
        self
    }
}

/// Group file records into per-package and project totals.
///
/// Every record lands in exactly one group, so `total_size` is the sum of
/// all record sizes. Empty input gives an all-zero snapshot.
pub fn aggregate<'a, I>(records: I, layout: &DependencyLayout) -> ReleaseSnapshot
where
    I: IntoIterator<Item = &'a PathSizeRecord>,
{
    let (packages, project_stats) = records.into_iter().fold(
        (PackageFold::default(), Vec::new()),
        |(packages, mut project), record| {
            if layout.is_dependency(&record.path) {
                (packages.add(layout.package_name(&record.path), record.size), project)
            } else {
                project.push(record.clone());
                (packages, project)
            }
        },
    );

    let node_module_stats = packages.groups;
    let total_node_module_size = sum_sizes(node_module_stats.iter().map(|g| g.size));
    let total_project_size = sum_sizes(project_stats.iter().map(|r| r.size));

    ReleaseSnapshot {
        total_node_module_size,
        total_project_size,
        total_size: total_node_module_size.saturating_add(total_project_size),
        project_stats,
        node_module_stats,
    }
}

fn sum_sizes(sizes: impl Iterator<Item = u64>) -> u64 {
    sizes.fold(0, u64::saturating_add)
}

impl ReleaseSnapshot {
    pub fn project_file_count(&self) -> usize {
        self.project_stats.len()
    }

    pub fn package_count(&self) -> usize {
        self.node_module_stats.len()
    }

    /// Up to `limit` packages, largest first. Ties keep first-seen order.
    pub fn largest_packages(&self, limit: usize) -> Vec<&PackageGroup> {
        let mut groups: Vec<&PackageGroup> = self.node_module_stats.iter().collect();
        groups.sort_by(|a, b| b.size.cmp(&a.size));
        groups.truncate(limit);
        groups
    }
}
