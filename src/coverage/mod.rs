//! Coverage module
//!
//! Provides:
//! - The hierarchical coverage model (run → packages → classes → lines)
//! - Cobertura XML parsing
//! - The built-in sample run

mod cobertura;
mod sample;

pub use cobertura::*;
pub use sample::*;

use anyhow::Result;

/// Anything that can produce the coverage root for one run
pub trait CoverageSource {
    fn load(&self) -> Result<CoverageRoot>;
}

/// Hit record for a single source line
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub line_number: u32,
    pub line_hash: String,
    pub hits: u64,
}

impl LineRecord {
    pub fn new(line_number: u32, line_hash: &str, hits: u64) -> Self {
        Self {
            line_number,
            line_hash: line_hash.to_string(),
            hits,
        }
    }

    pub fn is_covered(&self) -> bool {
        self.hits > 0
    }
}

/// Coverage for a single class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    /// `<file name>|<class name>`
    pub class_id: String,
    pub file_name: String,
    pub name: String,
    pub line_rate: f64,
    pub covered_lines: i64,
    pub lines: Vec<LineRecord>,
}

impl ClassNode {
    pub fn new(
        file_name: &str,
        name: &str,
        line_rate: f64,
        covered_lines: i64,
        lines: Vec<LineRecord>,
    ) -> Self {
        Self {
            class_id: format!("{}|{}", file_name, name),
            file_name: file_name.to_string(),
            name: name.to_string(),
            line_rate,
            covered_lines,
            lines,
        }
    }

    pub fn total_lines(&self) -> i64 {
        self.lines.len() as i64
    }
}

/// Coverage for a package, classes keyed by file name in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct PackageNode {
    pub name: String,
    pub line_rate: f64,
    classes: Vec<(String, ClassNode)>,
}

impl PackageNode {
    pub fn new(name: &str, line_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            line_rate,
            classes: Vec::new(),
        }
    }

    /// Insert a class under `key`; an existing key keeps its position
    pub fn insert_class(&mut self, key: &str, class: ClassNode) {
        upsert(&mut self.classes, key, class);
    }

    pub fn with_class(mut self, key: &str, class: ClassNode) -> Self {
        self.insert_class(key, class);
        self
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassNode)> {
        self.classes.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn class(&self, key: &str) -> Option<&ClassNode> {
        self.classes.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

/// Root of the coverage tree for one run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoverageRoot {
    pub line_rate: f64,
    pub lines_covered: i64,
    pub lines_valid: i64,
    packages: Vec<(String, PackageNode)>,
}

impl CoverageRoot {
    pub fn new(line_rate: f64, lines_covered: i64, lines_valid: i64) -> Self {
        Self {
            line_rate,
            lines_covered,
            lines_valid,
            packages: Vec::new(),
        }
    }

    /// Insert a package under `key`; an existing key keeps its position
    pub fn insert_package(&mut self, key: &str, package: PackageNode) {
        upsert(&mut self.packages, key, package);
    }

    pub fn with_package(mut self, key: &str, package: PackageNode) -> Self {
        self.insert_package(key, package);
        self
    }

    pub fn packages(&self) -> impl Iterator<Item = (&str, &PackageNode)> {
        self.packages.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn package(&self, key: &str) -> Option<&PackageNode> {
        self.packages.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

fn upsert<T>(entries: &mut Vec<(String, T)>, key: &str, value: T) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_id_combines_file_and_name() {
        let class = ClassNode::new("MyClass1.java", "MyClass1", 0.95, 19, Vec::new());
        assert_eq!(class.class_id, "MyClass1.java|MyClass1");
    }

    #[test]
    fn test_line_is_covered() {
        assert!(LineRecord::new(1, "abc123", 1).is_covered());
        assert!(!LineRecord::new(2, "def456", 0).is_covered());
    }

    #[test]
    fn test_packages_keep_insertion_order() {
        let root = CoverageRoot::new(0.5, 1, 2)
            .with_package("zeta", PackageNode::new("zeta", 0.1))
            .with_package("alpha", PackageNode::new("alpha", 0.2));

        let keys: Vec<&str> = root.packages().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut package = PackageNode::new("pkg", 0.5)
            .with_class("B.java", ClassNode::new("B.java", "B", 0.1, 0, Vec::new()))
            .with_class("A.java", ClassNode::new("A.java", "A", 0.2, 0, Vec::new()));

        package.insert_class("B.java", ClassNode::new("B.java", "B", 0.9, 4, Vec::new()));

        assert_eq!(package.class_count(), 2);
        let (first_key, first) = package.classes().next().unwrap();
        assert_eq!(first_key, "B.java");
        assert_eq!(first.line_rate, 0.9);
        assert_eq!(first.covered_lines, 4);
    }
}
