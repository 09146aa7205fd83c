//! Built-in sample coverage run, used to preview the summary without a report file

use anyhow::Result;

use super::{ClassNode, CoverageRoot, CoverageSource, LineRecord, PackageNode};

/// Source that always yields the same two-package demo run
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCoverage;

impl CoverageSource for SampleCoverage {
    fn load(&self) -> Result<CoverageRoot> {
        Ok(sample_root())
    }
}

/// The demo run: 170/200 lines at 85%, two packages, three classes
pub fn sample_root() -> CoverageRoot {
    let package1 = PackageNode::new("com.example.package1", 0.9)
        .with_class(
            "MyClass1.java",
            ClassNode::new(
                "MyClass1.java",
                "MyClass1",
                0.95,
                19,
                vec![
                    LineRecord::new(1, "abc123", 1),
                    LineRecord::new(2, "def456", 0),
                    LineRecord::new(3, "ghi789", 1),
                ],
            ),
        )
        .with_class(
            "MyClass2.java",
            ClassNode::new(
                "MyClass2.java",
                "MyClass2",
                0.80,
                16,
                vec![
                    LineRecord::new(1, "jkl012", 1),
                    LineRecord::new(2, "mno345", 0),
                    LineRecord::new(3, "pqr678", 1),
                ],
            ),
        );

    let package2 = PackageNode::new("com.example.package2", 0.75).with_class(
        "MyClass3.java",
        ClassNode::new(
            "MyClass3.java",
            "MyClass3",
            0.70,
            14,
            vec![
                LineRecord::new(1, "stu901", 1),
                LineRecord::new(2, "vwx234", 0),
                LineRecord::new(3, "yzab567", 1),
            ],
        ),
    );

    CoverageRoot::new(0.85, 170, 200)
        .with_package("com.example.package1", package1)
        .with_package("com.example.package2", package2)
}
