//! Coverage summary rendering
//!
//! Walks a [`CoverageRoot`] package by package and class by class, summing
//! covered/total line counts on the way up, and produces the nested HTML
//! table posted to the job summary. Each level displays its own stored line
//! rate; the summed counts only form the `covered/total` part of the label.

use crate::coverage::{CoverageRoot, PackageNode};
use crate::error::CoverageError;

/// Render the summary table for one coverage run
pub fn render(root: &CoverageRoot) -> Result<String, CoverageError> {
    let total_coverage = format_coverage(root.lines_covered, root.lines_valid, root.line_rate)?;

    if root.package_count() == 0 {
        return Err(CoverageError::MissingCoverageData);
    }

    let mut sections = String::new();
    for (_, package) in root.packages() {
        sections.push_str(&build_package_section(package)?);
    }

    Ok(format!(
        "<table><tbody>\
         <tr><th>Coverage&emsp;(covered/total - percentage)</th></tr>\
         <tr><td><b>Total coverage&emsp;({})</b></td></tr>\
         {}</tbody></table>",
        total_coverage, sections
    ))
}

/// Format `covered/total - rate%` with the rate shown to two decimals
pub fn format_coverage(covered: i64, total: i64, rate: f64) -> Result<String, CoverageError> {
    if covered < 0 || total < 0 {
        return Err(CoverageError::NegativeCoverageValues { covered, total });
    }
    if !(0.0..=1.0).contains(&rate) {
        return Err(CoverageError::InvalidCoverageRate { rate });
    }

    Ok(format!("{}/{} - {}%", covered, total, two_decimals(rate * 100.0)))
}

/// Round to two decimals, taking exact halves up (`12.125` → `12.13`)
fn two_decimals(value: f64) -> String {
    let rounded = format!("{:.2}", value);

    // A half is exactly representable, so the long expansion ends in 5000...
    let exact = format!("{:.30}", value);
    let Some(dot) = exact.find('.') else {
        return rounded;
    };
    let dropped = &exact[dot + 3..];
    if !(dropped.starts_with('5') && dropped[1..].bytes().all(|b| b == b'0')) {
        return rounded;
    }

    let kept = exact[..dot + 3].replace('.', "");
    match kept.parse::<u64>() {
        Ok(hundredths) => {
            let up = hundredths + 1;
            format!("{}.{:02}", up / 100, up % 100)
        }
        Err(_) => rounded,
    }
}

/// Counts summed over a package's classes, plus their rendered rows
struct PackageCoverage {
    covered_lines: i64,
    total_lines: i64,
    rows: String,
}

fn calculate_package_coverage(package: &PackageNode) -> Result<PackageCoverage, CoverageError> {
    let mut coverage = PackageCoverage {
        covered_lines: 0,
        total_lines: 0,
        rows: String::new(),
    };

    for (_, class) in package.classes() {
        let overflow = || CoverageError::InvalidPackageData {
            package: package.name.clone(),
        };
        coverage.covered_lines = coverage
            .covered_lines
            .checked_add(class.covered_lines)
            .ok_or_else(overflow)?;
        coverage.total_lines = coverage
            .total_lines
            .checked_add(class.total_lines())
            .ok_or_else(overflow)?;

        let class_coverage =
            format_coverage(class.covered_lines, class.total_lines(), class.line_rate)?;
        coverage.rows.push_str(&format!(
            "<tr><td>&emsp;{} ({})</td></tr>",
            escape_html(&class.name),
            class_coverage
        ));
    }

    Ok(coverage)
}

fn build_package_section(package: &PackageNode) -> Result<String, CoverageError> {
    if package.name.is_empty() {
        return Err(CoverageError::InvalidPackageData {
            package: package.name.clone(),
        });
    }

    let coverage = calculate_package_coverage(package)?;
    let package_coverage =
        format_coverage(coverage.covered_lines, coverage.total_lines, package.line_rate)?;

    Ok(format!(
        "<tr><td><details>\
         <summary>{} ({})</summary>\
         <table><tbody>{}</tbody></table>\
         </details></td></tr>",
        escape_html(&package.name),
        package_coverage,
        coverage.rows
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{sample_root, ClassNode, LineRecord};

    fn three_lines() -> Vec<LineRecord> {
        vec![
            LineRecord::new(1, "a", 1),
            LineRecord::new(2, "b", 0),
            LineRecord::new(3, "c", 1),
        ]
    }

    #[test]
    fn test_format_coverage() {
        assert_eq!(format_coverage(170, 200, 0.85).unwrap(), "170/200 - 85.00%");
        assert_eq!(format_coverage(0, 0, 0.0).unwrap(), "0/0 - 0.00%");
        assert_eq!(format_coverage(3, 3, 1.0).unwrap(), "3/3 - 100.00%");
        assert_eq!(format_coverage(1, 3, 0.3333).unwrap(), "1/3 - 33.33%");
    }

    #[test]
    fn test_format_coverage_rounds_halves_up() {
        assert_eq!(format_coverage(1, 2, 0.12125).unwrap(), "1/2 - 12.13%");
        assert_eq!(format_coverage(1, 2, 0.00625).unwrap(), "1/2 - 0.63%");
        assert_eq!(format_coverage(1, 2, 0.50625).unwrap(), "1/2 - 50.63%");
        assert_eq!(format_coverage(1, 2, 0.00125).unwrap(), "1/2 - 0.13%");
        // Values just off a half keep ordinary rounding
        assert_eq!(format_coverage(1, 2, 0.1212).unwrap(), "1/2 - 12.12%");
        assert_eq!(format_coverage(1, 2, 0.1218).unwrap(), "1/2 - 12.18%");
    }

    #[test]
    fn test_format_coverage_keeps_rate_as_given() {
        // Rate is not recomputed from the counts
        assert_eq!(format_coverage(19, 3, 0.95).unwrap(), "19/3 - 95.00%");
    }

    #[test]
    fn test_format_coverage_rejects_negative_counts() {
        assert_eq!(
            format_coverage(-1, 10, 0.5),
            Err(CoverageError::NegativeCoverageValues { covered: -1, total: 10 })
        );
        assert!(matches!(
            format_coverage(1, -5, 0.5),
            Err(CoverageError::NegativeCoverageValues { .. })
        ));
        // Negative counts are reported ahead of a bad rate
        assert!(matches!(
            format_coverage(-1, 0, 2.0),
            Err(CoverageError::NegativeCoverageValues { .. })
        ));
    }

    #[test]
    fn test_format_coverage_rejects_bad_rate() {
        assert_eq!(
            format_coverage(1, 2, 1.5),
            Err(CoverageError::InvalidCoverageRate { rate: 1.5 })
        );
        assert!(matches!(
            format_coverage(1, 2, -0.01),
            Err(CoverageError::InvalidCoverageRate { .. })
        ));
        assert!(matches!(
            format_coverage(1, 2, f64::NAN),
            Err(CoverageError::InvalidCoverageRate { .. })
        ));
    }

    #[test]
    fn test_render_empty_packages() {
        let root = CoverageRoot::new(0.5, 1, 2);
        assert_eq!(render(&root), Err(CoverageError::MissingCoverageData));
    }

    #[test]
    fn test_render_validates_root_before_packages() {
        let root = CoverageRoot::new(1.2, 1, 2);
        assert!(matches!(render(&root), Err(CoverageError::InvalidCoverageRate { .. })));
    }

    #[test]
    fn test_render_single_class() {
        let root = CoverageRoot::new(0.95, 19, 3).with_package(
            "pkgA",
            PackageNode::new("pkgA", 0.95)
                .with_class("C1.x", ClassNode::new("C1.x", "C1", 0.95, 19, three_lines())),
        );

        let html = render(&root).unwrap();
        assert!(html.contains("<tr><td>&emsp;C1 (19/3 - 95.00%)</td></tr>"));
        assert!(html.contains("<summary>pkgA (19/3 - 95.00%)</summary>"));
    }

    #[test]
    fn test_render_sample_run() {
        let html = render(&sample_root()).unwrap();

        assert_eq!(html.matches("<th>").count(), 1);
        assert!(html.contains("<b>Total coverage&emsp;(170/200 - 85.00%)</b>"));
        assert_eq!(html.matches("<details>").count(), 2);

        // Package counts are summed from classes, the percentage is the package's own rate
        assert!(html.contains("<summary>com.example.package1 (35/6 - 90.00%)</summary>"));
        assert!(html.contains("<summary>com.example.package2 (14/3 - 75.00%)</summary>"));

        let order = [
            "com.example.package1",
            "MyClass1 (19/3 - 95.00%)",
            "MyClass2 (16/3 - 80.00%)",
            "com.example.package2",
            "MyClass3 (14/3 - 70.00%)",
        ];
        let positions: Vec<usize> = order.iter().map(|s| html.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(html.starts_with("<table><tbody><tr><th>"));
        assert!(html.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_render_one_row_per_class() {
        let html = render(&sample_root()).unwrap();
        let sections: Vec<&str> = html.split("<details>").skip(1).collect();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].matches("&emsp;MyClass").count(), 2);
        assert_eq!(sections[1].matches("&emsp;MyClass").count(), 1);
    }

    #[test]
    fn test_render_package_without_classes() {
        let root = CoverageRoot::new(0.0, 0, 0).with_package("empty", PackageNode::new("empty", 0.0));
        let html = render(&root).unwrap();
        assert!(html.contains("<summary>empty (0/0 - 0.00%)</summary><table><tbody></tbody></table>"));
    }

    #[test]
    fn test_render_rejects_unnamed_package() {
        let root = CoverageRoot::new(0.5, 1, 2).with_package("", PackageNode::new("", 0.5));
        assert!(matches!(render(&root), Err(CoverageError::InvalidPackageData { .. })));
    }

    #[test]
    fn test_render_aborts_on_invalid_class() {
        let root = CoverageRoot::new(0.5, 1, 2)
            .with_package(
                "ok",
                PackageNode::new("ok", 0.5).with_class("A", ClassNode::new("A", "A", 0.5, 1, three_lines())),
            )
            .with_package(
                "bad",
                PackageNode::new("bad", 0.5).with_class("B", ClassNode::new("B", "B", 1.5, 1, three_lines())),
            );

        assert_eq!(render(&root), Err(CoverageError::InvalidCoverageRate { rate: 1.5 }));
    }

    #[test]
    fn test_render_rejects_negative_class_count() {
        let root = CoverageRoot::new(0.5, 1, 2).with_package(
            "p",
            PackageNode::new("p", 0.5).with_class("A", ClassNode::new("A", "A", 0.5, -1, three_lines())),
        );
        assert!(matches!(
            render(&root),
            Err(CoverageError::NegativeCoverageValues { covered: -1, total: 3 })
        ));
    }

    #[test]
    fn test_render_rejects_overflowing_package_counts() {
        let root = CoverageRoot::new(0.5, 1, 2).with_package(
            "huge",
            PackageNode::new("huge", 0.5)
                .with_class("A", ClassNode::new("A", "A", 0.5, i64::MAX, three_lines()))
                .with_class("B", ClassNode::new("B", "B", 0.5, 1, three_lines())),
        );
        assert_eq!(
            render(&root),
            Err(CoverageError::InvalidPackageData { package: "huge".to_string() })
        );
    }

    #[test]
    fn test_render_escapes_names() {
        let root = CoverageRoot::new(0.5, 1, 2).with_package(
            "a&b",
            PackageNode::new("a&b", 0.5)
                .with_class("L.java", ClassNode::new("L.java", "List<T>", 0.5, 1, three_lines())),
        );
        let html = render(&root).unwrap();
        assert!(html.contains("<summary>a&amp;b (1/3 - 50.00%)</summary>"));
        assert!(html.contains("&emsp;List&lt;T&gt; (1/3 - 50.00%)"));
    }
}
