//! Cobertura XML format parser

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{ClassNode, CoverageRoot, CoverageSource, LineRecord, PackageNode};
use crate::error::CoverageError;

/// Coverage source backed by a Cobertura XML file
#[derive(Debug, Clone)]
pub struct CoberturaFile {
    pub path: PathBuf,
}

impl CoberturaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CoverageSource for CoberturaFile {
    fn load(&self) -> Result<CoverageRoot> {
        parse_cobertura(&self.path)
    }
}

/// Parse a Cobertura XML file
pub fn parse_cobertura(path: &Path) -> Result<CoverageRoot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read coverage report: {}", path.display()))?;
    parse_cobertura_string(&content)
        .with_context(|| format!("Failed to parse coverage report: {}", path.display()))
}

/// Class being collected between `<class>` and `</class>`
struct PendingClass {
    file_name: String,
    name: String,
    line_rate: f64,
    lines: Vec<LineRecord>,
}

impl PendingClass {
    fn finish(self) -> (String, ClassNode) {
        let covered = self.lines.iter().filter(|l| l.is_covered()).count() as i64;
        let class = ClassNode::new(&self.file_name, &self.name, self.line_rate, covered, self.lines);
        (class.class_id.clone(), class)
    }
}

/// Parse Cobertura XML content from a string
pub fn parse_cobertura_string(content: &str) -> Result<CoverageRoot> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut root: Option<CoverageRoot> = None;
    let mut declared_covered: Option<i64> = None;
    let mut declared_valid: Option<i64> = None;

    let mut current_package: Option<PackageNode> = None;
    let mut current_class: Option<PendingClass> = None;
    // Lines nested under <methods> repeat the class lines
    let mut methods_depth = 0usize;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"coverage" => {
                    let (node, covered, valid) = read_coverage(e)?;
                    root = Some(node);
                    declared_covered = covered;
                    declared_valid = valid;
                }
                b"package" => current_package = Some(read_package(e)?),
                b"class" => {
                    if current_package.is_none() {
                        return Err(CoverageError::InvalidPackageData {
                            package: String::new(),
                        }
                        .into());
                    }
                    current_class = Some(read_class(e)?);
                }
                b"methods" => methods_depth += 1,
                b"line" => read_line_into(e, methods_depth, &mut current_class)?,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"coverage" => {
                    let (node, covered, valid) = read_coverage(e)?;
                    root = Some(node);
                    declared_covered = covered;
                    declared_valid = valid;
                }
                b"package" => {
                    let package = read_package(e)?;
                    if let Some(node) = root.as_mut() {
                        node.insert_package(&package.name.clone(), package);
                    }
                }
                b"class" => {
                    let Some(ref mut package) = current_package else {
                        return Err(CoverageError::InvalidPackageData {
                            package: String::new(),
                        }
                        .into());
                    };
                    let (key, class) = read_class(e)?.finish();
                    package.insert_class(&key, class);
                }
                b"line" => read_line_into(e, methods_depth, &mut current_class)?,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"methods" => methods_depth = methods_depth.saturating_sub(1),
                b"class" => {
                    if let (Some(pending), Some(package)) =
                        (current_class.take(), current_package.as_mut())
                    {
                        let (key, class) = pending.finish();
                        package.insert_class(&key, class);
                    }
                }
                b"package" => {
                    if let (Some(package), Some(node)) = (current_package.take(), root.as_mut()) {
                        node.insert_package(&package.name.clone(), package);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow::anyhow!("Error parsing Cobertura XML: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    let mut root = root.ok_or(CoverageError::MissingCoverageData)?;

    // Fall back to class totals when the root does not declare them
    root.lines_covered = match declared_covered {
        Some(count) => count,
        None => root
            .packages()
            .flat_map(|(_, p)| p.classes())
            .map(|(_, c)| c.covered_lines)
            .sum(),
    };
    root.lines_valid = match declared_valid {
        Some(count) => count,
        None => root
            .packages()
            .flat_map(|(_, p)| p.classes())
            .map(|(_, c)| c.total_lines())
            .sum(),
    };

    Ok(root)
}

fn read_coverage(e: &BytesStart) -> Result<(CoverageRoot, Option<i64>, Option<i64>)> {
    let mut line_rate = 0.0f64;
    let mut covered = None;
    let mut valid = None;

    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"line-rate" => line_rate = parse_number("line-rate", &attr.value)?,
            b"lines-covered" => covered = Some(parse_number("lines-covered", &attr.value)?),
            b"lines-valid" => valid = Some(parse_number("lines-valid", &attr.value)?),
            _ => {}
        }
    }

    Ok((CoverageRoot::new(line_rate, 0, 0), covered, valid))
}

fn read_package(e: &BytesStart) -> Result<PackageNode> {
    let mut name = None;
    let mut line_rate = 0.0f64;

    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.into_owned()),
            b"line-rate" => line_rate = parse_number("line-rate", &attr.value)?,
            _ => {}
        }
    }

    let name = name.ok_or(CoverageError::InvalidPackageData {
        package: String::new(),
    })?;

    Ok(PackageNode::new(&name, line_rate))
}

fn read_class(e: &BytesStart) -> Result<PendingClass> {
    let mut pending = PendingClass {
        file_name: String::new(),
        name: String::new(),
        line_rate: 0.0,
        lines: Vec::new(),
    };

    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"name" => pending.name = attr.unescape_value()?.into_owned(),
            b"filename" => pending.file_name = attr.unescape_value()?.into_owned(),
            b"line-rate" => pending.line_rate = parse_number("line-rate", &attr.value)?,
            _ => {}
        }
    }

    Ok(pending)
}

fn read_line_into(
    e: &BytesStart,
    methods_depth: usize,
    current_class: &mut Option<PendingClass>,
) -> Result<()> {
    if methods_depth > 0 {
        return Ok(());
    }
    let Some(class) = current_class.as_mut() else {
        return Ok(());
    };

    let mut line = LineRecord::new(0, "", 0);
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"number" => line.line_number = parse_number("number", &attr.value)?,
            b"hits" => line.hits = parse_number("hits", &attr.value)?,
            b"hash" => line.line_hash = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }

    class.lines.push(line);
    Ok(())
}

fn parse_number<T: FromStr>(name: &str, raw: &[u8]) -> Result<T> {
    let text = String::from_utf8_lossy(raw);
    text.trim()
        .parse::<T>()
        .map_err(|_| anyhow::anyhow!("Invalid {} value: '{}'", name, text))
}
