//! XLSX text: shared strings from `xl/sharedStrings.xml`, cells from each
//! `xl/worksheets/sheetN.xml`. One line per non-empty row.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use zip::ZipArchive;

use super::slides::unescape_xml;
use crate::error::ExtractError;

const SHARED_STRINGS: &str = "xl/sharedStrings.xml";

static RE_SHEET_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^xl/worksheets/sheet(\d+)\.xml$").unwrap());

static RE_SHARED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<si>(.*?)</si>").unwrap());

static RE_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<t(?:\s[^>]*)?>(.*?)</t>").unwrap());

static RE_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<row\b[^>]*>(.*?)</row>").unwrap());

static RE_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<c\b([^>]*?)(?:/>|>(.*?)</c>)").unwrap());

static RE_CELL_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bt="([^"]*)""#).unwrap());

static RE_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<v>(.*?)</v>").unwrap());

pub(super) fn extract(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path).map_err(|source| super::read_error(path, source))?;
    let mut archive = ZipArchive::new(file).map_err(|e| spreadsheet_error(path, e))?;

    let mut sheets: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = RE_SHEET_NAME.captures(name)?[1].parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    sheets.sort_by_key(|(number, _)| *number);

    if sheets.is_empty() {
        return Err(spreadsheet_error(path, "no worksheets found"));
    }

    // Workbooks with only numbers have no shared strings part.
    let shared = if archive.file_names().any(|name| name == SHARED_STRINGS) {
        shared_strings(&read_entry(&mut archive, SHARED_STRINGS, path)?)
    } else {
        Vec::new()
    };
    debug!(
        path = %path.display(),
        sheets = sheets.len(),
        shared_strings = shared.len(),
        "reading workbook"
    );

    let mut text = String::new();
    for (number, name) in &sheets {
        let xml = read_entry(&mut archive, name, path)?;
        let rows = sheet_rows(&xml, &shared);
        if rows.is_empty() {
            continue;
        }
        text.push_str(&format!("Sheet {number}\n"));
        for row in rows {
            text.push_str(&row);
            text.push('\n');
        }
        text.push('\n');
    }

    Ok(text)
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    path: &Path,
) -> Result<String, ExtractError> {
    let mut xml = String::new();
    archive
        .by_name(name)
        .map_err(|e| spreadsheet_error(path, e))?
        .read_to_string(&mut xml)
        .map_err(|e| spreadsheet_error(path, e))?;
    Ok(xml)
}

/// Each `<si>` item, with rich-text runs concatenated.
fn shared_strings(xml: &str) -> Vec<String> {
    RE_SHARED_ITEM
        .captures_iter(xml)
        .map(|item| collect_text(&item[1]))
        .collect()
}

fn collect_text(xml: &str) -> String {
    RE_TEXT
        .captures_iter(xml)
        .map(|run| unescape_xml(&run[1]))
        .collect()
}

/// Non-empty rows, cells joined by ` | `.
fn sheet_rows(xml: &str, shared: &[String]) -> Vec<String> {
    RE_ROW
        .captures_iter(xml)
        .map(|row| {
            RE_CELL
                .captures_iter(&row[1])
                .filter_map(|cell| {
                    let attributes = cell.get(1).map_or("", |m| m.as_str());
                    let body = cell.get(2).map_or("", |m| m.as_str());
                    cell_text(attributes, body, shared)
                })
                .filter(|value| !value.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn cell_text(attributes: &str, body: &str, shared: &[String]) -> Option<String> {
    let kind = RE_CELL_TYPE
        .captures(attributes)
        .map(|caps| caps[1].to_string());
    let value = || RE_VALUE.captures(body).map(|caps| unescape_xml(caps[1].trim()));

    match kind.as_deref() {
        Some("s") => {
            let index: usize = value()?.parse().ok()?;
            shared.get(index).cloned()
        }
        Some("inlineStr") => Some(collect_text(body)),
        Some("b") => value().map(|v| if v == "1" { "TRUE".to_string() } else { "FALSE".to_string() }),
        _ => value(),
    }
}

fn spreadsheet_error(path: &Path, detail: impl ToString) -> ExtractError {
    ExtractError::Spreadsheet {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    const SHARED: &str = r#"<sst count="4" uniqueCount="4">
        <si><t>Materia</t></si>
        <si><t>Puntaje</t></si>
        <si><r><t>Neuro</t></r><r><rPr><b/></rPr><t xml:space="preserve">logía</t></r></si>
        <si><t>Fármacos &amp; dosis</t></si>
    </sst>"#;

    fn sheet(rows: &str) -> String {
        format!(r#"<worksheet><cols><col min="1" max="2"/></cols><sheetData>{rows}</sheetData></worksheet>"#)
    }

    fn write_workbook(dir: &tempfile::TempDir, entries: &[(&str, String)]) -> std::path::PathBuf {
        let path = dir.path().join("notas.xlsx");
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        for (name, xml) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_shared_strings_join_rich_text_runs() {
        assert_eq!(
            shared_strings(SHARED),
            vec!["Materia", "Puntaje", "Neurología", "Fármacos & dosis"]
        );
    }

    #[test]
    fn test_cell_kinds() {
        let shared = shared_strings(SHARED);
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
               <row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2" s="3"><v>85.5</v></c></row>
               <row r="3"><c r="A3" t="inlineStr"><is><t>Cardio</t></is></c><c r="B3" t="b"><v>1</v></c><c r="C3" s="1"/></row>
               <row r="4"><c r="A4" s="2"/></row>"#,
        );
        assert_eq!(
            sheet_rows(&xml, &shared),
            vec!["Materia | Puntaje", "Neurología | 85.5", "Cardio | TRUE"]
        );
    }

    #[test]
    fn test_extracts_sheets_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(
            &dir,
            &[
                ("xl/sharedStrings.xml", SHARED.to_string()),
                ("xl/worksheets/sheet10.xml", sheet(r#"<row r="1"><c t="s"><v>3</v></c></row>"#)),
                ("xl/worksheets/sheet2.xml", sheet(r#"<row r="1"><c t="s"><v>2</v></c><c><v>70</v></c></row>"#)),
                ("xl/worksheets/_rels/sheet2.xml.rels", "<Relationships/>".to_string()),
                ("xl/worksheets/sheet1.xml", sheet(r#"<row r="1"><c t="s"><v>0</v></c><c t="s"><v>1</v></c></row>"#)),
            ],
        );

        let text = extract(&path).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "Sheet 1",
                "Materia | Puntaje",
                "Sheet 2",
                "Neurología | 70",
                "Sheet 10",
                "Fármacos & dosis",
            ]
        );
    }

    #[test]
    fn test_numbers_only_workbook_needs_no_shared_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(
            &dir,
            &[("xl/worksheets/sheet1.xml", sheet(r#"<row r="1"><c><v>1</v></c><c><v>2</v></c></row>"#))],
        );
        assert_eq!(extract(&path).unwrap().trim(), "Sheet 1\n1 | 2");
    }

    #[test]
    fn test_workbook_without_sheets_is_a_spreadsheet_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir, &[("xl/workbook.xml", "<workbook/>".to_string())]);
        assert!(matches!(extract(&path), Err(ExtractError::Spreadsheet { .. })));

        std::fs::write(&path, b"not a zip").unwrap();
        assert!(matches!(extract(&path), Err(ExtractError::Spreadsheet { .. })));
    }
}
