//! PPTX text: each slide is `ppt/slides/slideN.xml` inside the zip; visible
//! text lives in `<a:t>` runs grouped by `<a:p>` paragraphs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;

static RE_SLIDE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

static RE_PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<a:p>(.*?)</a:p>").unwrap());

static RE_TEXT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<a:t>(.*?)</a:t>").unwrap());

pub(super) fn extract(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path).map_err(|source| super::read_error(path, source))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| slides_error(path, e))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = RE_SLIDE_NAME.captures(name)?[1].parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    if slides.is_empty() {
        return Err(slides_error(path, "no slides found"));
    }
    debug!(path = %path.display(), slides = slides.len(), "reading slide deck");

    let mut text = String::new();
    for (_, name) in &slides {
        let mut xml = String::new();
        archive
            .by_name(name)
            .map_err(|e| slides_error(path, e))?
            .read_to_string(&mut xml)
            .map_err(|e| slides_error(path, e))?;

        for line in slide_lines(&xml) {
            text.push_str(&line);
            text.push('\n');
        }
        text.push('\n');
    }

    Ok(text)
}

/// One line per non-empty paragraph of a slide.
fn slide_lines(xml: &str) -> Vec<String> {
    RE_PARAGRAPH
        .captures_iter(xml)
        .map(|paragraph| {
            RE_TEXT_RUN
                .captures_iter(&paragraph[1])
                .map(|run| unescape_xml(&run[1]))
                .collect::<String>()
        })
        .filter(|line| !line.trim().is_empty())
        .collect()
}

pub(super) fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn slides_error(path: &Path, detail: impl ToString) -> ExtractError {
    ExtractError::Slides {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    fn slide_xml(paragraphs: &[&[&str]]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|runs| {
                let runs: String = runs
                    .iter()
                    .map(|r| format!("<a:r><a:rPr lang=\"es\"/><a:t>{r}</a:t></a:r>"))
                    .collect();
                format!("<a:p>{runs}</a:p>")
            })
            .collect();
        format!("<p:sld><p:cSld><p:spTree><p:sp><p:txBody>{body}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>")
    }

    #[test]
    fn test_slide_lines_joins_runs_and_unescapes() {
        let xml = slide_xml(&[&["Lóbulo ", "frontal"], &["A &amp; B &lt;3"], &["  "]]);
        assert_eq!(slide_lines(&xml), vec!["Lóbulo frontal", "A & B <3"]);
    }

    #[test]
    fn test_extracts_slides_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for (name, xml) in [
            ("ppt/slides/slide10.xml", slide_xml(&[&["Tenth"]])),
            ("ppt/slides/slide2.xml", slide_xml(&[&["Second"]])),
            ("ppt/slides/_rels/slide2.xml.rels", "<Relationships/>".to_string()),
            ("ppt/slides/slide1.xml", slide_xml(&[&["First"]])),
        ] {
            writer.start_file(name, options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap();

        let text = extract(&path).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["First", "Second", "Tenth"]);
    }

    #[test]
    fn test_not_a_zip_is_a_slides_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pptx");
        std::fs::write(&path, b"plain text, not a zip").unwrap();
        assert!(matches!(extract(&path), Err(ExtractError::Slides { .. })));
    }
}
