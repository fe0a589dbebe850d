//! Document text extraction.
//!
//! Every supported upload is reduced to one plain-text string, which becomes
//! the grounding material for verification and question generation.

mod pdf;
mod slides;
mod spreadsheet;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Slides,
    Spreadsheet,
    PlainText,
    Markdown,
    Csv,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ExtractError::UnknownType {
                path: path.to_path_buf(),
            })?;

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "pptx" => Ok(Self::Slides),
            "xlsx" => Ok(Self::Spreadsheet),
            "txt" | "text" => Ok(Self::PlainText),
            "md" | "markdown" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            // Recognised, but OCR and the binary Office formats are not offered.
            "jpg" | "jpeg" | "png" | "xls" | "ppt" => Err(ExtractError::Unsupported {
                path: path.to_path_buf(),
                extension,
            }),
            _ => Err(ExtractError::UnknownType {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Slides => "Slides",
            Self::Spreadsheet => "Spreadsheet",
            Self::PlainText => "Text",
            Self::Markdown => "Markdown",
            Self::Csv => "CSV",
        }
    }
}

/// Plain text pulled out of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub source: PathBuf,
    pub kind: DocumentKind,
    pub text: String,
}

impl ExtractedContent {
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// First `max_chars` characters, with `...` appended when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.text, max_chars)
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Extract the text of the document at `path`.
pub fn extract_text(path: impl AsRef<Path>) -> Result<ExtractedContent, ExtractError> {
    let path = path.as_ref();
    let kind = DocumentKind::from_path(path)?;

    if !path.exists() {
        return Err(ExtractError::NotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), kind = kind.label(), "extracting document text");

    let text = match kind {
        DocumentKind::Pdf => pdf::extract(path)?,
        DocumentKind::Slides => slides::extract(path)?,
        DocumentKind::Spreadsheet => spreadsheet::extract(path)?,
        DocumentKind::PlainText | DocumentKind::Markdown | DocumentKind::Csv => read_utf8(path)?,
    };

    let text = normalise(&text);
    if text.trim().is_empty() {
        return Err(ExtractError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        kind = kind.label(),
        chars = text.chars().count(),
        "document extracted"
    );

    Ok(ExtractedContent {
        source: path.to_path_buf(),
        kind,
        text,
    })
}

fn read_utf8(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path).map_err(|source| read_error(path, source))?;
    let text = String::from_utf8(bytes).map_err(|_| ExtractError::Encoding {
        path: path.to_path_buf(),
    })?;
    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

pub(crate) fn read_error(path: &Path, source: io::Error) -> ExtractError {
    if source.kind() == io::ErrorKind::NotFound {
        ExtractError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        ExtractError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// CRLF to LF, trailing whitespace trimmed, runs of blank lines collapsed.
fn normalise(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_kind_dispatch_by_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("a.PDF")).unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("a.pptx")).unwrap(), DocumentKind::Slides);
        assert_eq!(DocumentKind::from_path(Path::new("Notas.XLSX")).unwrap(), DocumentKind::Spreadsheet);
        assert_eq!(DocumentKind::from_path(Path::new("notes.md")).unwrap(), DocumentKind::Markdown);
        assert_eq!(DocumentKind::from_path(Path::new("t.csv")).unwrap(), DocumentKind::Csv);
        assert!(matches!(
            DocumentKind::from_path(Path::new("scan.png")),
            Err(ExtractError::Unsupported { .. })
        ));
        assert!(matches!(
            DocumentKind::from_path(Path::new("old.xls")),
            Err(ExtractError::Unsupported { .. })
        ));
        assert!(matches!(
            DocumentKind::from_path(Path::new("README")),
            Err(ExtractError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_extracts_plain_text() {
        let (_dir, path) = write_temp("notes.txt", b"\xEF\xBB\xBFLine one\r\n\r\n\r\n\r\nLine two   \r\n");
        let content = extract_text(&path).unwrap();
        assert_eq!(content.kind, DocumentKind::PlainText);
        assert_eq!(content.text, "Line one\n\nLine two");
        assert_eq!(content.word_count(), 4);
        assert_eq!(content.file_name(), "notes.txt");
    }

    #[test]
    fn test_whitespace_only_file_is_empty() {
        let (_dir, path) = write_temp("blank.md", b"   \n\n\t\n");
        assert!(matches!(extract_text(&path), Err(ExtractError::Empty { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let (_dir, path) = write_temp("bad.txt", &[0xff, 0xfe, 0x00, 0x41]);
        assert!(matches!(extract_text(&path), Err(ExtractError::Encoding { .. })));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            extract_text("/definitely/not/here.txt"),
            Err(ExtractError::NotFound { .. })
        ));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let content = ExtractedContent {
            source: PathBuf::from("x.txt"),
            kind: DocumentKind::PlainText,
            text: "épilepsie".to_string(),
        };
        assert_eq!(content.preview(3), "épi...");
        assert_eq!(content.preview(50), "épilepsie");
    }
}
