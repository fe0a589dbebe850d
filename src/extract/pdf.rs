//! PDF text via pdfium.
//!
//! The pdfium shared library is bound at runtime: first next to the
//! executable's working directory, then from the system library path. A
//! missing library surfaces as an extraction error, not a crash.

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::debug;

use crate::error::ExtractError;

pub(super) fn extract(path: &Path) -> Result<String, ExtractError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| pdf_error(path, format!("pdfium library unavailable: {e}")))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| pdf_error(path, e.to_string()))?;

    let pages = document.pages();
    debug!(path = %path.display(), pages = pages.len(), "reading pdf pages");

    let mut text = String::new();
    for (index, page) in pages.iter().enumerate() {
        let page_text = page
            .text()
            .map_err(|e| pdf_error(path, format!("page {}: {e}", index + 1)))?;
        text.push_str(&page_text.all());
        text.push('\n');
    }

    Ok(text)
}

fn pdf_error(path: &Path, detail: String) -> ExtractError {
    ExtractError::Pdf {
        path: path.to_path_buf(),
        detail,
    }
}
