//! Page naming and the static page template.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::error::ConvertError;

/// Complete standalone page with `__TITLE__` and `__CONTENT__` slots.
pub const TEMPLATE: &str = include_str!("template.html");
pub const TITLE_TOKEN: &str = "__TITLE__";
pub const CONTENT_TOKEN: &str = "__CONTENT__";

pub const OUTPUT_EXTENSION: &str = "html";

/// `my-doc.md` -> `My Doc`, `api_v2-notes.md` -> `Api V2 Notes`.
///
/// Separators become spaces; the first letter of every run of letters is
/// upper-cased and the rest of the run lower-cased.
pub fn derive_title(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut title = String::with_capacity(stem.len());
    let mut in_word = false;
    for c in stem.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}

/// Base name of the input with its extension replaced by `.html`.
pub fn output_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}.{OUTPUT_EXTENSION}")
}

pub fn escape_html(text: &str) -> String {
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

/// Fill the template. The title goes in first so a body that mentions the
/// title token is left alone.
pub fn assemble_page(title: &str, fragment: &str) -> String {
    TEMPLATE
        .replace(TITLE_TOKEN, &escape_html(title))
        .replacen(CONTENT_TOKEN, fragment, 1)
}

/// Write a page into `output_dir`, replacing any existing file.
pub fn write_page(output_dir: &Path, output_name: &str, page: &str) -> Result<PathBuf, ConvertError> {
    let path = output_dir.join(output_name);
    fs::write(&path, page).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write page");
        ConvertError::Write {
            path: path.clone(),
            source: e,
        }
    })?;
    debug!(path = %path.display(), bytes = page.len(), "Wrote page");
    Ok(path)
}
