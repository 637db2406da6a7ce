//! Loose-text document parsing.
//!
//! Imports a plain-text document by scanning for labeled sections. Header
//! fields (title, type, subject, author, reviewer) match to the end of the
//! line; the three body sections run until the next section label. Each
//! field is searched independently over the whole text, and a missing field
//! parses as empty rather than failing the import.

use regex_lite::Regex;

use crate::document::Document;
use crate::error::{DocumentError, Result};

/// Parse a loosely structured plain-text document into the fixed field set.
pub fn parse_document(text: &str) -> Result<Document> {
    Ok(Document {
        id: String::new(),
        title: field(text, r"(?im)^title:?[ \t]*(.+?)[ \t]*$")?,
        doc_type: field(text, r"(?im)^type:?[ \t]*(.+?)[ \t]*$")?,
        subject: field(text, r"(?im)^subject:?[ \t]*(.+?)[ \t]*$")?,
        author: field(text, r"(?im)^author:?[ \t]*(.+?)[ \t]*$")?,
        reviewer: field(text, r"(?im)^reviewer:?[ \t]*(.+?)[ \t]*$")?,
        introduction: field(text, r"(?is)introduction:?\s*(.+?)(?:body:|conclusion:|\z)")?,
        body: field(text, r"(?is)body:?\s*(.+?)(?:conclusion:|\z)")?,
        conclusion: field(text, r"(?is)conclusion:?\s*(.+)\z")?,
    })
}

/// Capture the first group of `pattern` in `text`, trimmed; empty on no match.
fn field(text: &str, pattern: &str) -> Result<String> {
    let re = Regex::new(pattern).map_err(|e| DocumentError::Parse(e.to_string()))?;
    Ok(re
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default())
}
