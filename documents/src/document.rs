//! The document type and its canonical text rendering.

use serde::{Deserialize, Serialize};

/// A user-written example document.
///
/// Documents carry a fixed set of named fields, any of which may be empty.
/// The id is the JSON file name the document was loaded from, unique within
/// the corpus, and is not part of the serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Unique identifier within the corpus (the source file name).
    #[serde(skip)]
    pub id: String,

    /// Document title.
    pub title: String,

    /// Document type (essay, report, lab practice, ...).
    #[serde(rename = "type")]
    pub doc_type: String,

    /// Subject or course the document belongs to.
    pub subject: String,

    /// Who wrote the document.
    pub author: String,

    /// Who the document was written for.
    pub reviewer: String,

    /// Opening section.
    pub introduction: String,

    /// Main section.
    pub body: String,

    /// Closing section.
    pub conclusion: String,
}

impl Document {
    /// Render the document as one comparable text blob.
    ///
    /// The labels and their order are a compatibility contract: cached
    /// embeddings are computed from this rendering, so it must stay stable
    /// across implementations. Empty fields render as empty values rather
    /// than being omitted.
    pub fn canonical_text(&self) -> String {
        let parts = [
            format!("Title: {}", self.title),
            format!("Type: {}", self.doc_type),
            format!("Subject: {}", self.subject),
            format!("Author: {}", self.author),
            format!("Reviewer: {}", self.reviewer),
            format!("Introduction: {}", self.introduction),
            format!("Body: {}", self.body),
            format!("Conclusion: {}", self.conclusion),
        ];
        parts.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_text_all_empty() {
        let text = Document::default().canonical_text();
        assert_eq!(
            text,
            "Title: \n\nType: \n\nSubject: \n\nAuthor: \n\nReviewer: \
             \n\nIntroduction: \n\nBody: \n\nConclusion: "
        );
    }

    #[test]
    fn test_canonical_text_field_order() {
        let document = Document {
            title: "Design Patterns in Java".to_string(),
            doc_type: "practice".to_string(),
            conclusion: "Patterns help.".to_string(),
            ..Default::default()
        };

        let text = document.canonical_text();
        let title_pos = text.find("Title:").unwrap();
        let type_pos = text.find("Type:").unwrap();
        let conclusion_pos = text.find("Conclusion:").unwrap();
        assert!(title_pos < type_pos && type_pos < conclusion_pos);
        assert!(text.contains("Title: Design Patterns in Java"));
        assert!(text.contains("Conclusion: Patterns help."));
    }

    #[test]
    fn test_id_not_serialized() {
        let document = Document {
            id: "doc.json".to_string(),
            title: "A title".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&document).unwrap();
        assert!(!json.contains("doc.json"));

        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "");
        assert_eq!(parsed.title, "A title");
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let parsed: Document = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(parsed.title, "Only a title");
        assert_eq!(parsed.body, "");
    }
}
