#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
use chrono::SecondsFormat;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Document types the embedding service accepts. Enforced client-side, before
/// any bytes leave the machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Option<DocumentKind> {
        let extension = match file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => return None,
        };

        match extension.as_str() {
            "pdf" => return Some(DocumentKind::Pdf),
            "docx" => return Some(DocumentKind::Docx),
            "txt" => return Some(DocumentKind::Text),
            _ => return None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => return "application/pdf",
            DocumentKind::Docx => {
                return "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Text => return "text/plain",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub file_name: String,
    pub file_type: String,
    pub file_size: usize,
    pub upload_date: String,
}

impl DocumentMetadata {
    pub fn describe(file_name: &str, kind: DocumentKind, file_size: usize) -> DocumentMetadata {
        return DocumentMetadata {
            file_name: file_name.to_string(),
            file_type: kind.mime().to_string(),
            file_size,
            upload_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
    }
}
