//! Boundary to the external multimodal extraction service. The domain layer
//! only sees the [`KycExtractor`] / [`IdCardExtractor`] traits and the
//! partially-filled result types; [`gemini`] provides the production
//! implementation.

pub mod gemini;
mod prompts;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::review::domain::FieldsConfidence;

/// Image payload handed to an extractor: base64-encoded bytes plus the MIME
/// type the bytes were read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: BASE64.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Wrap already-encoded data, e.g. a payload pasted into the HTTP API.
    pub fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Partially-filled KYC record returned by the collaborator. Every field is
/// optional; the reconciliation controller merges what is present over a
/// freshly-seeded default record. The collaborator may also return its own
/// sheet row, which is deserialized but never trusted; the rows are always
/// recomputed locally.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KycExtraction {
    pub date: Option<String>,
    pub auditor: Option<String>,
    pub member_id: Option<String>,
    pub name: Option<String>,
    pub remark_raw: Option<String>,
    pub remark_normalized: Option<String>,
    pub kyc_status: Option<String>,
    pub confidence: Option<f32>,
    pub fields_confidence: Option<FieldsConfidence>,
    pub notes: Option<String>,
    #[serde(default)]
    pub csv_row: Option<String>,
}

/// Fields read off an ID card. Dates are requested as `YYYY-MM-DD`; anything
/// unreadable comes back as null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdCardExtraction {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub id_number: Option<String>,
    pub date_of_expiry: Option<String>,
}

/// Failure at the extraction boundary. All variants are retryable by
/// re-submitting the image; the controller converts them to a single display
/// string and never lets them escape further.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction request failed: {0}")]
    Transport(String),
    #[error("extraction service returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("extraction response was not valid JSON: {0}")]
    Malformed(String),
    #[error("extraction response contained no candidates")]
    Empty,
}

/// Collaborator turning a KYC review screenshot into a partial record.
pub trait KycExtractor: Send + Sync {
    fn extract_kyc(&self, image: &EncodedImage) -> Result<KycExtraction, ExtractionError>;
}

/// Collaborator reading the fields of an ID card photo.
pub trait IdCardExtractor: Send + Sync {
    fn extract_id_card(&self, image: &EncodedImage) -> Result<IdCardExtraction, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kyc_extraction_accepts_partial_payloads() {
        let parsed: KycExtraction = serde_json::from_str(
            r#"{"member_id":"882211","remark_raw":"ID expired po","remark_normalized":"EXPIRED VALID ID","confidence":0.92}"#,
        )
        .expect("partial payload parses");
        assert_eq!(parsed.member_id.as_deref(), Some("882211"));
        assert_eq!(parsed.date, None);
        assert_eq!(parsed.csv_row, None);
    }

    #[test]
    fn id_card_extraction_uses_camel_case_keys() {
        let parsed: IdCardExtraction = serde_json::from_str(
            r#"{"name":"MANUEL JR VILLARMOSA NIEDO","dateOfBirth":"1971-12-21","idNumber":"D06-20-015979","dateOfExpiry":"2034-12-21"}"#,
        )
        .expect("payload parses");
        assert_eq!(parsed.date_of_birth.as_deref(), Some("1971-12-21"));
        assert_eq!(parsed.id_number.as_deref(), Some("D06-20-015979"));
    }

    #[test]
    fn encoded_image_round_trips_bytes() {
        let image = EncodedImage::from_bytes(b"\x89PNG", "image/png");
        assert_eq!(image.data, "iVBORw==");
        assert_eq!(image.mime_type, "image/png");
    }
}
