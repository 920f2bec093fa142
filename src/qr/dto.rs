use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for QR generation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub data: Option<String>,
}

/// The rendered code as a base64 PNG data URI.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub qr_code: String,
}

/// One stored code as listed on the profile page.
#[derive(Debug, Serialize)]
pub struct QrCodeItem {
    pub id: Uuid,
    pub qr_text: String,
    pub qr_image: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_tolerates_missing_data() {
        let req: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(req.data.is_none());
    }

    #[test]
    fn list_item_exposes_timestamp_field() {
        let item = QrCodeItem {
            id: Uuid::new_v4(),
            qr_text: "hello".into(),
            qr_image: "data:image/png;base64,AAAA".into(),
            timestamp: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
        assert!(json.get("created_at").is_none());
        assert_eq!(json["qr_text"], "hello");
    }
}
