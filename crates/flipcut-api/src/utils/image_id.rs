use flipcut_core::AppError;
use uuid::Uuid;

/// Parse an image id taken from the path.
///
/// Ids are only ever issued by the upload handler, so anything that is not a
/// UUID names an image that does not exist.
pub fn parse_image_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Image not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_issued_ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_image_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = parse_image_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Image not found"));
    }
}
