use uuid::Uuid;

use crate::error::ApiError;

/// Parses an opaque identifier taken from a path or query segment.
///
/// Every component funnels raw id strings through here so a malformed id is
/// always `InvalidId` (400), distinct from a well-formed id that misses
/// (`NotFound`).
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn malformed_id_is_invalid_id_not_not_found() {
        for raw in ["", "abc", "12345", "not-a-uuid-at-all"] {
            assert!(matches!(parse_id(raw), Err(ApiError::InvalidId)));
        }
    }
}
