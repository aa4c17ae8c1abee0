//! Path id parsing

use blog_core::{BlogError, Result};

/// Parse a path segment as an entity id.
///
/// A segment that is not an integer can never name an entity, so it is
/// reported as `NotFound` rather than a bad request.
pub fn parse_id(entity: &'static str, raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| BlogError::not_found(entity, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("Post", "12").unwrap(), 12);
        assert_eq!(
            parse_id("Post", "abc").unwrap_err(),
            BlogError::not_found("Post", "abc")
        );
    }
}
