//! Search and match query results

use std::fmt;

use as108m_core::Status;

/// Outcome of a search or match-by-id query
///
/// A no-match is an ordinary outcome, not an error: `status` carries the
/// confirmation code of the final protocol step so the caller can tell
/// "unmatched" from "not found in search".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Whether a fingerprint match was found
    pub matched: bool,

    /// Database page of the matched template
    pub page_id: u8,

    /// Matching score reported by the sensor
    pub score: u16,

    /// Confirmation status of the final step
    pub status: Status,
}

impl SearchResult {
    /// Create a successful match result.
    pub fn hit(page_id: u8, score: u16) -> Self {
        Self {
            matched: true,
            page_id,
            score,
            status: Status::Success,
        }
    }

    /// Create a no-match result carrying the reporting status.
    pub fn no_match(status: Status) -> Self {
        Self {
            matched: false,
            page_id: 0,
            score: 0,
            status,
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched {
            write!(f, "match[page={}, score={}]", self.page_id, self.score)
        } else {
            write!(f, "no match ({})", self.status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit() {
        let result = SearchResult::hit(7, 180);
        assert!(result.matched);
        assert_eq!(result.page_id, 7);
        assert_eq!(result.score, 180);
        assert_eq!(result.status, Status::Success);
    }

    #[test]
    fn test_no_match_keeps_status() {
        let result = SearchResult::no_match(Status::NotFound);
        assert!(!result.matched);
        assert_eq!(result.score, 0);
        assert_eq!(result.status, Status::NotFound);
    }
}
