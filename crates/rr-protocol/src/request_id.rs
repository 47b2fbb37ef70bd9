//! Request identifier type

use std::fmt;

/// Correlation token chosen by the client and echoed by the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub i32);

impl RequestId {
    /// Id the peer answers with when authentication is rejected
    pub const AUTH_FAILED: RequestId = RequestId(-1);

    /// First id handed out on a fresh connection
    pub const FIRST: RequestId = RequestId(1);

    /// Create a new request ID
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// The id following this one, wrapping back to [`RequestId::FIRST`]
    /// instead of overflowing into zero or negative values.
    pub fn next(self) -> Self {
        match self.0.checked_add(1) {
            Some(n) if n > 0 => Self(n),
            _ => Self::FIRST,
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

impl From<i32> for RequestId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_display() {
        assert_eq!(format!("{}", RequestId::new(42)), "req-42");
    }

    #[test]
    fn test_next_increments() {
        assert_eq!(RequestId::new(7).next(), RequestId::new(8));
    }

    #[test]
    fn test_next_wraps_on_overflow() {
        assert_eq!(RequestId::new(i32::MAX).next(), RequestId::FIRST);
    }

    #[test]
    fn test_next_never_yields_sentinel() {
        assert_eq!(RequestId::AUTH_FAILED.next(), RequestId::FIRST);
        assert_eq!(RequestId::new(0).next(), RequestId::FIRST);
    }
}
