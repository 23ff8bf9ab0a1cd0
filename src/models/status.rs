//! Reading status enumeration. The variants describe the user's relationship
//! with a book and are persisted as small integer codes; the raw code never
//! leaves the storage boundary.

use std::fmt;

/// The five states a book can be in, from queued to abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingStatus {
    /// In the reading queue but not started.
    #[default]
    ToRead,
    /// Currently being read.
    Reading,
    /// Finished.
    Completed,
    /// Abandoned partway through.
    DidNotFinish,
    /// Not yet acquired; wanted for the future.
    Wishlist,
}

impl ReadingStatus {
    /// Integer code used in the `status` column.
    pub fn code(self) -> i64 {
        match self {
            Self::ToRead => 0,
            Self::Reading => 1,
            Self::Completed => 2,
            Self::DidNotFinish => 3,
            Self::Wishlist => 4,
        }
    }

    /// Decode a stored code. Anything outside 0..=4 falls back to `ToRead`
    /// so a damaged row still hydrates into a usable entity.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Reading,
            2 => Self::Completed,
            3 => Self::DidNotFinish,
            4 => Self::Wishlist,
            _ => Self::ToRead,
        }
    }

    /// Every status in code order. Handy for callers that render pickers.
    pub fn all() -> [ReadingStatus; 5] {
        [
            Self::ToRead,
            Self::Reading,
            Self::Completed,
            Self::DidNotFinish,
            Self::Wishlist,
        ]
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ToRead => "To Read",
            Self::Reading => "Reading",
            Self::Completed => "Completed",
            Self::DidNotFinish => "Did Not Finish",
            Self::Wishlist => "Wishlist",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for status in ReadingStatus::all() {
            assert_eq!(ReadingStatus::from_code(status.code()), status);
        }
    }

    #[test]
    fn out_of_range_codes_decode_to_to_read() {
        assert_eq!(ReadingStatus::from_code(-1), ReadingStatus::ToRead);
        assert_eq!(ReadingStatus::from_code(5), ReadingStatus::ToRead);
        assert_eq!(ReadingStatus::from_code(i64::MAX), ReadingStatus::ToRead);
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(ReadingStatus::DidNotFinish.to_string(), "Did Not Finish");
        assert_eq!(ReadingStatus::ToRead.to_string(), "To Read");
    }
}
