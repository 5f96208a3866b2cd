//! `TimestampSet`: an ordered sequence of strictly increasing timestamps.

use crate::error::{ChronoError, Result};
use crate::time::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampSet {
    timestamps: Vec<Timestamp>,
}

impl TimestampSet {
    pub fn new(timestamps: Vec<Timestamp>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(ChronoError::normal_form("TimestampSet must be non-empty"));
        }
        for w in timestamps.windows(2) {
            if w[0] >= w[1] {
                return Err(ChronoError::normal_form(
                    "TimestampSet timestamps must be strictly increasing",
                ));
            }
        }
        Ok(Self { timestamps })
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        self.timestamps.binary_search(&t).is_ok()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
