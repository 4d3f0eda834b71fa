//! The sorted axis of distinct event dates.

use std::collections::BTreeSet;

use crate::{IsoDate, Lamp};

/// Deduplicated, ascending-sorted sequence of every distinct effective date.
///
/// Invariants: never empty (the baseline anchor is always a member), strictly
/// ascending, and every new lamp's effective date is a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAxis {
    dates: Vec<IsoDate>,
}

impl DateAxis {
    /// Collect effective dates from the new lamps, the daily-additions
    /// summary, and the baseline anchor. Never fails: with no events at all
    /// the axis is just the baseline date.
    pub fn build<'a>(
        new_lamps: &[Lamp],
        summary_dates: impl IntoIterator<Item = &'a IsoDate>,
        baseline_date: &IsoDate,
    ) -> Self {
        let mut dates = BTreeSet::new();
        dates.insert(baseline_date.clone());
        for lamp in new_lamps {
            dates.insert(lamp.effective_date(baseline_date).clone());
        }
        for date in summary_dates {
            dates.insert(date.clone());
        }

        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&IsoDate> {
        self.dates.get(index)
    }

    /// Index of the most recent date. Safe: the axis is never empty.
    pub fn last_index(&self) -> usize {
        self.dates.len() - 1
    }

    /// Membership lookup. The axis is sorted, so this is a binary search.
    pub fn index_of(&self, date: &IsoDate) -> Option<usize> {
        self.dates.binary_search(date).ok()
    }

    pub fn dates(&self) -> &[IsoDate] {
        &self.dates
    }
}
