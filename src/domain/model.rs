use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pricing-validity interval for one product. `end` is inclusive.
/// Lower `priority` values take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub price: f64,
    pub product: i64,
    pub priority: i32,
}

impl Period {
    pub fn new(
        id: i64,
        start: NaiveDate,
        end: NaiveDate,
        price: f64,
        product: i64,
        priority: i32,
    ) -> Self {
        Self {
            id,
            start,
            end,
            price,
            product,
            priority,
        }
    }

    /// Whether both periods belong to the same product and share at least one day.
    pub fn overlaps(&self, other: &Period) -> bool {
        self.product == other.product && self.start <= other.end && other.start <= self.end
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of days covered, both bounds included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "period {} (prodnum {}, {} to {}, price {:.2}, priority {})",
            self.id,
            self.product,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            self.price,
            self.priority
        )
    }
}

/// One mutation applied by the resolution engine. `by` is the id of the winning period.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionStep {
    TrimmedEnd {
        id: i64,
        product: i64,
        priority: i32,
        old_end: NaiveDate,
        new_end: NaiveDate,
        by: i64,
    },
    Split {
        id: i64,
        product: i64,
        priority: i32,
        head_end: NaiveDate,
        tail_start: NaiveDate,
        tail_end: NaiveDate,
        by: i64,
    },
    TrimmedStart {
        id: i64,
        product: i64,
        priority: i32,
        old_start: NaiveDate,
        new_start: NaiveDate,
        by: i64,
    },
    Removed {
        removed: Period,
        by: i64,
    },
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStep::TrimmedEnd {
                id,
                product,
                priority,
                old_end,
                new_end,
                by,
            } => write!(
                f,
                "prodnum {}: period {} (priority {}) now ends {} instead of {}, yielding to period {}",
                product, id, priority, new_end, old_end, by
            ),
            ResolutionStep::Split {
                id,
                product,
                priority,
                head_end,
                tail_start,
                tail_end,
                by,
            } => write!(
                f,
                "prodnum {}: period {} (priority {}) split around period {}: head ends {}, tail runs {} to {}",
                product, id, priority, by, head_end, tail_start, tail_end
            ),
            ResolutionStep::TrimmedStart {
                id,
                product,
                priority,
                old_start,
                new_start,
                by,
            } => write!(
                f,
                "prodnum {}: period {} (priority {}) now starts {} instead of {}, after period {}",
                product, id, priority, new_start, old_start, by
            ),
            ResolutionStep::Removed { removed, by } => {
                write!(f, "removed {}, fully covered by period {}", removed, by)
            }
        }
    }
}

/// Output of a resolution run: the flattened set and the mutations that produced it.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub periods: Vec<Period>,
    pub steps: Vec<ResolutionStep>,
}

#[derive(Debug, Clone)]
pub struct FlattenResult {
    pub source_periods: Vec<Period>,
    pub flattened: Vec<Period>,
    pub steps: Vec<ResolutionStep>,
    pub rejected: Vec<Period>,
}

/// What the load phase wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub fetched: usize,
    pub flattened: usize,
    pub rejected: usize,
    pub steps: usize,
    pub log_lines: usize,
    pub csv_output: Option<String>,
}
