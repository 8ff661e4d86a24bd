//! Repository layer for the in-memory book store

pub mod books;

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

/// Source of record timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Wall clock truncated to the millisecond precision records are served with
pub fn system_clock() -> Clock {
    Arc::new(|| Utc::now().trunc_subsecs(3))
}

/// Main repository struct holding every store
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create an empty repository
    pub fn new(id_length: usize) -> Self {
        Self::with_clock(id_length, system_clock())
    }

    pub fn with_clock(id_length: usize, clock: Clock) -> Self {
        Self {
            books: books::BooksRepository::new(id_length, clock),
        }
    }
}
