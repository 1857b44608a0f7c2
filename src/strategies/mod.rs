//! Concrete extraction strategies.
//!
//! Each strategy is a self-contained pass implementing `TagStrategy`:
//! - `DateTimeStrategy` — dates, times, ranges, ordinal weekday phrases
//! - `PriorityStrategy` — priority markers and keywords
//! - `EntityStrategy` — locations, people, projects, category labels
//!
//! Strategies run against the same read-only buffer and never see each
//! other's output; reconciling their overlapping detections is the
//! resolver's job.

pub mod datetime;
pub mod entity;
pub mod priority;

pub use datetime::DateTimeStrategy;
pub use entity::EntityStrategy;
pub use priority::PriorityStrategy;
