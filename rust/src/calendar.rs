//! Projection of a schedule onto calendar days.

use chrono::{Days, NaiveDate};

use crate::critical_path::Schedule;
use crate::error::ScheduleError;
use crate::models::ScheduledTask;

/// Offset `project_start` by a non-negative day count.
fn offset_date(
    project_start: NaiveDate,
    days: f64,
    task_id: &str,
) -> Result<NaiveDate, ScheduleError> {
    let out_of_range = || ScheduleError::DateOutOfRange {
        task: task_id.to_string(),
    };
    // `as u64` saturates and maps NaN to 0; reject anything it would distort
    if !days.is_finite() || days < 0.0 {
        return Err(out_of_range());
    }
    project_start
        .checked_add_days(Days::new(days as u64))
        .ok_or_else(out_of_range)
}

/// Map each task's earliest start/finish onto dates, in topological order.
///
/// Time 0 is `project_start`. Starts round down and finishes round up to whole
/// days, so a fractional task occupies every day it touches. Every day counts;
/// there is no notion of non-working time.
pub fn project_onto_calendar(
    schedule: &Schedule,
    project_start: NaiveDate,
) -> Result<Vec<ScheduledTask>, ScheduleError> {
    schedule
        .timings
        .iter()
        .map(|timing| {
            Ok(ScheduledTask {
                task_id: timing.task_id.clone(),
                start_date: offset_date(
                    project_start,
                    timing.earliest_start.floor(),
                    &timing.task_id,
                )?,
                end_date: offset_date(
                    project_start,
                    timing.earliest_finish.ceil(),
                    &timing.task_id,
                )?,
                duration_days: timing.expected_duration,
            })
        })
        .collect()
}
