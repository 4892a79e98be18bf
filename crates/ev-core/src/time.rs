//! Time point / time range model.
//!
//! The dashboard keeps one notion of "when": a single instant anchoring map
//! queries (the *point*) and a start/end pair anchoring chart queries (the
//! *range*). The range span is always kept within [`min_span`]..=[`max_span`].
//!
//! Transitions consume the selection and return the next one; nothing here
//! rejects input. Admission checks (future picks, data floors) live in
//! [`TimeBounds`] and run at the caller before a transition is applied.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::{CoreError, CoreResult};

/// Instant on the UTC timeline.
pub type Instant = DateTime<Utc>;

/// Shortest allowed chart window.
pub fn min_span() -> Duration {
    Duration::days(1)
}

/// Longest allowed chart window.
pub fn max_span() -> Duration {
    Duration::days(30)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    pub start: Instant,
    pub end: Instant,
}

impl TimeRange {
    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Clamp `end` so that `end - start` lies within one to thirty days.
///
/// `start` is never moved unless the clamped end would run past the last
/// representable instant, in which case the window is pinned to it. An `end`
/// before `start` counts as a too-short window and is pushed to
/// `start + 1 day`.
pub fn clamp_range(start: Instant, end: Instant) -> TimeRange {
    let span = end - start;
    let span = if span < min_span() {
        min_span()
    } else if span > max_span() {
        max_span()
    } else {
        return TimeRange { start, end };
    };
    match start.checked_add_signed(span) {
        Some(end) => TimeRange { start, end },
        None => window_ending_at(Instant::MAX_UTC, span),
    }
}

/// `[end - span, end]`, pinned to the first representable instant when
/// `end - span` underflows.
fn window_ending_at(end: Instant, span: Duration) -> TimeRange {
    match end.checked_sub_signed(span) {
        Some(start) => TimeRange { start, end },
        None => {
            let start = Instant::MIN_UTC;
            let end = start.checked_add_signed(span).unwrap_or(Instant::MAX_UTC);
            TimeRange { start, end }
        }
    }
}

/// Canonical time selection shared by map and chart consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSelection {
    /// Anchor for map-marker queries.
    pub point: Instant,
    /// Anchor for chart queries.
    pub range: TimeRange,
}

impl TimeSelection {
    /// Default selection: `point = now`, `range = [now - 1 day, now]`.
    ///
    /// Within a day of the start of the timeline the range becomes the first
    /// representable day.
    pub fn anchored_at(now: Instant) -> Self {
        Self {
            point: now,
            range: window_ending_at(now, min_span()),
        }
    }

    /// Map flow: set the point and rebuild the range as the day before it.
    #[must_use]
    pub fn set_point(self, instant: Instant) -> Self {
        Self::anchored_at(instant)
    }

    /// Move the range start, clamp against the current end, point follows the
    /// clamped end.
    #[must_use]
    pub fn set_range_start(self, instant: Instant) -> Self {
        let range = clamp_range(instant, self.range.end);
        Self {
            point: range.end,
            range,
        }
    }

    /// Move the range end and clamp, but keep the literal pick as the point.
    ///
    /// After this `point` may differ from `range.end`.
    #[must_use]
    pub fn set_range_end(self, instant: Instant) -> Self {
        let range = clamp_range(self.range.start, instant);
        Self {
            point: instant,
            range,
        }
    }

    /// Replace both ends at once; point follows the clamped end.
    #[must_use]
    pub fn set_range(self, start: Instant, end: Instant) -> Self {
        let range = clamp_range(start, end);
        Self {
            point: range.end,
            range,
        }
    }
}

/// Admission rules applied to user picks before they reach the model.
///
/// Picks later than "now" are refused, as are starts before
/// `earliest_start` and ends (or points) before `earliest_end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub earliest_start: Option<Instant>,
    pub earliest_end: Option<Instant>,
}

impl TimeBounds {
    pub fn admit_start(&self, candidate: Instant, now: Instant) -> CoreResult<()> {
        not_after(candidate, now, "start is later than now")?;
        not_before(candidate, self.earliest_start, "start precedes available data")
    }

    pub fn admit_end(&self, candidate: Instant, now: Instant) -> CoreResult<()> {
        not_after(candidate, now, "end is later than now")?;
        not_before(candidate, self.earliest_end, "end precedes available data")
    }

    pub fn admit_point(&self, candidate: Instant, now: Instant) -> CoreResult<()> {
        not_after(candidate, now, "time point is later than now")?;
        not_before(candidate, self.earliest_end, "time point precedes available data")
    }
}

fn not_after(candidate: Instant, now: Instant, what: &'static str) -> CoreResult<()> {
    if candidate > now {
        return Err(CoreError::TimeOutOfBounds {
            what,
            instant: to_wire(candidate),
        });
    }
    Ok(())
}

fn not_before(candidate: Instant, floor: Option<Instant>, what: &'static str) -> CoreResult<()> {
    match floor {
        Some(floor) if candidate < floor => Err(CoreError::TimeOutOfBounds {
            what,
            instant: to_wire(candidate),
        }),
        _ => Ok(()),
    }
}

/// Render an instant the way the backend expects: `YYYY-MM-DDTHH:MM:SSZ`.
pub fn to_wire(instant: Instant) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse the datetime spellings seen at the dashboard's edges.
///
/// Offsets are honoured; strings without one are taken as UTC. A bare date
/// means midnight UTC.
pub fn parse_instant(input: &str) -> CoreResult<Instant> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(CoreError::InvalidDateTime {
        input: input.to_string(),
    })
}
