//! Root and extremum search over sampled altitude curves.

use chrono::{DateTime, Duration, Utc};

use super::{EphemerisError, EphemerisResult};

/// Coarse sampling step for all searches
pub const STEP_SECONDS: i64 = 600;

const MAX_BISECTIONS: usize = 48;
const MAX_TERNARY_STEPS: usize = 80;

/// First upward and first downward zero crossing of `f` inside `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Crossings {
    pub ascending: Option<DateTime<Utc>>,
    pub descending: Option<DateTime<Utc>>,
}

pub fn shift(at: DateTime<Utc>, seconds: f64) -> EphemerisResult<DateTime<Utc>> {
    at.checked_add_signed(Duration::milliseconds((seconds * 1000.0).round() as i64))
        .ok_or(EphemerisError::InvalidInstant)
}

/// Sample instants from `start` to `end` inclusive, `STEP_SECONDS` apart
pub fn sample_times(start: DateTime<Utc>, end: DateTime<Utc>) -> EphemerisResult<Vec<DateTime<Utc>>> {
    if end <= start {
        return Err(EphemerisError::InvalidInterval);
    }
    let span = (end - start).num_seconds();
    let steps = (span + STEP_SECONDS - 1) / STEP_SECONDS;
    let mut times = Vec::with_capacity(steps as usize + 1);
    for i in 0..steps {
        times.push(shift(start, (i * STEP_SECONDS) as f64)?);
    }
    times.push(end);
    Ok(times)
}

/// Locate the first ascending and descending zero crossings of `f`, refined
/// by bisection to the nearest second
pub fn find_crossings<F>(start: DateTime<Utc>, end: DateTime<Utc>, f: F) -> EphemerisResult<Crossings>
where
    F: Fn(DateTime<Utc>) -> EphemerisResult<f64>,
{
    let times = sample_times(start, end)?;
    let values = times.iter().map(|t| f(*t)).collect::<EphemerisResult<Vec<_>>>()?;

    let mut crossings = Crossings::default();
    for i in 0..times.len() - 1 {
        let (a, b) = (values[i], values[i + 1]);
        if crossings.ascending.is_none() && a < 0.0 && b >= 0.0 {
            crossings.ascending = Some(bisect(times[i], times[i + 1], a, &f)?);
        }
        if crossings.descending.is_none() && a >= 0.0 && b < 0.0 {
            crossings.descending = Some(bisect(times[i], times[i + 1], a, &f)?);
        }
        if crossings.ascending.is_some() && crossings.descending.is_some() {
            break;
        }
    }
    Ok(crossings)
}

fn bisect<F>(
    mut lo: DateTime<Utc>,
    mut hi: DateTime<Utc>,
    f_lo: f64,
    f: &F,
) -> EphemerisResult<DateTime<Utc>>
where
    F: Fn(DateTime<Utc>) -> EphemerisResult<f64>,
{
    let lo_sign = f_lo >= 0.0;
    for _ in 0..MAX_BISECTIONS {
        let span = (hi - lo).num_milliseconds();
        if span <= 2 {
            return round_to_second(lo + Duration::milliseconds(span / 2));
        }
        let mid = lo + Duration::milliseconds(span / 2);
        if (f(mid)? >= 0.0) == lo_sign {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(EphemerisError::NoConvergence("horizon crossing"))
}

/// Instant of the largest value of `f` in `[start, end]`
pub fn find_maximum<F>(start: DateTime<Utc>, end: DateTime<Utc>, f: F) -> EphemerisResult<(DateTime<Utc>, f64)>
where
    F: Fn(DateTime<Utc>) -> EphemerisResult<f64>,
{
    let times = sample_times(start, end)?;
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, t) in times.iter().enumerate() {
        let v = f(*t)?;
        if v > best_value {
            best = i;
            best_value = v;
        }
    }

    let mut lo = times[best.saturating_sub(1)];
    let mut hi = times[(best + 1).min(times.len() - 1)];
    for _ in 0..MAX_TERNARY_STEPS {
        let span = (hi - lo).num_milliseconds();
        if span <= 2 {
            let at = round_to_second(lo + Duration::milliseconds(span / 2))?;
            let at = at.clamp(start, end);
            return Ok((at, f(at)?));
        }
        let m1 = lo + Duration::milliseconds(span / 3);
        let m2 = hi - Duration::milliseconds(span / 3);
        if f(m1)? < f(m2)? {
            lo = m1;
        } else {
            hi = m2;
        }
    }
    Err(EphemerisError::NoConvergence("maximum altitude"))
}

fn round_to_second(at: DateTime<Utc>) -> EphemerisResult<DateTime<Utc>> {
    let carry = i64::from(at.timestamp_subsec_millis() >= 500);
    DateTime::from_timestamp(at.timestamp() + carry, 0).ok_or(EphemerisError::InvalidInstant)
}
