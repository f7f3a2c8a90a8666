/// Domain models for the application
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Observer position on the Earth, degrees (east and north positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObserverLocation {
    pub longitude: f64,
    pub latitude: f64,
}

/// Civil time zone used for an observer's local timestamps.
///
/// Derived from the longitude alone (the nautical zone), so it is exact on the
/// open ocean and an approximation on land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverZone {
    offset_hours: i32,
}

impl ObserverZone {
    pub fn from_longitude(longitude: f64) -> Self {
        let hours = if longitude.is_finite() {
            (longitude / 15.0).round().clamp(-12.0, 12.0) as i32
        } else {
            0
        };
        Self {
            offset_hours: hours,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// IANA `Etc` identifier; note the POSIX sign inversion (`Etc/GMT+10` is UTC-10)
    pub fn name(&self) -> String {
        match self.offset_hours.cmp(&0) {
            Ordering::Equal => "Etc/GMT".to_string(),
            Ordering::Less => format!("Etc/GMT+{}", -self.offset_hours),
            Ordering::Greater => format!("Etc/GMT-{}", self.offset_hours),
        }
    }
}

/// A point in time carried in both UTC and the observer's local civil time.
/// Equality and ordering only look at the UTC instant.
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    utc: DateTime<Utc>,
    local: DateTime<FixedOffset>,
}

impl Instant {
    pub fn new(utc: DateTime<Utc>, zone: ObserverZone) -> Self {
        Self {
            utc,
            local: utc.with_timezone(&zone.offset()),
        }
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    pub fn local(&self) -> DateTime<FixedOffset> {
        self.local
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}

/// Civil day searched for horizon events: `[date 00:00, date+1 00:00)` in the observer zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    pub date: NaiveDate,
    pub zone: ObserverZone,
}

impl LocalDay {
    /// The day named by the UTC calendar date of `at`
    pub fn containing(at: DateTime<Utc>, zone: ObserverZone) -> Self {
        Self {
            date: at.date_naive(),
            zone,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        self.date.pred_opt().map(|date| Self { date, ..*self })
    }

    pub fn next(&self) -> Option<Self> {
        self.date.succ_opt().map(|date| Self { date, ..*self })
    }

    /// UTC bounds of the window
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let midnight = self.date.and_hms_opt(0, 0, 0)?;
        let start = midnight.and_local_timezone(self.zone.offset()).single()?;
        let end = start + chrono::Duration::days(1);
        Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorialCoordinate {
    /// degrees, [0, 360)
    pub right_ascension: f64,
    /// degrees, [-90, 90]
    pub declination: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipticCoordinate {
    pub longitude: f64,
    pub latitude: f64,
    /// geocentric distance in km
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalCoordinate {
    pub altitude: f64,
    /// measured from north through east
    pub azimuth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Sun,
    Moon,
}

/// What a request is about: a body resolved by the engine, or a fixed sky position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Sun,
    Moon,
    Fixed(EquatorialCoordinate),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Sun => write!(f, "sun"),
            Target::Moon => write!(f, "moon"),
            Target::Fixed(eq) => write!(f, "ra={} dec={}", eq.right_ascension, eq.declination),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonEvent {
    Rise,
    Maximum,
    Set,
}

impl fmt::Display for HorizonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizonEvent::Rise => write!(f, "rise"),
            HorizonEvent::Maximum => write!(f, "maximum"),
            HorizonEvent::Set => write!(f, "set"),
        }
    }
}

/// Resolved occurrence of one horizon event, absent when it does not happen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventOccurrence {
    pub kind: HorizonEvent,
    pub instant: Option<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Normal,
    AlwaysAbove,
    AlwaysBelow,
}

/// Rise, maximum and set as resolved against the query instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedEvents {
    pub visibility: Visibility,
    pub rise: EventOccurrence,
    pub maximum: EventOccurrence,
    pub set: EventOccurrence,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarPhase {
    /// days since new moon
    pub age: f64,
    /// phase angle, degrees
    pub angle: f64,
    /// Moon-Sun elongation, degrees
    pub elongation: f64,
    pub fraction: f64,
    /// illuminated percentage
    pub illumination: f64,
}

/// Derived quantities evaluated at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardProperties {
    pub horizontal: HorizontalCoordinate,
    pub equatorial: EquatorialCoordinate,
    pub phase: Option<LunarPhase>,
    /// degrees; `None` below the horizon
    pub refraction: Option<f64>,
    /// `None` below the horizon
    pub airmass: Option<f64>,
    /// degrees from the Moon, generic targets only
    pub separation: Option<f64>,
}

/// An occurrence together with the properties evaluated at its own instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatedEvent {
    pub instant: Instant,
    pub properties: StandardProperties,
}

/// One sample of a target's track across the day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub instant: Instant,
    pub altitude: f64,
    pub azimuth: f64,
    pub is_rise: bool,
    pub is_set: bool,
}

/// Request parameters once resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub instant: Instant,
    pub location: ObserverLocation,
    pub zone: ObserverZone,
}

/// Everything a sky endpoint knows about one target for one request.
/// Both response contracts serialize from this.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyReport {
    pub observation: Observation,
    pub target: Target,
    pub visibility: Visibility,
    /// properties at the query instant
    pub current: StandardProperties,
    pub rise: Option<EvaluatedEvent>,
    pub maximum: Option<EvaluatedEvent>,
    pub set: Option<EvaluatedEvent>,
    pub path: Vec<PathSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwilightKind {
    Civil,
    Nautical,
    Astronomical,
}

impl TwilightKind {
    /// Solar altitude bounding this twilight, degrees
    pub fn horizon(&self) -> f64 {
        match self {
            TwilightKind::Civil => -6.0,
            TwilightKind::Nautical => -12.0,
            TwilightKind::Astronomical => -18.0,
        }
    }
}

/// Night-side interval where the Sun sits below a twilight horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwilightWindow {
    pub from: Instant,
    pub until: Instant,
}

impl TwilightWindow {
    pub fn duration_hours(&self) -> f64 {
        (self.until.utc() - self.from.utc()).num_milliseconds() as f64 * 0.001 / 3600.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwilightReport {
    pub observation: Observation,
    pub civil: Option<TwilightWindow>,
    pub nautical: Option<TwilightWindow>,
    pub astronomical: Option<TwilightWindow>,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
