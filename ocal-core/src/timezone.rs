//! Timezone lookup and attachment.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Environment variable that overrides the host timezone.
pub const TZ_ENV: &str = "OCAL_TZ";

const FALLBACK_TIMEZONE: &str = "UTC";

/// A timezone name that does not resolve to an IANA zone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown timezone: {0}")]
pub struct UnknownTimezoneError(pub String);

/// Resolve an IANA timezone name such as `Europe/Dublin`.
pub fn resolve_timezone(name: &str) -> Result<Tz, UnknownTimezoneError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| UnknownTimezoneError(name.to_string()))
}

/// Source of the timezone used when none is given explicitly.
pub trait TimezoneSource {
    fn timezone_name(&self) -> String;
}

/// `OCAL_TZ`, then the host's configured zone, then `UTC`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimezone;

impl TimezoneSource for SystemTimezone {
    fn timezone_name(&self) -> String {
        if let Ok(name) = std::env::var(TZ_ENV)
            && !name.trim().is_empty()
        {
            return name;
        }

        match iana_time_zone::get_timezone() {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(error = %e, "host timezone unavailable, using {FALLBACK_TIMEZONE}");
                FALLBACK_TIMEZONE.to_string()
            }
        }
    }
}

/// A timezone name fixed up front (configuration, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTimezone(pub String);

impl TimezoneSource for FixedTimezone {
    fn timezone_name(&self) -> String {
        self.0.clone()
    }
}

/// Name of the system timezone.
pub fn system_timezone() -> String {
    SystemTimezone.timezone_name()
}

/// Attach `tz` to a naive local timestamp.
///
/// Ambiguous local times (clocks going back) resolve to the earliest instant.
/// Local times skipped by a DST gap are moved forward by one hour.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => {
            tracing::warn!(%naive, %tz, "ambiguous local time, picking earliest");
            earliest
        }
        LocalResult::None => {
            tracing::warn!(%naive, %tz, "local time falls in a DST gap, shifting forward");
            tz.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn resolves_iana_names() {
        assert_eq!(resolve_timezone("Europe/Dublin").unwrap(), Tz::Europe__Dublin);
        assert_eq!(resolve_timezone("UTC").unwrap(), Tz::UTC);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = resolve_timezone("Not/AZone").unwrap_err();
        assert_eq!(err, UnknownTimezoneError("Not/AZone".to_string()));
        assert_eq!(err.to_string(), "Unknown timezone: Not/AZone");
    }

    #[test]
    fn fixed_timezone_returns_its_name() {
        assert_eq!(FixedTimezone("Asia/Tokyo".into()).timezone_name(), "Asia/Tokyo");
    }

    #[test]
    fn localize_plain_time() {
        let naive = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let dt = localize(&Tz::Europe__Dublin, naive);
        assert_eq!(dt.naive_local(), naive);
    }

    #[test]
    fn localize_ambiguous_picks_earliest() {
        // Clocks go back at 02:00 on 2025-10-26 in Dublin.
        let naive = NaiveDate::from_ymd_opt(2025, 10, 26)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let dt = localize(&Tz::Europe__Dublin, naive);
        assert_eq!(dt.naive_local(), naive);
        assert_eq!(dt.naive_utc().hour(), 0);
    }

    #[test]
    fn localize_gap_shifts_forward() {
        // 01:30 does not exist on 2025-03-30 in Dublin.
        let naive = NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let dt = localize(&Tz::Europe__Dublin, naive);
        assert_eq!(dt.naive_local().hour(), 2);
        assert_eq!(dt.naive_local().minute(), 30);
    }
}
