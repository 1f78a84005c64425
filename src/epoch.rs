//! Civil and Julian date representations
use hifitime::{Epoch, Unit};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cfg::MINUTES_PER_DAY;

/// Calendar date and time of day, truncated to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CivilEpoch {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilEpoch {
    /// Converts to a [hifitime::Epoch] in UTC
    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
        )
    }
    /// Julian date of this calendar instant
    pub fn julian(&self) -> JulianDate {
        JulianDate::from_calendar(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second as f64,
        )
    }
}

impl std::fmt::Display for CivilEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02} UTC",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Julian date split in a whole part (ending in .5, midnight)
/// and a fraction of day, the way SGP4 consumes time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct JulianDate {
    /// Julian day number at the previous midnight
    pub day: f64,
    /// Elapsed fraction of day [0, 1)
    pub fraction: f64,
}

impl JulianDate {
    pub fn new(day: f64, fraction: f64) -> Self {
        Self { day, fraction }
    }
    /// Julian date from Gregorian calendar fields, valid 1900-2100.
    pub fn from_calendar(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: f64) -> Self {
        let (y, mo) = (year as f64, month as f64);
        let jd = 367.0 * y - (7.0 * (y + ((mo + 9.0) / 12.0).floor()) * 0.25).floor()
            + (275.0 * mo / 9.0).floor()
            + day as f64
            + 1_721_013.5;
        let fraction = (second + minute as f64 * 60.0 + hour as f64 * 3600.0) / 86_400.0;
        Self { day: jd, fraction }
    }
    /// Julian date of a [hifitime::Epoch]
    pub fn from_epoch(epoch: Epoch) -> Self {
        let (y, mo, d, h, mi, s, ns) = epoch.to_gregorian_utc();
        Self::from_calendar(y, mo, d, h, mi, s as f64 + ns as f64 * 1.0E-9)
    }
    /// Full (single float) julian date, loses ~10µs of resolution
    pub fn value(&self) -> f64 {
        self.day + self.fraction
    }
    /// Moves the fraction back within [0, 1)
    fn normalized(self) -> Self {
        let carry = self.fraction.floor();
        Self {
            day: self.day + carry,
            fraction: self.fraction - carry,
        }
    }
    /// Returns Self shifted by given amount of days
    pub fn add_days(&self, days: f64) -> Self {
        Self {
            day: self.day + days.trunc(),
            fraction: self.fraction + days.fract(),
        }
        .normalized()
    }
    /// Signed minutes elapsed from `reference` to Self
    pub fn minutes_since(&self, reference: &Self) -> f64 {
        ((self.day - reference.day) + (self.fraction - reference.fraction)) * MINUTES_PER_DAY
    }
    /// Converts to a [hifitime::Epoch] in UTC
    pub fn to_epoch(&self) -> Epoch {
        // julian day numbers end in .5: anchor on the civil midnight
        let midnight = Epoch::from_jde_utc(self.day);
        midnight + self.fraction * Unit::Day
    }
    /// Evenly spaced series starting at `start`, every `step` fraction of day,
    /// rolling over into the next julian day when the fraction reaches 1.
    pub fn series(start: Self, step: f64, count: usize) -> Vec<Self> {
        let mut series = Vec::with_capacity(count);
        let (mut day, mut fraction) = (start.day, start.fraction);
        for _ in 0..count {
            if fraction >= 1.0 {
                fraction -= 1.0;
                day += 1.0;
            }
            series.push(Self { day, fraction });
            fraction += step;
        }
        series
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(2021, 2, 2, 5, 36, 1.0, 2459247.5, 0.2333449074074074)]
    #[case(2023, 2, 1, 16, 23, 5.0, 2459976.5, 0.6826967592592592)]
    #[case(2000, 1, 1, 12, 0, 0.0, 2451544.5, 0.5)]
    fn calendar(
        #[case] y: i32,
        #[case] mo: u8,
        #[case] d: u8,
        #[case] h: u8,
        #[case] mi: u8,
        #[case] s: f64,
        #[case] day: f64,
        #[case] fraction: f64,
    ) {
        let jd = JulianDate::from_calendar(y, mo, d, h, mi, s);
        assert_eq!(jd.day, day);
        assert!((jd.fraction - fraction).abs() < 1.0E-12, "fraction {}", jd.fraction);
    }

    #[test]
    fn hifitime_agreement() {
        let epoch = Epoch::from_str("2023-02-01T16:23:05 UTC").unwrap();
        let jd = JulianDate::from_epoch(epoch);
        assert_eq!(jd.day, 2459976.5);
        assert!((jd.fraction - 0.6826967592592592).abs() < 1.0E-12);

        let back = jd.to_epoch();
        assert!(
            (back - epoch).abs().to_seconds() < 1.0E-3,
            "{:?} != {:?}",
            back,
            epoch
        );
    }

    #[test]
    fn day_arithmetic() {
        let jd = JulianDate::new(2459247.5, 0.75);
        let next = jd.add_days(0.5);
        assert_eq!(next.day, 2459248.5);
        assert!((next.fraction - 0.25).abs() < 1.0E-12);
        assert!((next.minutes_since(&jd) - 720.0).abs() < 1.0E-6);
        assert!((jd.minutes_since(&next) + 720.0).abs() < 1.0E-6);

        let prev = jd.add_days(-1.0);
        assert_eq!(prev.day, 2459246.5);
        assert!((prev.fraction - 0.75).abs() < 1.0E-12);
    }

    #[test]
    fn series_rollover() {
        let start = JulianDate::new(2459247.5, 0.99985);
        let series = JulianDate::series(start, 0.0001, 5);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], start);
        assert_eq!(series[1].day, 2459247.5);
        assert_eq!(series[2].day, 2459248.5);
        assert!((series[2].fraction - 0.00005).abs() < 1.0E-9);
        assert!((series[4].fraction - 0.00025).abs() < 1.0E-9);
        for pair in series.windows(2) {
            let dt = pair[1].minutes_since(&pair[0]);
            assert!((dt - 0.144).abs() < 1.0E-6, "dt {}", dt);
        }
    }

    #[test]
    fn civil_display() {
        let civil = CivilEpoch {
            year: 2021,
            month: 2,
            day: 2,
            hour: 5,
            minute: 36,
            second: 1,
        };
        assert_eq!(civil.to_string(), "2021-02-02T05:36:01 UTC");
        assert_eq!(civil.to_epoch(), Epoch::from_str("2021-02-02T05:36:01 UTC").unwrap());
        assert_eq!(civil.julian().day, 2459247.5);
    }
}
