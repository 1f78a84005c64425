//! NORAD two-line element sets
use hifitime::{Epoch, Unit};
use log::{debug, warn};
use std::{f64::consts::TAU, ops::Range, str::FromStr};

use crate::{
    cfg::{GravityModel, TwoDigitYear, SECONDS_PER_DAY},
    epoch::{CivilEpoch, JulianDate},
    kepler::Keplerian,
    Error,
};

/// Line length of a well formed TLE record (checksum included)
pub const LINE_LEN: usize = 69;

// line 1 columns
const EPOCH_YEAR: Range<usize> = 18..20;
const EPOCH_DAY: Range<usize> = 20..32;
const CATALOG_NUMBER: Range<usize> = 2..7;
const DESIGNATOR: Range<usize> = 9..17;

// line 2 columns
const INCLINATION: Range<usize> = 8..16;
const RAAN: Range<usize> = 17..25;
const ECCENTRICITY: Range<usize> = 26..33;
const ARG_PERIGEE: Range<usize> = 34..42;
const MEAN_ANOMALY: Range<usize> = 43..51;
const MEAN_MOTION: Range<usize> = 52..63;

fn malformed(line: u8, reason: impl Into<String>) -> Error {
    Error::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

/// Returns the fixed column field, or an error if the line is too short.
fn field<'a>(
    line: &'a str,
    number: u8,
    columns: Range<usize>,
    name: &str,
) -> Result<&'a str, Error> {
    let end = columns.end;
    line.get(columns).ok_or_else(|| {
        malformed(
            number,
            format!("{} field needs {} columns, line has {}", name, end, line.len()),
        )
    })
}

fn parse_field<T: FromStr>(
    line: &str,
    number: u8,
    columns: Range<usize>,
    name: &str,
) -> Result<T, Error> {
    let raw = field(line, number, columns, name)?;
    raw.trim()
        .parse::<T>()
        .map_err(|_| malformed(number, format!("invalid {} \"{}\"", name, raw)))
}

/// Parses a real valued field. "NaN" and "inf" are valid f64 literals
/// but never valid TLE content.
fn parse_real(line: &str, number: u8, columns: Range<usize>, name: &str) -> Result<f64, Error> {
    let value: f64 = parse_field(line, number, columns, name)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(malformed(number, format!("non finite {} {}", name, value)))
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn check_line_number(line: &str, number: u8) -> Result<(), Error> {
    let expected = (b'0' + number) as char;
    match line.chars().next() {
        Some(c) if c == expected => Ok(()),
        _ => Err(malformed(number, format!("should start with '{}'", expected))),
    }
}

/// Modulo 10 checksum: digits count for their value, '-' counts as 1.
pub fn checksum(line: &str) -> Option<u8> {
    let body = line.get(..LINE_LEN - 1)?;
    let sum = body
        .chars()
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum::<u32>();
    Some((sum % 10) as u8)
}

fn checksum_ok(line: &str) -> bool {
    let expected = line
        .get(LINE_LEN - 1..LINE_LEN)
        .and_then(|c| c.parse::<u8>().ok());
    expected.is_some() && checksum(line) == expected
}

/// Parses the Keplerian element set carried by line 2.
/// The semi major axis is derived from the mean motion assuming
/// unperturbed two-body motion (Kozai/Brouwer mean elements are not
/// distinguished).
pub fn parse_elements(
    line1: &str,
    line2: &str,
    gravity: &GravityModel,
) -> Result<Keplerian, Error> {
    check_line_number(line1, 1)?;
    check_line_number(line2, 2)?;

    let inc_deg = parse_real(line2, 2, INCLINATION, "inclination")?;
    let raan_deg = parse_real(line2, 2, RAAN, "raan")?;
    let ecc_digits = field(line2, 2, ECCENTRICITY, "eccentricity")?;
    let e = format!("0.{}", ecc_digits.trim())
        .parse::<f64>()
        .map_err(|_| malformed(2, format!("invalid eccentricity \"{}\"", ecc_digits)))?;
    let argp_deg = parse_real(line2, 2, ARG_PERIGEE, "argument of perigee")?;
    let ma_deg = parse_real(line2, 2, MEAN_ANOMALY, "mean anomaly")?;
    let revs_per_day = parse_real(line2, 2, MEAN_MOTION, "mean motion")?;

    if revs_per_day <= 0.0 {
        return Err(malformed(2, format!("mean motion {} rev/day", revs_per_day)));
    }

    let n = revs_per_day * TAU / SECONDS_PER_DAY;
    let a = (gravity.mu() / n.powi(2)).cbrt();

    debug!(
        "tle: n={} rev/day ({} rad/s) -> a={} m, e={}",
        revs_per_day, n, a, e
    );

    Ok(Keplerian {
        a,
        e,
        i: inc_deg.to_radians(),
        raan: raan_deg.to_radians(),
        argp: argp_deg.to_radians(),
        m: ma_deg.to_radians(),
    })
}

/// Raw (year, day of year) epoch fields of line 1
fn epoch_fields(line1: &str, policy: TwoDigitYear) -> Result<(i32, f64), Error> {
    let yy: u8 = parse_field(line1, 1, EPOCH_YEAR, "epoch year")?;
    let day_of_year = parse_real(line1, 1, EPOCH_DAY, "epoch day")?;
    let year = policy.full_year(yy);
    let days_in_year = if is_leap_year(year) { 366.0 } else { 365.0 };
    if !(1.0..days_in_year + 1.0).contains(&day_of_year) {
        return Err(malformed(
            1,
            format!("epoch day {} out of range for year {}", day_of_year, year),
        ));
    }
    Ok((year, day_of_year))
}

/// Parses the epoch of line 1 into calendar fields. Each stage is truncated,
/// never rounded, so sub-second information is dropped.
pub fn parse_epoch(line1: &str, policy: TwoDigitYear) -> Result<CivilEpoch, Error> {
    check_line_number(line1, 1)?;
    let (year, day_of_year) = epoch_fields(line1, policy)?;

    let whole_days = day_of_year.trunc();
    // TAI has no leap second: plain calendar day arithmetic
    let date = Epoch::from_gregorian_tai_at_midnight(year, 1, 1) + (whole_days - 1.0) * Unit::Day;
    let (_, month, day, _, _, _, _) = date.to_gregorian_tai();

    let fraction = day_of_year - whole_days;
    let hours = (fraction * 24.0).trunc();
    let minutes = ((fraction * 24.0 - hours) * 60.0).trunc();
    let seconds = (((fraction * 24.0 - hours) * 60.0 - minutes) * 60.0).trunc();

    Ok(CivilEpoch {
        year,
        month,
        day,
        hour: hours as u8,
        minute: minutes as u8,
        second: seconds as u8,
    })
}

/// Two line element set, optionally preceded by the object name.
#[derive(Debug, Clone, PartialEq)]
pub struct Tle {
    /// Object name (title line of the three line format)
    pub name: Option<String>,
    /// NORAD catalog number
    pub catalog_number: u32,
    /// International designator (launch year, number and piece)
    pub designator: String,
    pub(crate) line1: String,
    pub(crate) line2: String,
}

impl Tle {
    /// Builds a [Tle] from its two data lines.
    pub fn new(line1: &str, line2: &str) -> Result<Self, Error> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        check_line_number(line1, 1)?;
        check_line_number(line2, 2)?;

        for (number, line) in [(1, line1), (2, line2)] {
            if line.len() < LINE_LEN {
                return Err(malformed(
                    number,
                    format!("{} columns, expecting {}", line.len(), LINE_LEN),
                ));
            }
            if !checksum_ok(line) {
                warn!("tle line {}: checksum mismatch for \"{}\"", number, line);
            }
        }

        let catalog_number = parse_field(line1, 1, CATALOG_NUMBER, "catalog number")?;
        let designator = field(line1, 1, DESIGNATOR, "designator")?.trim().to_string();

        // make sure the fields we'll need later on are readable
        epoch_fields(line1, TwoDigitYear::default())?;

        Ok(Self {
            name: None,
            catalog_number,
            designator,
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }
    /// Copies and returns Self with given object name
    pub fn with_name(&self, name: &str) -> Self {
        let mut s = self.clone();
        s.name = Some(name.trim().to_string());
        s
    }
    pub fn line1(&self) -> &str {
        &self.line1
    }
    pub fn line2(&self) -> &str {
        &self.line2
    }
    /// Keplerian elements (see [parse_elements])
    pub fn elements(&self, gravity: &GravityModel) -> Result<Keplerian, Error> {
        parse_elements(&self.line1, &self.line2, gravity)
    }
    /// Truncated calendar epoch (see [parse_epoch])
    pub fn epoch(&self, policy: TwoDigitYear) -> Result<CivilEpoch, Error> {
        parse_epoch(&self.line1, policy)
    }
    /// Exact (non truncated) epoch as a julian date
    pub fn epoch_julian(&self, policy: TwoDigitYear) -> Result<JulianDate, Error> {
        let (year, day_of_year) = epoch_fields(&self.line1, policy)?;
        Ok(JulianDate::from_calendar(year, 1, 1, 0, 0, 0.0).add_days(day_of_year - 1.0))
    }
}

impl FromStr for Tle {
    type Err = Error;
    /// Parses the two or three line format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(|l| l.trim_end())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        match lines.as_slice() {
            [line1, line2] => Self::new(line1, line2),
            [name, line1, line2] => Ok(Self::new(line1, line2)?.with_name(name)),
            _ => Err(malformed(
                0,
                format!("expecting 2 or 3 lines, got {}", lines.len()),
            )),
        }
    }
}
