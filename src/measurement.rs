//! Memory sizes and durations as they appear in GC logs.
//!
//! Sizes normalize to kilobytes by integer scaling (fractional KB truncated).
//! Durations are held in microseconds; `millis()` rounds half-up.

use crate::error_handling::MeasurementError;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, one_of, space0},
    combinator::{all_consuming, opt, recognize},
    sequence::pair,
    IResult, Parser,
};
use serde::Serialize;

/// Largest size representable, in kilobytes
pub const MAX_SIZE_KB: u64 = i32::MAX as u64;

/// Fraction digits beyond this are dropped before scaling
const MAX_FRACTION_DIGITS: usize = 12;

/// A memory size, normalized to kilobytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Size(u64);

/// Source unit of a size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    fn bytes(self) -> u128 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => 1024,
            SizeUnit::Megabytes => 1024 * 1024,
            SizeUnit::Gigabytes => 1024 * 1024 * 1024,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(SizeUnit::Bytes),
            'K' => Some(SizeUnit::Kilobytes),
            'M' => Some(SizeUnit::Megabytes),
            'G' => Some(SizeUnit::Gigabytes),
            _ => None,
        }
    }
}

impl Size {
    pub const ZERO: Size = Size(0);

    pub fn from_kilobytes(kb: u64) -> Result<Self, MeasurementError> {
        if kb > MAX_SIZE_KB {
            return Err(MeasurementError::Overflow(format!("{}K", kb)));
        }
        Ok(Size(kb))
    }

    /// Bytes truncated to whole kilobytes
    pub fn from_bytes(bytes: u64) -> Result<Self, MeasurementError> {
        Self::from_kilobytes(bytes / 1024)
    }

    /// Parse `<digits>[.<digits>]<unit>`, e.g. `102M`, `21.9M`, `1024K`, `512B`, `2GB`
    pub fn parse(input: &str) -> Result<Self, MeasurementError> {
        let trimmed = input.trim();
        let (_, (number, unit_char)) = all_consuming(size_token)
            .parse(trimmed)
            .map_err(|_| MeasurementError::Invalid(trimmed.to_string()))?;
        let unit = SizeUnit::from_char(unit_char)
            .ok_or_else(|| MeasurementError::UnknownUnit(trimmed.to_string()))?;
        Self::from_parts(number, unit).map_err(|err| match err {
            MeasurementError::Overflow(_) => MeasurementError::Overflow(trimmed.to_string()),
            other => other,
        })
    }

    /// Scale a decimal number in `unit` to kilobytes
    pub fn from_parts(number: &str, unit: SizeUnit) -> Result<Self, MeasurementError> {
        let (scaled, denominator) = decimal_parts(number)?;
        let numerator = scaled
            .checked_mul(unit.bytes())
            .ok_or_else(|| MeasurementError::Overflow(number.to_string()))?;
        let kb = numerator / (denominator * 1024);
        if kb > MAX_SIZE_KB as u128 {
            return Err(MeasurementError::Overflow(number.to_string()));
        }
        Ok(Size(kb as u64))
    }

    pub fn kilobytes(self) -> u64 {
        self.0
    }

    pub fn megabytes(self) -> f64 {
        self.0 as f64 / 1024.0
    }

    pub fn saturating_sub(self, other: Size) -> Size {
        Size(self.0.saturating_sub(other.0))
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}K", self.0)
    }
}

/// A duration with microsecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Duration {
    micros: u64,
}

/// Source unit of a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl DurationUnit {
    fn nanos(self) -> u128 {
        match self {
            DurationUnit::Seconds => 1_000_000_000,
            DurationUnit::Millis => 1_000_000,
            DurationUnit::Micros => 1_000,
            DurationUnit::Nanos => 1,
        }
    }
}

impl Duration {
    pub const ZERO: Duration = Duration { micros: 0 };

    pub fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self {
            micros: millis.saturating_mul(1000),
        }
    }

    /// Parse a duration with its unit: `0.0254200 secs`, `0.0001215 seconds`,
    /// `1.234ms`, `0.01s`, `2173 ns`. A bare integer is taken as milliseconds.
    pub fn parse(input: &str) -> Result<Self, MeasurementError> {
        let trimmed = input.trim();
        let (_, (number, unit)) = all_consuming(duration_token)
            .parse(trimmed)
            .map_err(|_| MeasurementError::Invalid(trimmed.to_string()))?;
        let unit = match unit {
            Some(unit) => unit,
            None if !number.contains(&['.', ','][..]) => DurationUnit::Millis,
            None => return Err(MeasurementError::UnknownUnit(trimmed.to_string())),
        };
        Self::from_parts(number, unit)
    }

    /// Scale a decimal number in `unit` to microseconds, rounding half-up
    pub fn from_parts(number: &str, unit: DurationUnit) -> Result<Self, MeasurementError> {
        let (scaled, denominator) = decimal_parts(number)?;
        let nanos_scaled = scaled
            .checked_mul(unit.nanos())
            .ok_or_else(|| MeasurementError::Overflow(number.to_string()))?;
        let divisor = denominator * 1000;
        let micros = (nanos_scaled + divisor / 2) / divisor;
        if micros > u64::MAX as u128 {
            return Err(MeasurementError::Overflow(number.to_string()));
        }
        Ok(Self {
            micros: micros as u64,
        })
    }

    pub fn micros(self) -> u64 {
        self.micros
    }

    /// Milliseconds, rounded half-up
    pub fn millis(self) -> u64 {
        self.micros.saturating_add(500) / 1000
    }

    pub fn as_secs_f64(self) -> f64 {
        self.micros as f64 / 1_000_000.0
    }

    pub fn saturating_add(self, other: Duration) -> Duration {
        Duration {
            micros: self.micros.saturating_add(other.micros),
        }
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        self.saturating_add(rhs)
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, |acc, d| acc + d)
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:03}ms", self.micros / 1000, self.micros % 1000)
    }
}

/// `123`, `123.456`, or `123,456` (some locales print a comma)
fn decimal_number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(one_of(".,"), digit1)))).parse(input)
}

fn size_token(input: &str) -> IResult<&str, (&str, char)> {
    let (input, number) = decimal_number(input)?;
    let (input, unit) = one_of("BbKkMmGg").parse(input)?;
    // `KB`, `MB`, `GB`
    let (input, _) = if unit.eq_ignore_ascii_case(&'b') {
        (input, None)
    } else {
        opt(one_of("Bb")).parse(input)?
    };
    Ok((input, (number, unit)))
}

fn duration_unit(input: &str) -> IResult<&str, DurationUnit> {
    alt((
        tag("seconds").map(|_| DurationUnit::Seconds),
        tag("secs").map(|_| DurationUnit::Seconds),
        tag("sec").map(|_| DurationUnit::Seconds),
        tag("ms").map(|_| DurationUnit::Millis),
        tag("us").map(|_| DurationUnit::Micros),
        tag("ns").map(|_| DurationUnit::Nanos),
        tag("s").map(|_| DurationUnit::Seconds),
    ))
    .parse(input)
}

fn duration_token(input: &str) -> IResult<&str, (&str, Option<DurationUnit>)> {
    let (input, number) = decimal_number(input)?;
    let (input, _) = space0(input)?;
    let (input, unit) = opt(duration_unit).parse(input)?;
    Ok((input, (number, unit)))
}

/// Split a decimal string into (digits as integer, 10^fraction_len)
fn decimal_parts(number: &str) -> Result<(u128, u128), MeasurementError> {
    let (int_part, frac_part) = match number.find(&['.', ','][..]) {
        Some(pos) => (&number[..pos], &number[pos + 1..]),
        None => (number, ""),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MeasurementError::Invalid(number.to_string()));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MeasurementError::Invalid(number.to_string()));
    }
    let frac_part = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];

    let int_value: u128 = int_part
        .parse()
        .map_err(|_| MeasurementError::Overflow(number.to_string()))?;
    let denominator = 10u128.pow(frac_part.len() as u32);
    let frac_value: u128 = if frac_part.is_empty() {
        0
    } else {
        frac_part
            .parse()
            .map_err(|_| MeasurementError::Invalid(number.to_string()))?
    };
    let scaled = int_value
        .checked_mul(denominator)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| MeasurementError::Overflow(number.to_string()))?;
    Ok((scaled, denominator))
}
