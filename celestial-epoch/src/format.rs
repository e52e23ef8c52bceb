//! Format-code language for reading and writing epochs as text.
//!
//! A pattern is a run of code letters and literal characters. Repeating a code
//! letter sets the field width, e.g. `yyyy` or `sss`.
//!
//! | Code | Field |
//! |------|-------|
//! | `y` | year (may carry a sign) |
//! | `m` | month number |
//! | `d` | day of month |
//! | `H` | hour |
//! | `M` | minute |
//! | `S` | whole seconds |
//! | `s` | fraction of a second, one digit per letter |
//! | `D` | day of year |
//! | `t` | time scale name, resolved through the registry |
//! | `U` | month name (`January`) |
//! | `u` | abbreviated month name (`Jan`) |
//!
//! Any other character is a literal; `\` makes the next character literal.
//!
//! When parsing, a numeric field directly followed by another field is read at
//! exactly its width (`yyyymmdd`); otherwise it takes every digit available.
//! Text may stop early, and the fields it leaves out default to month and day 1
//! and midnight.
//!
//! When formatting, the fraction is rounded to the field width (at most 15
//! digits, padded with zeros beyond), carrying into the seconds: with `sss`,
//! `.1239` shows as `.124` and `23:59:59.9996` as the next second. Without a
//! fraction field the seconds are truncated.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::calendar::{self, CalendarParts, MONTH_NAMES};
use crate::epoch::Epoch;
use crate::errors::{TimeError, TimeResult};
use crate::registry;
use crate::scales::{Scale, TimeScale};

/// Default textual form, `2000-01-01T12:00:00.000`.
pub const ISO_PATTERN: &str = "yyyy-mm-ddTHH:MM:SS.sss";

/// Finest rounding an `f64` fraction of a second supports.
const MAX_ROUNDING_DIGITS: usize = 15;

static ISO: Lazy<DateFormat> = Lazy::new(|| DateFormat::compile(ISO_PATTERN));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Fraction,
    DayOfYear,
    Scale,
    MonthName,
    MonthAbbr,
}

impl Field {
    fn from_code(c: char) -> Option<Field> {
        Some(match c {
            'y' => Field::Year,
            'm' => Field::Month,
            'd' => Field::Day,
            'H' => Field::Hour,
            'M' => Field::Minute,
            'S' => Field::Second,
            's' => Field::Fraction,
            'D' => Field::DayOfYear,
            't' => Field::Scale,
            'U' => Field::MonthName,
            'u' => Field::MonthAbbr,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Field(Field, usize),
    Literal(char),
}

/// A compiled format pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFormat {
    pattern: String,
    tokens: Vec<Token>,
}

impl DateFormat {
    /// Compiles `pattern`, rejecting empty patterns and repeated fields.
    pub fn new(pattern: &str) -> TimeResult<Self> {
        let format = Self::compile(pattern);
        if format.tokens.is_empty() {
            return Err(TimeError::ParseError("empty format pattern".to_string()));
        }
        let fields: Vec<Field> = format.fields().collect();
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].contains(field) {
                return Err(TimeError::ParseError(format!(
                    "format pattern '{}' repeats the {:?} field",
                    pattern, field
                )));
            }
        }
        Ok(format)
    }

    /// The default `yyyy-mm-ddTHH:MM:SS.sss` format.
    pub fn iso() -> &'static DateFormat {
        &ISO
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn compile(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                tokens.push(Token::Literal(chars.next().unwrap_or('\\')));
                continue;
            }
            match Field::from_code(c) {
                Some(field) => {
                    let mut width = 1;
                    while chars.peek() == Some(&c) {
                        chars.next();
                        width += 1;
                    }
                    tokens.push(Token::Field(field, width));
                }
                None => tokens.push(Token::Literal(c)),
            }
        }
        Self {
            pattern: pattern.to_string(),
            tokens,
        }
    }

    fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Field(field, _) => Some(*field),
            Token::Literal(_) => None,
        })
    }

    pub(crate) fn parse_fields(&self, text: &str) -> TimeResult<ParsedFields> {
        let mut fields = ParsedFields::default();
        let mut rest = text.trim();

        for (i, token) in self.tokens.iter().enumerate() {
            if rest.is_empty() {
                break;
            }
            let (field, width) = match token {
                Token::Literal(c) => {
                    rest = rest.strip_prefix(*c).ok_or_else(|| {
                        TimeError::ParseError(format!(
                            "expected '{}' at '{}' in '{}' (format '{}')",
                            c, rest, text, self.pattern
                        ))
                    })?;
                    continue;
                }
                Token::Field(field, width) => (*field, *width),
            };
            let fixed = matches!(self.tokens.get(i + 1), Some(Token::Field(..))).then_some(width);

            rest = match field {
                Field::Year => {
                    let (sign, unsigned) = match rest.as_bytes()[0] {
                        b'-' => (-1, &rest[1..]),
                        b'+' => (1, &rest[1..]),
                        _ => (1, rest),
                    };
                    let (value, rest) = take_number(unsigned, fixed, "year")?;
                    let year = i64::try_from(value)
                        .map_err(|_| TimeError::ParseError(format!("year {} too large", value)))?;
                    fields.year = Some(sign * year);
                    rest
                }
                Field::Month => {
                    let (value, rest) = take_small(rest, fixed, "month")?;
                    fields.month = Some(value);
                    rest
                }
                Field::Day => {
                    let (value, rest) = take_small(rest, fixed, "day")?;
                    fields.day = Some(value);
                    rest
                }
                Field::Hour => {
                    let (value, rest) = take_small(rest, fixed, "hour")?;
                    fields.hour = value;
                    rest
                }
                Field::Minute => {
                    let (value, rest) = take_small(rest, fixed, "minute")?;
                    fields.minute = value;
                    rest
                }
                Field::Second => {
                    let (value, rest) = take_small(rest, fixed, "second")?;
                    fields.second = value;
                    rest
                }
                Field::Fraction => {
                    let (digits, rest) = take_digits(rest, fixed, "fraction")?;
                    fields.fraction = format!("0.{}", digits).parse().map_err(|_| {
                        TimeError::ParseError(format!("invalid fraction '{}'", digits))
                    })?;
                    rest
                }
                Field::DayOfYear => {
                    let (value, rest) = take_number(rest, fixed, "day of year")?;
                    let doy = u16::try_from(value).map_err(|_| {
                        TimeError::ParseError(format!("day of year {} out of range", value))
                    })?;
                    fields.day_of_year = Some(doy);
                    rest
                }
                Field::Scale => {
                    let (name, rest) = take_while(rest, |c| c.is_ascii_alphanumeric());
                    if name.is_empty() {
                        return Err(TimeError::ParseError(format!(
                            "expected a time scale name at '{}'",
                            rest
                        )));
                    }
                    fields.scale = Some(registry::lookup(name)?);
                    rest
                }
                Field::MonthName | Field::MonthAbbr => {
                    let (name, rest) = take_while(rest, |c| c.is_ascii_alphabetic());
                    let month = calendar::month_from_name(name).ok_or_else(|| {
                        TimeError::ParseError(format!("unknown month name '{}'", name))
                    })?;
                    fields.month = Some(month);
                    rest
                }
            };
        }

        if !rest.is_empty() {
            return Err(TimeError::ParseError(format!(
                "unexpected trailing text '{}' in '{}'",
                rest, text
            )));
        }
        Ok(fields)
    }

    pub(crate) fn format<S: TimeScale + Copy>(&self, epoch: &Epoch<S>) -> TimeResult<String> {
        let fraction_width = self
            .tokens
            .iter()
            .filter_map(|t| match t {
                Token::Field(Field::Fraction, width) => Some(*width),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        let digits = fraction_width.min(MAX_ROUNDING_DIGITS);
        let (parts, scaled) = if digits == 0 {
            (epoch.parts(), 0)
        } else {
            epoch.rounded_parts(digits as u32)?
        };

        let mut out = String::with_capacity(self.pattern.len() + 8);
        for token in &self.tokens {
            match token {
                Token::Literal(c) => out.push(*c),
                Token::Field(field, width) => {
                    write_field(&mut out, *field, *width, &parts, scaled, digits, epoch)
                }
            }
        }
        Ok(out)
    }
}

fn write_field<S: TimeScale + Copy>(
    out: &mut String,
    field: Field,
    width: usize,
    parts: &CalendarParts,
    scaled: u64,
    digits: usize,
    epoch: &Epoch<S>,
) {
    use std::fmt::Write;

    // Writing to a String cannot fail.
    let _ = match field {
        Field::Year if parts.year < 0 => write!(out, "-{:0w$}", -parts.year, w = width),
        Field::Year => write!(out, "{:0w$}", parts.year, w = width),
        Field::Month => write!(out, "{:0w$}", parts.month, w = width),
        Field::Day => write!(out, "{:0w$}", parts.day, w = width),
        Field::Hour => write!(out, "{:0w$}", parts.hour, w = width),
        Field::Minute => write!(out, "{:0w$}", parts.minute, w = width),
        Field::Second => write!(out, "{:0w$}", parts.second, w = width),
        Field::Fraction => {
            let rounded = format!("{:0w$}", scaled, w = digits);
            write!(out, "{:0<w$}", rounded, w = width)
        }
        Field::DayOfYear => write!(
            out,
            "{:0w$}",
            calendar::day_of_year(parts.year, parts.month, parts.day),
            w = width
        ),
        Field::Scale => write!(out, "{}", epoch.scale().name()),
        Field::MonthName => write!(out, "{}", MONTH_NAMES[parts.month as usize - 1]),
        Field::MonthAbbr => write!(out, "{}", &MONTH_NAMES[parts.month as usize - 1][..3]),
    };
}

fn take_while(text: &str, accept: impl Fn(char) -> bool) -> (&str, &str) {
    let end = text.find(|c: char| !accept(c)).unwrap_or(text.len());
    text.split_at(end)
}

fn take_digits<'a>(text: &'a str, fixed: Option<usize>, what: &str) -> TimeResult<(&'a str, &'a str)> {
    let available = text.bytes().take_while(u8::is_ascii_digit).count();
    let len = match fixed {
        Some(width) if available < width => {
            return Err(TimeError::ParseError(format!(
                "expected {} digits for {} at '{}'",
                width, what, text
            )))
        }
        Some(width) => width,
        None => available,
    };
    if len == 0 {
        return Err(TimeError::ParseError(format!("expected {} at '{}'", what, text)));
    }
    Ok(text.split_at(len))
}

fn take_number<'a>(text: &'a str, fixed: Option<usize>, what: &str) -> TimeResult<(u64, &'a str)> {
    let (digits, rest) = take_digits(text, fixed, what)?;
    let value = digits
        .parse()
        .map_err(|_| TimeError::ParseError(format!("{} '{}' out of range", what, digits)))?;
    Ok((value, rest))
}

fn take_small<'a>(text: &'a str, fixed: Option<usize>, what: &str) -> TimeResult<(u8, &'a str)> {
    let (value, rest) = take_number(text, fixed, what)?;
    let value = u8::try_from(value)
        .map_err(|_| TimeError::ParseError(format!("{} {} out of range", what, value)))?;
    Ok((value, rest))
}

/// Field values read from text before calendar validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ParsedFields {
    pub year: Option<i64>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub day_of_year: Option<u16>,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub fraction: f64,
    pub scale: Option<Scale>,
}

impl ParsedFields {
    pub fn date(&self) -> TimeResult<(i64, u8, u8)> {
        let year = self.year.unwrap_or(1);
        let Some(doy) = self.day_of_year else {
            return Ok((year, self.month.unwrap_or(1), self.day.unwrap_or(1)));
        };
        let (month, day) = calendar::from_day_of_year(year, doy)?;
        if self.month.map_or(false, |m| m != month) || self.day.map_or(false, |d| d != day) {
            return Err(TimeError::ParseError(format!(
                "day of year {} of {} is {:02}-{:02}, which conflicts with the month and day given",
                doy, year, month, day
            )));
        }
        Ok((year, month, day))
    }

    pub fn second(&self) -> f64 {
        self.second as f64 + self.fraction
    }
}

impl FromStr for DateFormat {
    type Err = TimeError;

    fn from_str(s: &str) -> TimeResult<Self> {
        Self::new(s)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::{TAI, TDB, TT, UTC};

    fn tt(text: &str) -> Epoch<TT> {
        text.parse().unwrap()
    }

    #[test]
    fn test_compile() {
        let format = DateFormat::new("yyyy-mm-dd\\THH").unwrap();
        assert_eq!(
            format.tokens,
            vec![
                Token::Field(Field::Year, 4),
                Token::Literal('-'),
                Token::Field(Field::Month, 2),
                Token::Literal('-'),
                Token::Field(Field::Day, 2),
                Token::Literal('T'),
                Token::Field(Field::Hour, 2),
            ]
        );
        assert!(DateFormat::new("").is_err());
        assert!(DateFormat::new("yyyy yy").is_err());
        assert_eq!("HH:MM".parse::<DateFormat>().unwrap().to_string(), "HH:MM");
    }

    #[test]
    fn test_default_format() {
        let e = tt("2000-01-01T12:00:00");
        assert_eq!(e.format(DateFormat::iso()).unwrap(), "2000-01-01T12:00:00.000");
    }

    #[test]
    fn test_fixed_width_fields() {
        let format = DateFormat::new("yyyymmddTHHMMSS").unwrap();
        let e = Epoch::parse_with_format(TT, "20240229T174501", &format).unwrap();
        assert_eq!(e.to_string(), "2024-02-29T17:45:01.000 TT");
        assert_eq!(e.format(&format).unwrap(), "20240229T174501");
    }

    #[test]
    fn test_day_of_year() {
        let format = DateFormat::new("yyyy-DDDTHH:MM").unwrap();
        let e = Epoch::parse_with_format(UTC, "2016-366T23:59", &format).unwrap();
        assert_eq!((e.month(), e.day()), (12, 31));
        assert_eq!(e.format(&format).unwrap(), "2016-366T23:59");

        let both = DateFormat::new("yyyy-mm-dd DDD").unwrap();
        assert!(Epoch::parse_with_format(UTC, "2016-12-31 366", &both).is_ok());
        assert!(matches!(
            Epoch::parse_with_format(UTC, "2016-12-30 366", &both),
            Err(TimeError::ParseError(_))
        ));
    }

    #[test]
    fn test_month_names() {
        let format = DateFormat::new("d U yyyy").unwrap();
        let e = Epoch::parse_with_format(TT, "4 July 1976", &format).unwrap();
        assert_eq!(e.month(), 7);
        assert_eq!(e.format(&format).unwrap(), "4 July 1976");

        let short = DateFormat::new("dd-u-yyyy").unwrap();
        assert_eq!(e.format(&short).unwrap(), "04-Jul-1976");
        assert!(Epoch::parse_with_format(TT, "04-Jly-1976", &short).is_err());
    }

    #[test]
    fn test_scale_field() {
        let format = DateFormat::new("yyyy-mm-dd t").unwrap();
        let e = Epoch::<Scale>::parse_with_scale("2000-01-01 TDB", &format).unwrap();
        assert_eq!(e.scale().name(), "TDB");
        assert_eq!(e.format(&format).unwrap(), "2000-01-01 TDB");

        assert!(matches!(
            Epoch::<Scale>::parse_with_scale("2000-01-01 NOPE", &format),
            Err(TimeError::UnknownScale(_))
        ));
        assert!(matches!(
            Epoch::parse_with_format(TAI, "2000-01-01 TDB", &format),
            Err(TimeError::ParseError(_))
        ));
        assert!(Epoch::parse_with_format(TDB, "2000-01-01 TDB", &format).is_ok());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        assert_eq!(tt("2010-06").to_string(), "2010-06-01T00:00:00.000 TT");
        assert_eq!(tt("2010-06-15T07").to_string(), "2010-06-15T07:00:00.000 TT");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("2010-06-15X".parse::<Epoch<TT>>(), Err(TimeError::ParseError(_))));
        assert!(matches!("2010/06/15".parse::<Epoch<TT>>(), Err(TimeError::ParseError(_))));
        assert!(matches!("2010-13-15".parse::<Epoch<TT>>(), Err(TimeError::InvalidDate { .. })));
        assert!(matches!("2010-02-30".parse::<Epoch<TT>>(), Err(TimeError::InvalidDate { .. })));
        assert!(matches!("2010-01-01T25:00".parse::<Epoch<TT>>(), Err(TimeError::ValidationError(_))));
        assert!("2010-01-01T00:00:999".parse::<Epoch<TT>>().is_err());
    }

    #[test]
    fn test_negative_year() {
        let e = tt("-0100-03-01T00:00:00");
        assert_eq!(e.year(), -100);
        assert_eq!(e.to_string(), "-0100-03-01T00:00:00.000 TT");
    }

    #[test]
    fn test_rounding_and_truncation() {
        let e = tt("2000-01-01T00:00:00.1239");
        assert_eq!(e.to_string(), "2000-01-01T00:00:00.124 TT");

        let fine = DateFormat::new("HH:MM:SS.ssssss").unwrap();
        assert_eq!(e.format(&fine).unwrap(), "00:00:00.123900");
        let coarse = DateFormat::new("HH:MM:SS").unwrap();
        assert_eq!(e.format(&coarse).unwrap(), "00:00:00");

        let e = tt("1999-12-31T23:59:59.9996");
        assert_eq!(e.to_string(), "2000-01-01T00:00:00.000 TT");
        assert_eq!(e.format(&coarse).unwrap(), "23:59:59");
    }

    #[test]
    fn test_carry_out_of_leap_second() {
        let e = Epoch::from_calendar(UTC, 2016, 12, 31, 23, 59, 60.9999).unwrap();
        assert_eq!(e.to_string(), "2017-01-01T00:00:00.000 UTC");
        let e = Epoch::from_calendar(UTC, 2016, 12, 31, 23, 59, 59.9999).unwrap();
        assert_eq!(e.to_string(), "2016-12-31T23:59:60.000 UTC");
    }

    #[test]
    fn test_leap_second_text_round_trip() {
        let e: Epoch<UTC> = "2016-12-31T23:59:60.5".parse().unwrap();
        assert!(e.is_leap_second());
        assert_eq!(e.to_string(), "2016-12-31T23:59:60.500 UTC");
    }
}
