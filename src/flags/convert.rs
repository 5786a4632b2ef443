//! Conversion of raw config and environment values into typed flag values.

use super::{FlagKind, FlagValue};
use crate::config::ConfigValue;
use std::time::Duration;

impl FlagKind {
    /// Parses a value given as text, as on the command line or in an
    /// environment variable. Lists are comma separated.
    pub fn parse_str(self, raw: &str) -> Result<FlagValue, String> {
        Ok(match self {
            Self::String => FlagValue::String(raw.to_owned()),
            Self::Bool => FlagValue::Bool(parse_bool(raw)?),
            Self::Int => FlagValue::Int(parse_num(raw.trim())?),
            Self::Uint => FlagValue::Uint(parse_num(raw.trim())?),
            Self::Float => FlagValue::Float(parse_num(raw.trim())?),
            Self::Duration => FlagValue::Duration(parse_duration(raw.trim())?),
            Self::StringList => {
                FlagValue::StringList(raw.split(',').map(|s| s.trim().to_owned()).collect())
            }
            Self::IntList => FlagValue::IntList(
                raw.split(',')
                    .map(|s| parse_num(s.trim()))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// Converts a value read from a defaults file.
    pub fn from_config(self, value: &ConfigValue) -> Result<FlagValue, String> {
        match (self, value) {
            (Self::String, ConfigValue::String(_) | ConfigValue::Number(_) | ConfigValue::Bool(_)) => {
                config_string(value).map(FlagValue::String)
            }
            (Self::Bool, ConfigValue::Bool(b)) => Ok(FlagValue::Bool(*b)),
            (Self::Int, ConfigValue::Number(_)) => config_int(value).map(FlagValue::Int),
            (Self::Uint, ConfigValue::Number(n)) => n
                .as_u64()
                .map(FlagValue::Uint)
                .ok_or_else(|| format!("{n} is not an unsigned integer")),
            (Self::Float, ConfigValue::Number(n)) => n
                .as_f64()
                .map(FlagValue::Float)
                .ok_or_else(|| format!("{n} is not a number")),
            (Self::StringList, ConfigValue::String(s)) => Ok(FlagValue::StringList(vec![s.clone()])),
            (Self::StringList, ConfigValue::List(items)) => items
                .iter()
                .map(config_string)
                .collect::<Result<_, _>>()
                .map(FlagValue::StringList),
            (Self::IntList, ConfigValue::Number(_)) => {
                config_int(value).map(|n| FlagValue::IntList(vec![n]))
            }
            (Self::IntList, ConfigValue::List(items)) => items
                .iter()
                .map(config_int)
                .collect::<Result<_, _>>()
                .map(FlagValue::IntList),
            // Text forms go through the same parser as the environment.
            (Self::Bool | Self::Int | Self::Uint | Self::Float | Self::Duration, ConfigValue::String(s)) => {
                self.parse_str(s)
            }
            (kind, value) => Err(format!("a {} cannot set a {kind:?} flag", value.kind())),
        }
    }
}

fn config_string(value: &ConfigValue) -> Result<String, String> {
    match value {
        ConfigValue::String(s) => Ok(s.clone()),
        ConfigValue::Number(n) => Ok(n.to_string()),
        ConfigValue::Bool(b) => Ok(b.to_string()),
        ConfigValue::List(_) => Err("nested lists cannot set a flag".into()),
    }
}

fn config_int(value: &ConfigValue) -> Result<i64, String> {
    match value {
        ConfigValue::Number(n) => n.as_i64().ok_or_else(|| format!("{n} is not an integer")),
        ConfigValue::String(s) => parse_num(s.trim()),
        other => Err(format!("a {} cannot set an integer", other.kind())),
    }
}

fn parse_num<T: std::str::FromStr>(raw: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| err.to_string())
}

/// Accepts the same spellings as Go's `strconv.ParseBool`.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(format!("'{other}' is not a boolean")),
    }
}

/// Parses durations such as `300ms`, `1.5h` or `2h45m`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. Negative
/// durations are rejected.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration '{raw}'");

    let mut rest = raw.strip_prefix('+').unwrap_or(raw);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after) = split_digits(rest);
        let (frac, after) = match after.strip_prefix('.') {
            Some(after) => split_digits(after),
            None => ("", after),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }

        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_end);
        let unit_nanos: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(format!("missing unit in duration '{raw}'")),
            other => return Err(format!("unknown unit '{other}' in duration '{raw}'")),
        };

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut nanos = whole.checked_mul(unit_nanos).ok_or_else(invalid)?;

        if !frac.is_empty() {
            let scale = u32::try_from(frac.len())
                .ok()
                .and_then(|len| 10u128.checked_pow(len))
                .ok_or_else(invalid)?;
            let frac: u128 = frac.parse().map_err(|_| invalid())?;
            nanos += frac.checked_mul(unit_nanos).ok_or_else(invalid)? / scale;
        }

        total = total.checked_add(nanos).ok_or_else(invalid)?;
        rest = after;
    }

    u64::try_from(total)
        .map(Duration::from_nanos)
        .map_err(|_| invalid())
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("300ms"), Ok(Duration::from_millis(300)));
        assert_eq!(parse_duration("1.5h"), Ok(Duration::from_secs(5_400)));
        assert_eq!(parse_duration("2h45m"), Ok(Duration::from_secs(9_900)));
        assert_eq!(parse_duration("1m0.5s"), Ok(Duration::from_millis(60_500)));
        assert_eq!(parse_duration("10µs"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration(".5s"), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn bad_durations() {
        for raw in ["", "5", "-1h", "1d", "h", "1.h2", "."] {
            assert!(parse_duration(raw).is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn parse_str_by_kind() {
        assert_eq!(FlagKind::Bool.parse_str("T"), Ok(FlagValue::Bool(true)));
        assert_eq!(FlagKind::Int.parse_str("-3"), Ok(FlagValue::Int(-3)));
        assert!(FlagKind::Uint.parse_str("-3").is_err());
        assert_eq!(
            FlagKind::StringList.parse_str("a.example.com, b.example.com"),
            Ok(FlagValue::StringList(vec![
                "a.example.com".into(),
                "b.example.com".into()
            ]))
        );
        assert_eq!(
            FlagKind::IntList.parse_str("1,2"),
            Ok(FlagValue::IntList(vec![1, 2]))
        );
        assert!(FlagKind::Bool.parse_str("yes").is_err());
    }

    #[test]
    fn from_config_by_kind() {
        let n = |v: i64| ConfigValue::from(v);

        assert_eq!(
            FlagKind::String.from_config(&n(8443)),
            Ok(FlagValue::String("8443".into()))
        );
        assert_eq!(FlagKind::Uint.from_config(&n(7)), Ok(FlagValue::Uint(7)));
        assert_eq!(
            FlagKind::Duration.from_config(&ConfigValue::from("24h")),
            Ok(FlagValue::Duration(Duration::from_secs(86_400)))
        );
        assert_eq!(
            FlagKind::StringList.from_config(&ConfigValue::List(vec![
                ConfigValue::from("a"),
                ConfigValue::from("b")
            ])),
            Ok(FlagValue::StringList(vec!["a".into(), "b".into()]))
        );
        assert_eq!(FlagKind::IntList.from_config(&n(4)), Ok(FlagValue::IntList(vec![4])));
    }

    #[test]
    fn from_config_rejects_mismatches() {
        assert!(FlagKind::Bool.from_config(&ConfigValue::from(1i64)).is_err());
        assert!(FlagKind::Uint.from_config(&ConfigValue::from(-1i64)).is_err());
        assert!(FlagKind::Duration.from_config(&ConfigValue::from(5i64)).is_err());
        assert!(
            FlagKind::String
                .from_config(&ConfigValue::List(vec![ConfigValue::from("a")]))
                .is_err()
        );
        assert!(
            FlagKind::StringList
                .from_config(&ConfigValue::List(vec![ConfigValue::List(vec![])]))
                .is_err()
        );
    }
}
