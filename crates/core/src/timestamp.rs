//! Rendering of the timestamp that starts every line.

use crate::err::{Error, Result};
use chrono::{
    format::{Item, StrftimeItems},
    DateTime, Local, TimeZone, Timelike,
};
use std::fmt::{Display, Write};

/// How the timestamp prefix of every line is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    #[default]
    /// `HH:MM:SS ffff`, wall clock time with ten-thousandths of a second.
    Clock,
    /// Nanoseconds since the unix epoch.
    Nanos,
    /// Milliseconds since the unix epoch.
    Millis,
    /// Seconds since the unix epoch.
    Epoch,
    /// A strftime pattern.
    Custom(String),
}

impl TimestampFormat {
    /// Select a format by name. The empty string selects [TimestampFormat::Clock],
    /// unknown names are taken as strftime patterns.
    pub fn parse(selector: &str) -> Result<Self> {
        Ok(match selector {
            "" => Self::Clock,
            "ns" => Self::Nanos,
            "ms" => Self::Millis,
            "epoch" | "unix" => Self::Epoch,
            pattern => {
                if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                    return Err(Error::TimestampFormat(pattern.to_owned()));
                }
                Self::Custom(pattern.to_owned())
            }
        })
    }

    pub fn now(&self) -> String {
        self.format(&Local::now())
    }

    pub fn format<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            Self::Clock => {
                // Leap seconds report a nanosecond count past 1e9.
                let fraction = (time.nanosecond() / 100_000).min(9_999);
                format!("{} {:04}", time.format("%H:%M:%S"), fraction)
            }
            Self::Nanos => {
                let nanos = i128::from(time.timestamp()) * 1_000_000_000
                    + i128::from(time.timestamp_subsec_nanos());
                nanos.to_string()
            }
            Self::Millis => time.timestamp_millis().to_string(),
            Self::Epoch => time.timestamp().to_string(),
            Self::Custom(pattern) => {
                let mut buf = String::with_capacity(pattern.len() * 2);
                // Patterns are validated in `parse`.
                let _ = write!(buf, "{}", time.format(pattern));
                buf
            }
        }
    }

    /// Bytes a line spends on its timestamp, including the separating space.
    ///
    /// This samples the current time, so for formats whose width grows (epoch
    /// counters, month names) it is an estimate.
    pub fn width(&self) -> usize {
        self.now().len() + 1
    }
}
