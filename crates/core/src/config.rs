use crate::{
    err::{Error, Result},
    line::LengthSpec,
    writer::{Destination, WritePolicy},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Everything needed to run the generator. Built once at startup and handed
/// to each component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Destination file, standard output when `None`.
    pub file: Option<PathBuf>,
    /// Truncate the destination on open instead of appending.
    pub truncate: bool,
    pub policy: WritePolicy,
    /// Lines per second.
    pub freq: f64,
    pub pidfile: Option<PathBuf>,
    /// See [crate::TimestampFormat::parse].
    pub ts_format: String,
    pub line_length: LengthSpec,
    /// Upper bound on the total line length when `line_length` is random.
    pub random_max: usize,
    pub dictionary: Option<PathBuf>,
    /// Stop after this many lines instead of running forever.
    pub count: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            truncate: false,
            policy: WritePolicy::Persistent,
            freq: 10.0,
            pidfile: None,
            ts_format: String::new(),
            line_length: LengthSpec::default(),
            random_max: 80,
            dictionary: None,
            count: None,
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.period().map(|_| ())
    }

    /// Time between two lines.
    pub fn period(&self) -> Result<Duration> {
        if !(self.freq.is_finite() && self.freq > 0.0) {
            return Err(Error::Frequency(self.freq));
        }
        Duration::try_from_secs_f64(self.freq.recip())
            .ok()
            .filter(|period| !period.is_zero())
            .ok_or(Error::Frequency(self.freq))
    }

    pub fn destination(&self) -> Destination {
        match &self.file {
            Some(path) => Destination::File {
                path: path.clone(),
                truncate: self.truncate,
            },
            None => Destination::Stdout,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use crate::{err::Error, line::LengthSpec, writer::Destination, writer::WritePolicy};
    use std::{path::PathBuf, time::Duration};

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.period().unwrap(), Duration::from_millis(100));
        assert_eq!(config.destination(), Destination::Stdout);
        assert_eq!(config.line_length, LengthSpec::Fixed(80));
    }

    #[test]
    fn frequency_must_be_positive_and_finite() {
        for freq in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-300] {
            let config = Config {
                freq,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(Error::Frequency(_))), "{freq}");
        }
    }

    #[test]
    fn destination_carries_open_mode() {
        let config = Config {
            file: Some(PathBuf::from("/tmp/out.log")),
            truncate: true,
            ..Config::default()
        };
        assert_eq!(
            config.destination(),
            Destination::File {
                path: PathBuf::from("/tmp/out.log"),
                truncate: true
            }
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "file": "out.log", "policy": "reopen-per-line", "line_length": "random" }"#,
        )
        .unwrap();
        assert_eq!(config.file, Some(PathBuf::from("out.log")));
        assert_eq!(config.policy, WritePolicy::ReopenPerLine);
        assert_eq!(config.line_length, LengthSpec::Random);
        assert_eq!(config.freq, 10.0);

        let config: Config = serde_json::from_str(r#"{ "line_length": 40 }"#).unwrap();
        assert_eq!(config.line_length, LengthSpec::Fixed(40));

        assert!(serde_json::from_str::<Config>(r#"{ "line_length": 0 }"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{ "colour": true }"#).is_err());
    }
}
