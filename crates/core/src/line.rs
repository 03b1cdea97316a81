//! Assembly of complete lines: a timestamp, a space, generated content and a
//! trailing newline.

use crate::{
    config::Config,
    content::ContentGenerator,
    err::{Error, Result},
    timestamp::TimestampFormat,
    words::WordIndex,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Longest line, in bytes, that will be generated.
pub const MAX_LINE_LENGTH: usize = 1 << 20;

/// Requested total line length, not counting the newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LengthArg", into = "LengthArg")]
pub enum LengthSpec {
    Fixed(usize),
    /// Pick a fresh length for every line.
    Random,
}

impl Default for LengthSpec {
    fn default() -> Self {
        Self::Fixed(80)
    }
}

impl FromStr for LengthSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rand" | "random" => Ok(Self::Random),
            _ => match s.parse::<usize>() {
                Ok(n) if n > MAX_LINE_LENGTH => Err(Error::LineTooLong {
                    length: n,
                    max: MAX_LINE_LENGTH,
                }),
                Ok(n) if n > 0 => Ok(Self::Fixed(n)),
                _ => Err(Error::BadLength(s.to_owned())),
            },
        }
    }
}

impl fmt::Display for LengthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// Lengths may be written as numbers or keywords in config files.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LengthArg {
    Number(usize),
    Text(String),
}

impl TryFrom<LengthArg> for LengthSpec {
    type Error = Error;

    fn try_from(arg: LengthArg) -> Result<Self> {
        match arg {
            LengthArg::Number(n) => n.to_string().parse(),
            LengthArg::Text(s) => s.parse(),
        }
    }
}

impl From<LengthSpec> for LengthArg {
    fn from(spec: LengthSpec) -> Self {
        match spec {
            LengthSpec::Fixed(n) => Self::Number(n),
            LengthSpec::Random => Self::Text(spec.to_string()),
        }
    }
}

/// Content budget after the timestamp has been accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Budget {
    Fixed(usize),
    /// Uniform in `0..ceiling`, ceiling is never zero.
    Random { ceiling: usize },
}

/// Produces one line per call to [LineAssembler::next_line].
pub struct LineAssembler<R = SmallRng> {
    timestamp: TimestampFormat,
    content: ContentGenerator,
    budget: Budget,
    rng: R,
}

impl LineAssembler<SmallRng> {
    /// Resolve the timestamp format, dictionary and length budget described by
    /// `config`. All configuration errors surface here, before any line is made.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timestamp = TimestampFormat::parse(&config.ts_format)?;

        let words = match &config.dictionary {
            Some(path) => {
                let words = WordIndex::load(path)?;
                if words.is_empty() {
                    return Err(Error::EmptyDictionary);
                }
                tracing::info!(
                    words = words.len(),
                    path = %path.display(),
                    "loaded dictionary"
                );
                Some(words)
            }
            None => None,
        };

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        Self::new(
            timestamp,
            ContentGenerator::new(words),
            config.line_length,
            config.random_max,
            rng,
        )
    }
}

impl<R: Rng> LineAssembler<R> {
    /// `random_max` caps the total line length when `length` is
    /// [LengthSpec::Random].
    pub fn new(
        timestamp: TimestampFormat,
        content: ContentGenerator,
        length: LengthSpec,
        random_max: usize,
        rng: R,
    ) -> Result<Self> {
        let longest = match length {
            LengthSpec::Fixed(length) => length,
            LengthSpec::Random => random_max,
        };
        if longest > MAX_LINE_LENGTH {
            return Err(Error::LineTooLong {
                length: longest,
                max: MAX_LINE_LENGTH,
            });
        }

        let width = timestamp.width();
        let too_short = |length| Error::LineTooShort {
            length,
            sample: timestamp.now(),
        };

        let budget = match length {
            LengthSpec::Fixed(length) => {
                Budget::Fixed(length.checked_sub(width).ok_or_else(|| too_short(length))?)
            }
            LengthSpec::Random => match random_max.checked_sub(width) {
                Some(ceiling) if ceiling > 0 => Budget::Random { ceiling },
                _ => return Err(too_short(random_max)),
            },
        };

        tracing::debug!(?budget, width, "resolved line budget");

        Ok(Self {
            timestamp,
            content,
            budget,
            rng,
        })
    }

    pub fn timestamp(&self) -> &TimestampFormat {
        &self.timestamp
    }

    /// `"<timestamp> <content>\n"`
    pub fn next_line(&mut self) -> String {
        let budget = match self.budget {
            Budget::Fixed(n) => n,
            Budget::Random { ceiling } => self.rng.random_range(0..ceiling),
        };
        let content = self.content.generate(budget, &mut self.rng);
        let timestamp = self.timestamp.now();

        let mut line = String::with_capacity(timestamp.len() + content.len() + 2);
        line.push_str(&timestamp);
        line.push(' ');
        line.push_str(&content);
        line.push('\n');
        line
    }
}
