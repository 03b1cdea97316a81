mod config;

use anyhow::{anyhow, Result};
use clap::Parser;
use randomizr_core::{
    pidfile, signal, Config, LengthSpec, LineAssembler, OutputWriter, Scheduler, WritePolicy,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Writes timestamped random lines at a fixed rate, for exercising log
/// shippers, parsers and rotation.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Destination file to which random data will be written [default: stdout]
    #[arg(long)]
    file: Option<PathBuf>,

    /// Truncate file on opening instead of appending
    #[arg(long)]
    truncate: bool,

    /// Reopen file handle on every write instead of using a persistent handle
    #[arg(long)]
    reopen: bool,

    /// Frequency in hz at which lines will be written [default: 10]
    #[arg(long)]
    freq: Option<f64>,

    /// File to which the pid is written
    #[arg(long)]
    pidfile: Option<PathBuf>,

    /// Timestamp format: ns, ms, epoch, unix or a strftime pattern [default: HH:MM:SS ffff]
    #[arg(long)]
    ts_format: Option<String>,

    /// Length of the lines to be generated in bytes, or "random" [default: 80]
    #[arg(long)]
    line_length: Option<LengthSpec>,

    /// Longest line produced when the line length is random [default: 80]
    #[arg(long)]
    random_max: Option<usize>,

    /// Dictionary of words to use for generating log data
    #[arg(long)]
    dict: Option<PathBuf>,

    /// Stop after writing this many lines
    #[arg(long)]
    count: Option<u64>,

    /// Seed for reproducible line content
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with default settings, overridden by flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Flags given on the command line take precedence over `config`.
    fn apply(self, config: &mut Config) {
        if self.file.is_some() {
            config.file = self.file;
        }
        if self.truncate {
            config.truncate = true;
        }
        if self.reopen {
            config.policy = WritePolicy::ReopenPerLine;
        }
        if let Some(freq) = self.freq {
            config.freq = freq;
        }
        if self.pidfile.is_some() {
            config.pidfile = self.pidfile;
        }
        if let Some(ts_format) = self.ts_format {
            config.ts_format = ts_format;
        }
        if let Some(line_length) = self.line_length {
            config.line_length = line_length;
        }
        if let Some(random_max) = self.random_max {
            config.random_max = random_max;
        }
        if self.dict.is_some() {
            config.dictionary = self.dict;
        }
        if self.count.is_some() {
            config.count = self.count;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = config::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    run(config)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env("RANDOMIZR_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    // Standard output may be the destination.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: Config) -> Result<()> {
    let assembler = LineAssembler::from_config(&config)?;
    let period = config.period()?;

    if let Some(path) = &config.pidfile {
        if let Err(err) = pidfile::write_pid(path) {
            tracing::error!(%err, path = %path.display(), "unable to write pidfile");
        }
    }

    let triggers = signal::reopen_triggers().unwrap_or_else(|err| {
        tracing::warn!(%err, "unable to listen for reopen signals");
        crossbeam_channel::never()
    });

    let (sx, rx) = crossbeam_channel::bounded(0);
    let writer = OutputWriter::new(
        config.destination(),
        config.policy,
        assembler.timestamp().clone(),
    )
    .spawn(rx, triggers);

    let sent = Scheduler::new(assembler, period, config.count).run(sx);

    let stats = writer
        .join()
        .map_err(|_| anyhow!("writer thread panicked"))?;
    tracing::info!(sent, written = stats.written, failed = stats.failed, "finished");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{run, Args};
    use anyhow::Result;
    use clap::Parser;
    use randomizr_core::{Config, LengthSpec, WritePolicy};
    use std::path::PathBuf;

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "randomizr",
            "--file",
            "out.log",
            "--reopen",
            "--freq",
            "2",
            "--line-length",
            "random",
            "--ts-format",
            "ms",
        ])
        .unwrap();

        let mut config = Config {
            freq: 50.0,
            seed: Some(4),
            ..Config::default()
        };
        args.apply(&mut config);

        assert_eq!(config.file, Some(PathBuf::from("out.log")));
        assert_eq!(config.policy, WritePolicy::ReopenPerLine);
        assert_eq!(config.freq, 2.0);
        assert_eq!(config.line_length, LengthSpec::Random);
        assert_eq!(config.ts_format, "ms");
        assert_eq!(config.seed, Some(4));
        assert!(!config.truncate);
    }

    #[test]
    fn bad_length_is_rejected_by_parser() {
        assert!(Args::try_parse_from(["randomizr", "--line-length", "long"]).is_err());
        assert!(Args::try_parse_from(["randomizr", "--line-length", "0"]).is_err());
    }

    #[test]
    fn runs_to_count() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("out.log");
        let pid = dir.path().join("randomizr.pid");

        let config = Config {
            file: Some(out.clone()),
            pidfile: Some(pid.clone()),
            freq: 100.0,
            line_length: LengthSpec::Fixed(40),
            count: Some(10),
            ..Config::default()
        };
        run(config)?;

        let contents = std::fs::read_to_string(&out)?;
        assert_eq!(contents.lines().count(), 10);
        assert!(contents.lines().all(|line| line.len() == 40));
        assert_eq!(
            std::fs::read_to_string(&pid)?,
            format!("{}\n", std::process::id())
        );
        Ok(())
    }

    #[test]
    fn too_short_line_fails_before_writing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("out.log");

        let config = Config {
            file: Some(out.clone()),
            line_length: LengthSpec::Fixed(5),
            count: Some(1),
            ..Config::default()
        };
        assert!(run(config).is_err());
        assert!(!out.exists());
        Ok(())
    }
}
