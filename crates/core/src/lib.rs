pub mod config;
pub mod content;
pub mod line;
pub mod schedule;
pub mod timestamp;
pub mod words;
pub mod writer;

pub mod err;
pub mod pidfile;
pub mod signal;

pub use config::Config;
pub use content::ContentGenerator;
pub use err::Result;
pub use line::{LengthSpec, LineAssembler};
pub use schedule::Scheduler;
pub use timestamp::TimestampFormat;
pub use words::WordIndex;
pub use writer::{Destination, OutputWriter, WritePolicy};
