use crate::err::Result;
use std::{fs::OpenOptions, io::Write, path::Path};

/// Write the current process id followed by a newline, replacing any previous
/// contents of `path`.
pub fn write_pid(path: &Path) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(())
}
