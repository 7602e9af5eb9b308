use anyhow::Context;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Open the report sink: a buffered file when a path is given, stdout
/// otherwise.
pub fn open_report_sink(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).context(format!("creating output file {:?}", p))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}
