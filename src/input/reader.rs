use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{self, Read};

use tracing::debug;

/// Largest input accepted by the one-shot commands.
pub const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Reads the text for `lingo detect` and `lingo translate`.
pub struct InputReader;

impl InputReader {
    /// Reads `file_path`, or stdin when no path is given.
    pub fn read(file_path: Option<&str>) -> Result<String> {
        match file_path {
            Some(path) => {
                let file =
                    File::open(path).with_context(|| format!("Failed to open file: {path}"))?;
                debug!(path, "reading input file");
                read_limited(file).with_context(|| format!("Failed to read file: {path}"))
            }
            None => {
                debug!("reading input from stdin");
                read_limited(io::stdin().lock()).context("Failed to read from stdin")
            }
        }
    }
}

/// Reads all of `source` as UTF-8, refusing anything over [`MAX_INPUT_SIZE`].
fn read_limited<R: Read>(source: R) -> Result<String> {
    let mut buffer = Vec::new();
    source
        .take(MAX_INPUT_SIZE as u64 + 1)
        .read_to_end(&mut buffer)?;

    if buffer.len() > MAX_INPUT_SIZE {
        bail!(
            "Input exceeds maximum allowed size (1 MB).\n\n\
             Send a shorter excerpt instead."
        );
    }

    String::from_utf8(buffer).context("Input is not valid UTF-8")
}
