//! Reading one-shot input from a file or stdin.

mod reader;

pub use reader::{InputReader, MAX_INPUT_SIZE};
