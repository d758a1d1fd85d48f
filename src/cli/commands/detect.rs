use anyhow::{Result, bail};

use super::prepare_surface;
use crate::chat::{Notice, describe_detection};
use crate::cli::SessionArgs;
use crate::ui::Spinner;

/// Detects the language of a file (or stdin) and prints it.
pub async fn run_detect(file: Option<&str>, args: &SessionArgs) -> Result<()> {
    let spinner = Spinner::new("Loading language detector...");
    let (mut surface, id) = prepare_surface(file, args).await?;

    spinner.set_message("Detecting language...");
    surface.request_detection(id)?;
    let notices = surface.settle().await;
    spinner.stop();

    for notice in notices {
        match notice {
            Notice::Detected(done) if done == id => {
                if let Some(detected) = surface.store().get(id).and_then(|m| m.detected_lang()) {
                    println!("{}", describe_detection(detected));
                }
                return Ok(());
            }
            Notice::NoConfidentResult(_) => bail!("No confident language detected"),
            Notice::OperationFailed { reason, .. } => bail!("Detection failed: {reason}"),
            _ => {}
        }
    }

    bail!("Detection did not complete")
}
