use anyhow::{Result, bail};

use super::prepare_surface;
use crate::capability::TRANSLATION_FAILED;
use crate::chat::{Dispatch, Notice};
use crate::cli::SessionArgs;
use crate::ui::Spinner;

/// Translates a file (or stdin) and prints the result to stdout.
///
/// Text whose target is the native language is printed unchanged.
pub async fn run_translate(file: Option<&str>, args: &SessionArgs) -> Result<()> {
    let spinner = Spinner::new("Loading translator...");
    let (mut surface, id) = prepare_surface(file, args).await?;

    if surface.request_translation(id)? == Dispatch::NotNeeded {
        spinner.stop();
        crate::status!("Target is the native language, printing input unchanged");
        if let Some(message) = surface.store().get(id) {
            println!("{}", message.content());
        }
        return Ok(());
    }

    spinner.set_message("Translating...");
    let notices = surface.settle().await;
    spinner.stop();

    for notice in notices {
        match notice {
            Notice::Translated(done) if done == id => {
                let translated = surface.store().get(id).and_then(|m| m.translated());
                match translated {
                    Some(TRANSLATION_FAILED) | None => bail!("Translation failed: empty result"),
                    Some(text) => println!("{text}"),
                }
                return Ok(());
            }
            Notice::OperationFailed { reason, .. } => bail!("Translation failed: {reason}"),
            _ => {}
        }
    }

    bail!("Translation did not complete")
}
