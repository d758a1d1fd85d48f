//! Terminal building blocks shared by the REPL and the one-shot commands.

use inquire::InquireError;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Ctrl+C and Escape both end a prompt without an answer.
pub const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Look of the chat prompt and its slash command suggestions.
///
/// Falls back to inquire's plain rendering when colors are disabled.
pub fn prompt_render_config() -> RenderConfig<'static> {
    if crate::output::is_no_color() {
        return RenderConfig::empty().with_prompt_prefix(Styled::new("❯"));
    }

    let prompt_style = Styled::new("❯")
        .with_fg(Color::LightBlue)
        .with_attr(Attributes::BOLD);
    let mut render_config = RenderConfig::default()
        .with_prompt_prefix(prompt_style)
        .with_answered_prompt_prefix(prompt_style);

    render_config.option = StyleSheet::new().with_fg(Color::Grey);
    render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));
    render_config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_and_interrupt_count_as_cancelled() {
        assert!(is_prompt_cancelled(&InquireError::OperationCanceled));
        assert!(is_prompt_cancelled(&InquireError::OperationInterrupted));
    }

    #[test]
    fn test_other_prompt_errors_are_not_cancellation() {
        let err = InquireError::Custom("broken terminal".into());
        assert!(!is_prompt_cancelled(&err));
    }

    #[test]
    fn test_prompt_prefix_is_arrow() {
        assert_eq!(prompt_render_config().prompt_prefix.content, "❯");
    }
}
