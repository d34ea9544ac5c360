use anyhow::{Context, Result};
use arboard::Clipboard;

/// Maximum clipboard size (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Trait for clipboard operations (allows mocking in tests)
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard via arboard, opened on each copy.
///
/// Opening is deferred so `--print` and plain execution never touch the display
/// server.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

/// Validates clipboard text without accessing system clipboard
fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

/// Copy `text` through `provider`.
///
/// # Errors
/// Returns error if:
/// - Text is empty
/// - Text is too large for clipboard (>10MB)
/// - The provider fails (clipboard locked, access denied, headless session)
pub fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    // Validate first, before initializing clipboard (for better error messages in CI)
    validate_clipboard_text(text)?;
    provider.set_text(text)?;
    Ok(())
}
