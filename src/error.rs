use crate::hotkeys::Hotkey;
use thiserror::Error;

/// Startup failures. All of them are fatal: reported to the user, then exit.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Failed to load image from resources: {0}")]
    AssetLoad(String),

    #[error("Failed to create overlay window: {0}")]
    WindowCreation(String),

    #[error("Failed to register hotkey {hotkey}: {reason}")]
    HotkeyRegistration { hotkey: Hotkey, reason: String },
}

pub type OverlayResult<T> = Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkey_error_names_the_combination() {
        let err = OverlayError::HotkeyRegistration {
            hotkey: Hotkey::ToggleClickThrough,
            reason: "already registered".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to register hotkey Ctrl+Numpad /: already registered"
        );
    }
}
