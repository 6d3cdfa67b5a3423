// Global hotkeys using Win32 RegisterHotKey API

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// Ctrl+Numpad . → show/hide the crosshair
    ToggleVisibility,
    /// Ctrl+Numpad / → toggle click-through
    ToggleClickThrough,
}

impl Hotkey {
    pub const ALL: [Hotkey; 2] = [Hotkey::ToggleVisibility, Hotkey::ToggleClickThrough];

    /// Hotkey ID (must be unique within the application)
    pub fn id(self) -> i32 {
        match self {
            Hotkey::ToggleVisibility => 1,
            Hotkey::ToggleClickThrough => 2,
        }
    }

    /// Map the `wParam` of a WM_HOTKEY back to a hotkey.
    pub fn from_id(id: usize) -> Option<Hotkey> {
        Self::ALL.into_iter().find(|h| h.id() as usize == id)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hotkey::ToggleVisibility => f.write_str("Ctrl+Numpad ."),
            Hotkey::ToggleClickThrough => f.write_str("Ctrl+Numpad /"),
        }
    }
}

#[cfg(windows)]
pub use registration::HotkeyRegistration;

#[cfg(windows)]
mod registration {
    use super::Hotkey;
    use crate::error::{OverlayError, OverlayResult};
    use tracing::info;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_CONTROL, MOD_NOREPEAT,
        VIRTUAL_KEY, VK_DECIMAL, VK_DIVIDE,
    };

    fn virtual_key(hotkey: Hotkey) -> VIRTUAL_KEY {
        match hotkey {
            Hotkey::ToggleVisibility => VK_DECIMAL,
            Hotkey::ToggleClickThrough => VK_DIVIDE,
        }
    }

    /// Holds the registered hotkeys; unregisters them on drop.
    pub struct HotkeyRegistration {
        hwnd: HWND,
        registered: Vec<Hotkey>,
    }

    impl HotkeyRegistration {
        /// Register all global hotkeys against `hwnd`. Stops at the first
        /// failure; anything registered before it is released by the guard.
        pub fn register_all(hwnd: HWND) -> OverlayResult<Self> {
            let mods = HOT_KEY_MODIFIERS(MOD_CONTROL.0 | MOD_NOREPEAT.0);
            let mut guard = Self {
                hwnd,
                registered: Vec::with_capacity(Hotkey::ALL.len()),
            };

            for hotkey in Hotkey::ALL {
                let result = unsafe {
                    RegisterHotKey(Some(hwnd), hotkey.id(), mods, virtual_key(hotkey).0 as u32)
                };
                result.map_err(|e| OverlayError::HotkeyRegistration {
                    hotkey,
                    reason: e.to_string(),
                })?;
                info!("registered hotkey {hotkey}");
                guard.registered.push(hotkey);
            }

            Ok(guard)
        }
    }

    impl Drop for HotkeyRegistration {
        fn drop(&mut self) {
            for hotkey in self.registered.drain(..) {
                unsafe {
                    let _ = UnregisterHotKey(Some(self.hwnd), hotkey.id());
                }
            }
        }
    }
}
