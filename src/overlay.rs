// The crosshair window: a hidden-by-default layered popup.
//
// WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW gives a borderless,
// always-on-top surface with no taskbar button whose pixels come entirely
// from UpdateLayeredWindow. Click-through is WS_EX_TRANSPARENT, toggled at
// runtime. Input is not handled in the window procedure: the message loop
// turns queued messages into `Event`s via `translate`.

use crate::error::{OverlayError, OverlayResult};
use crate::geometry::Point;
use crate::hotkeys::Hotkey;
use crate::state::Event;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetWindowLongW, IsWindow, LoadCursorW,
    MessageBoxW, PostMessageW, PostQuitMessage, RegisterClassW, SetWindowLongW, ShowWindow,
    GWL_EXSTYLE, IDC_ARROW, MB_ICONERROR, MB_OK, MSG, SW_HIDE, SW_SHOW, WM_APP,
    WM_CAPTURECHANGED, WM_DESTROY, WM_HOTKEY, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE,
    WNDCLASSW, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

const CLASS_NAME: &str = "CrosshairOverlay";
const WINDOW_TITLE: &str = "Crosshair Overlay";

/// Posted to ourselves when another window takes the pointer capture.
const WM_CAPTURE_LOST: u32 = WM_APP + 1;
/// `MK_LBUTTON` bit of a mouse message's `wParam`.
const MK_LBUTTON: usize = 0x0001;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        // Sent, not posted: requeue it so the loop sees the drag end.
        WM_CAPTURECHANGED if lparam.0 != hwnd.0 as isize => {
            let _ = PostMessageW(Some(hwnd), WM_CAPTURE_LOST, WPARAM(0), LPARAM(0));
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Owns the overlay HWND; destroys it on drop.
pub struct OverlayWindow {
    hwnd: HWND,
}

impl OverlayWindow {
    /// Register the window class and create the (hidden, zero-sized) window.
    pub fn create() -> OverlayResult<Self> {
        let class_name = wide(CLASS_NAME);
        let title = wide(WINDOW_TITLE);

        unsafe {
            let hinstance = GetModuleHandleW(PCWSTR::null())
                .map_err(|e| OverlayError::WindowCreation(e.to_string()))?;

            let wc = WNDCLASSW {
                lpfnWndProc: Some(window_proc),
                hInstance: hinstance.into(),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
                ..Default::default()
            };
            if RegisterClassW(&wc) == 0 {
                return Err(OverlayError::WindowCreation(format!(
                    "RegisterClassW failed for {CLASS_NAME}"
                )));
            }

            let hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_LAYERED | WS_EX_TOOLWINDOW,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_POPUP,
                0,
                0,
                0,
                0,
                None,
                None,
                Some(hinstance.into()),
                None,
            )
            .map_err(|e| OverlayError::WindowCreation(e.to_string()))?;

            Ok(Self { hwnd })
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
        }
    }

    pub fn hide(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    /// Toggle WS_EX_TRANSPARENT so pointer input falls through to whatever
    /// is underneath.
    pub fn set_click_through(&self, enabled: bool) {
        let flag = WS_EX_TRANSPARENT.0 as i32;
        unsafe {
            let style = GetWindowLongW(self.hwnd, GWL_EXSTYLE);
            let style = if enabled { style | flag } else { style & !flag };
            SetWindowLongW(self.hwnd, GWL_EXSTYLE, style);
        }
    }

    pub fn capture_pointer(&self) {
        unsafe {
            SetCapture(self.hwnd);
        }
    }

    pub fn release_pointer(&self) {
        unsafe {
            let _ = ReleaseCapture();
        }
    }

    /// Map a queued message to a state machine event. Pointer messages only
    /// count when addressed to this window; positions come from `MSG::pt`,
    /// which is already in screen coordinates. Losing the capture, or a move
    /// with the button already up, counts as a release.
    pub fn translate(&self, msg: &MSG) -> Option<Event> {
        let cursor = Point::new(msg.pt.x, msg.pt.y);
        match msg.message {
            WM_HOTKEY => match Hotkey::from_id(msg.wParam.0)? {
                Hotkey::ToggleVisibility => Some(Event::ToggleVisibility { cursor }),
                Hotkey::ToggleClickThrough => Some(Event::ToggleClickThrough),
            },
            _ if msg.hwnd != self.hwnd => None,
            WM_LBUTTONDOWN => Some(Event::PointerPress { cursor }),
            WM_MOUSEMOVE => {
                let primary_down = msg.wParam.0 & MK_LBUTTON != 0;
                Some(Event::pointer_moved(cursor, primary_down))
            }
            WM_LBUTTONUP | WM_CAPTURE_LOST => Some(Event::PointerRelease),
            _ => None,
        }
    }
}

impl Drop for OverlayWindow {
    fn drop(&mut self) {
        unsafe {
            if IsWindow(Some(self.hwnd)).as_bool() {
                let _ = DestroyWindow(self.hwnd);
            }
        }
    }
}

/// Modal error box for fatal startup failures.
pub fn show_error(owner: Option<&OverlayWindow>, message: &str) {
    let text = wide(message);
    let caption = wide(WINDOW_TITLE);
    unsafe {
        let _ = MessageBoxW(
            owner.map(OverlayWindow::hwnd),
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}
