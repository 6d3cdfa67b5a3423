// Prevents console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![cfg_attr(not(windows), allow(dead_code))]

mod compositor;
mod config;
mod error;
mod geometry;
mod hotkeys;
#[cfg(windows)]
mod overlay;
mod sprite;
mod state;

use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cfg = config::load_config();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config::log_level(&cfg))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {e}");
        return ExitCode::FAILURE;
    }
    info!("config={:?}", cfg);

    platform::run(&cfg)
}

#[cfg(windows)]
mod platform {
    use super::*;
    use crate::compositor::Compositor;
    use crate::error::OverlayResult;
    use crate::hotkeys::HotkeyRegistration;
    use crate::overlay::{self, OverlayWindow};
    use crate::state::{Action, OverlayState};
    use tracing::{debug, warn};
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, TranslateMessage, MSG,
    };

    pub fn run(cfg: &config::AppConfig) -> ExitCode {
        // The window is created first so that later failures can own the
        // error box; it is never shown unless startup completes.
        let window = match OverlayWindow::create() {
            Ok(window) => window,
            Err(e) => {
                error!("{e}");
                overlay::show_error(None, &e.to_string());
                return ExitCode::FAILURE;
            }
        };

        match start(&window, cfg) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e}");
                overlay::show_error(Some(&window), &e.to_string());
                ExitCode::FAILURE
            }
        }
    }

    fn start(window: &OverlayWindow, cfg: &config::AppConfig) -> OverlayResult<()> {
        let sprite = sprite::load_embedded()?;
        info!("loaded crosshair: {:?}", sprite.size());

        let mut compositor = Compositor::new(sprite, cfg.show_drag_region)?;
        let mut state = OverlayState::new(compositor.size());

        // Set initial size and position while still hidden
        if let Err(e) = compositor.render(window, state.position()) {
            warn!("initial render failed: {e}");
        }

        let _hotkeys = HotkeyRegistration::register_all(window.hwnd())?;

        info!("entering message loop");
        unsafe {
            let mut msg = MSG::default();
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                if let Some(event) = window.translate(&msg) {
                    for action in state.handle(event) {
                        apply(action, window, &mut compositor, &state);
                    }
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        info!("overlay closed");
        Ok(())
    }

    fn apply(
        action: Action,
        window: &OverlayWindow,
        compositor: &mut Compositor,
        state: &OverlayState,
    ) {
        match action {
            Action::Render => {
                if let Err(e) = compositor.render(window, state.position()) {
                    warn!("render at {:?} failed: {e}", state.position());
                }
            }
            Action::Show => {
                info!("showing crosshair at {:?}, size {:?}", state.position(), state.size());
                window.show();
            }
            Action::Hide => {
                debug_assert!(!state.is_visible() && !state.is_dragging());
                info!("hiding crosshair");
                window.hide();
            }
            Action::SetClickThrough(enabled) => {
                debug_assert_eq!(enabled, state.is_click_through());
                info!(
                    phase = ?state.phase(),
                    "click-through {}",
                    if enabled { "on" } else { "off" }
                );
                window.set_click_through(enabled);
            }
            Action::CapturePointer => {
                debug!("drag started with offset {:?}", state.drag_offset());
                window.capture_pointer();
            }
            Action::ReleasePointer => window.release_pointer(),
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::*;

    pub fn run(_cfg: &config::AppConfig) -> ExitCode {
        error!("the crosshair overlay needs a Windows desktop");
        ExitCode::FAILURE
    }
}
