// Layered-window compositing.
//
// Each render copies the sprite into a 32-bit top-down DIB section and hands
// it to UpdateLayeredWindow with per-pixel alpha (AC_SRC_OVER | AC_SRC_ALPHA).
// The optional drag-region outline is baked into the frame here and nowhere
// else, so hit testing never sees it.

use crate::geometry::Rect;
use crate::sprite::Sprite;

/// Opaque red, premultiplied BGRA.
const OUTLINE_BGRA: [u8; 4] = [0, 0, 255, 255];
const OUTLINE_WIDTH: i32 = 2;

/// Write the sprite into `dst` (same layout and size as the sprite), then
/// stroke `outline` (image-local coordinates) on top when given.
pub fn compose_into(dst: &mut [u8], sprite: &Sprite, outline: Option<Rect>) {
    dst.copy_from_slice(sprite.pixels());

    let Some(r) = outline else {
        return;
    };
    let size = sprite.size();
    for y in r.top.max(0)..r.bottom.min(size.height) {
        for x in r.left.max(0)..r.right.min(size.width) {
            let on_edge = x < r.left + OUTLINE_WIDTH
                || x >= r.right - OUTLINE_WIDTH
                || y < r.top + OUTLINE_WIDTH
                || y >= r.bottom - OUTLINE_WIDTH;
            if on_edge {
                let i = ((y * size.width + x) * 4) as usize;
                dst[i..i + 4].copy_from_slice(&OUTLINE_BGRA);
            }
        }
    }
}

#[cfg(windows)]
pub use layered::Compositor;

#[cfg(windows)]
mod layered {
    use super::compose_into;
    use crate::error::{OverlayError, OverlayResult};
    use crate::geometry::{Point, Size};
    use crate::overlay::OverlayWindow;
    use crate::sprite::Sprite;
    use crate::state::OverlayState;
    use std::mem::size_of;
    use windows::Win32::Foundation::{COLORREF, POINT, SIZE};
    use windows::Win32::Graphics::Gdi::{
        CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, ReleaseDC,
        SelectObject, AC_SRC_ALPHA, AC_SRC_OVER, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
        BLENDFUNCTION, DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ,
    };
    use windows::Win32::UI::WindowsAndMessaging::{UpdateLayeredWindow, ULW_ALPHA};

    /// Owns the sprite and the DIB section it is drawn into. The bitmap and its
    /// memory DC are released once, on drop.
    pub struct Compositor {
        sprite: Sprite,
        show_drag_region: bool,
        hdc_mem: HDC,
        hbmp: HBITMAP,
        old_bmp: HGDIOBJ,
        bits: *mut u8,
    }

    impl Compositor {
        pub fn new(sprite: Sprite, show_drag_region: bool) -> OverlayResult<Self> {
            let size = sprite.size();
            unsafe {
                let hdc_screen = GetDC(None);
                let hdc_mem = CreateCompatibleDC(Some(hdc_screen));
                ReleaseDC(None, hdc_screen);
                if hdc_mem.is_invalid() {
                    return Err(OverlayError::WindowCreation(
                        "CreateCompatibleDC failed".into(),
                    ));
                }

                let bmi = BITMAPINFO {
                    bmiHeader: BITMAPINFOHEADER {
                        biSize: size_of::<BITMAPINFOHEADER>() as u32,
                        biWidth: size.width,
                        biHeight: -size.height, // top-down
                        biPlanes: 1,
                        biBitCount: 32,
                        biCompression: BI_RGB.0,
                        ..Default::default()
                    },
                    ..Default::default()
                };

                let mut bits_ptr: *mut std::ffi::c_void = std::ptr::null_mut();
                let hbmp = match CreateDIBSection(
                    Some(hdc_mem),
                    &bmi,
                    DIB_RGB_COLORS,
                    &mut bits_ptr,
                    None,
                    0,
                ) {
                    Ok(hbmp) if !bits_ptr.is_null() => hbmp,
                    Ok(hbmp) => {
                        let _ = DeleteObject(hbmp.into());
                        let _ = DeleteDC(hdc_mem);
                        return Err(OverlayError::WindowCreation(
                            "DIB section has no pixel buffer".into(),
                        ));
                    }
                    Err(e) => {
                        let _ = DeleteDC(hdc_mem);
                        return Err(OverlayError::WindowCreation(e.to_string()));
                    }
                };
                let old_bmp = SelectObject(hdc_mem, hbmp.into());

                Ok(Self {
                    sprite,
                    show_drag_region,
                    hdc_mem,
                    hbmp,
                    old_bmp,
                    bits: bits_ptr as *mut u8,
                })
            }
        }

        pub fn size(&self) -> Size {
            self.sprite.size()
        }

        /// Composite the sprite onto `window` with its top-left at `position`.
        pub fn render(
            &mut self,
            window: &OverlayWindow,
            position: Point,
        ) -> windows::core::Result<()> {
            let size = self.size();
            let outline = self.show_drag_region.then(|| OverlayState::handle_rect(size));

            let len = (size.width * size.height * 4) as usize;
            let frame = unsafe { std::slice::from_raw_parts_mut(self.bits, len) };
            compose_into(frame, &self.sprite, outline);

            let pt_pos = POINT {
                x: position.x,
                y: position.y,
            };
            let pt_size = SIZE {
                cx: size.width,
                cy: size.height,
            };
            let pt_src = POINT { x: 0, y: 0 };
            let blend = BLENDFUNCTION {
                BlendOp: AC_SRC_OVER as u8,
                BlendFlags: 0,
                SourceConstantAlpha: 255,
                AlphaFormat: AC_SRC_ALPHA as u8,
            };

            unsafe {
                let hdc_screen = GetDC(None);
                let result = UpdateLayeredWindow(
                    window.hwnd(),
                    Some(hdc_screen),
                    Some(&pt_pos),
                    Some(&pt_size),
                    Some(self.hdc_mem),
                    Some(&pt_src),
                    COLORREF(0),
                    Some(&blend),
                    ULW_ALPHA,
                );
                ReleaseDC(None, hdc_screen);
                result
            }
        }
    }

    impl Drop for Compositor {
        fn drop(&mut self) {
            unsafe {
                SelectObject(self.hdc_mem, self.old_bmp);
                let _ = DeleteObject(self.hbmp.into());
                let _ = DeleteDC(self.hdc_mem);
            }
        }
    }
}
