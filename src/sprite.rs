// Image loading: embedded PNG → premultiplied BGRA pixels.

use crate::error::{OverlayError, OverlayResult};
use crate::geometry::Size;

/// Resource id of the crosshair PNG (see resources/crosshair.rc).
pub const CROSSHAIR_RESOURCE_ID: u16 = 129;

/// Decoded image, top-down rows of premultiplied BGRA, ready for a 32-bit DIB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    size: Size,
    pixels: Vec<u8>,
}

impl Sprite {
    pub fn decode(bytes: &[u8]) -> OverlayResult<Self> {
        if bytes.is_empty() {
            return Err(OverlayError::AssetLoad("resource is empty".into()));
        }

        let rgba = image::load_from_memory(bytes)
            .map_err(|e| OverlayError::AssetLoad(e.to_string()))?
            .to_rgba8();

        let (width, height) = rgba.dimensions();
        let size = Size::new(
            i32::try_from(width).map_err(|_| OverlayError::AssetLoad("image too wide".into()))?,
            i32::try_from(height).map_err(|_| OverlayError::AssetLoad("image too tall".into()))?,
        );
        if size.is_empty() {
            return Err(OverlayError::AssetLoad(format!(
                "image has no pixels ({width}x{height})"
            )));
        }

        let mut pixels = rgba.into_raw();
        for px in pixels.chunks_exact_mut(4) {
            let a = px[3] as u32;
            let r = premultiply(px[0], a);
            let g = premultiply(px[1], a);
            let b = premultiply(px[2], a);
            px[0] = b;
            px[1] = g;
            px[2] = r;
        }

        Ok(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

fn premultiply(channel: u8, alpha: u32) -> u8 {
    ((channel as u32 * alpha + 127) / 255) as u8
}

/// Decode the crosshair compiled into the executable's resources.
#[cfg(windows)]
pub fn load_embedded() -> OverlayResult<Sprite> {
    use windows::core::PCWSTR;
    use windows::Win32::System::LibraryLoader::{
        FindResourceW, GetModuleHandleW, LoadResource, LockResource, SizeofResource,
    };
    use windows::Win32::UI::WindowsAndMessaging::RT_RCDATA;

    unsafe {
        let module = GetModuleHandleW(PCWSTR::null())
            .map_err(|e| OverlayError::AssetLoad(e.to_string()))?;

        let name = PCWSTR(CROSSHAIR_RESOURCE_ID as usize as *const u16);
        let resource = FindResourceW(Some(module), name, RT_RCDATA);
        if resource.is_invalid() {
            return Err(OverlayError::AssetLoad(format!(
                "resource {CROSSHAIR_RESOURCE_ID} not found"
            )));
        }

        let loaded = LoadResource(Some(module), resource)
            .map_err(|e| OverlayError::AssetLoad(e.to_string()))?;
        let data = LockResource(loaded) as *const u8;
        let len = SizeofResource(Some(module), resource) as usize;
        if data.is_null() || len == 0 {
            return Err(OverlayError::AssetLoad(format!(
                "resource {CROSSHAIR_RESOURCE_ID} is empty"
            )));
        }

        // Resource memory is mapped with the module and never freed.
        Sprite::decode(std::slice::from_raw_parts(data, len))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png(width: u32, height: u32, fill: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, fill);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encode test png");
        buf
    }

    #[test]
    fn reports_pixel_dimensions() {
        let sprite = Sprite::decode(&png(64, 48, Rgba([0, 255, 0, 255]))).unwrap();
        assert_eq!(sprite.size(), Size::new(64, 48));
        assert_eq!(sprite.pixels().len(), 64 * 48 * 4);
    }

    #[test]
    fn converts_to_premultiplied_bgra() {
        let sprite = Sprite::decode(&png(2, 2, Rgba([200, 100, 50, 128]))).unwrap();
        // 200*128/255 ≈ 100, 100*128/255 ≈ 50, 50*128/255 ≈ 25
        assert_eq!(&sprite.pixels()[..4], &[25, 50, 100, 128]);
    }

    #[test]
    fn fully_transparent_pixels_become_zero() {
        let sprite = Sprite::decode(&png(1, 1, Rgba([255, 255, 255, 0]))).unwrap();
        assert_eq!(sprite.pixels(), &[0, 0, 0, 0]);
    }

    #[test]
    fn rejects_empty_and_garbage_bytes() {
        assert!(matches!(Sprite::decode(&[]), Err(OverlayError::AssetLoad(_))));
        assert!(matches!(
            Sprite::decode(b"definitely not a png"),
            Err(OverlayError::AssetLoad(_))
        ));
    }

    #[test]
    fn bundled_crosshair_decodes() {
        let bytes = include_bytes!("../resources/crosshair.png");
        let sprite = Sprite::decode(bytes).unwrap();
        assert_eq!(sprite.size(), Size::new(64, 64));
        // Center dot is opaque, the corners are clear.
        let at = |x: usize, y: usize| sprite.pixels()[(y * 64 + x) * 4 + 3];
        assert_eq!(at(32, 32), 255);
        assert_eq!(at(0, 0), 0);
    }
}
