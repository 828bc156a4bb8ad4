//! Preview handles for selected images.
//!
//! A [`PreviewHandle`] is a registered reference to a selected image, used to
//! draw the preview panel. Acquiring one registers it with the
//! [`PreviewRegistry`]; dropping it releases the registration. Because the
//! handle is owned by exactly one [`Selection`](super::Selection), every
//! transition that replaces or discards the selection releases it exactly
//! once, including teardown.
//!
//! Thumbnails decode on the blocking pool when a tokio runtime is available,
//! so selecting a large photo never stalls the UI loop. The handle reports
//! [`PreviewHandle::is_decoding`] until the pixels are ready.

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::file::SelectedImage;

/// Largest thumbnail width in pixels (one pixel per terminal column).
pub const THUMBNAIL_MAX_WIDTH: u32 = 64;

/// Largest thumbnail height in pixels (two pixels per terminal row).
pub const THUMBNAIL_MAX_HEIGHT: u32 = 40;

/// Largest width or height accepted for preview decoding.
pub const DECODE_MAX_DIMENSION: u32 = 16_384;

/// Largest allocation the decoder may make for one preview.
pub const DECODE_MAX_ALLOC: u64 = 256 * 1024 * 1024;

/// Original dimensions and thumbnail of a decoded image.
type Decoded = ((u32, u32), Thumbnail);

/// Decode result shared between a handle and its decoding task.
/// Empty while decoding; `Some(None)` when the image did not decode.
type DecodeCell = Arc<OnceLock<Option<Decoded>>>;

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashSet<u64>,
    acquired: u64,
    released: u64,
}

/// Tracks live preview handles.
///
/// Cloning the registry shares the same underlying table.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl PreviewRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new preview for `image` and returns its handle.
    ///
    /// Decoding starts on the tokio blocking pool, or runs inline when no
    /// runtime is available. Images that fail to decode still get a handle,
    /// just without pixels.
    #[must_use]
    pub fn acquire(&self, image: &SelectedImage) -> PreviewHandle {
        let id = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.live.insert(id);
            inner.acquired += 1;
            id
        };
        tracing::debug!(id, name = %image.name, "preview acquired");

        let decoded: DecodeCell = Arc::new(OnceLock::new());
        let bytes = Arc::clone(&image.bytes);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let cell = Arc::clone(&decoded);
                runtime.spawn_blocking(move || {
                    let _ = cell.set(Thumbnail::decode(&bytes));
                    tracing::debug!(id, "preview decoded");
                });
            }
            Err(_) => {
                let _ = decoded.set(Thumbnail::decode(&bytes));
            }
        }

        PreviewHandle {
            id,
            decoded,
            registry: self.clone(),
        }
    }

    /// Number of handles acquired and not yet released.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Total number of acquisitions.
    #[must_use]
    pub fn acquired(&self) -> u64 {
        self.lock().acquired
    }

    /// Total number of releases.
    #[must_use]
    pub fn released(&self) -> u64 {
        self.lock().released
    }

    /// Returns true if the handle with `id` is still registered.
    #[must_use]
    pub fn is_live(&self, id: u64) -> bool {
        self.lock().live.contains(&id)
    }

    fn release(&self, id: u64) {
        let mut inner = self.lock();
        if inner.live.remove(&id) {
            inner.released += 1;
            tracing::debug!(id, "preview released");
        } else {
            tracing::warn!(id, "preview released twice");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A registered preview of one selected image.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    decoded: DecodeCell,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// Registry identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// True until the background decode has finished.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        self.decoded.get().is_none()
    }

    /// Original image dimensions, once the image has decoded.
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.decoded.get()?.as_ref().map(|(dims, _)| *dims)
    }

    /// Downscaled pixels for drawing, once the image has decoded.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.decoded.get()?.as_ref().map(|(_, thumb)| thumb)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// Downscaled RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl Thumbnail {
    /// Decodes `bytes` and returns the original dimensions with a thumbnail
    /// that fits within [`THUMBNAIL_MAX_WIDTH`] x [`THUMBNAIL_MAX_HEIGHT`].
    ///
    /// Images larger than [`DECODE_MAX_DIMENSION`] on either side, or needing
    /// more than [`DECODE_MAX_ALLOC`] bytes, are not decoded.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<((u32, u32), Self)> {
        let mut limits = image::Limits::default();
        limits.max_image_width = Some(DECODE_MAX_DIMENSION);
        limits.max_image_height = Some(DECODE_MAX_DIMENSION);
        limits.max_alloc = Some(DECODE_MAX_ALLOC);

        let decoded = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|mut reader| {
                reader.limits(limits);
                reader.decode()
            });
        let decoded = match decoded {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!("preview decode failed: {e}");
                return None;
            }
        };
        let dimensions = (decoded.width(), decoded.height());
        // `thumbnail` scales to fit in both directions, so small images skip it.
        let rgb = if dimensions.0 <= THUMBNAIL_MAX_WIDTH && dimensions.1 <= THUMBNAIL_MAX_HEIGHT {
            decoded.to_rgb8()
        } else {
            decoded
                .thumbnail(THUMBNAIL_MAX_WIDTH, THUMBNAIL_MAX_HEIGHT)
                .to_rgb8()
        };
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Some((
            dimensions,
            Self {
                width,
                height,
                pixels,
            },
        ))
    }

    /// Returns the pixel at (`x`, `y`), or `None` outside the thumbnail.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::try_from(y * self.width + x).ok()?;
        self.pixels.get(index).copied()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Cursor;

    /// Encodes a solid-colour PNG of the given size.
    pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut out = Cursor::new(Vec::new());
        #[allow(clippy::unwrap_used)]
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::solid_png;
    use super::*;
    use crate::core::file::ImageKind;

    fn png_image(width: u32, height: u32) -> SelectedImage {
        SelectedImage::from_bytes("cat.png", ImageKind::Png, solid_png(width, height, [200, 10, 10]))
    }

    #[test]
    fn acquire_then_drop_releases_once() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(&png_image(4, 4));
        let id = handle.id();
        assert!(registry.is_live(id));
        assert_eq!(registry.live_count(), 1);

        drop(handle);

        assert!(!registry.is_live(id));
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.acquired(), 1);
        assert_eq!(registry.released(), 1);
    }

    #[test]
    fn handles_get_distinct_ids() {
        let registry = PreviewRegistry::new();
        let a = registry.acquire(&png_image(2, 2));
        let b = registry.acquire(&png_image(2, 2));
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn decodes_dimensions_and_thumbnail() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(&png_image(200, 100));

        assert_eq!(handle.dimensions(), Some((200, 100)));
        let thumb = handle.thumbnail().unwrap();
        assert!(thumb.width <= THUMBNAIL_MAX_WIDTH);
        assert!(thumb.height <= THUMBNAIL_MAX_HEIGHT);
        assert_eq!(thumb.pixels.len(), (thumb.width * thumb.height) as usize);
        assert_eq!(thumb.pixel(0, 0), Some([200, 10, 10]));
        assert_eq!(thumb.pixel(thumb.width, 0), None);
    }

    #[test]
    fn undecodable_bytes_still_get_a_handle() {
        let registry = PreviewRegistry::new();
        let image = SelectedImage::from_bytes("broken.png", ImageKind::Png, vec![0, 1, 2, 3]);
        let handle = registry.acquire(&image);

        assert!(handle.thumbnail().is_none());
        assert!(handle.dimensions().is_none());
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn oversized_images_are_not_decoded() {
        let bytes = solid_png(DECODE_MAX_DIMENSION + 1, 1, [0, 0, 0]);

        assert!(Thumbnail::decode(&bytes).is_none());
    }

    #[tokio::test]
    async fn runtime_decodes_in_background() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(&png_image(20, 10));

        for _ in 0..100 {
            if !handle.is_decoding() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(!handle.is_decoding());
        assert_eq!(handle.dimensions(), Some((20, 10)));
        assert!(handle.thumbnail().is_some());
        drop(handle);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn without_runtime_decode_is_immediate() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(&png_image(4, 4));

        assert!(!handle.is_decoding());
        assert_eq!(handle.dimensions(), Some((4, 4)));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let (dims, thumb) = Thumbnail::decode(&solid_png(3, 2, [0, 0, 0])).unwrap();
        assert_eq!(dims, (3, 2));
        assert_eq!((thumb.width, thumb.height), (3, 2));
    }
}
