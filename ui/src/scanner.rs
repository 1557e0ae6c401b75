//! Reading a recipient address from a QR code.
//!
//! In the browser the rear camera is tried first; everywhere else, and
//! whenever no camera can be opened, the user picks a picture of the code.

use dioxus_logger::tracing;
use image::GrayImage;
use thiserror::Error;

use crate::compat;

#[cfg(target_arch = "wasm32")]
pub use self::camera::CameraScanner;

/// Symbology reported by a scan.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumString, strum::EnumIs)]
pub enum BarcodeFormat {
    #[strum(serialize = "QR_CODE")]
    QrCode,
    #[strum(default)]
    Other(String),
}

/// Result of one scan attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    pub cancelled: bool,
    pub format: BarcodeFormat,
    pub text: String,
}

impl ScanOutcome {
    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            format: BarcodeFormat::QrCode,
            text: String::new(),
        }
    }

    pub fn qr_code(text: String) -> Self {
        Self {
            cancelled: false,
            format: BarcodeFormat::QrCode,
            text,
        }
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("could not read the selected file: {0}")]
    Read(String),
    #[error("not a supported image: {0}")]
    Image(#[from] image::ImageError),
    #[error("no QR code found in image")]
    NotFound,
    #[error("failed to decode QR content: {0}")]
    Decode(String),
    #[error("camera unavailable: {0}")]
    Camera(String),
}

/// Something that can produce a barcode reading on request.
pub trait Scanner {
    async fn scan(&self) -> Result<ScanOutcome, ScanError>;
}

/// Lets the user pick a picture of a QR code and decodes it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageFileScanner;

impl Scanner for ImageFileScanner {
    async fn scan(&self) -> Result<ScanOutcome, ScanError> {
        let Some(bytes) = compat::pick_image_file().await.map_err(ScanError::Read)? else {
            tracing::debug!("image picker dismissed");
            return Ok(ScanOutcome::cancelled());
        };
        let image = image::load_from_memory(&bytes)?.to_luma8();
        decode_qr(image)
    }
}

/// The scanner behind the send screen's scan button.
#[derive(Clone, Debug)]
pub struct DeviceScanner {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    cancel_label: String,
}

impl DeviceScanner {
    /// `cancel_label` captions the button that closes the camera view.
    pub fn new(cancel_label: impl Into<String>) -> Self {
        Self {
            cancel_label: cancel_label.into(),
        }
    }
}

impl Scanner for DeviceScanner {
    async fn scan(&self) -> Result<ScanOutcome, ScanError> {
        #[cfg(target_arch = "wasm32")]
        match CameraScanner::new(self.cancel_label.clone()).scan().await {
            Err(ScanError::Camera(reason)) => {
                tracing::info!("camera unavailable ({reason}), asking for an image instead");
            }
            other => return other,
        }
        ImageFileScanner.scan().await
    }
}

/// Converts an RGBA camera frame to grayscale. A frame whose brightness
/// spans less than 200 levels is stretched to the full range first, which
/// helps detection in dim light.
///
/// Returns `None` when `rgba` holds fewer than `width * height` pixels.
pub fn rgba_to_luma(width: u32, height: u32, rgba: &[u8]) -> Option<GrayImage> {
    let mut luma: Vec<u8> = rgba
        .chunks_exact(4)
        .map(|p| (p[0] as f32 * 0.299 + p[1] as f32 * 0.587 + p[2] as f32 * 0.114) as u8)
        .collect();

    let (min, max) = luma
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let range = max.saturating_sub(min);
    if range > 0 && range < 200 {
        let scale = 255.0 / range as f32;
        for p in &mut luma {
            *p = ((*p - min) as f32 * scale).round() as u8;
        }
    }

    GrayImage::from_raw(width, height, luma)
}

/// Decodes the first QR code found in a grayscale image.
pub fn decode_qr(image: GrayImage) -> Result<ScanOutcome, ScanError> {
    let mut prepared_image = rqrr::PreparedImage::prepare(image);
    let grids = prepared_image.detect_grids();

    let Some(grid) = grids.first() else {
        return Err(ScanError::NotFound);
    };

    let (_meta, content) = grid.decode().map_err(|e| ScanError::Decode(e.to_string()))?;
    Ok(ScanOutcome::qr_code(content))
}

/// Rear camera capture for the web build: a video preview in a dialog,
/// sampled into a hidden canvas a few times a second.
#[cfg(target_arch = "wasm32")]
mod camera {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlVideoElement,
        MediaStream, MediaStreamConstraints, MediaStreamTrack,
    };

    const FRAME_INTERVAL: Duration = Duration::from_millis(250);

    fn js_error(value: JsValue) -> ScanError {
        ScanError::Camera(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }

    fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, ScanError> {
        document
            .create_element(tag)
            .map_err(js_error)?
            .dyn_into::<T>()
            .map_err(|_| ScanError::Camera(format!("<{tag}> has an unexpected type")))
    }

    #[derive(Clone, Debug)]
    pub struct CameraScanner {
        cancel_label: String,
    }

    impl CameraScanner {
        pub fn new(cancel_label: impl Into<String>) -> Self {
            Self {
                cancel_label: cancel_label.into(),
            }
        }
    }

    impl Scanner for CameraScanner {
        async fn scan(&self) -> Result<ScanOutcome, ScanError> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| ScanError::Camera("no document".into()))?;
            let stream = open_rear_camera().await?;
            let session = CameraSession::open(&document, stream, &self.cancel_label)?;

            loop {
                compat::sleep(FRAME_INTERVAL).await;
                if session.cancelled.get() {
                    tracing::debug!("camera scan cancelled");
                    return Ok(ScanOutcome::cancelled());
                }
                let Some(frame) = session.grab_frame()? else {
                    continue;
                };
                if let Ok(outcome) = decode_qr(frame) {
                    if !outcome.text.is_empty() {
                        return Ok(outcome);
                    }
                }
            }
        }
    }

    async fn open_rear_camera() -> Result<MediaStream, ScanError> {
        let window = web_sys::window().ok_or_else(|| ScanError::Camera("no window".into()))?;
        let media_devices = window.navigator().media_devices().map_err(js_error)?;

        // { facingMode: "environment" }
        let video = js_sys::Object::new();
        js_sys::Reflect::set(&video, &"facingMode".into(), &"environment".into())
            .map_err(js_error)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video);
        constraints.set_audio(&JsValue::FALSE);

        let promise = media_devices
            .get_user_media_with_constraints(&constraints)
            .map_err(js_error)?;
        let stream = JsFuture::from(promise).await.map_err(js_error)?;
        Ok(MediaStream::from(stream))
    }

    /// The open camera and its on-screen dialog. Dropping it stops the camera
    /// and removes the dialog, including when the scan future is abandoned.
    struct CameraSession {
        stream: MediaStream,
        overlay: Element,
        video: HtmlVideoElement,
        canvas: HtmlCanvasElement,
        cancelled: Rc<Cell<bool>>,
        _on_cancel: Closure<dyn FnMut()>,
    }

    impl CameraSession {
        fn open(
            document: &Document,
            stream: MediaStream,
            cancel_label: &str,
        ) -> Result<Self, ScanError> {
            let overlay: Element = create(document, "dialog")?;
            overlay.set_attribute("open", "").map_err(js_error)?;
            let article: Element = create(document, "article")?;

            let video: HtmlVideoElement = create(document, "video")?;
            video.set_autoplay(true);
            video.set_attribute("playsinline", "").map_err(js_error)?;
            video.set_attribute("style", "width: 100%;").map_err(js_error)?;
            video.set_src_object(Some(&stream));

            let canvas: HtmlCanvasElement = create(document, "canvas")?;
            canvas.set_attribute("style", "display: none;").map_err(js_error)?;

            let cancel: Element = create(document, "button")?;
            cancel.set_class_name("secondary");
            cancel.set_text_content(Some(cancel_label));

            let cancelled = Rc::new(Cell::new(false));
            let flag = cancelled.clone();
            let on_cancel = Closure::<dyn FnMut()>::new(move || flag.set(true));
            cancel
                .add_event_listener_with_callback("click", on_cancel.as_ref().unchecked_ref())
                .map_err(js_error)?;

            article.append_child(&video).map_err(js_error)?;
            article.append_child(&canvas).map_err(js_error)?;
            article.append_child(&cancel).map_err(js_error)?;
            overlay.append_child(&article).map_err(js_error)?;
            document
                .body()
                .ok_or_else(|| ScanError::Camera("no body".into()))?
                .append_child(&overlay)
                .map_err(js_error)?;

            Ok(Self {
                stream,
                overlay,
                video,
                canvas,
                cancelled,
                _on_cancel: on_cancel,
            })
        }

        /// The current frame, or `None` while the video has no size yet.
        fn grab_frame(&self) -> Result<Option<GrayImage>, ScanError> {
            let (width, height) = (self.video.video_width(), self.video.video_height());
            if width == 0 || height == 0 {
                return Ok(None);
            }
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            let ctx = self
                .canvas
                .get_context("2d")
                .map_err(js_error)?
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                .ok_or_else(|| ScanError::Camera("no 2d canvas context".into()))?;
            ctx.draw_image_with_html_video_element(&self.video, 0.0, 0.0)
                .map_err(js_error)?;
            let data = ctx
                .get_image_data(0.0, 0.0, width as f64, height as f64)
                .map_err(js_error)?;

            Ok(rgba_to_luma(width, height, &data.data().0))
        }
    }

    impl Drop for CameraSession {
        fn drop(&mut self) {
            self.stream
                .get_tracks()
                .for_each(&mut |track, _, _| MediaStreamTrack::from(track).stop());
            self.overlay.remove();
        }
    }
}
