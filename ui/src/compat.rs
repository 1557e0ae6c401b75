// Re-export the public API from the appropriate module
#[cfg(target_arch = "wasm32")]
pub use wasm32::*;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::*;

/// File types offered by the image picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[cfg(target_arch = "wasm32")]
pub mod wasm32 {
    use super::IMAGE_EXTENSIONS;
    use std::time::Duration;

    pub async fn sleep(duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }

    /// Prompts the user to select an image and returns its bytes, or `None`
    /// if the picker was dismissed.
    pub async fn pick_image_file() -> Result<Option<Vec<u8>>, String> {
        let file_handle = rfd::AsyncFileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
            .await;

        match file_handle {
            Some(handle) => Ok(Some(handle.read().await)),
            None => Ok(None),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod non_wasm32 {
    use super::IMAGE_EXTENSIONS;
    use std::time::Duration;

    pub async fn sleep(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Prompts the user to select an image and returns its bytes, or `None`
    /// if the picker was dismissed.
    pub async fn pick_image_file() -> Result<Option<Vec<u8>>, String> {
        let file_handle = rfd::AsyncFileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
            .await;

        if let Some(handle) = file_handle {
            let content = tokio::fs::read(handle.path())
                .await
                .map_err(|e| e.to_string())?;
            Ok(Some(content))
        } else {
            Ok(None)
        }
    }
}
