//! One-shot export of the curve store to a native kernel document.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::error::SketchError;
use crate::kernel::GeometryKernel;
use crate::state::CurveStore;

/// Where exported bytes end up.
pub trait SaveTarget {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), SketchError>;
}

pub fn serialize_curves<K: GeometryKernel>(
    kernel: &K,
    curves: &CurveStore<K::Curve>,
) -> Result<Vec<u8>, SketchError> {
    if curves.is_empty() {
        return Err(SketchError::EmptyExport);
    }
    Ok(kernel.serialize_document(curves.as_slice())?)
}

/// Serializes and saves; returns the number of bytes written.
pub fn export_curves<K: GeometryKernel, T: SaveTarget>(
    kernel: &K,
    curves: &CurveStore<K::Curve>,
    file_name: &str,
    target: &mut T,
) -> Result<usize, SketchError> {
    let bytes = serialize_curves(kernel, curves)?;
    target.save(file_name, &bytes)?;
    log::info!(
        "exported {} curve(s) to {file_name} ({} bytes)",
        curves.len(),
        bytes.len()
    );
    Ok(bytes.len())
}

/// Object URLs outlive the click by this long; browsers fetch the download
/// on a later task.
const REVOKE_DELAY_MS: i32 = 1_000;

/// Triggers a browser download through a temporary object URL.
#[derive(Debug, Default)]
pub struct BrowserDownload;

impl SaveTarget for BrowserDownload {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), SketchError> {
        let window = web_sys::window().ok_or_else(|| SketchError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SketchError::Host("no document".into()))?;

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let opts = BlobPropertyBag::new();
        opts.set_type("application/octet-stream");
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let link = document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| SketchError::Host("<a> is not an anchor element".into()))?;
        link.set_href(&url);
        link.set_download(file_name);
        link.click();

        let revoke = Closure::once_into_js(move || {
            if let Err(e) = Url::revoke_object_url(&url) {
                log::warn!("could not revoke {url}: {e:?}");
            }
        });
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.unchecked_ref(),
            REVOKE_DELAY_MS,
        )?;
        Ok(())
    }
}
