//! 生成物のダウンロード
//!
//! BlobをオブジェクトURLにしてアンカー経由でダウンロードを発火させる。
//! サーバーラウンドトリップは発生しない

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// 文字列コンテンツをファイルとしてダウンロードさせる
pub fn download_text(content: &str, filename: &str, mime_type: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;

    let url = Url::create_object_url_with_blob(&blob)?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("body unavailable"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)?;
    Ok(())
}

/// ダウンロード失敗はコンソールに残すだけ（UIは継続）
pub fn download_or_log(content: &str, filename: &str, mime_type: &str) {
    if let Err(err) = download_text(content, filename, mime_type) {
        web_sys::console::error_1(&err);
    }
}
