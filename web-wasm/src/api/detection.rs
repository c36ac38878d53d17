//! 検出サービスAPIクライアント
//!
//! fetchベースの薄いラッパー。リトライ・バッチ・認証は持たない
//! （認証が必要になったときのためのフックだけ置いてある）。
//! 失敗は common::Error の分類（接続不可/タイムアウト/サービスエラー）へ
//! 明示的に落とし込む

use futures::future::{select, Either};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, FormData, Request, RequestInit, RequestMode, Response};

use inventory_ai_common::types::{DeleteResponse, HealthResponse, ResultsListResponse};
use inventory_ai_common::{parser, AnalysisResult, Error, Result};

/// デフォルトの接続先
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// 1リクエストあたりのタイムアウト（画像解析を見込んで30秒固定）
pub const REQUEST_TIMEOUT_MS: u32 = 30_000;

const GENERIC_ANALYZE_FAILURE: &str = "Failed to analyze image. Please try again.";
const GENERIC_REQUEST_FAILURE: &str = "Request failed. Please try again.";

/// 検出サービスクライアント
#[derive(Debug, Clone)]
pub struct DetectionApi {
    base_url: String,
}

impl Default for DetectionApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl DetectionApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 注釈付き画像のURL
    pub fn result_image_url(&self, result_id: &str) -> String {
        format!("{}/api/v1/results/{}/image", self.base_url, result_id)
    }

    /// サービスが返す相対URLを絶対URLへ
    ///
    /// base_url側は末尾スラッシュを落としてあるので、区切りが
    /// ちょうど1つになるようpath側で補う
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 画像を解析する（POST /api/v1/analyze, multipart）
    pub async fn analyze(
        &self,
        image: &web_sys::File,
        user_id: Option<&str>,
        metadata: Option<&str>,
    ) -> Result<AnalysisResult> {
        let form = FormData::new().map_err(transport_error)?;
        form.append_with_blob_and_filename("image", image, &image.name())
            .map_err(transport_error)?;
        if let Some(user_id) = user_id {
            form.append_with_str("user_id", user_id)
                .map_err(transport_error)?;
        }
        if let Some(metadata) = metadata {
            form.append_with_str("metadata", metadata)
                .map_err(transport_error)?;
        }

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        // Content-Typeはブラウザがboundary付きで設定する
        opts.set_body(&form);

        let response = self
            .send(
                &format!("{}/api/v1/analyze", self.base_url),
                &opts,
                GENERIC_ANALYZE_FAILURE,
            )
            .await?;
        let body = read_text(&response).await?;
        parser::parse_analysis_response(&body)
    }

    /// 解析結果を取得する（GET /api/v1/results/{id}）
    pub async fn get_result(&self, result_id: &str) -> Result<AnalysisResult> {
        let opts = get_options();
        let response = self
            .send(
                &format!("{}/api/v1/results/{}", self.base_url, result_id),
                &opts,
                GENERIC_REQUEST_FAILURE,
            )
            .await?;
        let body = read_text(&response).await?;
        parser::parse_analysis_response(&body)
    }

    /// 解析履歴を取得する（GET /api/v1/results）
    pub async fn list_results(
        &self,
        user_id: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<ResultsListResponse> {
        let mut url = format!(
            "{}/api/v1/results?limit={}&offset={}",
            self.base_url, limit, offset
        );
        if let Some(user_id) = user_id {
            url.push_str("&user_id=");
            url.push_str(user_id);
        }

        let opts = get_options();
        let response = self.send(&url, &opts, GENERIC_REQUEST_FAILURE).await?;
        read_json(&response).await
    }

    /// 解析結果を削除する（DELETE /api/v1/results/{id}）
    pub async fn delete_result(&self, result_id: &str) -> Result<DeleteResponse> {
        let opts = RequestInit::new();
        opts.set_method("DELETE");
        opts.set_mode(RequestMode::Cors);

        let response = self
            .send(
                &format!("{}/api/v1/results/{}", self.base_url, result_id),
                &opts,
                GENERIC_REQUEST_FAILURE,
            )
            .await?;
        read_json(&response).await
    }

    /// ヘルスチェック（GET /api/v1/health）
    pub async fn health(&self) -> Result<HealthResponse> {
        let opts = get_options();
        let response = self
            .send(
                &format!("{}/api/v1/health", self.base_url),
                &opts,
                GENERIC_REQUEST_FAILURE,
            )
            .await?;
        read_json(&response).await
    }

    /// fetch本体
    ///
    /// タイムアウトとレースさせ、負けた側のリクエストは中断する。
    /// HTTPレスポンス自体が返らない失敗だけをConnectivityに分類する
    async fn send(&self, url: &str, opts: &RequestInit, fallback: &str) -> Result<Response> {
        let controller = AbortController::new().map_err(transport_error)?;
        opts.set_signal(Some(&controller.signal()));

        let request = prepare_request(url, opts)?;

        let window = web_sys::window()
            .ok_or_else(|| Error::Connectivity("window unavailable".to_string()))?;
        let fetch = JsFuture::from(window.fetch_with_request(&request));
        let timeout = TimeoutFuture::new(REQUEST_TIMEOUT_MS);
        futures::pin_mut!(fetch, timeout);

        let response_value = match select(fetch, timeout).await {
            Either::Left((response, _)) => response.map_err(transport_error)?,
            Either::Right((_, _)) => {
                controller.abort();
                return Err(Error::Timeout(REQUEST_TIMEOUT_MS));
            }
        };

        let response: Response = response_value.dyn_into().map_err(transport_error)?;
        if !response.ok() {
            let status = response.status();
            let body = read_text(&response).await.unwrap_or_default();
            return Err(Error::Service {
                status,
                message: parser::extract_error_message(&body, fallback),
            });
        }
        Ok(response)
    }
}

/// リクエスト直前のフック
///
/// 現状は素通し。認証トークンを付ける場合はここでヘッダを足す
fn prepare_request(url: &str, opts: &RequestInit) -> Result<Request> {
    Request::new_with_str_and_init(url, opts).map_err(transport_error)
}

fn get_options() -> RequestInit {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    opts
}

async fn read_text(response: &Response) -> Result<String> {
    let promise = response.text().map_err(transport_error)?;
    let value = JsFuture::from(promise).await.map_err(transport_error)?;
    Ok(value.as_string().unwrap_or_default())
}

async fn read_json<T: serde::de::DeserializeOwned>(response: &Response) -> Result<T> {
    let promise = response.json().map_err(transport_error)?;
    let value = JsFuture::from(promise).await.map_err(transport_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| Error::Parse(e.to_string()))
}

/// fetchの失敗（レスポンスなし）をConnectivityへ
fn transport_error(err: JsValue) -> Error {
    let reason = err
        .as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", err));
    Error::Connectivity(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slashes() {
        let api = DetectionApi::new("http://example.com:8000///");
        assert_eq!(api.base_url(), "http://example.com:8000");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(DetectionApi::default().base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_result_image_url() {
        let api = DetectionApi::default();
        assert_eq!(
            api.result_image_url("abc-123"),
            "http://localhost:8000/api/v1/results/abc-123/image"
        );
    }

    #[test]
    fn test_absolute_url_prefixes_relative_paths() {
        let api = DetectionApi::default();
        assert_eq!(
            api.absolute_url("/api/v1/results/x/image"),
            "http://localhost:8000/api/v1/results/x/image"
        );
    }

    #[test]
    fn test_absolute_url_inserts_missing_separator() {
        // 先頭スラッシュなしの素のパスを返すサーバーもある
        let api = DetectionApi::default();
        assert_eq!(
            api.absolute_url("api/v1/results/x/image"),
            "http://localhost:8000/api/v1/results/x/image"
        );
    }

    #[test]
    fn test_absolute_url_keeps_full_urls() {
        let api = DetectionApi::default();
        assert_eq!(
            api.absolute_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }
}
