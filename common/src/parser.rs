//! APIレスポンスパーサー
//!
//! v1の {success, result} エンベロープと旧APIの素の結果オブジェクトの
//! 両方を受け付ける。スキーマ差分（detections/bbox等）はtypes側のaliasで吸収する

use crate::error::{Error, Result};
use crate::types::{AnalysisResponse, AnalysisResult};

/// 解析レスポンス本文をパースする
///
/// "success"キーがあればv1エンベロープとして扱い、なければ
/// 旧APIの素の結果として読む
pub fn parse_analysis_response(body: &str) -> Result<AnalysisResult> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;

    let is_envelope = value
        .as_object()
        .map(|obj| obj.contains_key("success"))
        .unwrap_or(false);

    if is_envelope {
        let envelope: AnalysisResponse =
            serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))?;
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "invalid response format from API".to_string());
            return Err(Error::Parse(message));
        }
        return envelope
            .result
            .ok_or_else(|| Error::Parse("missing result field".to_string()));
    }

    serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))
}

/// エラーレスポンス本文から表示用メッセージを抽出する
///
/// 優先順位: detail → message → error → fallback
pub fn extract_error_message(body: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    fallback.to_string()
}
