//! 検出サービスの型定義
//!
//! v1スキーマ（predictions / class_name / bounding_box / processing_time_ms）を
//! 正とし、旧スキーマ（detections / class / bbox / processing_time）は
//! serde aliasで受け付ける

use serde::{Deserialize, Deserializer, Serialize};

/// バウンディングボックス（ピクセル座標）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// 表示用の位置文字列 "(x,y)"
    pub fn position_label(&self) -> String {
        format!("({},{})", self.x.round() as i64, self.y.round() as i64)
    }

    /// 表示用のサイズ文字列 "W × Hpx"
    pub fn size_label(&self) -> String {
        format!(
            "{} × {}px",
            self.width.round() as i64,
            self.height.round() as i64
        )
    }
}

/// 検出結果1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prediction {
    /// 旧APIは数値IDを返すことがあるため文字列へ正規化する
    #[serde(deserialize_with = "de_optional_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(alias = "class")]
    pub class_name: String,

    /// 0.0..=1.0
    pub confidence: f64,

    #[serde(alias = "bbox")]
    pub bounding_box: BoundingBox,
}

fn de_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// 解析結果に付随するメタデータ
///
/// demo_mode以外のキーはそのまま保持する
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultMetadata {
    pub demo_mode: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub result_id: String,

    pub filename: String,

    #[serde(alias = "timestamp")]
    pub created_at: String,

    #[serde(alias = "detections")]
    pub predictions: Vec<Prediction>,

    pub prediction_count: usize,

    /// 旧APIのprocessing_time（秒）もここに読まれる。単位の曖昧さは
    /// 解消しない方針（DESIGN.md参照）
    #[serde(alias = "processing_time")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    pub status: String,

    /// 注釈付き画像の相対URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub metadata: ResultMetadata,
}

impl AnalysisResult {
    /// デモフォールバックで合成された結果かどうか
    pub fn is_demo(&self) -> bool {
        self.metadata.demo_mode
    }

    pub fn detection_count(&self) -> usize {
        self.predictions.len()
    }

    /// 平均信頼度（四捨五入した%、検出0件なら0）
    pub fn average_confidence_percent(&self) -> u32 {
        if self.predictions.is_empty() {
            return 0;
        }
        let sum: f64 = self.predictions.iter().map(|p| p.confidence).sum();
        (sum / self.predictions.len() as f64 * 100.0).round() as u32
    }

    /// 処理時間の表示文字列
    pub fn processing_time_label(&self) -> String {
        match self.processing_time_ms {
            Some(ms) => format!("{} ms", ms.round() as u64),
            None => "Unknown".to_string(),
        }
    }

    pub fn model_version_label(&self) -> &str {
        self.model_version.as_deref().unwrap_or("Unknown")
    }
}

/// POST /api/v1/analyze のレスポンスエンベロープ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    pub success: bool,
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/v1/results の1件分サマリ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResultSummary {
    pub result_id: String,
    pub filename: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub prediction_count: usize,
    pub status: String,
}

/// GET /api/v1/results のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsListResponse {
    pub success: bool,
    pub results: Vec<AnalysisResultSummary>,
    pub total_count: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// DELETE /api/v1/results/{id} のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub deleted_result_id: String,
}

/// GET /api/v1/health のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_labels() {
        let bbox = BoundingBox {
            x: 300.0,
            y: 200.0,
            width: 150.0,
            height: 180.0,
        };
        assert_eq!(bbox.position_label(), "(300,200)");
        assert_eq!(bbox.size_label(), "150 × 180px");
    }

    #[test]
    fn test_bounding_box_labels_round_float() {
        let bbox = BoundingBox {
            x: 120.4,
            y: 199.6,
            width: 60.5,
            height: 99.5,
        };
        assert_eq!(bbox.position_label(), "(120,200)");
        assert_eq!(bbox.size_label(), "61 × 100px");
    }

    #[test]
    fn test_prediction_deserialize_v1() {
        let json = r#"{
            "id": "pred-1",
            "class_name": "bed",
            "confidence": 0.95,
            "bounding_box": {"x": 120, "y": 200, "width": 400, "height": 300}
        }"#;

        let prediction: Prediction = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(prediction.id.as_deref(), Some("pred-1"));
        assert_eq!(prediction.class_name, "bed");
        assert_eq!(prediction.confidence, 0.95);
        assert_eq!(prediction.bounding_box.width, 400.0);
    }

    #[test]
    fn test_prediction_deserialize_legacy() {
        // 旧API: class / bbox / 数値ID
        let json = r#"{
            "id": 3,
            "class": "chair",
            "confidence": 0.76,
            "bbox": {"x": 300, "y": 200, "width": 150, "height": 180}
        }"#;

        let prediction: Prediction = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(prediction.id.as_deref(), Some("3"));
        assert_eq!(prediction.class_name, "chair");
        assert_eq!(prediction.bounding_box.x, 300.0);
    }

    #[test]
    fn test_analysis_result_deserialize_missing_fields() {
        let json = r#"{"result_id": "abc"}"#;

        let result: AnalysisResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.result_id, "abc");
        assert!(result.predictions.is_empty());
        assert!(result.processing_time_ms.is_none());
        assert!(!result.is_demo());
    }

    #[test]
    fn test_analysis_result_legacy_aliases() {
        let json = r#"{
            "result_id": "legacy-1",
            "timestamp": "2026-08-04T10:00:00Z",
            "processing_time": 2.34,
            "detections": [
                {"class": "sofa", "confidence": 0.9, "bbox": {"x": 1, "y": 2, "width": 3, "height": 4}}
            ]
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.created_at, "2026-08-04T10:00:00Z");
        assert_eq!(result.predictions.len(), 1);
        assert_eq!(result.predictions[0].class_name, "sofa");
        assert_eq!(result.processing_time_ms, Some(2.34));
    }

    #[test]
    fn test_average_confidence_percent() {
        let result = AnalysisResult {
            predictions: vec![
                Prediction {
                    confidence: 0.95,
                    ..Default::default()
                },
                Prediction {
                    confidence: 0.84,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        // (0.95 + 0.84) / 2 = 0.895 -> 90%
        assert_eq!(result.average_confidence_percent(), 90);
    }

    #[test]
    fn test_average_confidence_percent_empty() {
        assert_eq!(AnalysisResult::default().average_confidence_percent(), 0);
    }

    #[test]
    fn test_metadata_preserves_extra_keys() {
        let json = r#"{"demo_mode": true, "note": "n", "source": "upload"}"#;
        let metadata: ResultMetadata = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(metadata.demo_mode);
        assert_eq!(metadata.extra.get("source").and_then(|v| v.as_str()), Some("upload"));

        let back = serde_json::to_string(&metadata).expect("シリアライズ失敗");
        assert!(back.contains("\"source\":\"upload\""));
    }

    #[test]
    fn test_processing_time_label() {
        let mut result = AnalysisResult {
            processing_time_ms: Some(2340.0),
            ..Default::default()
        };
        assert_eq!(result.processing_time_label(), "2340 ms");

        result.processing_time_ms = None;
        assert_eq!(result.processing_time_label(), "Unknown");
    }

    #[test]
    fn test_results_list_response_deserialize() {
        let json = r#"{
            "success": true,
            "results": [
                {"result_id": "r1", "filename": "a.jpg", "created_at": "2026-08-04T10:00:00Z",
                 "prediction_count": 8, "status": "completed"}
            ],
            "total_count": 1,
            "limit": 10,
            "offset": 0,
            "has_more": false
        }"#;

        let response: ResultsListResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(response.success);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].prediction_count, 8);
        assert!(!response.has_more);
    }
}
