//! デモモードのフォールバックデータ
//!
//! バックエンド未起動でもUIを一通り触れるようにするための決定的なダミー結果。
//! エラー回復ではなく開発用の隠蔽である点はUploadステージ側のコメント参照

use crate::types::{AnalysisResult, BoundingBox, Prediction, ResultMetadata};

pub const DEMO_RESULT_ID: &str = "demo-uuid-12345";
pub const DEMO_MODEL_VERSION: &str = "v8.0";
pub const DEMO_PROCESSING_TIME_MS: f64 = 2340.0;

/// 接続不可と判定してからダミー結果を返すまでの演出ディレイ
pub const DEMO_FALLBACK_DELAY_MS: u32 = 2_000;

const DEMO_NOTE: &str = "This is demo data. Backend server is not running on localhost:8000";

/// (class_name, confidence, x, y, width, height)
const DEMO_PREDICTIONS: [(&str, f64, f64, f64, f64, f64); 8] = [
    ("bed", 0.95, 120.0, 200.0, 400.0, 300.0),
    ("nightstand", 0.84, 560.0, 240.0, 100.0, 120.0),
    ("lamp", 0.87, 580.0, 180.0, 60.0, 100.0),
    ("dresser", 0.82, 700.0, 300.0, 180.0, 200.0),
    ("mirror", 0.79, 720.0, 120.0, 160.0, 200.0),
    ("closet", 0.86, 50.0, 100.0, 200.0, 400.0),
    ("painting", 0.80, 420.0, 90.0, 220.0, 140.0),
    ("rug", 0.83, 200.0, 500.0, 300.0, 180.0),
];

/// デモ用の解析結果を合成する
///
/// 件数・信頼度・ボックスはすべて固定。可変なのはファイル名と時刻だけ
pub fn demo_result(filename: &str, created_at: &str) -> AnalysisResult {
    let predictions: Vec<Prediction> = DEMO_PREDICTIONS
        .iter()
        .enumerate()
        .map(|(index, (class_name, confidence, x, y, width, height))| Prediction {
            id: Some(format!("pred-{}", index + 1)),
            class_name: class_name.to_string(),
            confidence: *confidence,
            bounding_box: BoundingBox {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            },
        })
        .collect();

    AnalysisResult {
        result_id: DEMO_RESULT_ID.to_string(),
        filename: filename.to_string(),
        created_at: created_at.to_string(),
        prediction_count: predictions.len(),
        predictions,
        processing_time_ms: Some(DEMO_PROCESSING_TIME_MS),
        model_version: Some(DEMO_MODEL_VERSION.to_string()),
        status: "completed".to_string(),
        image_url: None,
        metadata: ResultMetadata {
            demo_mode: true,
            note: Some(DEMO_NOTE.to_string()),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_result_shape() {
        let result = demo_result("bedroom.jpg", "2026-08-04T10:00:00.000Z");

        assert_eq!(result.result_id, DEMO_RESULT_ID);
        assert_eq!(result.filename, "bedroom.jpg");
        assert_eq!(result.predictions.len(), 8);
        assert_eq!(result.prediction_count, 8);
        assert_eq!(result.model_version.as_deref(), Some("v8.0"));
        assert_eq!(result.status, "completed");
        assert!(result.is_demo());
        assert!(result.metadata.note.is_some());
    }

    #[test]
    fn test_demo_result_first_prediction() {
        let result = demo_result("x.jpg", "");
        let bed = &result.predictions[0];
        assert_eq!(bed.id.as_deref(), Some("pred-1"));
        assert_eq!(bed.class_name, "bed");
        assert_eq!(bed.confidence, 0.95);
        assert_eq!(bed.bounding_box.x, 120.0);
        assert_eq!(bed.bounding_box.height, 300.0);
    }

    #[test]
    fn test_demo_result_is_deterministic() {
        let a = demo_result("same.jpg", "2026-08-04T10:00:00.000Z");
        let b = demo_result("same.jpg", "2026-08-04T10:00:00.000Z");
        assert_eq!(a, b);
    }
}
