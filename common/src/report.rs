//! 最終レポートの生成
//!
//! Finalise時に一度だけ構築される不変スナップショット。
//! 時刻は呼び出し側がReportClockで渡すため、生成は入力に対して決定的

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::review::{Condition, ReviewedObject};
use crate::types::AnalysisResult;

/// 署名の種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    #[default]
    Digital,
    Text,
}

impl SignatureKind {
    pub fn label(self) -> &'static str {
        match self {
            SignatureKind::Digital => "digital",
            SignatureKind::Text => "text",
        }
    }
}

/// レポート承認の署名
///
/// dataは手描きならcanvasのData URL、テキストなら入力文字列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    #[serde(rename = "type")]
    pub kind: SignatureKind,
    pub data: String,
    pub timestamp: String,
}

impl Signature {
    /// 署名が実体を持つか（空ならレポート生成はブロックされる）
    pub fn is_present(&self) -> bool {
        !self.data.trim().is_empty()
    }
}

/// レポート生成時刻。呼び出し側が実時刻を注入する
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportClock {
    pub unix_millis: u64,
    pub iso_timestamp: String,
}

/// 解析概要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSummary {
    pub original_image: String,
    /// "Available" / "Not Available"
    pub annotated_image: String,
    pub total_objects_detected: usize,
    pub objects_included: usize,
    pub processing_time_ms: u64,
    pub model_version: String,
    pub demo_mode: bool,
}

/// レポートに載るオブジェクト1件分の射影
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportObject {
    pub id: u32,
    #[serde(rename = "class")]
    pub class_name: String,
    /// 四捨五入済みの%
    pub confidence: u32,
    pub condition: Condition,
    /// 空のときは "None"
    pub comments: String,
    pub verified: bool,
    pub position: String,
    pub size: String,
}

/// 状態評価ごとの件数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionBreakdown {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
    pub damaged: usize,
}

impl ConditionBreakdown {
    fn count(objects: &[&ReviewedObject]) -> Self {
        let tally = |condition: Condition| {
            objects
                .iter()
                .filter(|o| o.condition == condition)
                .count()
        };
        ConditionBreakdown {
            excellent: tally(Condition::Excellent),
            good: tally(Condition::Good),
            fair: tally(Condition::Fair),
            poor: tally(Condition::Poor),
            damaged: tally(Condition::Damaged),
        }
    }
}

/// 集計サマリ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSummary {
    pub total_verified: usize,
    pub condition_breakdown: ConditionBreakdown,
}

/// 最終レポート
///
/// 生成後は一切変更されない。Completeステージのエクスポートだけが消費する
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub id: String,
    pub timestamp: String,
    pub analysis: AnalysisSummary,
    pub objects: Vec<ReportObject>,
    pub signature: Signature,
    pub summary: ReportSummary,
}

/// バウンディングボックスを持たない（手動追加）オブジェクトの表示値
const NOT_APPLICABLE: &str = "N/A";

/// 最終レポートを構築する
///
/// 除外フラグ付きオブジェクトは他のフィールドに関係なく対象外。
/// 署名が空のときはValidationエラー（UI側でもボタンを無効化している）。
/// 含まれるオブジェクトが0件でもレポート自体は生成できる
pub fn generate_final_report(
    objects: &[ReviewedObject],
    signature: &Signature,
    analysis: Option<&AnalysisResult>,
    original_image: Option<&str>,
    annotated_image_available: bool,
    clock: &ReportClock,
) -> Result<Report> {
    if !signature.is_present() {
        return Err(Error::Validation("A signature is required.".to_string()));
    }

    let included: Vec<&ReviewedObject> = objects.iter().filter(|o| !o.excluded).collect();

    let report_objects: Vec<ReportObject> = included
        .iter()
        .map(|obj| ReportObject {
            id: obj.id,
            class_name: obj.class_name.clone(),
            confidence: obj.confidence_percent(),
            condition: obj.condition,
            comments: if obj.comments.is_empty() {
                "None".to_string()
            } else {
                obj.comments.clone()
            },
            verified: obj.verified,
            position: obj
                .bounding_box
                .map(|b| b.position_label())
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            size: obj
                .bounding_box
                .map(|b| b.size_label())
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
        })
        .collect();

    let summary = ReportSummary {
        total_verified: included.iter().filter(|o| o.verified).count(),
        condition_breakdown: ConditionBreakdown::count(&included),
    };

    Ok(Report {
        id: format!("REPORT_{}", clock.unix_millis),
        timestamp: clock.iso_timestamp.clone(),
        analysis: AnalysisSummary {
            original_image: original_image.unwrap_or("Unknown").to_string(),
            annotated_image: if annotated_image_available {
                "Available".to_string()
            } else {
                "Not Available".to_string()
            },
            total_objects_detected: analysis.map(|a| a.detection_count()).unwrap_or(0),
            objects_included: report_objects.len(),
            processing_time_ms: analysis
                .and_then(|a| a.processing_time_ms)
                .map(|ms| ms.round() as u64)
                .unwrap_or(0),
            model_version: analysis
                .map(|a| a.model_version_label().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            demo_mode: analysis.map(|a| a.is_demo()).unwrap_or(false),
        },
        objects: report_objects,
        signature: signature.clone(),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn text_signature() -> Signature {
        Signature {
            kind: SignatureKind::Text,
            data: "Jane Reviewer".to_string(),
            timestamp: "2026-08-04T10:00:00.000Z".to_string(),
        }
    }

    fn clock() -> ReportClock {
        ReportClock {
            unix_millis: 1_770_000_000_000,
            iso_timestamp: "2026-08-04T10:05:00.000Z".to_string(),
        }
    }

    fn sample_objects() -> Vec<ReviewedObject> {
        vec![
            ReviewedObject {
                id: 1,
                class_name: "chair".to_string(),
                confidence: 0.756,
                bounding_box: Some(BoundingBox {
                    x: 300.0,
                    y: 200.0,
                    width: 150.0,
                    height: 180.0,
                }),
                verified: true,
                ..Default::default()
            },
            ReviewedObject {
                id: 2,
                class_name: "lamp".to_string(),
                confidence: 0.87,
                bounding_box: Some(BoundingBox {
                    x: 580.0,
                    y: 180.0,
                    width: 60.0,
                    height: 100.0,
                }),
                condition: Condition::Damaged,
                comments: "shade torn".to_string(),
                ..Default::default()
            },
            ReviewedObject {
                id: 3,
                class_name: "mirror".to_string(),
                confidence: 0.79,
                excluded: true,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_report_excludes_flagged_objects() {
        let report = generate_final_report(
            &sample_objects(),
            &text_signature(),
            None,
            Some("room.jpg"),
            true,
            &clock(),
        )
        .expect("レポート生成失敗");

        assert_eq!(report.objects.len(), 2);
        assert!(report.objects.iter().all(|o| o.class_name != "mirror"));
        assert_eq!(report.analysis.objects_included, 2);
        assert_eq!(report.analysis.original_image, "room.jpg");
        assert_eq!(report.analysis.annotated_image, "Available");
    }

    #[test]
    fn test_report_object_projection() {
        let report = generate_final_report(
            &sample_objects(),
            &text_signature(),
            None,
            None,
            false,
            &clock(),
        )
        .expect("レポート生成失敗");

        let chair = &report.objects[0];
        assert_eq!(chair.confidence, 76);
        assert_eq!(chair.comments, "None");
        assert_eq!(chair.position, "(300,200)");
        assert_eq!(chair.size, "150 × 180px");
        assert!(chair.verified);

        let lamp = &report.objects[1];
        assert_eq!(lamp.comments, "shade torn");
        assert_eq!(lamp.condition, Condition::Damaged);

        assert_eq!(report.analysis.original_image, "Unknown");
        assert_eq!(report.analysis.annotated_image, "Not Available");
    }

    #[test]
    fn test_report_manual_entry_has_no_position() {
        let objects = vec![ReviewedObject::manual(1, "antique clock")];
        let report = generate_final_report(
            &objects,
            &text_signature(),
            None,
            None,
            false,
            &clock(),
        )
        .expect("レポート生成失敗");

        assert_eq!(report.objects[0].confidence, 100);
        assert_eq!(report.objects[0].position, "N/A");
        assert_eq!(report.objects[0].size, "N/A");
    }

    #[test]
    fn test_report_summary_counts() {
        let report = generate_final_report(
            &sample_objects(),
            &text_signature(),
            None,
            None,
            false,
            &clock(),
        )
        .expect("レポート生成失敗");

        assert_eq!(report.summary.total_verified, 1);
        assert_eq!(report.summary.condition_breakdown.good, 1);
        assert_eq!(report.summary.condition_breakdown.damaged, 1);
        assert_eq!(report.summary.condition_breakdown.excellent, 0);
    }

    #[test]
    fn test_report_deterministic_except_clock() {
        let objects = sample_objects();
        let signature = text_signature();

        let first = generate_final_report(&objects, &signature, None, None, false, &clock())
            .expect("レポート生成失敗");
        let second_clock = ReportClock {
            unix_millis: 1_770_000_099_999,
            iso_timestamp: "2026-08-04T11:00:00.000Z".to_string(),
        };
        let second =
            generate_final_report(&objects, &signature, None, None, false, &second_clock)
                .expect("レポート生成失敗");

        assert_ne!(first.id, second.id);
        assert_ne!(first.timestamp, second.timestamp);
        assert_eq!(first.analysis, second.analysis);
        assert_eq!(first.objects, second.objects);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_report_id_from_clock() {
        let report = generate_final_report(
            &[],
            &text_signature(),
            None,
            None,
            false,
            &clock(),
        )
        .expect("レポート生成失敗");
        assert_eq!(report.id, "REPORT_1770000000000");
    }

    #[test]
    fn test_report_requires_signature() {
        let blank = Signature {
            kind: SignatureKind::Text,
            data: "   ".to_string(),
            timestamp: String::new(),
        };
        let err =
            generate_final_report(&[], &blank, None, None, false, &clock()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_report_allows_zero_included_objects() {
        let objects = vec![ReviewedObject {
            id: 1,
            excluded: true,
            ..Default::default()
        }];
        let report = generate_final_report(
            &objects,
            &text_signature(),
            None,
            None,
            false,
            &clock(),
        )
        .expect("レポート生成失敗");
        assert!(report.objects.is_empty());
        assert_eq!(report.analysis.objects_included, 0);
    }

    #[test]
    fn test_report_uses_analysis_metadata() {
        let analysis = AnalysisResult {
            predictions: vec![Default::default(), Default::default()],
            processing_time_ms: Some(2340.0),
            model_version: Some("v8.0".to_string()),
            metadata: crate::types::ResultMetadata {
                demo_mode: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let report = generate_final_report(
            &[],
            &text_signature(),
            Some(&analysis),
            Some("bedroom.jpg"),
            true,
            &clock(),
        )
        .expect("レポート生成失敗");

        assert_eq!(report.analysis.total_objects_detected, 2);
        assert_eq!(report.analysis.processing_time_ms, 2340);
        assert_eq!(report.analysis.model_version, "v8.0");
        assert!(report.analysis.demo_mode);
    }

    #[test]
    fn test_report_serialize_camel_case() {
        let report = generate_final_report(
            &sample_objects(),
            &text_signature(),
            None,
            None,
            false,
            &clock(),
        )
        .expect("レポート生成失敗");

        let json = serde_json::to_string(&report).expect("シリアライズ失敗");
        assert!(json.contains("\"originalImage\":"));
        assert!(json.contains("\"totalObjectsDetected\":"));
        assert!(json.contains("\"conditionBreakdown\":"));
        assert!(json.contains("\"class\":\"chair\""));
        assert!(json.contains("\"type\":\"text\""));
        assert!(json.contains("\"condition\":\"Damaged\""));
    }
}
