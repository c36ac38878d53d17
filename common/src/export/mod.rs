//! レポートのエクスポート
//!
//! すべてクライアント側で完結する純粋な文字列生成。
//! HTML/CSV/JSONのダウンロードとmailto/smsの共有リンクを扱う

pub mod csv;
pub mod html;
pub mod share;

use crate::error::{Error, Result};
use crate::report::Report;

/// レポートの生JSONダンプ
pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| Error::Parse(e.to_string()))
}

pub fn json_filename(report: &Report) -> String {
    format!("Analysis_Report_{}.json", report.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Signature, SignatureKind};

    #[test]
    fn test_render_json_pretty() {
        let report = Report {
            id: "REPORT_1".to_string(),
            signature: Signature {
                kind: SignatureKind::Text,
                data: "Jane".to_string(),
                timestamp: "t".to_string(),
            },
            ..Default::default()
        };

        let json = render_json(&report).expect("JSON変換失敗");
        assert!(json.contains("\"id\": \"REPORT_1\""));
        assert!(json.contains("\"analysis\""));
    }

    #[test]
    fn test_json_filename() {
        let report = Report {
            id: "REPORT_42".to_string(),
            ..Default::default()
        };
        assert_eq!(json_filename(&report), "Analysis_Report_REPORT_42.json");
    }
}
