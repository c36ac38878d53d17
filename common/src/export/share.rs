//! 共有リンクの本文生成
//!
//! mailto/smsに載せるテキストと最終的なリンクの組み立て。
//! URLエンコードはWASM側（js_sys）で行うため、リンク組み立て関数は
//! エンコード済み文字列を受け取る

use crate::report::{Report, SignatureKind};

/// メール件名
pub fn email_subject(report: &Report) -> String {
    format!("AI Analysis Report - {}", report.id)
}

/// 署名の表示値
///
/// 手描き署名のData URLをそのまま本文へ入れるとリンク長が破綻するため
/// 固定文言に置き換える
fn signature_display(report: &Report) -> &str {
    match report.signature.kind {
        SignatureKind::Digital => "Digital signature",
        SignatureKind::Text => report.signature.data.as_str(),
    }
}

/// メール本文（人間可読のサマリ）
pub fn email_body(report: &Report) -> String {
    let breakdown = &report.summary.condition_breakdown;
    format!(
        "Hi,\n\n\
         Please find the AI Image Analysis Report summary below:\n\n\
         Report ID: {id}\n\
         Generated: {generated}\n\n\
         Analysis Overview:\n\
         - Original Image: {original}\n\
         - Total Objects Detected: {detected}\n\
         - Objects Included: {included}\n\
         - Objects Verified: {verified}\n\n\
         Condition Breakdown:\n\
         - Excellent: {excellent}\n\
         - Good: {good}\n\
         - Fair: {fair}\n\
         - Poor: {poor}\n\
         - Damaged: {damaged}\n\n\
         Signed by: {signed_by}\n\
         Signature Date: {signed_on}\n\n\
         Please download the full report for complete details.\n\n\
         Best regards,\n\
         AI Image Analysis System",
        id = report.id,
        generated = report.timestamp,
        original = report.analysis.original_image,
        detected = report.analysis.total_objects_detected,
        included = report.analysis.objects_included,
        verified = report.summary.total_verified,
        excellent = breakdown.excellent,
        good = breakdown.good,
        fair = breakdown.fair,
        poor = breakdown.poor,
        damaged = breakdown.damaged,
        signed_by = signature_display(report),
        signed_on = report.signature.timestamp,
    )
}

/// SMS本文（短いサマリ）
pub fn sms_message(report: &Report) -> String {
    format!(
        "AI Analysis Report {}: {} objects verified. Report generated on {}. \
         View full details in the downloaded report.",
        report.id, report.summary.total_verified, report.timestamp
    )
}

/// mailtoリンクを組み立てる（件名・本文はエンコード済みであること）
pub fn mailto_link(address: &str, encoded_subject: &str, encoded_body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        address, encoded_subject, encoded_body
    )
}

/// smsリンクを組み立てる（本文はエンコード済みであること）
///
/// iOSはクエリ区切りが「&」、それ以外は「?」
pub fn sms_link(phone_number: &str, encoded_body: &str, is_ios: bool) -> String {
    let separator = if is_ios { '&' } else { '?' };
    format!("sms:{}{}body={}", phone_number, separator, encoded_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AnalysisSummary, ReportSummary, Signature};

    fn sample_report() -> Report {
        Report {
            id: "REPORT_1770000000000".to_string(),
            timestamp: "2026-08-04T10:05:00.000Z".to_string(),
            analysis: AnalysisSummary {
                original_image: "room.jpg".to_string(),
                total_objects_detected: 8,
                objects_included: 6,
                ..Default::default()
            },
            signature: Signature {
                kind: SignatureKind::Text,
                data: "Jane Reviewer".to_string(),
                timestamp: "2026-08-04T10:00:00.000Z".to_string(),
            },
            summary: ReportSummary {
                total_verified: 4,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_email_subject() {
        assert_eq!(
            email_subject(&sample_report()),
            "AI Analysis Report - REPORT_1770000000000"
        );
    }

    #[test]
    fn test_email_body_contains_summary_fields() {
        let body = email_body(&sample_report());

        assert!(body.starts_with("Hi,\n"));
        assert!(body.contains("Report ID: REPORT_1770000000000"));
        assert!(body.contains("- Original Image: room.jpg"));
        assert!(body.contains("- Total Objects Detected: 8"));
        assert!(body.contains("- Objects Verified: 4"));
        assert!(body.contains("Signed by: Jane Reviewer"));
        assert!(body.ends_with("AI Image Analysis System"));
    }

    #[test]
    fn test_email_body_digital_signature_not_inlined() {
        let mut report = sample_report();
        report.signature.kind = SignatureKind::Digital;
        report.signature.data = "data:image/png;base64,AAAA".to_string();

        let body = email_body(&report);
        assert!(body.contains("Signed by: Digital signature"));
        assert!(!body.contains("base64"));
    }

    #[test]
    fn test_sms_message() {
        let message = sms_message(&sample_report());
        assert!(message.starts_with("AI Analysis Report REPORT_1770000000000: 4 objects verified."));
        assert!(message.ends_with("View full details in the downloaded report."));
    }

    #[test]
    fn test_mailto_link() {
        let link = mailto_link("a@example.com", "Subject%20X", "Body%20Y");
        assert_eq!(link, "mailto:a@example.com?subject=Subject%20X&body=Body%20Y");
    }

    #[test]
    fn test_sms_link_platform_separator() {
        assert_eq!(
            sms_link("+1234567890", "msg", false),
            "sms:+1234567890?body=msg"
        );
        assert_eq!(
            sms_link("+1234567890", "msg", true),
            "sms:+1234567890&body=msg"
        );
    }
}
