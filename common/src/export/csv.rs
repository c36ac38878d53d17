//! CSVエクスポート
//!
//! 含まれるオブジェクト1件につき1行。コメント欄はカンマを含み得るため
//! 常にダブルクォートで囲む

use crate::report::Report;

/// 固定ヘッダ行
pub const CSV_HEADER: &str = "ID,Class,Confidence (%),Comments,Verified,Position,Size";

/// レポートをCSV文字列へ変換する
pub fn render_csv(report: &Report) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];
    for obj in &report.objects {
        lines.push(format!(
            "{},{},{},\"{}\",{},{},{}",
            obj.id,
            obj.class_name,
            obj.confidence,
            obj.comments.replace('"', "\"\""),
            if obj.verified { "Yes" } else { "No" },
            obj.position,
            obj.size,
        ));
    }
    lines.join("\n")
}

pub fn csv_filename(report: &Report) -> String {
    format!("Analysis_Report_{}.csv", report.id)
}
