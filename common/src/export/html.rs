//! HTMLレポートエクスポート
//!
//! インラインCSSのみで完結する単一HTML文書を生成する。
//! ユーザー入力由来のテキストはエスケープする

use crate::report::{Report, SignatureKind};

const STYLE: &str = r#"
        body {
            font-family: 'Arial', sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .container {
            max-width: 800px;
            margin: 0 auto;
            background-color: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 2px solid #667eea;
            padding-bottom: 20px;
        }
        .title {
            color: #667eea;
            margin-bottom: 10px;
        }
        .section {
            margin-bottom: 25px;
        }
        .section-title {
            background-color: #f8fafc;
            padding: 10px;
            margin-bottom: 15px;
            border-left: 4px solid #667eea;
            font-weight: bold;
        }
        .info-grid {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 10px;
            margin-bottom: 15px;
        }
        .info-item {
            display: flex;
            justify-content: space-between;
            padding: 8px;
            background-color: #f9fafb;
            border-radius: 4px;
        }
        .objects-table {
            width: 100%;
            border-collapse: collapse;
            margin-top: 10px;
        }
        .objects-table th,
        .objects-table td {
            border: 1px solid #e2e8f0;
            padding: 8px;
            text-align: left;
        }
        .objects-table th {
            background-color: #f8fafc;
            font-weight: bold;
        }
        .signature-section {
            margin-top: 30px;
            padding: 20px;
            background-color: #f8fafc;
            border-radius: 6px;
            text-align: center;
        }
        .condition-excellent { background-color: #dcfce7; color: #166534; }
        .condition-good { background-color: #dbeafe; color: #1e40af; }
        .condition-fair { background-color: #fef3c7; color: #92400e; }
        .condition-poor { background-color: #fed7d7; color: #c53030; }
        .condition-damaged { background-color: #fee2e2; color: #991b1b; }
        .verified { font-weight: bold; color: #059669; }
        .footer {
            margin-top: 30px;
            text-align: center;
            font-size: 0.9em;
            color: #6b7280;
        }
"#;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn info_item(label: &str, value: &str) -> String {
    format!(
        "                <div class=\"info-item\">\n                    \
         <span><strong>{}:</strong></span>\n                    \
         <span>{}</span>\n                </div>\n",
        label,
        escape_html(value)
    )
}

fn object_rows(report: &Report) -> String {
    let mut rows = String::new();
    for obj in &report.objects {
        let condition = obj.condition.label();
        rows.push_str(&format!(
            "                    <tr>\n                        \
             <td>{}</td>\n                        \
             <td style=\"text-transform: capitalize;\">{}</td>\n                        \
             <td>{}%</td>\n                        \
             <td class=\"condition-{}\">{}</td>\n                        \
             <td style=\"font-family: monospace;\">{}</td>\n                        \
             <td style=\"font-family: monospace;\">{}</td>\n                        \
             <td class=\"{}\">{}</td>\n                        \
             <td>{}</td>\n                    </tr>\n",
            obj.id,
            escape_html(&obj.class_name),
            obj.confidence,
            condition.to_lowercase(),
            condition,
            escape_html(&obj.position),
            escape_html(&obj.size),
            if obj.verified { "verified" } else { "" },
            if obj.verified { "✓ Verified" } else { "Pending" },
            escape_html(&obj.comments),
        ));
    }
    rows
}

fn signature_block(report: &Report) -> String {
    match report.signature.kind {
        // 手描き署名はData URLをそのまま埋め込む
        SignatureKind::Digital => format!(
            "            <img src=\"{}\" alt=\"Digital signature\" \
             style=\"max-height: 80px; margin: 10px 0;\"/>\n",
            report.signature.data
        ),
        SignatureKind::Text => format!(
            "            <div style=\"font-family: cursive; font-size: 1.5em; \
             margin: 10px 0;\">{}</div>\n",
            escape_html(&report.signature.data)
        ),
    }
}

fn demo_banner(report: &Report) -> &'static str {
    if report.analysis.demo_mode {
        "            <div style=\"padding: 10px; background-color: #fef3c7; \
         border-radius: 4px; color: #92400e; text-align: center;\">\
         <strong>⚠️ Generated in Demo Mode</strong></div>\n"
    } else {
        ""
    }
}

/// レポートを単一HTML文書へ変換する
pub fn render_html(report: &Report) -> String {
    let mut overview = String::new();
    overview.push_str(&info_item("Original Image", &report.analysis.original_image));
    overview.push_str(&info_item(
        "Total Objects Detected",
        &report.analysis.total_objects_detected.to_string(),
    ));
    overview.push_str(&info_item(
        "Objects Included",
        &report.analysis.objects_included.to_string(),
    ));
    overview.push_str(&info_item(
        "Processing Time",
        &format!("{} ms", report.analysis.processing_time_ms),
    ));
    overview.push_str(&info_item("Model Version", &report.analysis.model_version));
    overview.push_str(&info_item("Annotated Image", &report.analysis.annotated_image));

    let breakdown = &report.summary.condition_breakdown;
    let mut statistics = String::new();
    statistics.push_str(&info_item(
        "Total Verified",
        &report.summary.total_verified.to_string(),
    ));
    statistics.push_str(&info_item("Excellent Condition", &breakdown.excellent.to_string()));
    statistics.push_str(&info_item("Good Condition", &breakdown.good.to_string()));
    statistics.push_str(&info_item("Fair Condition", &breakdown.fair.to_string()));
    statistics.push_str(&info_item("Poor Condition", &breakdown.poor.to_string()));
    statistics.push_str(&info_item("Damaged", &breakdown.damaged.to_string()));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI Analysis Report - {id}</title>
    <style>{style}    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1 class="title">🔍 AI Image Analysis Report</h1>
            <p><strong>Report ID:</strong> {id}</p>
            <p><strong>Generated:</strong> {timestamp}</p>
        </div>

        <div class="section">
            <div class="section-title">📊 Analysis Overview</div>
            <div class="info-grid">
{overview}            </div>
{demo_banner}        </div>

        <div class="section">
            <div class="section-title">📋 Detected Objects</div>
            <table class="objects-table">
                <thead>
                    <tr>
                        <th>ID</th>
                        <th>Class</th>
                        <th>Confidence</th>
                        <th>Condition</th>
                        <th>Position</th>
                        <th>Size</th>
                        <th>Status</th>
                        <th>Comments</th>
                    </tr>
                </thead>
                <tbody>
{rows}                </tbody>
            </table>
        </div>

        <div class="section">
            <div class="section-title">📈 Summary Statistics</div>
            <div class="info-grid">
{statistics}            </div>
        </div>

        <div class="signature-section">
            <div class="section-title">✍️ Authorization</div>
            <p><strong>Report signed by:</strong></p>
{signature}            <p><strong>Signed on:</strong> {signed_on}</p>
        </div>

        <div class="footer">
            <p>This report was generated automatically by the AI Image Analysis System</p>
            <p>Report ID: {id} | Generated: {timestamp}</p>
        </div>
    </div>
</body>
</html>"#,
        id = escape_html(&report.id),
        style = STYLE,
        timestamp = escape_html(&report.timestamp),
        overview = overview,
        demo_banner = demo_banner(report),
        rows = object_rows(report),
        statistics = statistics,
        signature = signature_block(report),
        signed_on = escape_html(&report.signature.timestamp),
    )
}

pub fn html_filename(report: &Report) -> String {
    format!("Analysis_Report_{}.html", report.id)
}
