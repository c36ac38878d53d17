//! 確定ステージ
//!
//! サマリ確認と署名キャプチャ。手描き（canvas）とテキストの2モードで、
//! モード切替では互いのデータを消さない。署名が空の間は
//! レポート生成ボタンが無効のままになる（例外経路はない）

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use inventory_ai_common::{
    generate_final_report, review, ReportClock, SessionPatch, Signature, SignatureKind,
};

use crate::workflow::{now_iso, now_millis, use_workflow};

fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into().ok())
}

#[component]
pub fn FinaliseStage() -> impl IntoView {
    let workflow = use_workflow();
    let (signature_mode, set_signature_mode) = signal(SignatureKind::Digital);
    let (text_signature, set_text_signature) = signal(String::new());
    let (is_drawing, set_is_drawing) = signal(false);
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    let has_signature = move || {
        workflow.with(|s| {
            s.signature
                .as_ref()
                .map(|sig| sig.is_present())
                .unwrap_or(false)
        })
    };
    let is_demo = move || {
        workflow.with(|s| {
            s.analysis_result
                .as_ref()
                .map(|r| r.is_demo())
                .unwrap_or(false)
        })
    };
    let signature_preview = move || {
        workflow
            .with(|s| s.signature.clone())
            .filter(|sig| sig.is_present())
    };

    let summary_items = move || {
        workflow.with(|s| {
            let included: Vec<_> =
                review::effective_objects(&s.reviewed_objects, &s.object_groups)
                    .into_iter()
                    .filter(|o| !o.excluded)
                    .collect();
            vec![
                (
                    "Total Objects Detected",
                    s.analysis_result
                        .as_ref()
                        .map(|r| r.detection_count())
                        .unwrap_or(0)
                        .to_string(),
                ),
                ("Objects Included", included.len().to_string()),
                (
                    "Objects Verified",
                    included.iter().filter(|o| o.verified).count().to_string(),
                ),
                (
                    "Processing Time",
                    s.analysis_result
                        .as_ref()
                        .map(|r| r.processing_time_label())
                        .unwrap_or_else(|| "Unknown".to_string()),
                ),
                (
                    "Model Version",
                    s.analysis_result
                        .as_ref()
                        .map(|r| r.model_version_label().to_string())
                        .unwrap_or_else(|| "Unknown".to_string()),
                ),
                (
                    "Analysis Date",
                    now_iso().chars().take(10).collect::<String>(),
                ),
            ]
        })
    };

    // 手描き署名
    let on_mouse_down = move |ev: web_sys::MouseEvent| {
        if signature_mode.get_untracked() != SignatureKind::Digital {
            return;
        }
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        set_is_drawing.set(true);
        let rect = canvas.get_bounding_client_rect();
        if let Some(ctx) = canvas_context(&canvas) {
            ctx.begin_path();
            ctx.move_to(
                ev.client_x() as f64 - rect.left(),
                ev.client_y() as f64 - rect.top(),
            );
        }
    };
    let on_mouse_move = move |ev: web_sys::MouseEvent| {
        if !is_drawing.get_untracked() || signature_mode.get_untracked() != SignatureKind::Digital
        {
            return;
        }
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let rect = canvas.get_bounding_client_rect();
        if let Some(ctx) = canvas_context(&canvas) {
            ctx.line_to(
                ev.client_x() as f64 - rect.left(),
                ev.client_y() as f64 - rect.top(),
            );
            ctx.stroke();
        }
    };
    // ストローク終了時点のビットマップを署名として採用する
    let on_mouse_up = move |_: web_sys::MouseEvent| {
        if signature_mode.get_untracked() != SignatureKind::Digital
            || !is_drawing.get_untracked()
        {
            return;
        }
        set_is_drawing.set(false);
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        if let Ok(data_url) = canvas.to_data_url() {
            workflow.patch(SessionPatch {
                signature: Some(Some(Signature {
                    kind: SignatureKind::Digital,
                    data: data_url,
                    timestamp: now_iso(),
                })),
                ..Default::default()
            });
        }
    };

    let on_text_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        set_text_signature.set(value.clone());
        let trimmed = value.trim().to_string();
        let signature = if trimmed.is_empty() {
            None
        } else {
            Some(Signature {
                kind: SignatureKind::Text,
                data: trimmed,
                timestamp: now_iso(),
            })
        };
        workflow.patch(SessionPatch {
            signature: Some(signature),
            ..Default::default()
        });
    };

    // クリアは明示操作のみ。アクティブなモードの入力だけ消す
    let on_clear_signature = move |_| {
        if signature_mode.get_untracked() == SignatureKind::Digital {
            if let Some(canvas) = canvas_ref.get_untracked() {
                if let Some(ctx) = canvas_context(&canvas) {
                    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
                }
            }
        } else {
            set_text_signature.set(String::new());
        }
        workflow.patch(SessionPatch {
            signature: Some(None),
            ..Default::default()
        });
    };

    let on_generate = move |_| {
        workflow.update(|s| {
            // ボタンのdisabledが効いている限りここで署名は必ずある
            let Some(signature) = s.signature.clone().filter(|sig| sig.is_present()) else {
                return;
            };
            let included = review::effective_objects(&s.reviewed_objects, &s.object_groups);
            let clock = ReportClock {
                unix_millis: now_millis(),
                iso_timestamp: now_iso(),
            };
            match generate_final_report(
                &included,
                &signature,
                s.analysis_result.as_ref(),
                s.selected_file.as_ref().map(|f| f.name.as_str()),
                s.annotated_image_url.is_some(),
                &clock,
            ) {
                Ok(report) => s.final_report = Some(report),
                Err(err) => web_sys::console::error_1(&err.to_string().into()),
            }
        });
    };

    view! {
        <div class="finalise-stage">
            <h2>"Finalise Report"</h2>
            <p class="text-muted">
                "Review the analysis summary below and provide your signature to finalise the report."
            </p>

            <div class="summary-card">
                <h3>"Summary"</h3>
                <div class="summary-grid">
                    {move || {
                        summary_items()
                            .into_iter()
                            .map(|(label, value)| {
                                view! {
                                    <div class="summary-item">
                                        <span class="summary-key">{label} ":"</span>
                                        <span>{value}</span>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>
                <Show when=is_demo>
                    <div class="demo-banner">"⚠️ Report generated in demo mode"</div>
                </Show>
            </div>

            <div class="signature-section">
                <h3>"Signature Required"</h3>

                <div class="mode-selector">
                    <button
                        class="mode-button"
                        class:active=move || signature_mode.get() == SignatureKind::Digital
                        on:click=move |_| set_signature_mode.set(SignatureKind::Digital)
                    >
                        "✏️ Digital Signature"
                    </button>
                    <button
                        class="mode-button"
                        class:active=move || signature_mode.get() == SignatureKind::Text
                        on:click=move |_| set_signature_mode.set(SignatureKind::Text)
                    >
                        "📝 Text Signature"
                    </button>
                </div>

                <Show when=move || signature_mode.get() == SignatureKind::Digital>
                    <div>
                        <canvas
                            node_ref=canvas_ref
                            class="signature-canvas"
                            width="400"
                            height="150"
                            on:mousedown=on_mouse_down
                            on:mousemove=on_mouse_move
                            on:mouseup=on_mouse_up
                            on:mouseleave=on_mouse_up
                        ></canvas>
                        <p class="text-muted">"Click and drag to draw your signature above"</p>
                    </div>
                </Show>

                <Show when=move || signature_mode.get() == SignatureKind::Text>
                    <input
                        type="text"
                        class="text-signature-input"
                        placeholder="Enter your full name"
                        prop:value=text_signature
                        on:input=on_text_input
                    />
                </Show>

                <div class="signature-actions">
                    <button class="btn btn-secondary" on:click=on_clear_signature>
                        "Clear"
                    </button>
                </div>

                {move || {
                    signature_preview()
                        .map(|signature| {
                            let preview = match signature.kind {
                                SignatureKind::Digital => {
                                    view! {
                                        <img
                                            class="signature-image"
                                            src=signature.data.clone()
                                            alt="Digital signature"
                                        />
                                    }
                                        .into_any()
                                }
                                SignatureKind::Text => {
                                    view! {
                                        <span class="signature-text">{signature.data.clone()}</span>
                                    }
                                        .into_any()
                                }
                            };
                            view! {
                                <div class="signature-preview">
                                    <strong>"Signature Preview:"</strong>
                                    <br />
                                    {preview}
                                    <div class="text-muted">"Signed on: " {signature.timestamp.clone()}</div>
                                </div>

                                <div class="certification">
                                    <h4>"Certification"</h4>
                                    <p>"By providing your digital signature above, you certify that:"</p>
                                    <ul>
                                        <li>
                                            "The inventory information listed above is accurate to the best of your knowledge"
                                        </li>
                                        <li>
                                            "All items have been properly identified and their conditions noted"
                                        </li>
                                        <li>
                                            "You have the authority to certify this inventory on behalf of your organization"
                                        </li>
                                        <li>
                                            "This digital signature has the same legal effect as a handwritten signature"
                                        </li>
                                    </ul>
                                </div>
                            }
                        })
                }}
            </div>

            <button
                class="btn btn-primary btn-generate"
                disabled=move || !has_signature()
                on:click=on_generate
            >
                {move || {
                    if has_signature() { "Generate Report" } else { "Signature Required" }
                }}
            </button>
        </div>
    }
}
