//! 解析結果ステージ
//!
//! 注釈付き画像と生JSONをタブで切り替えて表示する

use leptos::prelude::*;

use crate::workflow::use_workflow;

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Annotated,
    Json,
}

#[component]
pub fn AnalysisOutputStage() -> impl IntoView {
    let workflow = use_workflow();
    let (active_tab, set_active_tab) = signal(Tab::Annotated);

    let result = move || workflow.with(|s| s.analysis_result.clone());
    let annotated_url = move || workflow.with(|s| s.annotated_image_url.clone());
    let detection_count = move || result().map(|r| r.detection_count()).unwrap_or(0);
    let average_confidence =
        move || result().map(|r| r.average_confidence_percent()).unwrap_or(0);
    let is_demo = move || result().map(|r| r.is_demo()).unwrap_or(false);
    let result_json = move || {
        result()
            .and_then(|r| serde_json::to_string_pretty(&r).ok())
            .unwrap_or_default()
    };

    let on_copy_json = move |_| {
        let json = workflow.with_untracked(|s| {
            s.analysis_result
                .as_ref()
                .and_then(|r| serde_json::to_string_pretty(r).ok())
        });
        if let (Some(window), Some(json)) = (web_sys::window(), json) {
            let _ = window.navigator().clipboard().write_text(&json);
        }
    };

    view! {
        <div class="analysis-stage">
            <h2>"Analysis Results"</h2>
            <p class="text-muted">
                "You can switch between the annotated image and raw JSON output."
            </p>

            <div class="summary-cards">
                <div class="summary-card">
                    <div class="summary-number">{detection_count}</div>
                    <div class="summary-label">"Objects Found"</div>
                </div>
                <div class="summary-card">
                    <div class="summary-number">{move || format!("{}%", average_confidence())}</div>
                    <div class="summary-label">"Avg Confidence"</div>
                </div>
            </div>

            <div class="tab-list">
                <button
                    class="tab"
                    class:active=move || active_tab.get() == Tab::Annotated
                    on:click=move |_| set_active_tab.set(Tab::Annotated)
                >
                    "📸 Annotated Image"
                </button>
                <button
                    class="tab"
                    class:active=move || active_tab.get() == Tab::Json
                    on:click=move |_| set_active_tab.set(Tab::Json)
                >
                    "📄 JSON Output"
                </button>
            </div>

            <div class="tab-content">
                <Show when=move || active_tab.get() == Tab::Annotated>
                    <Show
                        when=move || annotated_url().is_some()
                        fallback=|| {
                            view! {
                                <div class="no-image">
                                    <div class="no-image-icon">"🖼️"</div>
                                    <p>
                                        <strong>"No Annotated Image Available"</strong>
                                    </p>
                                    <p class="text-muted">
                                        "The analysis completed but no annotated image was returned by the model."
                                    </p>
                                </div>
                            }
                        }
                    >
                        <div class="image-container">
                            <img
                                class="annotated-image"
                                src=move || annotated_url().unwrap_or_default()
                                alt="Annotated analysis result"
                            />
                            {move || {
                                result()
                                    .map(|r| {
                                        let timestamp = if r.created_at.is_empty() {
                                            "Unknown".to_string()
                                        } else {
                                            r.created_at.clone()
                                        };
                                        view! {
                                            <div class="image-info">
                                                <strong>"Analysis Complete: "</strong>
                                                {r.detection_count()}
                                                " objects detected"
                                                <br />
                                                <strong>"Model: "</strong>
                                                {r.model_version_label().to_string()}
                                                <br />
                                                <strong>"Timestamp: "</strong>
                                                {timestamp}
                                                <br />
                                                <Show when=is_demo>
                                                    <strong class="demo-flag">"⚠️ Demo Mode Active"</strong>
                                                </Show>
                                            </div>
                                        }
                                    })
                            }}
                        </div>
                    </Show>
                </Show>

                <Show when=move || active_tab.get() == Tab::Json>
                    <div class="json-container">
                        <div class="json-header">
                            <div class="json-title">"Raw Analysis Data"</div>
                            <button
                                class="btn btn-small btn-secondary"
                                title="Copy JSON to clipboard"
                                on:click=on_copy_json
                            >
                                "📋 Copy"
                            </button>
                        </div>
                        <pre class="json-content">{result_json}</pre>
                    </div>
                </Show>
            </div>

            <div class="button-row">
                <button class="btn btn-secondary" on:click=move |_| workflow.jump_to(0)>
                    "Upload New Image"
                </button>
                <button class="btn btn-primary" on:click=move |_| workflow.jump_to(2)>
                    "Review Items"
                </button>
            </div>
        </div>
    }
}
