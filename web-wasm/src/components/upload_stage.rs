//! アップロードステージ
//!
//! ファイル選択と解析リクエスト。HTTPレスポンスが一切返らない失敗
//! （バックエンド未起動）のときだけデモデータへフォールバックする。
//! これはエラー回復ではなく開発用の隠蔽で、ユーザーには伝えず
//! コンソールログだけ残す

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, File, FileReader, HtmlInputElement};

use gloo::timers::future::TimeoutFuture;
use inventory_ai_common::{demo, Error, FileMeta, SessionPatch};

use crate::api::DetectionApi;
use crate::workflow::{now_iso, use_workflow};

#[component]
pub fn UploadStage() -> impl IntoView {
    let workflow = use_workflow();
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let (is_dragover, set_is_dragover) = signal(false);

    let select_file = move |file: File| {
        set_error.set(None);
        let meta = FileMeta {
            name: file.name(),
            size: file.size() as u64,
            mime_type: file.type_(),
        };
        workflow.set_selected_file(Some(file.clone()));
        // 新しいファイルを選んだら前回のプレビュー・結果は黙って破棄する
        workflow.patch(SessionPatch {
            selected_file: Some(Some(meta)),
            preview_data_url: Some(None),
            analysis_result: Some(None),
            annotated_image_url: Some(None),
            reviewed_objects: Some(Vec::new()),
            object_groups: Some(Vec::new()),
            ..Default::default()
        });
        read_preview(file, move |data_url| {
            workflow.patch(SessionPatch {
                preview_data_url: Some(Some(data_url)),
                ..Default::default()
            });
        });
    };

    let on_file_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            select_file(file);
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            select_file(file);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_clear = move |_| {
        workflow.set_selected_file(None);
        // selected_fileをクリアすればプレビューも一緒に消える
        workflow.patch(SessionPatch {
            selected_file: Some(None),
            ..Default::default()
        });
        set_error.set(None);
    };

    let on_analyze = move |_| {
        let Some(file) = workflow.selected_file() else {
            set_error.set(Some("Please select an image file first.".to_string()));
            return;
        };
        if is_loading.get_untracked() {
            // 送信中はボタンが無効になっているのが唯一の多重送信ガード
            return;
        }
        set_is_loading.set(true);
        set_error.set(None);

        let api = DetectionApi::default();
        spawn_local(async move {
            match api.analyze(&file, None, None).await {
                Ok(result) => {
                    let annotated = result
                        .image_url
                        .as_deref()
                        .map(|path| api.absolute_url(path));
                    workflow.patch(SessionPatch {
                        analysis_result: Some(Some(result)),
                        annotated_image_url: Some(annotated),
                        ..Default::default()
                    });
                    set_is_loading.set(false);
                    workflow.advance();
                }
                Err(Error::Connectivity(reason)) => {
                    web_sys::console::log_1(
                        &format!(
                            "analyze request got no response ({}); falling back to demo data",
                            reason
                        )
                        .into(),
                    );
                    TimeoutFuture::new(demo::DEMO_FALLBACK_DELAY_MS).await;

                    let file_name = workflow.with_untracked(|s| {
                        s.selected_file
                            .as_ref()
                            .map(|f| f.name.clone())
                            .unwrap_or_default()
                    });
                    let preview = workflow.with_untracked(|s| s.preview_data_url.clone());
                    workflow.patch(SessionPatch {
                        analysis_result: Some(Some(demo::demo_result(&file_name, &now_iso()))),
                        // デモでは元画像をそのまま注釈画像として使う
                        annotated_image_url: Some(preview),
                        ..Default::default()
                    });
                    set_is_loading.set(false);
                    workflow.advance();
                }
                Err(err) => {
                    set_error.set(Some(err.to_string()));
                    set_is_loading.set(false);
                }
            }
        });
    };

    let has_file = move || workflow.with(|s| s.selected_file.is_some());
    let preview = move || workflow.with(|s| s.preview_data_url.clone());
    let file_info = move || {
        workflow.with(|s| {
            s.selected_file
                .as_ref()
                .map(|f| (f.name.clone(), f.size_label(), f.mime_type.clone()))
        })
    };

    view! {
        <div class="upload-stage">
            <h2>"Upload Your Image"</h2>
            <p class="text-muted">"Supported formats: JPG, PNG, GIF (up to 10MB)"</p>

            <Show when=move || preview().is_none()>
                <div class="file-input-container">
                    <input
                        type="file"
                        id="workflow-image-upload"
                        class="file-input"
                        accept="image/*"
                        on:change=on_file_change
                    />
                    <label
                        for="workflow-image-upload"
                        class="upload-area"
                        class:dragover=is_dragover
                        on:drop=on_drop
                        on:dragover=on_dragover
                        on:dragleave=on_dragleave
                    >
                        <div class="upload-icon">"📤"</div>
                        <p class="upload-text">"Choose Image File"</p>
                        <p class="text-muted">"or drag and drop here"</p>
                    </label>
                </div>
            </Show>

            <Show when=move || preview().is_some()>
                <div class="preview-container">
                    <img
                        class="preview-image"
                        src=move || preview().unwrap_or_default()
                        alt="Selected image preview"
                    />
                    {move || {
                        file_info().map(|(name, size, mime)| {
                            view! {
                                <div class="file-info">
                                    <strong>"Selected: "</strong>
                                    {name}
                                    <br />
                                    <strong>"Size: "</strong>
                                    {size}
                                    <br />
                                    <strong>"Type: "</strong>
                                    {mime}
                                </div>
                            }
                        })
                    }}
                </div>
            </Show>

            {move || {
                error
                    .get()
                    .map(|message| view! { <div class="error-alert">"❌ " {message}</div> })
            }}

            <div class="button-row">
                <Show when=has_file>
                    <button class="btn btn-secondary" disabled=is_loading on:click=on_clear>
                        "Clear"
                    </button>
                </Show>
                <button
                    class="btn btn-primary"
                    disabled=move || !has_file() || is_loading.get()
                    on:click=on_analyze
                >
                    {move || if is_loading.get() { "Analysing..." } else { "Submit" }}
                </button>
            </div>
        </div>
    }
}

/// FileReaderでプレビュー用Data URLを読み出す
fn read_preview<F>(file: File, on_loaded: F)
where
    F: Fn(String) + 'static,
{
    let Ok(reader) = FileReader::new() else {
        return;
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Ok(result) = reader_clone.result() {
            if let Some(data_url) = result.as_string() {
                on_loaded(data_url);
            }
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    let _ = reader.read_as_data_url(&file);
}
