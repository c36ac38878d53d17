//! 完了ステージ
//!
//! レポートのダウンロード（HTML/CSV/JSON）とメール/SMS共有、リセット。
//! どの操作もレポート自体は変更しない。共有はリンクを開いた時点で
//! 成功扱い（送達確認はこの層では不可能）

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use gloo::timers::future::TimeoutFuture;
use inventory_ai_common::export::{csv, html, json_filename, render_json};
use inventory_ai_common::SignatureKind;

use crate::export::{download, share};
use crate::workflow::use_workflow;

/// 共有完了メッセージを出しておく時間
const SHARE_MESSAGE_MS: u32 = 3_000;

#[component]
pub fn CompleteStage() -> impl IntoView {
    let workflow = use_workflow();
    let (show_email_modal, set_show_email_modal) = signal(false);
    let (show_sms_modal, set_show_sms_modal) = signal(false);
    let (email_address, set_email_address) = signal(String::new());
    let (phone_number, set_phone_number) = signal(String::new());
    let (share_message, set_share_message) = signal(None::<String>);

    let report = move || workflow.with(|s| s.final_report.clone());
    let report_untracked = move || workflow.with_untracked(|s| s.final_report.clone());

    let on_download_html = move |_| {
        if let Some(report) = report_untracked() {
            download::download_or_log(
                &html::render_html(&report),
                &html::html_filename(&report),
                "text/html",
            );
        }
    };
    let on_download_csv = move |_| {
        if let Some(report) = report_untracked() {
            download::download_or_log(
                &csv::render_csv(&report),
                &csv::csv_filename(&report),
                "text/csv;charset=utf-8;",
            );
        }
    };
    let on_download_json = move |_| {
        if let Some(report) = report_untracked() {
            match render_json(&report) {
                Ok(json) => download::download_or_log(
                    &json,
                    &json_filename(&report),
                    "application/json",
                ),
                Err(err) => web_sys::console::error_1(&err.to_string().into()),
            }
        }
    };

    let on_send_email = move |_| {
        let address = email_address.get_untracked();
        if address.is_empty() {
            return;
        }
        let Some(report) = report_untracked() else {
            return;
        };
        share::share_via_email(&report, &address);
        set_share_message.set(Some("Email client opened! Please send the email.".to_string()));
        spawn_local(async move {
            TimeoutFuture::new(SHARE_MESSAGE_MS).await;
            set_share_message.set(None);
            set_show_email_modal.set(false);
            set_email_address.set(String::new());
        });
    };

    let on_send_sms = move |_| {
        let phone = phone_number.get_untracked();
        if phone.is_empty() {
            return;
        }
        let Some(report) = report_untracked() else {
            return;
        };
        share::share_via_sms(&report, &phone);
        set_share_message.set(Some("SMS app opened! Please send the message.".to_string()));
        spawn_local(async move {
            TimeoutFuture::new(SHARE_MESSAGE_MS).await;
            set_share_message.set(None);
            set_show_sms_modal.set(false);
            set_phone_number.set(String::new());
        });
    };

    let share_message_view = move || {
        share_message
            .get()
            .map(|message| view! { <div class="success-message">{message}</div> })
    };

    view! {
        <Show
            when=move || report().is_some()
            fallback=|| {
                view! {
                    <div class="complete-stage">
                        <h2>"⚠️ Report Not Generated"</h2>
                        <p class="text-muted">
                            "Please complete the previous steps to generate your final report."
                        </p>
                    </div>
                }
            }
        >
            <div class="complete-stage">
                <h2 class="complete-title">"Inventory Complete!"</h2>
                <p class="text-muted">
                    "Your inventory has been completed. Review the summary and download your final report."
                </p>

                <div class="report-summary">
                    <h3>"Report Summary"</h3>
                    <div class="summary-grid">
                        <div class="summary-item">
                            <span class="summary-key">"Report ID:"</span>
                            <span>{move || report().map(|r| r.id).unwrap_or_default()}</span>
                        </div>
                        <div class="summary-item">
                            <span class="summary-key">"Created Date:"</span>
                            <span>
                                {move || {
                                    report()
                                        .map(|r| r.timestamp.chars().take(10).collect::<String>())
                                        .unwrap_or_default()
                                }}
                            </span>
                        </div>
                        <div class="summary-item">
                            <span class="summary-key">"Objects Verified:"</span>
                            <span>
                                {move || {
                                    report().map(|r| r.summary.total_verified).unwrap_or_default()
                                }}
                            </span>
                        </div>
                        <div class="summary-item">
                            <span class="summary-key">"Signature Type:"</span>
                            <span class="capitalize">
                                {move || {
                                    report()
                                        .map(|r| match r.signature.kind {
                                            SignatureKind::Digital => "Digital",
                                            SignatureKind::Text => "Text",
                                        })
                                        .unwrap_or_default()
                                }}
                            </span>
                        </div>
                    </div>
                </div>

                <div class="actions-row">
                    <button class="btn btn-success" on:click=on_download_html>
                        "📄 Download Report"
                    </button>
                    <button class="btn btn-warning" on:click=on_download_csv>
                        "📊 Export CSV"
                    </button>
                    <button class="btn btn-warning" on:click=on_download_json>
                        "🗂️ Export JSON"
                    </button>
                    <button class="btn btn-primary" on:click=move |_| set_show_email_modal.set(true)>
                        "📧 Share via Email"
                    </button>
                    <button class="btn btn-primary" on:click=move |_| set_show_sms_modal.set(true)>
                        "💬 Share via SMS"
                    </button>
                    <button class="btn btn-secondary" on:click=move |_| workflow.reset()>
                        "🔄 Start New Analysis"
                    </button>
                </div>

                <Show when=show_email_modal>
                    <div class="modal-overlay" on:click=move |_| set_show_email_modal.set(false)>
                        <div class="modal-content" on:click=|ev| ev.stop_propagation()>
                            <h3>"📧 Share Report via Email"</h3>
                            <p class="text-muted">
                                "Enter the recipient's email address. Your default email client will open with a pre-filled message containing the report summary."
                            </p>
                            <div class="input-group">
                                <label>"Email Address"</label>
                                <input
                                    type="email"
                                    placeholder="recipient@example.com"
                                    prop:value=email_address
                                    on:input=move |ev| set_email_address.set(event_target_value(&ev))
                                />
                            </div>
                            {share_message_view}
                            <div class="modal-actions">
                                <button
                                    class="btn btn-secondary"
                                    on:click=move |_| {
                                        set_show_email_modal.set(false);
                                        set_email_address.set(String::new());
                                        set_share_message.set(None);
                                    }
                                >
                                    "Cancel"
                                </button>
                                <button
                                    class="btn btn-success"
                                    disabled=move || email_address.get().is_empty()
                                    on:click=on_send_email
                                >
                                    "Send Email"
                                </button>
                            </div>
                        </div>
                    </div>
                </Show>

                <Show when=show_sms_modal>
                    <div class="modal-overlay" on:click=move |_| set_show_sms_modal.set(false)>
                        <div class="modal-content" on:click=|ev| ev.stop_propagation()>
                            <h3>"💬 Share Report via SMS"</h3>
                            <p class="text-muted">
                                "Enter the recipient's phone number. Your SMS app will open with a pre-filled message containing a brief report summary."
                            </p>
                            <div class="input-group">
                                <label>"Phone Number"</label>
                                <input
                                    type="tel"
                                    placeholder="+1 234 567 8900"
                                    prop:value=phone_number
                                    on:input=move |ev| set_phone_number.set(event_target_value(&ev))
                                />
                            </div>
                            {share_message_view}
                            <div class="modal-actions">
                                <button
                                    class="btn btn-secondary"
                                    on:click=move |_| {
                                        set_show_sms_modal.set(false);
                                        set_phone_number.set(String::new());
                                        set_share_message.set(None);
                                    }
                                >
                                    "Cancel"
                                </button>
                                <button
                                    class="btn btn-success"
                                    disabled=move || phone_number.get().is_empty()
                                    on:click=on_send_sms
                                >
                                    "Send SMS"
                                </button>
                            </div>
                        </div>
                    </div>
                </Show>
            </div>
        </Show>
    }
}
