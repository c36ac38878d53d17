//! レビューステージ
//!
//! 検出結果を1件ずつ確認し、状態評価・コメント・取扱コード・損傷報告を
//! 付けて検証または除外する。クラス単位のグループには数量カウンタがあり、
//! 0にするとそのクラスは下流ステージから外れる（検出自体は消えない）

use leptos::prelude::*;

use inventory_ai_common::review::{self, DAMAGE_CODES, DAMAGE_LOCATIONS, HANDLING_CODES};
use inventory_ai_common::{Condition, ReviewedObject};

use crate::workflow::{use_workflow, WorkflowContext};

/// 信頼度バッジの色分け
fn confidence_class(confidence: f64) -> &'static str {
    if confidence >= 0.8 {
        "confidence high"
    } else if confidence >= 0.6 {
        "confidence medium"
    } else {
        "confidence low"
    }
}

fn update_object(workflow: WorkflowContext, id: u32, f: impl FnOnce(&mut ReviewedObject)) {
    workflow.update(|s| {
        if let Some(obj) = s.reviewed_objects.iter_mut().find(|o| o.id == id) {
            f(obj);
        }
    });
}

fn change_quantity(workflow: WorkflowContext, class_name: &str, delta: i64) {
    workflow.update(|s| {
        let current = s
            .object_groups
            .iter()
            .find(|g| g.class_name == class_name)
            .map(|g| g.quantity);
        if let Some(current) = current {
            let quantity = (current as i64 + delta).max(0) as u32;
            review::set_group_quantity(&mut s.object_groups, class_name, quantity);
        }
    });
}

/// (コード, 説明)の一覧をoptionタグ列へ
fn code_options(codes: &'static [(&'static str, &'static str)], selected: &str) -> impl IntoView {
    codes
        .iter()
        .map(|(value, label)| {
            view! {
                <option value=*value selected=selected == *value>
                    {format!("{} - {}", value, label)}
                </option>
            }
        })
        .collect_view()
}

#[component]
pub fn ReviewObjectsStage() -> impl IntoView {
    let workflow = use_workflow();
    let (manual_name, set_manual_name) = signal(String::new());
    let (manual_error, set_manual_error) = signal(None::<String>);

    // 初回入場時だけ展開する。再訪時は編集中の内容をそのまま使う
    Effect::new(move |_| {
        let needs_init = workflow
            .with_untracked(|s| s.reviewed_objects.is_empty() && s.analysis_result.is_some());
        if needs_init {
            workflow.update(|s| {
                if let Some(result) = s.analysis_result.as_ref() {
                    let objects = review::init_reviewed_objects(result);
                    s.object_groups = review::group_objects(&objects);
                    s.reviewed_objects = objects;
                }
            });
        }
    });

    let has_objects = move || workflow.with(|s| !s.reviewed_objects.is_empty());
    let pending_count = move || {
        workflow.with(|s| {
            s.reviewed_objects
                .iter()
                .filter(|o| !o.verified && !o.excluded)
                .count()
        })
    };
    let verified_count =
        move || workflow.with(|s| s.reviewed_objects.iter().filter(|o| o.verified).count());
    let excluded_count =
        move || workflow.with(|s| s.reviewed_objects.iter().filter(|o| o.excluded).count());

    let group_rows = move || {
        workflow
            .with(|s| s.object_groups.clone())
            .into_iter()
            .map(|group| {
                let decrement = {
                    let class_name = group.class_name.clone();
                    move |_| change_quantity(workflow, &class_name, -1)
                };
                let increment = {
                    let class_name = group.class_name.clone();
                    move |_| change_quantity(workflow, &class_name, 1)
                };
                let meta = format!(
                    "{} detected · avg {}%",
                    group.member_ids.len(),
                    group.average_confidence_percent()
                );
                view! {
                    <div class="group-row" class:removed=group.quantity == 0>
                        <span class="group-class">{group.class_name.clone()}</span>
                        <span class="group-meta">{meta}</span>
                        <div class="quantity-control">
                            <button class="btn btn-small btn-secondary" on:click=decrement>
                                "−"
                            </button>
                            <span class="quantity">{group.quantity}</span>
                            <button class="btn btn-small btn-secondary" on:click=increment>
                                "+"
                            </button>
                        </div>
                    </div>
                }
            })
            .collect_view()
    };

    let object_cards = move || {
        workflow
            .with(|s| s.reviewed_objects.clone())
            .into_iter()
            .map(|obj| object_card(workflow, obj))
            .collect_view()
    };

    let on_add_manual = move |_| {
        let name = manual_name.get_untracked();
        let mut outcome = Ok(0);
        workflow.update(|s| {
            outcome =
                review::add_manual_entry(&mut s.reviewed_objects, &mut s.object_groups, &name);
        });
        match outcome {
            Ok(_) => {
                set_manual_name.set(String::new());
                set_manual_error.set(None);
            }
            Err(err) => set_manual_error.set(Some(err.to_string())),
        }
    };

    view! {
        <div class="review-stage">
            <h2>"Review Detected Objects"</h2>
            <p class="text-muted">
                "Add conditions, comments, and verify or exclude objects as needed."
            </p>

            <Show
                when=has_objects
                fallback=|| {
                    view! {
                        <div class="empty-state">
                            <div class="empty-state-icon">"🔍"</div>
                            <p>"No objects detected in the analysis to review."</p>
                        </div>
                    }
                }
            >
                <div class="summary-bar">
                    <div class="summary-item">
                        <div class="summary-number">{pending_count}</div>
                        <div class="summary-label">"Pending Review"</div>
                    </div>
                    <div class="summary-item">
                        <div class="summary-number">{verified_count}</div>
                        <div class="summary-label">"Verified"</div>
                    </div>
                    <div class="summary-item">
                        <div class="summary-number">{excluded_count}</div>
                        <div class="summary-label">"Excluded"</div>
                    </div>
                </div>

                <div class="group-panel">
                    <h3>"Groups"</h3>
                    <p class="text-muted">
                        "Adjust quantities per class. Setting a quantity to 0 removes the group from the report."
                    </p>
                    {group_rows}
                </div>

                <div class="manual-add">
                    <input
                        type="text"
                        class="manual-add-input"
                        placeholder="Add an item the model missed..."
                        prop:value=manual_name
                        on:input=move |ev| set_manual_name.set(event_target_value(&ev))
                    />
                    <button class="btn btn-secondary" on:click=on_add_manual>
                        "+ Add Item"
                    </button>
                </div>
                {move || {
                    manual_error
                        .get()
                        .map(|message| view! { <div class="error-alert">{message}</div> })
                }}

                <div class="object-grid">{object_cards}</div>
            </Show>

            <div class="button-row">
                <button class="btn btn-secondary" on:click=move |_| workflow.retreat()>
                    "← Back"
                </button>
                <button class="btn btn-primary" on:click=move |_| workflow.advance()>
                    "Continue →"
                </button>
            </div>
        </div>
    }
}

/// オブジェクト1件分のカード
///
/// セッションが変わるたびにリスト全体が作り直されるので、
/// カード内の値はスナップショットで十分
fn object_card(workflow: WorkflowContext, obj: ReviewedObject) -> impl IntoView {
    let id = obj.id;
    let is_manual = obj.is_manual_entry;
    let verified = obj.verified;
    let excluded = obj.excluded;
    let condition = obj.condition;
    let confidence_percent = obj.confidence_percent();
    let badge_class = confidence_class(obj.confidence);
    let class_name = obj.class_name.clone();
    let comments = obj.comments.clone();
    let handling_code = obj.handling_code.clone();
    let damage_type = obj.damage_type.clone();
    let damage_location = obj.damage_location.clone();
    let has_damage = !damage_type.is_empty();

    let card_class = if excluded {
        "object-card excluded"
    } else if verified {
        "object-card verified"
    } else {
        "object-card"
    };

    let bbox_label = obj
        .bounding_box
        .map(|b| format!("{} · {}", b.position_label(), b.size_label()))
        .unwrap_or_else(|| "manual entry".to_string());

    let on_condition_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        if let Some(condition) = Condition::from_label(&value) {
            update_object(workflow, id, |o| o.condition = condition);
        }
    };
    let on_handling_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        update_object(workflow, id, move |o| o.handling_code = value);
    };
    let on_damage_toggle = move |_| update_object(workflow, id, |o| o.toggle_damage_report());
    let on_damage_type_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        update_object(workflow, id, move |o| o.set_damage_type(&value));
    };
    let on_damage_location_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        update_object(workflow, id, move |o| o.set_damage_location(&value));
    };
    let on_comments_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        update_object(workflow, id, move |o| o.comments = value);
    };
    let on_verify = move |_| update_object(workflow, id, |o| o.verified = !o.verified);
    let on_exclude = move |_| update_object(workflow, id, |o| o.excluded = !o.excluded);

    let manual_badge = is_manual.then(|| view! { <span class="manual-badge">"Manual"</span> });

    let damage_fields = has_damage.then(|| {
        view! {
            <div class="form-group">
                <label>"Damage Type:"</label>
                <select class="select" disabled=excluded on:change=on_damage_type_change>
                    {code_options(&DAMAGE_CODES, &damage_type)}
                </select>
            </div>

            <div class="form-group">
                <label>"Damage Location:"</label>
                <select class="select" disabled=excluded on:change=on_damage_location_change>
                    <option value="" selected=damage_location.is_empty()>
                        "Select Location"
                    </option>
                    {code_options(&DAMAGE_LOCATIONS, &damage_location)}
                </select>
            </div>
        }
    });

    let condition_options = Condition::ALL
        .into_iter()
        .map(|c| {
            view! {
                <option value=c.label() selected=condition == c>
                    {c.label()}
                </option>
            }
        })
        .collect_view();

    let no_handling_selected = handling_code.is_empty();

    view! {
        <div class=card_class>
            <div class="card-header">
                <div class="object-class">{class_name} {manual_badge}</div>
                <div class=badge_class>{format!("{}%", confidence_percent)}</div>
            </div>

            <div class="bbox-info">{bbox_label}</div>

            <div class="card-content">
                <div class="form-group">
                    <label>"Condition:"</label>
                    <select class="select" disabled=excluded on:change=on_condition_change>
                        {condition_options}
                    </select>
                </div>

                <div class="form-group">
                    <label>"Handling Code:"</label>
                    <select class="select" disabled=excluded on:change=on_handling_change>
                        <option value="" selected=no_handling_selected>
                            "Select Handling Code"
                        </option>
                        {code_options(&HANDLING_CODES, &handling_code)}
                    </select>
                </div>

                <div class="form-group">
                    <button
                        class=if has_damage { "btn btn-danger" } else { "btn btn-warning" }
                        disabled=excluded
                        on:click=on_damage_toggle
                    >
                        {if has_damage { "Remove Damage Report" } else { "Report Damage" }}
                    </button>
                </div>

                {damage_fields}

                <div class="form-group">
                    <label>"Comments:"</label>
                    <textarea
                        class="textarea"
                        placeholder="Add any additional notes or observations..."
                        prop:value=comments
                        disabled=excluded
                        on:input=on_comments_input
                    ></textarea>
                </div>
            </div>

            <div class="card-actions">
                <button
                    class=if verified { "btn btn-success active" } else { "btn btn-success" }
                    disabled=excluded
                    on:click=on_verify
                >
                    {if verified { "✓ Verified" } else { "Verify" }}
                </button>
                <button
                    class=if excluded { "btn btn-secondary" } else { "btn btn-danger" }
                    on:click=on_exclude
                >
                    {if excluded { "Include" } else { "Exclude" }}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_class_buckets() {
        assert_eq!(confidence_class(0.95), "confidence high");
        assert_eq!(confidence_class(0.8), "confidence high");
        assert_eq!(confidence_class(0.79), "confidence medium");
        assert_eq!(confidence_class(0.6), "confidence medium");
        assert_eq!(confidence_class(0.59), "confidence low");
    }
}
