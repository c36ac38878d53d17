//! メインアプリケーションコンポーネント
//!
//! ステージの切り替えと前後ナビゲーション。セッション状態は
//! ここで生成してcontextで各ステージへ配る

use leptos::prelude::*;

use inventory_ai_common::Stage;

use crate::components::{
    analysis_stage::AnalysisOutputStage, complete_stage::CompleteStage,
    finalise_stage::FinaliseStage, header::Header, review_stage::ReviewObjectsStage,
    upload_stage::UploadStage,
};
use crate::workflow::provide_workflow;

fn stage_icon(stage: Stage) -> &'static str {
    match stage {
        Stage::Upload => "📤",
        Stage::Analysis => "🔍",
        Stage::Review => "📝",
        Stage::Finalise => "✍️",
        Stage::Complete => "✅",
    }
}

#[component]
pub fn App() -> impl IntoView {
    let workflow = provide_workflow();

    let current = move || workflow.stage();
    let current_index = move || current().index();
    let is_first = move || current_index() == 0;
    let is_last = move || current_index() == Stage::COUNT - 1;

    view! {
        <div class="container">
            <Header />

            <div class="stage-indicator">
                {Stage::ALL
                    .into_iter()
                    .map(|stage| {
                        view! {
                            <div
                                class="stage-chip"
                                class:active=move || current() == stage
                                class:done=move || current_index() > stage.index()
                            >
                                <span class="stage-chip-icon">{stage_icon(stage)}</span>
                                <span>{stage.title()}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="stage-container">
                {move || match current() {
                    Stage::Upload => view! { <UploadStage /> }.into_any(),
                    Stage::Analysis => view! { <AnalysisOutputStage /> }.into_any(),
                    Stage::Review => view! { <ReviewObjectsStage /> }.into_any(),
                    Stage::Finalise => view! { <FinaliseStage /> }.into_any(),
                    Stage::Complete => view! { <CompleteStage /> }.into_any(),
                }}
            </div>

            <div class="workflow-nav">
                <button
                    class="btn btn-secondary"
                    disabled=is_first
                    on:click=move |_| workflow.retreat()
                >
                    "← Back"
                </button>
                <span class="step-counter">
                    {move || format!("Step {} of {}", current_index() + 1, Stage::COUNT)}
                </span>
                <button
                    class="btn btn-primary"
                    disabled=is_last
                    on:click=move |_| workflow.advance()
                >
                    "Next →"
                </button>
            </div>
        </div>
    }
}
