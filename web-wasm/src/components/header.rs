//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"AI Image Analysis"</h1>
            <p class="subtitle">"Complete analysis workflow from upload to final report"</p>
        </header>
    }
}
