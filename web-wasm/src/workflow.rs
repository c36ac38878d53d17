//! ワークフローコンテキスト
//!
//! セッション状態への読み書きハンドル。ルートコンポーネントが所有し、
//! 各ステージへはcontext経由で配る。Fileハンドル本体はシリアライズ不能
//! なのでセッションとは別のローカルシグナルに持つ

use leptos::prelude::*;

use inventory_ai_common::{SessionPatch, Stage, WorkflowSession};

/// 各ステージへ配る共有ハンドル
#[derive(Clone, Copy)]
pub struct WorkflowContext {
    session: RwSignal<WorkflowSession>,
    file: RwSignal<Option<web_sys::File>, LocalStorage>,
}

impl WorkflowContext {
    fn new() -> Self {
        Self {
            session: RwSignal::new(WorkflowSession::new()),
            file: RwSignal::new_local(None),
        }
    }

    /// セッションを読む（リアクティブ）
    pub fn with<T>(&self, f: impl FnOnce(&WorkflowSession) -> T) -> T {
        self.session.with(f)
    }

    /// セッションを読む（追跡なし。イベントハンドラ内からの参照用）
    pub fn with_untracked<T>(&self, f: impl FnOnce(&WorkflowSession) -> T) -> T {
        self.session.with_untracked(f)
    }

    /// セッションを直接編集する（レビューステージのインプレース更新用）
    pub fn update(&self, f: impl FnOnce(&mut WorkflowSession)) {
        self.session.update(f);
    }

    pub fn patch(&self, patch: SessionPatch) {
        self.session.update(|s| s.patch(patch));
    }

    pub fn stage(&self) -> Stage {
        self.session.with(|s| s.current_stage())
    }

    pub fn advance(&self) {
        self.session.update(|s| s.advance());
    }

    pub fn retreat(&self) {
        self.session.update(|s| s.retreat());
    }

    pub fn jump_to(&self, index: usize) {
        self.session.update(|s| s.jump_to(index));
    }

    /// セッションとFileハンドルの両方を初期値へ戻す
    pub fn reset(&self) {
        self.file.set(None);
        self.session.update(|s| s.reset());
    }

    pub fn selected_file(&self) -> Option<web_sys::File> {
        self.file.get_untracked()
    }

    pub fn set_selected_file(&self, file: Option<web_sys::File>) {
        self.file.set(file);
    }
}

/// ルートコンポーネントで一度だけ呼ぶ
pub fn provide_workflow() -> WorkflowContext {
    let context = WorkflowContext::new();
    provide_context(context);
    context
}

/// ステージコンポーネントからハンドルを取り出す
pub fn use_workflow() -> WorkflowContext {
    use_context::<WorkflowContext>().expect("use_workflow must be called under the workflow root")
}

/// 現在時刻のISO-8601文字列
pub fn now_iso() -> String {
    js_sys::Date::new_0()
        .to_iso_string()
        .as_string()
        .unwrap_or_default()
}

/// 現在時刻のUNIXミリ秒
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}
