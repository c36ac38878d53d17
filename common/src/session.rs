//! ワークフローセッション状態
//!
//! ウィザード全体で共有される状態コンテナとステージ遷移。
//! UIイベントループ上の単一ライタしか触らないため、ロックは持たない

use serde::{Deserialize, Serialize};

use crate::report::{Report, Signature};
use crate::review::{ObjectGroup, ReviewedObject};
use crate::types::AnalysisResult;

/// ウィザードの1画面
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Upload,
    Analysis,
    Review,
    Finalise,
    Complete,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Upload,
        Stage::Analysis,
        Stage::Review,
        Stage::Finalise,
        Stage::Complete,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<Stage> {
        Self::ALL.get(index).copied()
    }

    pub fn id(self) -> &'static str {
        match self {
            Stage::Upload => "upload",
            Stage::Analysis => "analysis",
            Stage::Review => "review",
            Stage::Finalise => "finalise",
            Stage::Complete => "complete",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Upload => "Upload File",
            Stage::Analysis => "Analysis Output",
            Stage::Review => "Review Objects",
            Stage::Finalise => "Finalise",
            Stage::Complete => "Complete",
        }
    }
}

/// 選択されたファイルのメタデータ
///
/// 実体のFileハンドルはシリアライズ不能なのでUI層が別に保持する
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    /// バイト数
    pub size: u64,
    pub mime_type: String,
}

impl FileMeta {
    /// "2.00 MB" 形式の表示
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size as f64 / 1024.0 / 1024.0)
    }
}

/// ワークフローセッション
///
/// マウント時に生成され、リセットで初期値へ戻る。
/// ルートコンポーネントが唯一の所有者で、各ステージには
/// 読み書きハンドル経由で渡される
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowSession {
    current: Stage,
    pub selected_file: Option<FileMeta>,
    pub preview_data_url: Option<String>,
    pub analysis_result: Option<AnalysisResult>,
    pub annotated_image_url: Option<String>,
    pub reviewed_objects: Vec<ReviewedObject>,
    pub object_groups: Vec<ObjectGroup>,
    pub signature: Option<Signature>,
    pub final_report: Option<Report>,
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_stage(&self) -> Stage {
        self.current
    }

    pub fn stage_index(&self) -> usize {
        self.current.index()
    }

    /// 次のステージへ。最終ステージでは何もしない
    pub fn advance(&mut self) {
        if let Some(next) = Stage::from_index(self.current.index() + 1) {
            self.current = next;
        }
    }

    /// 前のステージへ。先頭ステージでは何もしない
    pub fn retreat(&mut self) {
        if let Some(prev) = self
            .current
            .index()
            .checked_sub(1)
            .and_then(Stage::from_index)
        {
            self.current = prev;
        }
    }

    /// 指定インデックスへ移動。範囲外は黙って無視する
    pub fn jump_to(&mut self, index: usize) {
        if let Some(stage) = Stage::from_index(index) {
            self.current = stage;
        }
    }

    /// 部分更新をマージする（後勝ち）
    ///
    /// ファイル未選択の状態でプレビューだけが残ることはない
    pub fn patch(&mut self, patch: SessionPatch) {
        if let Some(selected_file) = patch.selected_file {
            self.selected_file = selected_file;
        }
        if let Some(preview_data_url) = patch.preview_data_url {
            self.preview_data_url = preview_data_url;
        }
        if let Some(analysis_result) = patch.analysis_result {
            self.analysis_result = analysis_result;
        }
        if let Some(annotated_image_url) = patch.annotated_image_url {
            self.annotated_image_url = annotated_image_url;
        }
        if let Some(reviewed_objects) = patch.reviewed_objects {
            self.reviewed_objects = reviewed_objects;
        }
        if let Some(object_groups) = patch.object_groups {
            self.object_groups = object_groups;
        }
        if let Some(signature) = patch.signature {
            self.signature = signature;
        }
        if let Some(final_report) = patch.final_report {
            self.final_report = final_report;
        }

        if self.selected_file.is_none() {
            self.preview_data_url = None;
        }
    }

    /// 全フィールドを初期値へ戻す
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// セッションへの部分更新
///
/// 外側のOptionは「このフィールドを更新するか」、
/// 内側のOptionは更新後の値（Noneでクリア）
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub selected_file: Option<Option<FileMeta>>,
    pub preview_data_url: Option<Option<String>>,
    pub analysis_result: Option<Option<AnalysisResult>>,
    pub annotated_image_url: Option<Option<String>>,
    pub reviewed_objects: Option<Vec<ReviewedObject>>,
    pub object_groups: Option<Vec<ObjectGroup>>,
    pub signature: Option<Option<Signature>>,
    pub final_report: Option<Option<Report>>,
}
