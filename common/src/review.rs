//! レビュー対象オブジェクトのモデル
//!
//! 検出結果を人手レビュー用に1件ずつ展開し、状態評価・コメント・
//! 検証/除外フラグ・取扱コード・損傷報告を付与する。
//! クラス名ごとのグループと数量カウンタもここで扱う

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, BoundingBox, Prediction};

/// 物品の状態評価
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
    Damaged,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
        Condition::Damaged,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
            Condition::Damaged => "Damaged",
        }
    }

    pub fn from_label(label: &str) -> Option<Condition> {
        Condition::ALL.into_iter().find(|c| c.label() == label)
    }
}

/// 取扱コード (コード, 説明)
pub const HANDLING_CODES: [(&str, &str); 7] = [
    ("PBO", "Packed by Owner (Owner's Risk)"),
    ("PBR", "Packed by Removalist"),
    ("DBO", "Dismantled by Owner"),
    ("LP", "Left Packed"),
    ("B&W", "Black & White TV"),
    ("UR", "Unpacked by Removalist"),
    ("C", "Colour"),
];

/// 損傷種別コード
pub const DAMAGE_CODES: [(&str, &str); 26] = [
    ("BE", "Bent"),
    ("BW", "Badly Worn"),
    ("BR", "Broken"),
    ("BU", "Burned"),
    ("CH", "Chipped"),
    ("CR", "Cracked"),
    ("CU", "Condition Unknown"),
    ("D", "Dented"),
    ("F", "Faded"),
    ("G", "Gouged Deeply Dented"),
    ("L", "Loose"),
    ("ME", "Moth Eaten"),
    ("MG", "Missing"),
    ("ML", "Mildew"),
    ("NS", "Not Signed"),
    ("RI", "Ripped"),
    ("R", "Rubbed"),
    ("RU", "Rusted"),
    ("ST", "Stained"),
    ("SC", "Scratched"),
    ("SS", "Surface Scratched"),
    ("SO", "Soiled/Dirty"),
    ("T", "Torn"),
    ("WE", "Worm Eaten"),
    ("WD", "Water Damaged"),
    ("√", "Same (as Previous)"),
];

/// 損傷箇所コード
pub const DAMAGE_LOCATIONS: [(&str, &str); 14] = [
    ("1", "Bottom"),
    ("2", "Corner"),
    ("3", "Front"),
    ("4", "Left"),
    ("5", "Rear"),
    ("6", "Right"),
    ("7", "Side"),
    ("8", "Top"),
    ("9", "Leg"),
    ("10", "From"),
    ("11", "Arm"),
    ("12", "Edge"),
    ("13", "Veneer"),
    ("14", "Inside"),
];

/// 「損傷を報告」トグルで入る初期値
pub const DEFAULT_DAMAGE_TYPE: &str = "BE";

/// レビュー対象オブジェクト
///
/// 検出1件（または手動追加1件）に対応する。手動追加は
/// バウンディングボックスを持たず信頼度100%固定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewedObject {
    pub id: u32,

    /// 検出サービス側のID（手動追加はNone）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_id: Option<String>,

    #[serde(rename = "class")]
    pub class_name: String,

    pub confidence: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    pub condition: Condition,
    pub comments: String,
    pub verified: bool,
    pub excluded: bool,

    /// 空文字 = 未選択
    pub handling_code: String,
    pub damage_type: String,
    pub damage_location: String,

    pub is_manual_entry: bool,
}

impl ReviewedObject {
    /// 検出結果1件をレビュー対象へ展開する
    pub fn from_prediction(index: usize, prediction: &Prediction) -> Self {
        ReviewedObject {
            id: index as u32 + 1,
            detection_id: prediction.id.clone(),
            class_name: prediction.class_name.clone(),
            confidence: prediction.confidence,
            bounding_box: Some(prediction.bounding_box),
            ..Default::default()
        }
    }

    /// 手動追加のオブジェクトを作る
    pub fn manual(id: u32, name: &str) -> Self {
        ReviewedObject {
            id,
            class_name: name.to_string(),
            confidence: 1.0,
            bounding_box: None,
            is_manual_entry: true,
            ..Default::default()
        }
    }

    /// 四捨五入した信頼度%
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    pub fn has_damage_report(&self) -> bool {
        !self.damage_type.is_empty()
    }

    /// 損傷報告のトグル
    ///
    /// OFF→ONでは既定の種別を入れてドロップダウンを出す。
    /// ON→OFFでは種別・箇所の両方をクリアする
    pub fn toggle_damage_report(&mut self) {
        if self.damage_type.is_empty() {
            self.damage_type = DEFAULT_DAMAGE_TYPE.to_string();
        } else {
            self.damage_type.clear();
            self.damage_location.clear();
        }
    }

    /// 損傷種別の変更。箇所は選び直しになる
    pub fn set_damage_type(&mut self, code: &str) {
        if code.is_empty() {
            self.damage_type.clear();
            self.damage_location.clear();
        } else {
            self.damage_type = code.to_string();
            self.damage_location.clear();
        }
    }

    /// 損傷箇所の変更。種別が未選択なら無視する
    pub fn set_damage_location(&mut self, code: &str) {
        if !self.damage_type.is_empty() {
            self.damage_location = code.to_string();
        }
    }
}

/// 解析結果をレビューリストへ展開する（初回のみ呼ぶこと）
pub fn init_reviewed_objects(result: &AnalysisResult) -> Vec<ReviewedObject> {
    result
        .predictions
        .iter()
        .enumerate()
        .map(|(index, prediction)| ReviewedObject::from_prediction(index, prediction))
        .collect()
}

/// クラス名ごとのグループ
///
/// quantityは検出件数と独立に増減できる仮想カウンタ。
/// 0にするとメンバーが下流ステージから外れる（検出自体は消えない）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectGroup {
    pub class_name: String,
    pub member_ids: Vec<u32>,
    pub average_confidence: f64,
    pub quantity: u32,
}

impl ObjectGroup {
    pub fn average_confidence_percent(&self) -> u32 {
        (self.average_confidence * 100.0).round() as u32
    }
}

/// レビューリストをクラス名でグループ化する（出現順を維持）
pub fn group_objects(objects: &[ReviewedObject]) -> Vec<ObjectGroup> {
    let mut groups: Vec<ObjectGroup> = Vec::new();
    for obj in objects {
        match groups.iter_mut().find(|g| g.class_name == obj.class_name) {
            Some(group) => group.member_ids.push(obj.id),
            None => groups.push(ObjectGroup {
                class_name: obj.class_name.clone(),
                member_ids: vec![obj.id],
                average_confidence: 0.0,
                quantity: 0,
            }),
        }
    }

    for group in &mut groups {
        let sum: f64 = group
            .member_ids
            .iter()
            .filter_map(|id| objects.iter().find(|o| o.id == *id))
            .map(|o| o.confidence)
            .sum();
        group.average_confidence = sum / group.member_ids.len() as f64;
        group.quantity = group.member_ids.len() as u32;
    }

    groups
}

/// オブジェクト追加後などにグループを再構成する
///
/// 既存クラスのユーザー調整済みquantityは引き継ぐ
pub fn regroup(objects: &[ReviewedObject], previous: &[ObjectGroup]) -> Vec<ObjectGroup> {
    let mut groups = group_objects(objects);
    for group in &mut groups {
        if let Some(old) = previous.iter().find(|g| g.class_name == group.class_name) {
            // メンバーが増えたクラスは新メンバー分だけ数量を積み増す
            let added = group
                .member_ids
                .len()
                .saturating_sub(old.member_ids.len()) as u32;
            group.quantity = old.quantity + added;
        }
    }
    groups
}

/// グループの数量を変更する（未知のクラス名は無視）
pub fn set_group_quantity(groups: &mut [ObjectGroup], class_name: &str, quantity: u32) {
    if let Some(group) = groups.iter_mut().find(|g| g.class_name == class_name) {
        group.quantity = quantity;
    }
}

/// 下流ステージへ渡すオブジェクトリスト
///
/// 数量0のグループのメンバーを除外する。元のリストは変更しない
pub fn effective_objects(
    objects: &[ReviewedObject],
    groups: &[ObjectGroup],
) -> Vec<ReviewedObject> {
    objects
        .iter()
        .filter(|obj| {
            groups
                .iter()
                .find(|g| g.class_name == obj.class_name)
                .map(|g| g.quantity > 0)
                .unwrap_or(true)
        })
        .cloned()
        .collect()
}

/// 手動オブジェクトを追加し、グループも同期する
///
/// 名前が空のときはValidationエラー
pub fn add_manual_entry(
    objects: &mut Vec<ReviewedObject>,
    groups: &mut Vec<ObjectGroup>,
    name: &str,
) -> Result<u32> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Please enter an item name.".to_string()));
    }

    let next_id = objects.iter().map(|o| o.id).max().unwrap_or(0) + 1;
    objects.push(ReviewedObject::manual(next_id, name));
    *groups = regroup(objects, groups);
    Ok(next_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_classes(classes: &[(&str, f64)]) -> AnalysisResult {
        AnalysisResult {
            predictions: classes
                .iter()
                .enumerate()
                .map(|(i, (class_name, confidence))| Prediction {
                    id: Some(format!("pred-{}", i + 1)),
                    class_name: class_name.to_string(),
                    confidence: *confidence,
                    bounding_box: BoundingBox {
                        x: 10.0 * i as f64,
                        y: 20.0,
                        width: 30.0,
                        height: 40.0,
                    },
                })
                .collect(),
            ..Default::default()
        }
    }

    // =============================================
    // 初期展開テスト
    // =============================================

    #[test]
    fn test_init_reviewed_objects_defaults() {
        let result = result_with_classes(&[("bed", 0.95), ("lamp", 0.87), ("rug", 0.83)]);
        let objects = init_reviewed_objects(&result);

        assert_eq!(objects.len(), 3);
        for (index, obj) in objects.iter().enumerate() {
            assert_eq!(obj.id, index as u32 + 1);
            assert_eq!(obj.condition, Condition::Good);
            assert!(!obj.verified);
            assert!(!obj.excluded);
            assert!(!obj.is_manual_entry);
            assert!(obj.comments.is_empty());
            assert!(obj.handling_code.is_empty());
            assert!(obj.bounding_box.is_some());
        }
        assert_eq!(objects[1].class_name, "lamp");
        assert_eq!(objects[1].detection_id.as_deref(), Some("pred-2"));
    }

    #[test]
    fn test_confidence_percent_rounds() {
        let obj = ReviewedObject {
            confidence: 0.756,
            ..Default::default()
        };
        assert_eq!(obj.confidence_percent(), 76);
    }

    // =============================================
    // 損傷報告の従属フィールドテスト
    // =============================================

    #[test]
    fn test_damage_report_toggle_on_sets_default_type() {
        let mut obj = ReviewedObject::default();
        assert!(!obj.has_damage_report());

        obj.toggle_damage_report();
        assert_eq!(obj.damage_type, DEFAULT_DAMAGE_TYPE);
        assert!(obj.damage_location.is_empty());
        assert!(obj.has_damage_report());
    }

    #[test]
    fn test_damage_report_toggle_off_clears_both() {
        let mut obj = ReviewedObject::default();
        obj.toggle_damage_report();
        obj.set_damage_type("CR");
        obj.set_damage_location("2");

        obj.toggle_damage_report();
        assert!(obj.damage_type.is_empty());
        assert!(obj.damage_location.is_empty());
    }

    #[test]
    fn test_damage_type_change_resets_location() {
        let mut obj = ReviewedObject::default();
        obj.toggle_damage_report();
        obj.set_damage_location("8");
        assert_eq!(obj.damage_location, "8");

        obj.set_damage_type("SC");
        assert_eq!(obj.damage_type, "SC");
        assert!(obj.damage_location.is_empty());
    }

    #[test]
    fn test_damage_location_ignored_without_type() {
        let mut obj = ReviewedObject::default();
        obj.set_damage_location("3");
        assert!(obj.damage_location.is_empty());
    }

    // =============================================
    // グループ化と数量テスト
    // =============================================

    #[test]
    fn test_group_objects_by_class() {
        let result =
            result_with_classes(&[("chair", 0.8), ("chair", 0.6), ("table", 0.9)]);
        let objects = init_reviewed_objects(&result);
        let groups = group_objects(&objects);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].class_name, "chair");
        assert_eq!(groups[0].member_ids, vec![1, 2]);
        assert_eq!(groups[0].quantity, 2);
        assert_eq!(groups[0].average_confidence_percent(), 70);
        assert_eq!(groups[1].class_name, "table");
        assert_eq!(groups[1].quantity, 1);
    }

    #[test]
    fn test_quantity_zero_removes_from_downstream() {
        let result =
            result_with_classes(&[("chair", 0.8), ("chair", 0.6), ("table", 0.9)]);
        let objects = init_reviewed_objects(&result);
        let mut groups = group_objects(&objects);

        set_group_quantity(&mut groups, "chair", 0);
        let downstream = effective_objects(&objects, &groups);

        assert_eq!(downstream.len(), 1);
        assert_eq!(downstream[0].class_name, "table");
        // 元のリストは手つかず
        assert_eq!(objects.len(), 3);
    }

    #[test]
    fn test_set_quantity_unknown_class_is_noop() {
        let result = result_with_classes(&[("chair", 0.8)]);
        let objects = init_reviewed_objects(&result);
        let mut groups = group_objects(&objects);

        set_group_quantity(&mut groups, "sofa", 5);
        assert_eq!(groups[0].quantity, 1);
    }

    #[test]
    fn test_effective_objects_without_group_passes_through() {
        let result = result_with_classes(&[("chair", 0.8)]);
        let objects = init_reviewed_objects(&result);

        let downstream = effective_objects(&objects, &[]);
        assert_eq!(downstream.len(), 1);
    }

    // =============================================
    // 手動追加テスト
    // =============================================

    #[test]
    fn test_add_manual_entry() {
        let result = result_with_classes(&[("chair", 0.8)]);
        let mut objects = init_reviewed_objects(&result);
        let mut groups = group_objects(&objects);

        let id = add_manual_entry(&mut objects, &mut groups, "  antique clock ")
            .expect("手動追加失敗");

        assert_eq!(id, 2);
        let manual = objects.last().expect("追加されていない");
        assert_eq!(manual.class_name, "antique clock");
        assert_eq!(manual.confidence, 1.0);
        assert!(manual.bounding_box.is_none());
        assert!(manual.is_manual_entry);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].class_name, "antique clock");
        assert_eq!(groups[1].quantity, 1);
    }

    #[test]
    fn test_add_manual_entry_empty_name_rejected() {
        let mut objects = Vec::new();
        let mut groups = Vec::new();

        let err = add_manual_entry(&mut objects, &mut groups, "   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(objects.is_empty());
    }

    #[test]
    fn test_regroup_preserves_adjusted_quantity() {
        let result = result_with_classes(&[("chair", 0.8), ("chair", 0.6)]);
        let mut objects = init_reviewed_objects(&result);
        let mut groups = group_objects(&objects);

        // ユーザーが数量を5へ調整してから同クラスを手動追加
        set_group_quantity(&mut groups, "chair", 5);
        add_manual_entry(&mut objects, &mut groups, "chair").expect("手動追加失敗");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].member_ids.len(), 3);
        assert_eq!(groups[0].quantity, 6);
    }
}
