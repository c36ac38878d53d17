//! エラー型定義
//!
//! 検出サービスまわりの失敗を明示的に分類する:
//! HTTPレスポンスが得られない接続不可(Connectivity)はデモフォールバックの
//! トリガーになり、それ以外はすべて画面表示して終わり（自動リトライなし）

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// HTTPレスポンスが一切返らなかった（サービス未起動・DNS不可など）
    #[error("network unreachable: {0}")]
    Connectivity(String),

    /// 規定時間内にレスポンスが得られなかった
    #[error("request timed out after {0} ms")]
    Timeout(u32),

    /// サービスがエラーレスポンスを返した
    #[error("{message}")]
    Service { status: u16, message: String },

    /// リクエスト前の入力検証エラー（ネットワーク層には到達しない）
    #[error("{0}")]
    Validation(String),

    /// レスポンス本文の解釈に失敗
    #[error("invalid response: {0}")]
    Parse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// デモフォールバックの対象かどうか
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity(_))
    }
}
