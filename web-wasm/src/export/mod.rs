//! ブラウザ側のエクスポート処理
//!
//! 文字列生成はcommon側の純関数に任せ、ここではダウンロードの発火と
//! 共有リンクへの遷移だけを行う

pub mod download;
pub mod share;
