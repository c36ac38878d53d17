//! 共有リンク（mailto / sms）
//!
//! 本文はcommon側で組み立て、ここでURLエンコードと遷移を行う。
//! リンクを開いた時点で成功扱い。送達確認はこの層では不可能

use inventory_ai_common::export::share;
use inventory_ai_common::Report;

/// メールクライアントを開く
pub fn share_via_email(report: &Report, address: &str) {
    let subject = encode(&share::email_subject(report));
    let body = encode(&share::email_body(report));
    navigate(&share::mailto_link(address, &subject, &body));
}

/// SMSアプリを開く
pub fn share_via_sms(report: &Report, phone_number: &str) {
    let body = encode(&share::sms_message(report));
    let is_ios = user_agent()
        .map(|ua| is_ios_user_agent(&ua))
        .unwrap_or(false);
    navigate(&share::sms_link(phone_number, &body, is_ios));
}

/// iOS系端末か（smsリンクのクエリ区切りが異なる）
pub fn is_ios_user_agent(user_agent: &str) -> bool {
    ["iPhone", "iPad", "iPod"]
        .iter()
        .any(|device| user_agent.contains(device))
}

fn user_agent() -> Option<String> {
    web_sys::window().and_then(|w| w.navigator().user_agent().ok())
}

fn encode(text: &str) -> String {
    js_sys::encode_uri_component(text).into()
}

fn navigate(href: &str) {
    if let Some(window) = web_sys::window() {
        if window.location().set_href(href).is_err() {
            web_sys::console::error_1(&format!("failed to open link: {}", href).into());
        }
    }
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_encode_escapes_reserved_characters() {
        assert_eq!(encode("a b&c?d"), "a%20b%26c%3Fd");
    }
}
