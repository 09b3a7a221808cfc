use std::sync::OnceLock;

use regex::Regex;

/// 菜單段落常把兩道菜黏在一起 (如 `Chicken curryBasmati rice`)。
/// 在第一個「小寫後接大寫」的位置截斷，只保留前半段。
pub fn truncate_at_case_boundary(s: &str) -> &str {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\p{Ll}\p{Lu}").expect("regex should be valid"));
    match re.find(s) {
        Some(m) => {
            let lower_len = s[m.start()..].chars().next().map_or(0, char::len_utf8);
            &s[..m.start() + lower_len]
        }
        None => s,
    }
}
