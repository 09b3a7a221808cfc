use chrono::{NaiveDate, Weekday};
use std::fmt::Write;

use crate::domain::model::WeekStart;

/// 一個待嘗試的網址日期片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub week: WeekStart,
    pub fragment: String,
}

/// 將錨點日期正規化到週起始日，並依序產生每個日期格式的網址片段。
///
/// 外層迴圈是週偏移，內層是格式範本，兩者都依設定順序。
/// 同一週內格式化結果相同的範本只會出現一次。
#[derive(Debug, Clone)]
pub struct DateCursor {
    week: WeekStart,
    templates: Vec<String>,
    offsets: Vec<u32>,
}

impl DateCursor {
    pub fn new(anchor: NaiveDate, first_day: Weekday, templates: Vec<String>, offsets: Vec<u32>) -> Self {
        Self {
            week: WeekStart::containing(anchor, first_day),
            templates,
            offsets,
        }
    }

    pub fn week(&self) -> WeekStart {
        self.week
    }

    /// 每次呼叫都從頭開始
    pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.offsets.iter().flat_map(move |&offset| {
            let week = self.week.plus_weeks(offset);
            let mut fragments: Vec<String> = Vec::new();
            for template in &self.templates {
                match format_fragment(week.date(), template) {
                    Some(fragment) if !fragments.contains(&fragment) => fragments.push(fragment),
                    Some(_) => {}
                    None => tracing::warn!("⚠️ Date format '{}' could not be applied", template),
                }
            }
            fragments
                .into_iter()
                .map(move |fragment| Candidate { week, fragment })
        })
    }
}

/// 以 strftime 範本格式化日期並轉小寫，例如 `%d-%b` → `04-mar`
pub fn format_fragment(date: NaiveDate, template: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(template)).ok()?;
    Some(out.to_lowercase())
}
