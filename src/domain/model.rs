use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::DigestError;

/// 一週的起始日，也是檢查點檔案保存的唯一狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekStart(NaiveDate);

impl WeekStart {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// 回到 `date` 當天或之前最近的 `first_day`
    pub fn containing(date: NaiveDate, first_day: Weekday) -> Self {
        let back = (7 + date.weekday().num_days_from_monday() - first_day.num_days_from_monday()) % 7;
        Self(date - Duration::days(i64::from(back)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn plus_weeks(&self, weeks: u32) -> Self {
        Self(self.0 + Duration::weeks(i64::from(weeks)))
    }

    pub fn next(&self) -> Self {
        self.plus_weeks(1)
    }

    /// 至少七天後的第一個 `first_day`。
    /// 檢查點未對齊時 (例如舊檔以星期日為週首) 往後取整，不會回到已處理過的那週。
    pub fn following(&self, first_day: Weekday) -> Self {
        Self::containing(self.0 + Duration::days(13), first_day)
    }

    pub fn is_aligned(&self, first_day: Weekday) -> bool {
        self.0.weekday() == first_day
    }

    /// `today` 距離這週起始日已超過幾天
    pub fn days_before(&self, today: NaiveDate) -> i64 {
        (today - self.0).num_days()
    }
}

/// 檢查點格式: `YYYY, MM, DD`
impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y, %m, %d"))
    }
}

impl FromStr for WeekStart {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(DigestError::checkpoint(format!(
                "expected 'YYYY, MM, DD', got '{}'",
                s.trim()
            )));
        }

        let number = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| DigestError::checkpoint(format!("'{}' is not a number", part)))
        };
        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| DigestError::checkpoint(format!("'{}' is not a year", parts[0])))?;
        let month = number(parts[1])?;
        let day = number(parts[2])?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DigestError::checkpoint(format!("'{}' is not a calendar date", s.trim())))
    }
}

/// 菜單欄位。排序即郵件中的顯示順序: 前菜依編號，其後素食、主菜、配菜、甜點
///
/// 前菜以數字排序 (`Starter_2` 在 `Starter_10` 之前)，不是鍵名字串排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Course {
    Starter(usize),
    Vegetarian,
    Main,
    Sides,
    Dessert,
    Special,
}

impl Course {
    /// 菜單鍵名，例如 `Starter_0`
    pub fn key(&self) -> String {
        match self {
            Self::Starter(n) => format!("Starter_{}", n),
            other => other.label().to_string(),
        }
    }

    /// 顯示用名稱，去掉編號後綴
    pub fn label(&self) -> &'static str {
        match self {
            Self::Starter(_) => "Starter",
            Self::Vegetarian => "Vegetarian",
            Self::Main => "Main",
            Self::Sides => "Sides",
            Self::Dessert => "Dessert",
            Self::Special => "Special",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDay {
    pub date: String,
    pub courses: BTreeMap<Course, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekMenu {
    pub week: WeekStart,
    pub days: Vec<MenuDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub desires: Vec<String>,
    #[serde(default)]
    pub disgusts: Option<Vec<String>>,
}

/// 對某位使用者有吸引力的一天，`matched` 為小寫的課程鍵名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestingDay<'a> {
    pub day: &'a MenuDay,
    pub matched: BTreeSet<String>,
}

impl InterestingDay<'_> {
    pub fn is_matched(&self, course: &Course) -> bool {
        self.matched.contains(&course.key().to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingDigest {
    pub recipient_name: String,
    pub recipient_email: String,
    pub html_body: String,
}

#[derive(Debug)]
pub struct DeliveryReport {
    pub recipient: String,
    pub interesting_days: usize,
    pub result: crate::utils::error::Result<()>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}
