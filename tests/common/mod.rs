#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use hall_digest::core::engine::{RunMode, RunSettings};
use hall_digest::domain::model::{OutgoingDigest, UserProfile, WeekStart};
use hall_digest::domain::ports::{CheckpointStore, Mailer, MenuSource};
use hall_digest::{DigestError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://hall.test";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn week(s: &str) -> WeekStart {
    s.parse().unwrap()
}

pub fn settings(mode: RunMode) -> RunSettings {
    RunSettings {
        base_url: BASE_URL.to_string(),
        path_prefix: "hall-menu-".to_string(),
        date_formats: vec!["%d-%b".to_string(), "%-d-%B".to_string()],
        week_start: Weekday::Mon,
        stale_after_days: 3,
        mode,
        dry_run: false,
    }
}

pub fn user(name: &str, desires: &[&str], disgusts: Option<&[&str]>) -> UserProfile {
    UserProfile {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        desires: desires.iter().map(|s| s.to_string()).collect(),
        disgusts: disgusts.map(|d| d.iter().map(|s| s.to_string()).collect()),
    }
}

/// 一列菜單：日期兩段 + 菜色段落
pub fn menu_row(day: &str, month: &str, courses: &[&str]) -> String {
    let paragraphs: String = courses.iter().map(|c| format!("<p>{}</p>", c)).collect();
    format!(
        "<tr><td><p>{}</p><p>{}</p></td><td>{}</td></tr>",
        day, month, paragraphs
    )
}

pub fn menu_page(rows: &[String]) -> String {
    format!(
        "<html><body><table><tbody>{}</tbody></table></body></html>",
        rows.concat()
    )
}

pub fn week_page() -> String {
    menu_page(&[
        menu_row(
            "Monday",
            "11 March",
            &[
                "Leek soup",
                "Vegetarian: Mushroom risotto",
                "Chicken curry with peanut sauce",
                "Rice",
                "Fruit salad",
            ],
        ),
        menu_row(
            "Tuesday",
            "12 March",
            &[
                "Tomato soup",
                "Vegetarian: Bean chilli",
                "Chicken curry",
                "Naan",
                "Peanut brittle",
            ],
        ),
        menu_row("Sunday", "17 March", &["Formal Hall Banquet"]),
    ])
}

pub const NOT_PUBLISHED_PAGE: &str = "<html><body><p>Menu coming soon</p></body></html>";

#[derive(Clone, Default)]
pub struct MemoryCheckpoint {
    week: Arc<Mutex<Option<WeekStart>>>,
    saves: Arc<Mutex<Vec<WeekStart>>>,
}

impl MemoryCheckpoint {
    pub fn holding(week: WeekStart) -> Self {
        let store = Self::default();
        *store.week.lock().unwrap() = Some(week);
        store
    }

    pub fn current(&self) -> Option<WeekStart> {
        *self.week.lock().unwrap()
    }

    pub fn saves(&self) -> Vec<WeekStart> {
        self.saves.lock().unwrap().clone()
    }
}

impl CheckpointStore for MemoryCheckpoint {
    async fn load(&self) -> Result<WeekStart> {
        self.current()
            .ok_or_else(|| DigestError::checkpoint("no checkpoint stored"))
    }

    async fn save(&self, week: WeekStart) -> Result<()> {
        *self.week.lock().unwrap() = Some(week);
        self.saves.lock().unwrap().push(week);
        Ok(())
    }
}

/// 依網址回傳頁面；未設定的網址回傳「尚未公布」頁
#[derive(Clone, Default)]
pub struct FakeSite {
    pages: Arc<HashMap<String, String>>,
    broken: Arc<HashSet<String>>,
    every_url: Option<Arc<String>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeSite {
    pub fn with_pages(pages: &[(&str, String)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(path, html)| (format!("{}/{}", BASE_URL, path), html.clone()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn serving_everywhere(html: String) -> Self {
        Self {
            every_url: Some(Arc::new(html)),
            ..Self::default()
        }
    }

    pub fn with_broken(mut self, paths: &[&str]) -> Self {
        self.broken = Arc::new(
            paths
                .iter()
                .map(|path| format!("{}/{}", BASE_URL, path))
                .collect(),
        );
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl MenuSource for FakeSite {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.broken.contains(url) {
            return Err(DigestError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                format!("connection reset fetching {}", url),
            )));
        }
        if let Some(html) = &self.every_url {
            return Ok(html.to_string());
        }
        Ok(self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| NOT_PUBLISHED_PAGE.to_string()))
    }
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingDigest>>>,
    failing: Arc<HashSet<String>>,
}

impl RecordingMailer {
    pub fn failing_for(emails: &[&str]) -> Self {
        Self {
            failing: Arc::new(emails.iter().map(|e| e.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingDigest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, digest: &OutgoingDigest) -> Result<()> {
        if self.failing.contains(&digest.recipient_email) {
            return Err(DigestError::mail(
                &digest.recipient_email,
                "535 authentication failed",
            ));
        }
        self.sent.lock().unwrap().push(digest.clone());
        Ok(())
    }
}
