use chrono::{NaiveDate, Weekday};

use crate::core::date_cursor::DateCursor;
use crate::core::digest::render_digest;
use crate::core::menu_parser::parse_menu;
use crate::core::preferences::find_interesting_days;
use crate::domain::model::{DeliveryReport, OutgoingDigest, UserProfile, WeekMenu, WeekStart};
use crate::domain::ports::{CheckpointStore, Mailer, MenuSource};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// 從檢查點的下一週開始，結束後更新檢查點
    Scheduled,
    /// 以今天為錨點，多試下一週，不寫檢查點
    Debug,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub base_url: String,
    pub path_prefix: String,
    pub date_formats: Vec<String>,
    pub week_start: Weekday,
    pub stale_after_days: i64,
    pub mode: RunMode,
    pub dry_run: bool,
}

impl RunSettings {
    pub fn menu_url(&self, fragment: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            self.path_prefix,
            fragment
        )
    }

    pub fn week_offsets(&self) -> Vec<u32> {
        match self.mode {
            RunMode::Scheduled => vec![0],
            RunMode::Debug => vec![0, 1],
        }
    }

    pub fn persists_checkpoint(&self) -> bool {
        self.mode == RunMode::Scheduled && !self.dry_run
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    /// 找到菜單並逐一寄送
    Delivered {
        week: WeekStart,
        reports: Vec<DeliveryReport>,
    },
    /// Dry run: 已產生郵件但未寄出
    Previewed {
        week: WeekStart,
        digests: Vec<OutgoingDigest>,
    },
    /// 菜單遲遲未公布，放棄這一週
    Skipped { week: WeekStart },
    /// 菜單尚未公布，下次再試
    NotPublished { week: WeekStart },
}

impl RunOutcome {
    /// 寄送全部失敗時不前進，下次重試同一週
    pub fn next_checkpoint(&self) -> Option<WeekStart> {
        match self {
            Self::Delivered { week, reports }
                if reports.is_empty() || reports.iter().any(DeliveryReport::is_delivered) =>
            {
                Some(*week)
            }
            Self::Skipped { week } => Some(*week),
            _ => None,
        }
    }
}

pub struct DigestEngine<S: CheckpointStore, F: MenuSource, M: Mailer> {
    store: S,
    source: F,
    mailer: M,
    settings: RunSettings,
}

impl<S: CheckpointStore, F: MenuSource, M: Mailer> DigestEngine<S, F, M> {
    pub fn new(store: S, source: F, mailer: M, settings: RunSettings) -> Self {
        Self {
            store,
            source,
            mailer,
            settings,
        }
    }

    /// 讀取檢查點、處理目標週，並依結果寫回檢查點
    pub async fn run(&self, users: &[UserProfile], today: NaiveDate) -> Result<RunOutcome> {
        let anchor = match self.settings.mode {
            RunMode::Debug => {
                tracing::debug!("Debug mode: anchoring on today ({})", today);
                today
            }
            RunMode::Scheduled => {
                let last = self.store.load().await?;
                tracing::info!("📅 Last processed week: {}", last);
                if !last.is_aligned(self.settings.week_start) {
                    tracing::warn!(
                        "⚠️ Checkpoint {} is not a {:?}; moving on to the next full week",
                        last,
                        self.settings.week_start
                    );
                }
                last.following(self.settings.week_start).date()
            }
        };

        let outcome = self.process_week(anchor, users, today).await;

        match outcome.next_checkpoint() {
            Some(week) if self.settings.persists_checkpoint() => {
                self.store.save(week).await?;
                tracing::info!("💾 Checkpoint advanced to {}", week);
            }
            Some(week) => tracing::info!("Checkpoint left unchanged (would be {})", week),
            None => tracing::debug!("Checkpoint left unchanged"),
        }

        Ok(outcome)
    }

    /// 處理單一週次；不讀寫檢查點
    pub async fn process_week(
        &self,
        anchor: NaiveDate,
        users: &[UserProfile],
        today: NaiveDate,
    ) -> RunOutcome {
        let cursor = DateCursor::new(
            anchor,
            self.settings.week_start,
            self.settings.date_formats.clone(),
            self.settings.week_offsets(),
        );
        let target = cursor.week();
        tracing::info!("🔎 Looking for the menu of the week starting {}", target.date());

        match self.find_menu(&cursor).await {
            Some(menu) => self.deliver(&menu, users).await,
            None if target.days_before(today) > self.settings.stale_after_days => {
                tracing::warn!(
                    "⏭️ No menu for the week of {} after {} days, skipping it",
                    target.date(),
                    target.days_before(today)
                );
                RunOutcome::Skipped { week: target }
            }
            None => {
                tracing::info!("No menu published yet for the week of {}", target.date());
                RunOutcome::NotPublished { week: target }
            }
        }
    }

    async fn find_menu(&self, cursor: &DateCursor) -> Option<WeekMenu> {
        for candidate in cursor.candidates() {
            let url = self.settings.menu_url(&candidate.fragment);
            tracing::debug!("Trying {}", url);

            let html = match self.source.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("⚠️ Fetching {} failed: {}", url, e);
                    continue;
                }
            };

            match parse_menu(&html) {
                Some(days) if !days.is_empty() => {
                    tracing::info!("✅ Found menu at {} ({} days)", url, days.len());
                    return Some(WeekMenu {
                        week: candidate.week,
                        days,
                    });
                }
                Some(_) => tracing::warn!("⚠️ Menu table at {} has no readable rows", url),
                None => tracing::debug!("No menu table at {}", url),
            }
        }
        None
    }

    async fn deliver(&self, menu: &WeekMenu, users: &[UserProfile]) -> RunOutcome {
        let mut reports = Vec::new();
        let mut previews = Vec::new();

        for user in users {
            let days = find_interesting_days(&menu.days, user);
            let digest = OutgoingDigest {
                recipient_name: user.name.clone(),
                recipient_email: user.email.clone(),
                html_body: render_digest(&user.name, &days),
            };

            if self.settings.dry_run {
                tracing::info!(
                    "🔍 DRY RUN - digest for {} <{}>:\n{}",
                    user.name,
                    user.email,
                    digest.html_body
                );
                previews.push(digest);
                continue;
            }

            tracing::info!(
                "📧 Sending digest to {} <{}> ({} interesting day(s))",
                user.name,
                user.email,
                days.len()
            );
            let result = self.mailer.send(&digest).await;
            if let Err(e) = &result {
                tracing::error!("❌ Delivery to {} <{}> failed: {}", user.name, user.email, e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            }
            reports.push(DeliveryReport {
                recipient: user.email.clone(),
                interesting_days: days.len(),
                result,
            });
        }

        if self.settings.dry_run {
            RunOutcome::Previewed {
                week: menu.week,
                digests: previews,
            }
        } else {
            RunOutcome::Delivered {
                week: menu.week,
                reports,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: RunMode, dry_run: bool) -> RunSettings {
        RunSettings {
            base_url: "http://intranet.example.ac.uk/".to_string(),
            path_prefix: "hall-menu-".to_string(),
            date_formats: vec!["%d-%b".to_string()],
            week_start: Weekday::Mon,
            stale_after_days: 3,
            mode,
            dry_run,
        }
    }

    fn week() -> WeekStart {
        "2024, 03, 11".parse().unwrap()
    }

    #[test]
    fn test_menu_url() {
        assert_eq!(
            settings(RunMode::Scheduled, false).menu_url("11-mar"),
            "http://intranet.example.ac.uk/hall-menu-11-mar"
        );
    }

    #[test]
    fn test_only_scheduled_real_runs_persist() {
        assert!(settings(RunMode::Scheduled, false).persists_checkpoint());
        assert!(!settings(RunMode::Scheduled, true).persists_checkpoint());
        assert!(!settings(RunMode::Debug, false).persists_checkpoint());
        assert_eq!(settings(RunMode::Debug, false).week_offsets(), vec![0, 1]);
    }

    #[test]
    fn test_next_checkpoint_policy() {
        let ok = DeliveryReport {
            recipient: "a@example.com".to_string(),
            interesting_days: 1,
            result: Ok(()),
        };
        let failed = || DeliveryReport {
            recipient: "b@example.com".to_string(),
            interesting_days: 0,
            result: Err(crate::utils::error::DigestError::mail("b@example.com", "refused")),
        };

        let partial = RunOutcome::Delivered {
            week: week(),
            reports: vec![ok, failed()],
        };
        assert_eq!(partial.next_checkpoint(), Some(week()));

        let all_failed = RunOutcome::Delivered {
            week: week(),
            reports: vec![failed()],
        };
        assert_eq!(all_failed.next_checkpoint(), None);

        let nobody = RunOutcome::Delivered {
            week: week(),
            reports: Vec::new(),
        };
        assert_eq!(nobody.next_checkpoint(), Some(week()));

        assert_eq!(RunOutcome::Skipped { week: week() }.next_checkpoint(), Some(week()));
        assert_eq!(RunOutcome::NotPublished { week: week() }.next_checkpoint(), None);
    }
}
