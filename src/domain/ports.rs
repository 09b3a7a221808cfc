use crate::domain::model::{OutgoingDigest, WeekStart};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 上次成功處理的週次
pub trait CheckpointStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<WeekStart>> + Send;
    fn save(&self, week: WeekStart) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait MenuSource: Send + Sync {
    /// 取得頁面原始 HTML；非 2xx 也回傳內容，交給解析判斷
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, digest: &OutgoingDigest) -> Result<()>;
}
