use crate::domain::model::UserProfile;
use crate::utils::error::{DigestError, Result};
use crate::utils::validation::{self, Validate};
use std::path::Path;

/// 從 JSON 陣列載入使用者清單
pub fn load_users<P: AsRef<Path>>(path: P) -> Result<Vec<UserProfile>> {
    let content = std::fs::read_to_string(&path)?;
    let users = parse_users(&content)?;
    tracing::debug!(
        "Loaded {} user(s) from {}",
        users.len(),
        path.as_ref().display()
    );
    Ok(users)
}

pub fn parse_users(content: &str) -> Result<Vec<UserProfile>> {
    let users: Vec<UserProfile> = serde_json::from_str(content)?;
    for user in &users {
        user.validate()?;
    }
    Ok(users)
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("users.name", &self.name)?;
        validation::validate_non_empty_string("users.email", &self.email)?;

        if self.desires.is_empty() {
            tracing::warn!(
                "⚠️ {} has no desired phrases and will always get the empty digest",
                self.name
            );
        }
        // 空白片語會符合任何菜色
        for phrase in self.desires.iter().chain(self.disgusts.iter().flatten()) {
            validation::validate_non_empty_string(&format!("users.{}", self.name), phrase)?;
        }
        Ok(())
    }
}
