use std::collections::BTreeSet;

use crate::domain::model::{InterestingDay, MenuDay, UserProfile};

/// 片語的每個單字都以不分大小寫的子字串出現在描述中即算符合；不看順序與相鄰。
pub fn phrase_present(description: &str, phrase: &str) -> bool {
    let haystack = description.to_lowercase();
    phrase
        .split_whitespace()
        .all(|word| haystack.contains(&word.to_lowercase()))
}

pub fn desire_match(description: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| phrase_present(description, phrase))
}

/// 逐課程檢查：符合任一喜好且同一課程沒有命中厭惡清單，該天即為有興趣。
///
/// 厭惡清單只針對觸發喜好的那道菜，其他課程命中厭惡詞不影響這一天。
pub fn find_interesting_days<'a>(days: &'a [MenuDay], profile: &UserProfile) -> Vec<InterestingDay<'a>> {
    let mut interesting: Vec<InterestingDay<'a>> = Vec::new();

    for day in days {
        for (course, dish) in &day.courses {
            if !desire_match(dish, &profile.desires) {
                continue;
            }
            if let Some(disgusts) = &profile.disgusts {
                if desire_match(dish, disgusts) {
                    tracing::debug!(
                        "{} on {} matched a disgust for {}",
                        course.key(),
                        day.date,
                        profile.name
                    );
                    continue;
                }
            }

            let key = course.key().to_lowercase();
            let same_day = interesting
                .last()
                .is_some_and(|last| std::ptr::eq(last.day, day));
            if same_day {
                if let Some(last) = interesting.last_mut() {
                    last.matched.insert(key);
                }
            } else {
                interesting.push(InterestingDay {
                    day,
                    matched: BTreeSet::from([key]),
                });
            }
        }
    }

    interesting
}
