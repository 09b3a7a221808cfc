use crate::domain::model::InterestingDay;

pub const SUBJECT: &str = "Weekly Hall Digest";
pub const SENDER_NAME: &str = "HallBot";

const APOLOGY: &str =
    "Unfortunately, I haven't found anything good at hall this week. I'll try again next week!";
const INTRO: &str = "According to your desires, you may like the following:";
const SIGNATURE: &str = "Yours sincerely,<br>HallBot";

/// 產生郵件 HTML。命中的課程整行加粗。
pub fn render_digest(name: &str, days: &[InterestingDay<'_>]) -> String {
    let mut body = format!("Hi {},<br><br>", escape_html(name));

    if days.is_empty() {
        body.push_str(APOLOGY);
        body.push_str("<br><br>");
    } else {
        body.push_str(INTRO);
        body.push_str("<br><br>");

        for interesting in days {
            body.push_str(&format!("<h3>{}</h3>", escape_html(&interesting.day.date)));
            for (course, dish) in &interesting.day.courses {
                let line = format!("<i>{}</i>: {}", course.label(), escape_html(dish));
                if interesting.is_matched(course) {
                    body.push_str(&format!("<b>{}</b><br>", line));
                } else {
                    body.push_str(&line);
                    body.push_str("<br>");
                }
            }
            body.push_str("<br>");
        }
    }

    body.push_str(SIGNATURE);
    body
}

/// 菜單內容來自外部網頁，輸出前轉義
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
