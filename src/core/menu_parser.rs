use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

use crate::core::cleanup::truncate_at_case_boundary;
use crate::domain::model::{Course, MenuDay};
use crate::static_selector;
use crate::utils::error::{DigestError, Result};

const VEGETARIAN_MARKER: &str = "Vegetarian:";

/// 解析菜單頁面。找不到表格代表本週菜單尚未公布，回傳 `None`。
///
/// 標題列、空白列以及欄位數不符的列會被略過 (記錄警告)，不會讓整頁失敗。
pub fn parse_menu(html: &str) -> Option<Vec<MenuDay>> {
    static_selector!(TABLE <- "table");
    static_selector!(ROW <- "tr");

    let document = Html::parse_document(html);
    let table = document.select(&TABLE).next()?;

    let days = table.select(&ROW).filter_map(parse_row).collect();
    Some(days)
}

fn parse_row(row: ElementRef<'_>) -> Option<MenuDay> {
    let cells: Vec<ElementRef<'_>> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .collect();
    let (date_cell, course_cell) = (cells.first()?, cells.get(1)?);

    let date_parts: Vec<String> = paragraph_texts(*date_cell).collect();
    let day = date_parts.first()?;
    let month = date_parts.get(1)?;
    if month.is_empty() {
        return None;
    }
    let date = format!("{} {}", day, month);

    let descriptions: Vec<String> = paragraph_texts(*course_cell)
        .filter(|text| !text.is_empty())
        .collect();

    match assign_courses(&descriptions) {
        Ok(courses) => Some(MenuDay { date, courses }),
        Err(e) => {
            tracing::warn!("⚠️ Skipping menu row '{}': {}", date, e);
            None
        }
    }
}

/// 每個 `<p>` 的文字節點各自去除空白後直接相接
fn paragraph_texts<'a>(cell: ElementRef<'a>) -> impl Iterator<Item = String> + 'a {
    static_selector!(PARAGRAPH <- "p");
    cell.select(&PARAGRAPH)
        .map(|p| p.text().map(str::trim).collect::<String>())
}

/// 把一天的菜色段落對應到課程。
///
/// 只有一段時視為 `Special`；否則以 `Vegetarian:` 開頭的段落為分界，
/// 之前的都是前菜，之後三段依序為主菜、配菜、甜點。
pub fn assign_courses(descriptions: &[String]) -> Result<BTreeMap<Course, String>> {
    let mut courses = BTreeMap::new();

    match descriptions {
        [] => {
            return Err(DigestError::ParseError {
                message: "row has no course text".to_string(),
            })
        }
        [only] => {
            courses.insert(Course::Special, clean(only));
            return Ok(courses);
        }
        _ => {}
    }

    let vegetarian = descriptions
        .iter()
        .position(|d| d.starts_with(VEGETARIAN_MARKER))
        .ok_or_else(|| DigestError::ParseError {
            message: format!(
                "{} course paragraphs but none starts with '{}'",
                descriptions.len(),
                VEGETARIAN_MARKER
            ),
        })?;

    let rest = &descriptions[vegetarian + 1..];
    if rest.len() < 3 {
        return Err(DigestError::ParseError {
            message: format!(
                "expected main, sides and dessert after the vegetarian dish, found {} paragraph(s)",
                rest.len()
            ),
        });
    }

    for (n, starter) in descriptions[..vegetarian].iter().enumerate() {
        courses.insert(Course::Starter(n), clean(starter));
    }
    courses.insert(
        Course::Vegetarian,
        clean(&descriptions[vegetarian][VEGETARIAN_MARKER.len()..]),
    );
    courses.insert(Course::Main, clean(&rest[0]));
    courses.insert(Course::Sides, clean(&rest[1]));
    courses.insert(Course::Dessert, clean(&rest[2]));

    if rest.len() > 3 {
        tracing::debug!("Ignoring {} trailing course paragraph(s)", rest.len() - 3);
    }

    Ok(courses)
}

fn clean(description: &str) -> String {
    truncate_at_case_boundary(description.trim()).trim().to_string()
}
