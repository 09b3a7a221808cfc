use std::sync::OnceLock;

use scraper::Selector;

/// 第一次使用時才編譯的 CSS selector
#[derive(Debug)]
pub struct StaticSelector {
    cell: OnceLock<Selector>,
    css: &'static str,
}

impl StaticSelector {
    pub const fn new(css: &'static str) -> Self {
        Self {
            cell: OnceLock::new(),
            css,
        }
    }
}

impl std::ops::Deref for StaticSelector {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell.get_or_init(|| match Selector::parse(self.css) {
            Ok(sel) => sel,
            Err(e) => panic!("invalid static selector {}: {:?}", self.css, e),
        })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($name:ident <- $css:literal) => {
        static $name: $crate::utils::selector::StaticSelector =
            $crate::utils::selector::StaticSelector::new($css);
    };
}
