//! Paginator over a result table and the "smart" page window shown in pagination controls.

use serde::Serialize;
use serde_json::Value;

/// Rows per list page.
pub const PER_PAGE: usize = 50;

/// Window is shown in full up to this many pages.
const FULL_WINDOW_MAX: u32 = 10;
/// Links kept on each side of the current page.
const ON_EACH_SIDE: u32 = 3;
/// Links kept at either end of the range.
const ON_ENDS: u32 = 2;

pub struct Paginator {
    rows: Vec<Value>,
    per_page: usize,
}

/// One page of rows. `number` is 1-based and always within `1..=num_pages`.
#[derive(Clone, Debug, Serialize)]
pub struct Page {
    pub number: u32,
    pub num_pages: u32,
    pub count: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub object_list: Vec<Value>,
}

impl Paginator {
    pub fn new(rows: Vec<Value>, per_page: usize) -> Self {
        Paginator {
            rows,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// At least one page, even for an empty table.
    pub fn num_pages(&self) -> u32 {
        let n = self.rows.len().div_ceil(self.per_page);
        n.max(1) as u32
    }

    /// Page for a raw `page` query value: unparseable (or absent) gives page 1,
    /// out of range gives the last page.
    pub fn page_from_query(&self, raw: Option<&str>) -> Page {
        let requested = raw.unwrap_or("1").trim().parse::<i64>().unwrap_or(1);
        let num_pages = self.num_pages() as i64;
        let number = if requested < 1 || requested > num_pages {
            num_pages
        } else {
            requested
        };
        self.page(number as u32)
    }

    fn page(&self, number: u32) -> Page {
        let start = (number as usize - 1) * self.per_page;
        let end = (start + self.per_page).min(self.rows.len());
        let object_list = self.rows.get(start..end).map(|s| s.to_vec()).unwrap_or_default();
        let (start_index, end_index) = if self.rows.is_empty() {
            (0, 0)
        } else {
            (start + 1, end)
        };
        Page {
            number,
            num_pages: self.num_pages(),
            count: self.rows.len(),
            start_index,
            end_index,
            object_list,
        }
    }
}

/// A single entry in the page window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageToken {
    Number(u32),
    Ellipsis,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub required: bool,
    pub tokens: Vec<PageToken>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl PageWindow {
    /// Window for `num_pages` total pages with `current` selected.
    pub fn compute(num_pages: u32, current: u32) -> Self {
        let (required, tokens) = if num_pages <= 1 {
            (false, Vec::new())
        } else if num_pages <= FULL_WINDOW_MAX {
            (true, (1..=num_pages).map(PageToken::Number).collect())
        } else {
            (true, smart_range(num_pages, current))
        };
        let prev = if current <= 1 { None } else { Some(current - 1) };
        let next = if current >= num_pages { None } else { Some(current + 1) };
        PageWindow {
            required,
            tokens,
            prev,
            next,
        }
    }

    pub fn for_page(page: &Page) -> Self {
        Self::compute(page.num_pages, page.number)
    }

    /// Template context: one entry per token with `page`, `ellipsis` and `current` keys.
    pub fn to_context(&self, current: u32) -> Value {
        let range: Vec<Value> = self
            .tokens
            .iter()
            .map(|t| match t {
                PageToken::Number(n) => serde_json::json!({
                    "page": n,
                    "ellipsis": false,
                    "current": *n == current,
                }),
                PageToken::Ellipsis => serde_json::json!({
                    "page": null,
                    "ellipsis": true,
                    "current": false,
                }),
            })
            .collect();
        serde_json::json!({
            "pagination_required": self.required,
            "page_prev": self.prev,
            "page_next": self.next,
            "page_range": range,
        })
    }
}

fn smart_range(num_pages: u32, current: u32) -> Vec<PageToken> {
    let mut out = Vec::new();
    if current > ON_EACH_SIDE + ON_ENDS + 1 {
        out.extend((1..=ON_ENDS).map(PageToken::Number));
        out.push(PageToken::Ellipsis);
        out.extend((current - ON_EACH_SIDE..current).map(PageToken::Number));
    } else {
        out.extend((1..current).map(PageToken::Number));
    }
    if current + ON_EACH_SIDE + ON_ENDS < num_pages {
        out.extend((current..=current + ON_EACH_SIDE).map(PageToken::Number));
        out.push(PageToken::Ellipsis);
        out.extend((num_pages - ON_ENDS + 1..=num_pages).map(PageToken::Number));
    } else {
        out.extend((current..=num_pages).map(PageToken::Number));
    }
    out
}
