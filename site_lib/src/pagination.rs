//! Sliding page-number window and the page strip built around it.

use serde::Serialize;

/// Number of page links shown around the current page.
pub const DEFAULT_WINDOW_SIZE: i64 = 7;

/// Inclusive range of page numbers to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub start: i64,
    pub end: i64,
}

impl PageWindow {
    pub fn pages(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Page 1 is outside the window, so a leading "1 …" is needed.
    pub fn has_leading_gap(&self) -> bool {
        self.start > 1
    }

    /// The last page is outside the window.
    pub fn has_trailing_gap(&self, total_pages: i64) -> bool {
        self.end < total_pages
    }
}

/// Window of at most `window_size` pages centred on `current_page` where possible.
///
/// Inputs below 1 are treated as 1. The current page is always inside the
/// window when `current_page <= total_pages`.
pub fn page_window(current_page: i64, total_pages: i64, window_size: i64) -> PageWindow {
    let current = current_page.max(1);
    let total = total_pages.max(1);
    let size = window_size.max(1);

    let half = size / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = start.saturating_add(size - 1).min(total);
    if end - start + 1 < size {
        start = end.saturating_sub(size - 1).max(1);
    }
    PageWindow { start, end }
}

/// One entry of the rendered page strip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageItem {
    Page { number: i64, current: bool },
    Gap,
}

/// Page links around `current`: `1 … window … total`, plus previous/next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageStrip {
    pub previous: Option<i64>,
    pub items: Vec<PageItem>,
    pub next: Option<i64>,
}

impl PageStrip {
    pub fn new(current_page: i64, total_pages: i64, window_size: i64) -> Self {
        let total = total_pages.max(1);
        let current = current_page.clamp(1, total);
        let window = page_window(current, total, window_size);

        let page = |number: i64| PageItem::Page {
            number,
            current: number == current,
        };

        let mut items = Vec::with_capacity(window.len() + 4);
        if window.start > 1 {
            items.push(page(1));
            if window.start > 2 {
                items.push(PageItem::Gap);
            }
        }
        items.extend(window.pages().map(page));
        if window.end < total {
            if window.end < total - 1 {
                items.push(PageItem::Gap);
            }
            items.push(page(total));
        }

        Self {
            previous: (current > 1).then(|| current - 1),
            items,
            next: (current < total).then(|| current + 1),
        }
    }

    /// Page numbers only, in order.
    pub fn numbers(&self) -> Vec<i64> {
        self.items
            .iter()
            .filter_map(|item| match item {
                PageItem::Page { number, .. } => Some(*number),
                PageItem::Gap => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_many() {
        let window = page_window(1, 20, 7);
        assert_eq!(window, PageWindow { start: 1, end: 7 });
        assert!(!window.has_leading_gap());
        assert!(window.has_trailing_gap(20));
    }

    #[test]
    fn last_page_of_many() {
        let window = page_window(20, 20, 7);
        assert_eq!(window, PageWindow { start: 14, end: 20 });
        assert!(window.has_leading_gap());
        assert!(!window.has_trailing_gap(20));
    }

    #[test]
    fn middle_page_is_centred() {
        assert_eq!(page_window(10, 20, 7), PageWindow { start: 7, end: 13 });
    }

    #[test]
    fn window_length_is_min_of_size_and_total() {
        for total in 1..30 {
            for current in 1..=total {
                let window = page_window(current, total, 7);
                assert_eq!(window.len() as i64, total.min(7), "current={current} total={total}");
                assert!(window.start <= current && current <= window.end);
                assert!(window.start >= 1 && window.end <= total);
            }
        }
    }

    #[test]
    fn extreme_page_counts_saturate() {
        let window = page_window(i64::MAX, i64::MAX, 7);
        assert_eq!(window, PageWindow { start: i64::MAX - 6, end: i64::MAX });
        let window = page_window(1, i64::MAX, i64::MAX);
        assert_eq!(window, PageWindow { start: 1, end: i64::MAX });
        let strip = PageStrip::new(i64::MAX, i64::MAX, 7);
        assert_eq!(strip.next, None);
        assert_eq!(strip.previous, Some(i64::MAX - 1));
    }

    #[test]
    fn window_is_deterministic() {
        assert_eq!(page_window(5, 12, 7), page_window(5, 12, 7));
    }

    #[test]
    fn single_page() {
        let window = page_window(1, 1, 7);
        assert_eq!(window, PageWindow { start: 1, end: 1 });
        let strip = PageStrip::new(1, 1, 7);
        assert_eq!(strip.previous, None);
        assert_eq!(strip.next, None);
        assert_eq!(strip.numbers(), vec![1]);
    }

    #[test]
    fn strip_on_first_page_has_trailing_gap() {
        let strip = PageStrip::new(1, 20, 7);
        assert_eq!(strip.numbers(), vec![1, 2, 3, 4, 5, 6, 7, 20]);
        assert_eq!(strip.items[7], PageItem::Gap);
        assert_eq!(strip.previous, None);
        assert_eq!(strip.next, Some(2));
    }

    #[test]
    fn strip_on_last_page_has_leading_gap() {
        let strip = PageStrip::new(20, 20, 7);
        assert_eq!(strip.numbers(), vec![1, 14, 15, 16, 17, 18, 19, 20]);
        assert_eq!(strip.items[1], PageItem::Gap);
        assert_eq!(strip.previous, Some(19));
        assert_eq!(strip.next, None);
    }

    #[test]
    fn no_gap_when_window_touches_the_edge_page() {
        // Window 2..8 of 9: page 1 and 9 are adjacent, so no gaps.
        let strip = PageStrip::new(5, 9, 7);
        assert_eq!(strip.numbers(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(!strip.items.contains(&PageItem::Gap));
    }

    #[test]
    fn current_page_is_marked() {
        let strip = PageStrip::new(3, 5, 7);
        let current: Vec<i64> = strip
            .items
            .iter()
            .filter_map(|item| match item {
                PageItem::Page { number, current: true } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(current, vec![3]);
    }
}
