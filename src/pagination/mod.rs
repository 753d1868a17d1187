use std::num::NonZeroU64;

use serde::Serialize;

/// Inputs to the page window: catalog size, page size and the page being viewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationRequest {
    pub total_items: u64,
    pub page_size: NonZeroU64,
    pub current_page: u64,
}

/// One renderable element of the pagination bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageControl {
    PreviousButton,
    PageButton { page_number: u64, is_active: bool },
    Ellipsis,
    NextButton,
}

impl PageControl {
    /// Page the viewer should move to when this control is activated.
    pub fn target(&self, current_page: u64) -> Option<u64> {
        match *self {
            PageControl::PageButton { page_number, .. } => Some(page_number),
            PageControl::PreviousButton => current_page.checked_sub(1).filter(|p| *p >= 1),
            PageControl::NextButton => current_page.checked_add(1),
            PageControl::Ellipsis => None,
        }
    }
}

/// Left-to-right sequence of controls. Recomputed on every page change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PaginationPlan {
    controls: Vec<PageControl>,
}

impl PaginationPlan {
    pub fn controls(&self) -> &[PageControl] {
        &self.controls
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageControl> {
        self.controls.iter()
    }

    /// Page numbers of every `PageButton`, in render order.
    pub fn page_numbers(&self) -> Vec<u64> {
        self.controls
            .iter()
            .filter_map(|c| match c {
                PageControl::PageButton { page_number, .. } => Some(*page_number),
                _ => None,
            })
            .collect()
    }

    pub fn active_page(&self) -> Option<u64> {
        self.controls.iter().find_map(|c| match c {
            PageControl::PageButton {
                page_number,
                is_active: true,
            } => Some(*page_number),
            _ => None,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.controls.contains(&PageControl::PreviousButton)
    }

    pub fn has_next(&self) -> bool {
        self.controls.contains(&PageControl::NextButton)
    }
}

impl<'a> IntoIterator for &'a PaginationPlan {
    type Item = &'a PageControl;
    type IntoIter = std::slice::Iter<'a, PageControl>;

    fn into_iter(self) -> Self::IntoIter {
        self.controls.iter()
    }
}

pub fn total_pages(total_items: u64, page_size: NonZeroU64) -> u64 {
    total_items.div_ceil(page_size.get())
}

/// Computes the pagination bar for `request`.
///
/// Shows up to two pages either side of the current one, the first and last
/// pages when they fall outside that window, and an ellipsis wherever pages
/// are skipped. A current page past the end anchors the window at the last
/// page; nothing is marked active in that case.
pub fn compute(request: PaginationRequest) -> PaginationPlan {
    let total = total_pages(request.total_items, request.page_size);
    let current = request.current_page;
    let mut controls: Vec<PageControl> = Vec::new();
    if total == 0 {
        return PaginationPlan { controls };
    }

    if current > 1 {
        controls.push(PageControl::PreviousButton);
    }

    let start = current.saturating_sub(2).max(1).min(total);
    let end = current.saturating_add(2).min(total);

    // start > 1 is current > 3 and start > 2 is current > 4 for in-range pages;
    // using the clamped start keeps page 1 unique when current is past the end.
    if start > 1 {
        controls.push(page_button(1, current));
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    for page in start..=end {
        controls.push(page_button(page, current));
    }

    if current < total.saturating_sub(2) {
        if current < total.saturating_sub(3) {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(page_button(total, current));
    }

    if current < total {
        controls.push(PageControl::NextButton);
    }

    PaginationPlan { controls }
}

fn page_button(page_number: u64, current_page: u64) -> PageControl {
    PageControl::PageButton {
        page_number,
        is_active: page_number == current_page,
    }
}
