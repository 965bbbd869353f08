use crate::query::FilterState;

/// Most page numbers shown at once.
pub const WINDOW: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub page: u32,
    pub href: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLink {
    pub page: u32,
    pub href: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub previous: StepLink,
    pub pages: Vec<PageLink>,
    pub next: StepLink,
}

/// Contiguous page numbers around `current`, at most [`WINDOW`] of them,
/// shifted left near the end so the window stays full when it can.
pub fn window(current: u32, total: u32) -> Vec<u32> {
    if total <= 1 {
        return vec![];
    }
    let half = WINDOW / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = total.min(start.saturating_add(WINDOW - 1));
    if end - start.min(end) < WINDOW - 1 {
        start = end.saturating_sub(WINDOW - 1).max(1);
    }
    (start..=end).collect()
}

/// Pagination controls for a listing, or `None` when there is a single page.
///
/// `current` is clamped into `1..=total` so an out-of-range page reported
/// by the API never yields a link past the last page.
pub fn paginate(filter: &FilterState, current: u32, total: u32) -> Option<Pagination> {
    if total <= 1 {
        return None;
    }
    let current = current.clamp(1, total);

    let pages = window(current, total)
        .into_iter()
        .map(|page| PageLink {
            page,
            href: filter.page_href(page),
            current: page == current,
        })
        .collect();

    let prev = current.saturating_sub(1).max(1);
    let next = current.saturating_add(1).min(total);

    Some(Pagination {
        previous: StepLink {
            page: prev,
            href: filter.page_href(prev),
            disabled: current == 1,
        },
        pages,
        next: StepLink {
            page: next,
            href: filter.page_href(next),
            disabled: current == total,
        },
    })
}
