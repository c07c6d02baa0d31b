//! Pagination stage.
//!
//! Pages slice the top-level rows only, so a parent and its expanded
//! children always land on the same page.

use crate::model::derived::PageInfo;
use crate::model::state::Pagination;

pub(super) fn page_info(root_count: usize, pagination: &Pagination, enabled: bool) -> PageInfo {
    if !enabled {
        return PageInfo {
            page_index: 0,
            page_size: pagination.page_size,
            page_count: 1,
            can_previous: false,
            can_next: false,
        };
    }

    let page_size = pagination.page_size.max(1);
    let page_count = root_count.div_ceil(page_size);
    let page_index = pagination.page_index.min(page_count.saturating_sub(1));
    PageInfo {
        page_index,
        page_size,
        page_count,
        can_previous: page_index > 0,
        can_next: page_index + 1 < page_count,
    }
}

pub(super) fn page_slice<'a>(roots: &'a [usize], page: &PageInfo, enabled: bool) -> &'a [usize] {
    if !enabled {
        return roots;
    }
    let start = (page.page_index * page.page_size).min(roots.len());
    let end = (start + page.page_size).min(roots.len());
    &roots[start..end]
}
