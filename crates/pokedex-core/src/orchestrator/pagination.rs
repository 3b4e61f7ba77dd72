use crate::view_state::PAGE_SIZE;

/// Visible slots in the pagination strip, counting first, last and ellipses.
const MAX_SLOTS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

pub fn total_pages(total_count: u64) -> u32 {
    total_count.div_ceil(PAGE_SIZE as u64) as u32
}

/// Page numbers for the pagination strip.
///
/// Short ranges are listed in full. Longer ones always show the first and
/// last page with a window around `current`, and an ellipsis wherever pages
/// are skipped.
pub fn page_numbers(total_pages: u32, current: u32) -> Vec<PageSlot> {
    if total_pages <= MAX_SLOTS {
        return (1..=total_pages).map(PageSlot::Page).collect();
    }

    let middle = MAX_SLOTS - 2;
    let half = middle / 2;

    let (start, end) = if current >= total_pages - half {
        (total_pages - middle, total_pages - 1)
    } else if current <= half + 1 {
        (2, middle)
    } else {
        (current - half, current + half)
    };

    let mut slots = vec![PageSlot::Page(1)];
    if start > 2 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.extend((start..=end).map(PageSlot::Page));
    if end < total_pages - 1 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.push(PageSlot::Page(total_pages));
    slots
}
