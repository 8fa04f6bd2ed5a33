//! Page slicing for filtered and sorted deal collections.

/// Smallest page size the marketplace will serve
pub const MIN_LIMIT: usize = 10;

/// Page size used when the URL does not carry one
pub const DEFAULT_LIMIT: usize = 12;

/// Requested page, 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    /// Page number and size actually used for slicing
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.max(MIN_LIMIT),
        }
    }

    /// Start index for this page (0-indexed)
    pub fn start_index(&self) -> usize {
        let clamped = self.clamped();
        (clamped.page - 1).saturating_mul(clamped.limit)
    }
}

/// A single page of results plus the totals needed to render page links
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    /// Effective page number after clamping
    pub page: usize,
    /// Effective page size after clamping
    pub limit: usize,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        let clamped = request.clamped();
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
            page: clamped.page,
            limit: clamped.limit,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Slice `items` down to the requested page.
///
/// Out-of-range pages produce an empty `items` with correct totals.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let clamped = request.clamped();
    let total_items = items.len();
    let total_pages = total_items.div_ceil(clamped.limit);

    let start = clamped.start_index().min(total_items);
    let end = start.saturating_add(clamped.limit).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        total_items,
        total_pages,
        page: clamped.page,
        limit: clamped.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn twenty_three_items_over_limit_ten() {
        let items = numbers(23);
        let sizes: Vec<usize> = (1..=3)
            .map(|p| paginate(&items, PageRequest::new(p, 10)).items.len())
            .collect();
        assert_eq!(sizes, vec![10, 10, 3]);

        let beyond = paginate(&items, PageRequest::new(4, 10));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 3);
        assert_eq!(beyond.total_items, 23);
        assert!(!beyond.has_next());
    }

    #[test]
    fn limit_and_page_are_clamped() {
        let items = numbers(15);
        let page = paginate(&items, PageRequest::new(0, 3));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MIN_LIMIT);
        assert_eq!(page.items, numbers(10));
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = paginate::<usize>(&[], PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_previous());
    }

    #[test]
    fn pages_cover_collection_exactly_once() {
        for total in [0, 1, 9, 10, 11, 37, 100] {
            let items = numbers(total);
            let first = paginate(&items, PageRequest::new(1, 10));
            let mut seen = Vec::new();
            for p in 1..=first.total_pages {
                seen.extend(paginate(&items, PageRequest::new(p, 10)).items);
            }
            assert_eq!(seen, items, "total = {total}");
        }
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let items = numbers(5);
        let page = paginate(&items, PageRequest::new(usize::MAX, 50));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
