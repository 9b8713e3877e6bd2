//! An in-memory collection with client-side filtering and pagination.
//!
//! Filtering and paging never touch the network; they reshape whatever
//! the last successful fetch returned.

use super::resource::Resource;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// A fetched collection plus the filter text and page the user is looking at.
#[derive(Debug, Clone)]
pub struct ResourceList<R> {
    items: Vec<R>,
    filter: String,
    page: usize,
}

impl<R> Default for ResourceList<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filter: String::new(),
            page: 1,
        }
    }
}

impl<R: Resource> ResourceList<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetched item, unfiltered, in server order.
    #[must_use]
    pub fn items(&self) -> &[R] {
        &self.items
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Current page, starting at 1.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Swap in a freshly fetched collection, keeping filter and page.
    pub fn replace_all(&mut self, items: Vec<R>) {
        self.items = items;
    }

    /// Change the filter text and go back to the first page.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.page = 1;
    }

    /// Jump to a page. Page numbers below 1 become 1; pages past the end are
    /// kept and show nothing.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Items matching the filter, in server order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&R> {
        let needle = self.filter.to_lowercase();
        self.items.iter().filter(|item| item.matches(&needle)).collect()
    }

    /// The slice of filtered items on the current page.
    #[must_use]
    pub fn visible(&self) -> Vec<&R> {
        self.filtered()
            .into_iter()
            .skip((self.page - 1).saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .collect()
    }

    /// Pagination summary for the filtered items.
    #[must_use]
    pub fn pager(&self) -> Pager {
        Pager::new(self.page, self.filtered().len())
    }

    #[must_use]
    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Append a newly created item.
    pub fn push(&mut self, item: R) {
        self.items.push(item);
    }

    /// Replace the item with the same id in place, or append it if it is gone.
    pub fn upsert(&mut self, item: R) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Remove the item with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &R::Id) -> Option<R> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

/// Pagination summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Current page, starting at 1.
    pub page: usize,
    /// `ceil(total_items / PAGE_SIZE)`.
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based position of the first item shown, or 0 if the page is empty.
    pub first_item: usize,
    /// 1-based position of the last item shown, or 0 if the page is empty.
    pub last_item: usize,
}

impl Pager {
    #[must_use]
    pub const fn new(page: usize, total_items: usize) -> Self {
        let page = if page == 0 { 1 } else { page };
        let start = (page - 1).saturating_mul(PAGE_SIZE);
        let (first_item, last_item) = if start < total_items {
            let end = start.saturating_add(PAGE_SIZE);
            (
                start + 1,
                if end < total_items { end } else { total_items },
            )
        } else {
            (0, 0)
        };

        Self {
            page,
            total_pages: total_items.div_ceil(PAGE_SIZE),
            total_items,
            first_item,
            last_item,
        }
    }

    /// Controls are hidden when everything fits on one page.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.total_items > PAGE_SIZE
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Every page number, for numbered page links.
    pub fn page_numbers(&self) -> impl Iterator<Item = usize> {
        1..=self.total_pages
    }
}
