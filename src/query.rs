// Query Builder: turns {search text, sort, page} into a retrieval request.
// Search and listing are mutually exclusive modes; search ignores sort and
// pagination entirely and never has further pages.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Created,
    Price,
    Rating,
    MaxGuests,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
            SortKey::MaxGuests => "maxGuests",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// The two retrieval strategies, kept as an explicit tagged union rather
/// than one unified query object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalMode {
    Listing {
        page: u32,
        sort: SortKey,
        order: SortOrder,
    },
    Search {
        text: String,
    },
}

/// How a freshly fetched page combines with already-accumulated results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDisposition {
    /// Discard accumulated pages; this request restarts from page 1.
    Replace,
    /// "Load more": append onto what is already shown.
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueQuery {
    search_text: String,
    sort: SortKey,
    order: SortOrder,
    page: u32,
    page_size: u32,
}

impl Default for VenueQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl VenueQuery {
    pub const DEFAULT_PAGE_SIZE: u32 = 12;

    pub fn new() -> Self {
        Self::with_page_size(Self::DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            search_text: String::new(),
            sort: SortKey::Created,
            order: SortOrder::Desc,
            page: 1,
            page_size,
        }
    }

    pub fn mode(&self) -> RetrievalMode {
        if self.search_text.is_empty() {
            RetrievalMode::Listing {
                page: self.page,
                sort: self.sort,
                order: self.order,
            }
        } else {
            RetrievalMode::Search {
                text: self.search_text.clone(),
            }
        }
    }

    pub fn is_search(&self) -> bool {
        !self.search_text.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Empty text switches back to listing mode. Either way pagination
    /// resets and accumulated pages are discarded.
    pub fn set_search_text(&mut self, text: &str) -> PageDisposition {
        self.search_text = text.trim().to_string();
        self.page = 1;
        PageDisposition::Replace
    }

    /// Changing the sort resets pagination and replaces accumulated pages.
    pub fn set_sort(&mut self, sort: SortKey, order: SortOrder) -> PageDisposition {
        self.sort = sort;
        self.order = order;
        self.page = 1;
        PageDisposition::Replace
    }

    /// Advances to the next page in listing mode; search has no pages.
    pub fn next_page(&mut self) -> Option<PageDisposition> {
        if self.is_search() {
            return None;
        }
        self.page += 1;
        Some(PageDisposition::Append)
    }

    /// Undoes a [`next_page`](Self::next_page) whose fetch failed, so the
    /// same page is requested again on retry.
    pub fn retreat_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Back to page 1 without changing sort or mode.
    pub fn reset(&mut self) -> PageDisposition {
        self.page = 1;
        PageDisposition::Replace
    }

    /// Query parameters for the current mode.
    pub fn params(&self) -> Vec<(String, String)> {
        match self.mode() {
            RetrievalMode::Search { text } => vec![("q".to_string(), text)],
            RetrievalMode::Listing { page, sort, order } => vec![
                ("limit".to_string(), self.page_size.to_string()),
                ("page".to_string(), page.to_string()),
                ("sort".to_string(), sort.as_str().to_string()),
                ("sortOrder".to_string(), order.as_str().to_string()),
            ],
        }
    }

    /// A short page means the listing is exhausted; search results are a
    /// flat set with no further pages by definition.
    pub fn has_more(&self, last_page_len: usize) -> bool {
        !self.is_search() && last_page_len as u32 == self.page_size
    }
}
