//! Page-number pagination
//!
//! Resolves `page`/`page_size` query parameters against a [`Queryset`], slices
//! out the requested page, and wraps the serialized page in a collection
//! envelope with `paging` metadata and navigation links.

use studyhub_api::envelope::{Envelope, Paging, PagingLinks};
use tracing::debug;
use url::Url;

use crate::error::CoreError;
use crate::queryset::Queryset;

/// Page size used when the request does not ask for one
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Largest page size a request may ask for; larger requests are clamped
pub const MAX_PAGE_SIZE: u64 = 1000;
/// Query parameter selecting the page
pub const PAGE_QUERY_PARAM: &str = "page";
/// Query parameter overriding the page size
pub const PAGE_SIZE_QUERY_PARAM: &str = "page_size";

const LAST_PAGE_STRINGS: &[&str] = &["last"];

/// Raw pagination query parameters, as sent by the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageParams {
    /// Read `page` and `page_size` from a request URL
    ///
    /// A repeated parameter resolves to its last value.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                PAGE_QUERY_PARAM => params.page = Some(value.into_owned()),
                PAGE_SIZE_QUERY_PARAM => params.page_size = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// Page-number pagination policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumberPagination {
    page_size: u64,
    max_page_size: u64,
}

impl Default for PageNumberPagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageNumberPagination {
    /// Create a policy; sizes below 1 are raised to 1
    #[must_use]
    pub fn new(page_size: u64, max_page_size: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            max_page_size: max_page_size.max(1),
        }
    }

    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    #[must_use]
    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    /// Effective page size for a raw `page_size` parameter
    ///
    /// Missing, non-numeric and non-positive values fall back to the default;
    /// values above the maximum are clamped to it.
    #[must_use]
    pub fn resolve_page_size(&self, raw: Option<&str>) -> u64 {
        raw.and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|&size| size > 0)
            .map_or(self.page_size, |size| size.min(self.max_page_size))
    }

    /// Fetch the requested page of `queryset`
    ///
    /// `request_url` is the absolute URL of the current request; navigation
    /// links are derived from it.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidPage` if the page parameter is not a number
    /// or lies outside `1..=total_pages`, or any error from the queryset.
    pub async fn paginate_queryset<Q: Queryset>(
        &self,
        queryset: &Q,
        params: &PageParams,
        request_url: &Url,
    ) -> Result<Page<Q::Record>, CoreError> {
        let per_page = self.resolve_page_size(params.page_size.as_deref());
        let total_items = queryset.count().await?;
        let total_pages = num_pages(total_items, per_page);
        let number = validate_page_number(params.page.as_deref(), total_pages)?;

        let records = queryset.slice((number - 1) * per_page, per_page).await?;
        debug!(
            resource = queryset.resource(),
            page = number,
            per_page,
            total_items,
            "paginated queryset"
        );

        Ok(Page {
            number,
            per_page,
            total_items,
            total_pages,
            records,
            request_url: request_url.clone(),
        })
    }
}

/// Number of pages for `count` items; an empty collection still has one page
#[must_use]
pub fn num_pages(count: u64, per_page: u64) -> u64 {
    if count == 0 {
        1
    } else {
        count.div_ceil(per_page.max(1))
    }
}

fn validate_page_number(raw: Option<&str>, total_pages: u64) -> Result<u64, CoreError> {
    let Some(raw) = raw else {
        return Ok(1);
    };
    if LAST_PAGE_STRINGS.contains(&raw) {
        return Ok(total_pages);
    }

    let invalid = |reason| CoreError::InvalidPage {
        page: raw.to_string(),
        reason,
    };
    let number: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("That page number is not an integer"))?;
    if number < 1 {
        return Err(invalid("That page number is less than 1"));
    }
    let number = number.unsigned_abs();
    if number > total_pages {
        return Err(invalid("That page contains no results"));
    }
    Ok(number)
}

/// One page of records plus the state needed to describe it
#[derive(Debug, Clone)]
pub struct Page<R> {
    /// Page number (1-indexed)
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub records: Vec<R>,
    request_url: Url,
}

impl<R> Page<R> {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Absolute URL of the next page
    #[must_use]
    pub fn next_link(&self) -> Option<String> {
        if !self.has_next() {
            return None;
        }
        let next = (self.number + 1).to_string();
        Some(replace_query_param(
            &self.request_url,
            PAGE_QUERY_PARAM,
            &next,
        ))
    }

    /// Absolute URL of the previous page; page 1 is linked without a `page` parameter
    #[must_use]
    pub fn previous_link(&self) -> Option<String> {
        if !self.has_previous() {
            return None;
        }
        let previous = self.number - 1;
        if previous == 1 {
            return Some(remove_query_param(&self.request_url, PAGE_QUERY_PARAM));
        }
        Some(replace_query_param(
            &self.request_url,
            PAGE_QUERY_PARAM,
            &previous.to_string(),
        ))
    }

    /// Paging metadata for a page that serialized to `items` entries
    ///
    /// `first` and `last` links are left unset.
    #[must_use]
    pub fn paging(&self, items: usize) -> Paging {
        Paging {
            page: Some(self.number),
            items: Some(items as u64),
            total_pages: Some(self.total_pages),
            total_items: Some(self.total_items),
            links: Some(PagingLinks {
                first: None,
                previous: self.previous_link(),
                next: self.next_link(),
                last: None,
            }),
        }
    }

    /// Serialize the page's records and wrap them in a collection envelope
    pub fn paginated_response<T>(mut self, serializer: impl FnMut(R) -> T) -> Envelope<T> {
        let records = std::mem::take(&mut self.records);
        let data: Vec<T> = records.into_iter().map(serializer).collect();
        let paging = self.paging(data.len());
        Envelope::collection(data).with_paging(paging)
    }
}

fn replace_query_param(url: &Url, key: &str, value: &str) -> String {
    let mut pairs = query_pairs_without(url, key);
    pairs.push((key.to_string(), value.to_string()));
    with_sorted_query(url, pairs)
}

fn remove_query_param(url: &Url, key: &str) -> String {
    with_sorted_query(url, query_pairs_without(url, key))
}

fn query_pairs_without(url: &Url, key: &str) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn with_sorted_query(url: &Url, mut pairs: Vec<(String, String)>) -> String {
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let mut url = url.clone();
    url.set_fragment(None);
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&pairs);
    }
    url.to_string()
}
