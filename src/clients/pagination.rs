//! Lazy iteration over paginated list responses.
//!
//! List endpoints return a page shaped like:
//!
//! ```json
//! {"services": [...], "links": {"next": "http://api/services?page=2", "prev": "..."}}
//! ```
//!
//! [`PagedIter`] yields the items of the first page, then follows
//! `links.next` until a page carries no next link.

use std::collections::VecDeque;

use futures::stream::{self, Stream};
use serde_json::Value;

use crate::clients::errors::ApiError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::QueryParams;

/// Navigation links carried in a page's `links` object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Link to the next page, if any.
    pub next: Option<String>,
    /// Link to the previous page, if any.
    pub prev: Option<String>,
    /// Link to the last page, if any.
    pub last: Option<String>,
}

impl PageLinks {
    /// Reads the `links` object of a page.
    ///
    /// Missing or non-string entries are treated as absent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dm_api_client::PageLinks;
    /// use serde_json::json;
    ///
    /// let page = json!({"items": [], "links": {"next": "http://api/items?page=2"}});
    /// let links = PageLinks::from_page(&page);
    ///
    /// assert_eq!(links.next.as_deref(), Some("http://api/items?page=2"));
    /// assert!(links.prev.is_none());
    /// ```
    #[must_use]
    pub fn from_page(page: &Value) -> Self {
        let link = |name: &str| {
            page.get("links")
                .and_then(|links| links.get(name))
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        Self {
            next: link("next"),
            prev: link("prev"),
            last: link("last"),
        }
    }

    /// Returns `true` if there is a next page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Items of a page under the first of `keys` present in it.
///
/// Returns `None` if the page has none of the keys. A key whose value is not
/// an array has no items.
fn page_items(page: &Value, keys: &[&str]) -> Option<VecDeque<Value>> {
    let container = keys.iter().find_map(|key| page.get(*key))?;
    Some(
        container
            .as_array()
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default(),
    )
}

/// Lazily iterates over the items of a paginated resource.
///
/// The iterator holds the items of the current page and the next link. Each
/// page is fetched only once the previous page's items have been consumed.
/// A page carrying none of the container keys ends the sequence without
/// following its links. Dropping it early leaves later pages unfetched.
///
/// # Example
///
/// ```rust,ignore
/// let mut services = data_client.find_services_iter(ServiceFilters::default()).await?;
/// while let Some(service) = services.next().await? {
///     println!("{}", service["id"]);
/// }
/// ```
#[derive(Debug)]
pub struct PagedIter<'a> {
    client: &'a HttpClient,
    keys: &'static [&'static str],
    items: VecDeque<Value>,
    next_link: Option<String>,
}

impl<'a> PagedIter<'a> {
    /// Creates an iterator starting from an already fetched first page.
    ///
    /// `first_page` is `None` when the client is disabled, which produces an
    /// empty sequence.
    #[must_use]
    pub fn new(
        client: &'a HttpClient,
        first_page: Option<Value>,
        keys: &'static [&'static str],
    ) -> Self {
        let mut iter = Self {
            client,
            keys,
            items: VecDeque::new(),
            next_link: None,
        };
        iter.load(first_page);
        iter
    }

    fn load(&mut self, page: Option<Value>) {
        let loaded = page.and_then(|page| {
            page_items(&page, self.keys).map(|items| (items, PageLinks::from_page(&page).next))
        });

        match loaded {
            Some((items, next_link)) => {
                self.items = items;
                self.next_link = next_link;
            }
            None => {
                self.items.clear();
                self.next_link = None;
            }
        }
    }

    /// Returns the next item, fetching the next page when needed.
    ///
    /// Returns `Ok(None)` once the final page is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of a failed page fetch. The iterator is left
    /// at the end of the sequence.
    pub async fn next(&mut self) -> Result<Option<Value>, ApiError> {
        loop {
            if let Some(item) = self.items.pop_front() {
                return Ok(Some(item));
            }

            let Some(next_link) = self.next_link.take() else {
                return Ok(None);
            };

            tracing::debug!(url = %next_link, "Fetching next page");
            let page = self.client.get(&next_link, QueryParams::new()).await?;
            self.load(page);
        }
    }

    /// Returns `true` if more pages remain to be fetched.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_link.is_some()
    }

    /// Converts the iterator into a [`Stream`] of items.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value, ApiError>> + 'a {
        stream::try_unfold(self, |mut iter| async move {
            Ok(iter.next().await?.map(|item| (item, iter)))
        })
    }

    /// Fetches every remaining page and collects all items.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] encountered.
    pub async fn collect_all(mut self) -> Result<Vec<Value>, ApiError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}
