use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::pagination::resolve_last_page;
use crate::resource::{PageRef, Resource};

/// Per-page extraction output: one or more aligned field series.
///
/// `append` concatenates another page's series field by field; `into_records`
/// zips the series index-wise. All series in one value must have equal length.
pub trait FieldSet: Default + Send + 'static {
    type Record: Send + 'static;

    fn rows(&self) -> usize;
    fn append(&mut self, other: Self);
    fn into_records(self) -> Vec<Self::Record>;
}

/// Records that are extracted row-shaped already form a single series.
impl<T: Send + 'static> FieldSet for Vec<T> {
    type Record = T;

    fn rows(&self) -> usize {
        self.len()
    }

    fn append(&mut self, mut other: Self) {
        Vec::append(self, &mut other);
    }

    fn into_records(self) -> Vec<T> {
        self
    }
}

/// Every record of a paginated resource, in page-then-row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub records: Vec<T>,
    pub last_page: u32,
    /// Pages after the first that failed to fetch and contributed no rows.
    pub degraded_pages: Vec<u32>,
}

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.degraded_pages.is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

/// Fetches all pages of a resource and merges their field series.
#[derive(Clone)]
pub struct Aggregator {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: impl Into<String>, concurrency: usize) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Build the full collection for `resource`.
    ///
    /// `first_page` reuses markup already fetched by the caller; otherwise page 1
    /// is fetched here and a failure aborts with a fetch error. `max_pages` caps
    /// the resolved last page.
    pub async fn collect<F: FieldSet>(
        &self,
        resource: &Resource,
        first_page: Option<String>,
        max_pages: Option<u32>,
        extract: fn(&str) -> F,
    ) -> Result<Collection<F::Record>> {
        let first = match first_page {
            Some(markup) => markup,
            None => {
                let url = PageRef::first(resource.clone()).url(&self.base_url);
                self.fetcher.fetch(&url).await?
            }
        };

        let mut last_page = resolve_last_page(&first, &resource.kind.page_marker());
        if let Some(cap) = max_pages {
            last_page = last_page.min(cap.max(1));
        }
        info!(resource = %resource, last_page, "collecting");

        let mut fields = extract(&first);
        drop(first);

        if last_page == 1 {
            return Ok(Collection {
                records: fields.into_records(),
                last_page,
                degraded_pages: Vec::new(),
            });
        }

        let mut pages = self.fetch_remaining(resource, last_page, extract).await;

        // Completion order is arbitrary; merge strictly by page number.
        pages.sort_by_key(|(page, _)| *page);

        let mut degraded_pages = Vec::new();
        let mut expected = 2..=last_page;
        for (page, contribution) in pages {
            for missing in expected.by_ref().take_while(|p| *p < page) {
                warn!(resource = %resource, page = missing, "page worker never reported");
                degraded_pages.push(missing);
            }
            match contribution {
                Some(page_fields) => fields.append(page_fields),
                None => degraded_pages.push(page),
            }
        }
        for missing in expected {
            warn!(resource = %resource, page = missing, "page worker never reported");
            degraded_pages.push(missing);
        }

        let records = fields.into_records();
        info!(
            resource = %resource,
            rows = records.len(),
            degraded = degraded_pages.len(),
            "collection complete"
        );

        Ok(Collection {
            records,
            last_page,
            degraded_pages,
        })
    }

    /// Fetch and extract pages `2..=last_page` on a bounded worker pool.
    ///
    /// Returns once every worker has finished. A failed fetch reports `None`.
    async fn fetch_remaining<F: FieldSet>(
        &self,
        resource: &Resource,
        last_page: u32,
        extract: fn(&str) -> F,
    ) -> Vec<(u32, Option<F>)> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel::<(u32, Option<F>)>(self.concurrency * 2);

        for page in 2..=last_page {
            let url = PageRef::new(resource.clone(), page).url(&self.base_url);
            let fetcher = Arc::clone(&self.fetcher);
            let sem = Arc::clone(&semaphore);
            let tx = tx.clone();

            tokio::spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return;
                };
                let contribution = match fetcher.fetch(&url).await {
                    Ok(markup) => Some(extract(&markup)),
                    Err(e) => {
                        warn!(page, url = %url, error = %e, "page fetch failed, contributing no rows");
                        None
                    }
                };
                let _ = tx.send((page, contribution)).await;
            });
        }

        // Drop our copy of tx so rx closes when all spawned tasks finish
        drop(tx);

        let mut received = Vec::with_capacity(last_page as usize - 1);
        while let Some(item) = rx.recv().await {
            received.push(item);
        }
        received
    }
}
