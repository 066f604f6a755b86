use std::sync::Arc;

use tracing::{debug, error, info};

use crate::api::error::ApiResult;
use crate::api::traits::PropertyApi;
use crate::api::types::{FilterCriteria, FilterField};
use crate::listing::filters::FilterState;
use crate::listing::map::MapSelection;
use crate::models::{DateRange, PropertyListResponse, PropertySummary};

/// Map center used until a result or a geo filter provides one (London)
pub const DEFAULT_MAP_CENTER: (f64, f64) = (51.505, -0.09);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    /// Nothing requested yet
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; the next filter change retries
    Failed,
}

/// A listing request tagged with the filter generation that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    generation: u64,
    criteria: FilterCriteria,
}

impl PendingFetch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }
}

/// What the property grid should show
#[derive(Debug, Clone, PartialEq)]
pub enum ListingView<'a> {
    Loading,
    /// Valid empty page; prompt the user to reset filters
    NoResults,
    /// The fetch failed; an empty grid without an error banner
    Unavailable,
    Results {
        properties: &'a [PropertySummary],
        total: u64,
    },
}

/// Owns the filter state and the latest page of results.
///
/// Every filter change bumps a generation counter and yields a
/// [`PendingFetch`]; a completion is only applied if it carries the latest
/// generation, so a slow response can never overwrite a newer page. While a
/// fetch is in flight the previous page is kept but the view reports
/// `Loading`; a failed fetch clears the page.
pub struct ListingController<A: PropertyApi> {
    api: Arc<A>,
    filters: FilterState,
    results: Vec<PropertySummary>,
    total_count: u64,
    next: Option<String>,
    previous: Option<String>,
    phase: ListingPhase,
    map_center: (f64, f64),
    generation: u64,
}

impl<A: PropertyApi> ListingController<A> {
    pub fn new(api: Arc<A>, initial: FilterCriteria) -> Self {
        Self {
            api,
            filters: FilterState::new(initial),
            results: Vec::new(),
            total_count: 0,
            next: None,
            previous: None,
            phase: ListingPhase::Idle,
            map_center: DEFAULT_MAP_CENTER,
            generation: 0,
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filters.current()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn results(&self) -> &[PropertySummary] {
        &self.results
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn phase(&self) -> ListingPhase {
        self.phase
    }

    pub fn map_center(&self) -> (f64, f64) {
        self.map_center
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Stay dates driving per-card pricing
    pub fn date_range(&self) -> Option<DateRange> {
        self.criteria().date_range()
    }

    /// Header line, e.g. `12 properties available · 2024-07-01 to 2024-07-04 (Dynamic Pricing Active)`
    pub fn headline(&self) -> String {
        let mut line = format!("{} properties available", self.total_count);
        if let Some(range) = self.date_range() {
            line.push_str(&format!(" · {range} (Dynamic Pricing Active)"));
        }
        line
    }

    /// `Showing N of M properties` when the total spans more than one page
    pub fn pagination_summary(&self) -> Option<String> {
        let shown = self.results.len() as u64;
        (self.phase == ListingPhase::Ready && self.total_count > shown)
            .then(|| format!("Showing {} of {} properties", shown, self.total_count))
    }

    pub fn view(&self) -> ListingView<'_> {
        match self.phase {
            ListingPhase::Idle | ListingPhase::Loading => ListingView::Loading,
            ListingPhase::Failed => ListingView::Unavailable,
            ListingPhase::Ready if self.results.is_empty() => ListingView::NoResults,
            ListingPhase::Ready => ListingView::Results {
                properties: &self.results,
                total: self.total_count,
            },
        }
    }

    fn begin(&mut self) -> PendingFetch {
        self.generation += 1;
        self.phase = ListingPhase::Loading;
        debug!("Listing fetch #{} queued", self.generation);
        PendingFetch {
            generation: self.generation,
            criteria: self.filters.current().clone(),
        }
    }

    /// Apply field edits; re-applying an unchanged value still refetches
    pub fn begin_update<I>(&mut self, changes: I) -> PendingFetch
    where
        I: IntoIterator<Item = FilterField>,
    {
        self.filters.update(changes);
        self.begin()
    }

    pub fn begin_toggle_amenity(&mut self, amenity: &str) -> PendingFetch {
        self.filters.toggle_amenity(amenity);
        self.begin()
    }

    pub fn begin_reset(&mut self) -> PendingFetch {
        self.filters.reset();
        self.begin()
    }

    /// Geo search from a map click; the map recenters on the click at once
    pub fn begin_location(&mut self, selection: MapSelection) -> PendingFetch {
        self.map_center = (selection.latitude, selection.longitude);
        self.filters.update(selection.changes());
        self.begin()
    }

    pub fn begin_refresh(&mut self) -> PendingFetch {
        self.begin()
    }

    /// Run the request for a pending fetch without touching controller state
    pub async fn fetch(&self, pending: &PendingFetch) -> ApiResult<PropertyListResponse> {
        self.api.list_properties(&pending.criteria).await
    }

    /// Apply a finished fetch. Returns `false` when it was superseded and dropped.
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        result: ApiResult<PropertyListResponse>,
    ) -> bool {
        if pending.generation != self.generation {
            debug!(
                "Dropping stale listing response #{} (current #{})",
                pending.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(page) => {
                info!(
                    "Loaded {} of {} properties",
                    page.results.len(),
                    page.count
                );
                if !page.results.is_empty() {
                    self.map_center = match pending.criteria.geo_center() {
                        Some(center) => center,
                        None => page.results[0].position(),
                    };
                }
                self.results = page.results;
                self.total_count = page.count;
                self.next = page.next;
                self.previous = page.previous;
                self.phase = ListingPhase::Ready;
            }
            Err(err) => {
                error!("Error fetching properties: {}", err);
                self.results.clear();
                self.total_count = 0;
                self.next = None;
                self.previous = None;
                self.phase = ListingPhase::Failed;
            }
        }
        true
    }

    async fn run(&mut self, pending: PendingFetch) {
        let result = self.fetch(&pending).await;
        self.complete(pending, result);
    }

    pub async fn update<I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = FilterField>,
    {
        let pending = self.begin_update(changes);
        self.run(pending).await;
    }

    pub async fn toggle_amenity(&mut self, amenity: &str) {
        let pending = self.begin_toggle_amenity(amenity);
        self.run(pending).await;
    }

    pub async fn reset(&mut self) {
        let pending = self.begin_reset();
        self.run(pending).await;
    }

    pub async fn select_location(&mut self, selection: MapSelection) {
        let pending = self.begin_location(selection);
        self.run(pending).await;
    }

    pub async fn refresh(&mut self) {
        let pending = self.begin_refresh();
        self.run(pending).await;
    }

    /// Move to the following page if the backend reported one
    pub async fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        let page = self.criteria().page.unwrap_or(1) + 1;
        self.update([FilterField::Page(Some(page))]).await;
        true
    }

    pub async fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        let page = self.criteria().page.unwrap_or(1).saturating_sub(1).max(1);
        self.update([FilterField::Page(Some(page))]).await;
        true
    }
}
