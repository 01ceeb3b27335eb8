//! Listing controller: owns the criteria, the loaded campaign cache and the
//! load state, and decides what the presentation layer shows.
//!
//! A fetch is split in three steps so a host can run the network part off its
//! UI loop: [`CampaignListController::begin_fetch`] hands out a [`FetchJob`],
//! [`FetchJob::run`] awaits the store, and
//! [`CampaignListController::finish_fetch`] applies the outcome.
//! [`CampaignListController::activate`] and
//! [`CampaignListController::refetch`] do all three in place.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Campaign, CampaignId, CampaignStatus},
    error::FetchError,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    collaborators::{
        CampaignPresenter, Navigator, Notification, Notifier, CREATE_CAMPAIGN_ROUTE,
    },
    criteria::{ListCriteria, SortKey, StatusFilter, ViewMode},
    repository::{CampaignRepository, FetchedCampaigns},
    view::derive_view,
};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

/// What the presentation layer should draw right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation<'a> {
    Loading,
    Empty { mode: ViewMode },
    Grid(&'a [Campaign]),
    Table(&'a [Campaign]),
}

/// One outstanding fetch. Owns everything it needs, so it can be moved to
/// another task.
pub struct FetchJob {
    generation: u64,
    repository: Arc<dyn CampaignRepository>,
    timeout: Duration,
    cancel: CancellationToken,
}

pub struct FetchOutcome {
    generation: u64,
    result: Result<FetchedCampaigns, FetchError>,
}

impl FetchOutcome {
    pub fn result(&self) -> &Result<FetchedCampaigns, FetchError> {
        &self.result
    }
}

impl FetchJob {
    pub async fn run(self) -> FetchOutcome {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FetchError::Cancelled),
            fetched = tokio::time::timeout(self.timeout, self.repository.fetch_all()) => {
                fetched.unwrap_or(Err(FetchError::Timeout(self.timeout)))
            }
        };
        FetchOutcome {
            generation: self.generation,
            result,
        }
    }
}

pub struct CampaignListController {
    repository: Arc<dyn CampaignRepository>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    fetch_timeout: Duration,
    criteria: ListCriteria,
    campaigns: Vec<Campaign>,
    view: Vec<Campaign>,
    state: LoadState,
    generation: u64,
    cancel: CancellationToken,
}

impl CampaignListController {
    pub fn new(
        repository: Arc<dyn CampaignRepository>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            repository,
            notifier,
            navigator,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            criteria: ListCriteria::default(),
            campaigns: Vec::new(),
            view: Vec::new(),
            state: LoadState::Idle,
            generation: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_criteria(mut self, criteria: ListCriteria) -> Self {
        self.criteria = criteria;
        self.recompute();
        self
    }

    /// Mount-time load. Always goes to the store, whatever is cached.
    pub async fn activate(&mut self) {
        info!("campaigns: activating listing");
        self.fetch_now().await;
    }

    /// User-triggered reload.
    pub async fn refetch(&mut self) {
        info!("campaigns: refetch requested");
        self.fetch_now().await;
    }

    async fn fetch_now(&mut self) {
        if let Some(job) = self.begin_fetch() {
            let outcome = job.run().await;
            self.finish_fetch(outcome);
        }
    }

    /// Enters `Loading` and returns the job to run, or `None` while another
    /// fetch is still outstanding.
    ///
    /// A job whose token was cancelled no longer counts as outstanding, even
    /// if its outcome never came back (e.g. the job was dropped): the next
    /// trigger supersedes it. The token is only replaced once it has been
    /// cancelled, so handles taken earlier stay attached to the next fetch.
    pub fn begin_fetch(&mut self) -> Option<FetchJob> {
        if self.state == LoadState::Loading {
            if !self.cancel.is_cancelled() {
                debug!(
                    generation = self.generation,
                    "campaigns: fetch already in flight; ignoring trigger"
                );
                return None;
            }
            debug!(
                generation = self.generation,
                "campaigns: superseding cancelled fetch"
            );
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
        self.generation += 1;
        self.state = LoadState::Loading;
        Some(FetchJob {
            generation: self.generation,
            repository: self.repository.clone(),
            timeout: self.fetch_timeout,
            cancel: self.cancel.clone(),
        })
    }

    /// Applies a finished fetch. Outcomes from superseded jobs are dropped.
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation || self.state != LoadState::Loading {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "campaigns: dropping stale fetch outcome"
            );
            return;
        }

        match outcome.result {
            Ok(fetched) => {
                info!(
                    count = fetched.campaigns.len(),
                    rejected = fetched.rejected,
                    "campaigns: listing ready"
                );
                self.campaigns = fetched.campaigns;
                self.state = LoadState::Ready;
            }
            Err(FetchError::Cancelled) => {
                info!("campaigns: fetch cancelled; keeping previous listing");
                self.state = LoadState::Idle;
            }
            Err(err) => {
                error!(error = %err, "campaigns: fetch failed");
                self.notifier.notify(&Notification::fetch_failed());
                self.campaigns.clear();
                self.state = LoadState::Failed(err);
            }
        }
        self.recompute();
    }

    /// Handle for cancelling the current fetch from elsewhere. Taken before
    /// a fetch starts, it cancels that fetch too.
    pub fn cancellation_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel_fetch(&self) {
        self.cancel.cancel();
    }

    pub fn set_search_term(&mut self, search_term: impl Into<String>) {
        self.criteria.search_term = search_term.into();
        self.recompute();
    }

    pub fn set_status_filter(&mut self, status_filter: StatusFilter) {
        self.criteria.status_filter = status_filter;
        self.recompute();
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.criteria.sort_key = sort_key;
        self.recompute();
    }

    /// Only changes which renderer is used; the derived sequence stays as is.
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.criteria.view_mode = view_mode;
    }

    fn recompute(&mut self) {
        self.view = derive_view(&self.campaigns, &self.criteria);
    }

    pub fn criteria(&self) -> &ListCriteria {
        &self.criteria
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn view(&self) -> &[Campaign] {
        &self.view
    }

    /// Per-status totals over the loaded campaigns, in [`CampaignStatus::ALL`] order.
    pub fn counts(&self) -> Vec<(CampaignStatus, usize)> {
        CampaignStatus::ALL
            .into_iter()
            .map(|status| {
                let count = self.campaigns.iter().filter(|c| c.status == status).count();
                (status, count)
            })
            .collect()
    }

    pub fn presentation(&self) -> Presentation<'_> {
        if self.is_loading() {
            return Presentation::Loading;
        }
        if self.view.is_empty() {
            return Presentation::Empty {
                mode: self.criteria.view_mode,
            };
        }
        match self.criteria.view_mode {
            ViewMode::Grid => Presentation::Grid(&self.view),
            ViewMode::Table => Presentation::Table(&self.view),
        }
    }

    pub fn render(&self, presenter: &mut dyn CampaignPresenter) {
        match self.presentation() {
            Presentation::Loading => presenter.loading(),
            Presentation::Empty { mode } => presenter.empty(mode),
            Presentation::Grid(campaigns) => {
                for campaign in campaigns {
                    presenter.card(campaign);
                }
            }
            Presentation::Table(campaigns) => {
                presenter.table(campaigns, &|id: &CampaignId| self.handle_view_details(id));
            }
        }
    }

    /// Detail navigation is not wired up yet; the hook exists for renderers.
    pub fn handle_view_details(&self, campaign_id: &CampaignId) {
        debug!(campaign_id = %campaign_id, "campaigns: view details requested");
    }

    pub fn create_campaign(&self) {
        info!(route = CREATE_CAMPAIGN_ROUTE, "campaigns: opening creation flow");
        self.navigator.navigate_to(CREATE_CAMPAIGN_ROUTE);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
