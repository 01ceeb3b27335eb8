//! Campaign listing core: loads campaigns from the remote store and derives
//! the filtered, sorted view a front end renders.

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod criteria;
pub mod repository;
pub mod view;

pub use collaborators::{
    CampaignPresenter, Navigator, Notification, Notifier, Severity, CREATE_CAMPAIGN_ROUTE,
};
pub use controller::{CampaignListController, FetchJob, FetchOutcome, LoadState, Presentation};
pub use criteria::{ListCriteria, SortKey, StatusFilter, ViewMode};
pub use repository::{
    CampaignRepository, FetchedCampaigns, RestCampaignRepository, StaticCampaignRepository,
};
pub use view::derive_view;
