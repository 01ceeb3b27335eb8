//! Seams to the outside world: user notifications, navigation and rendering.

use shared::domain::{Campaign, CampaignId};

use crate::criteria::ViewMode;

pub const FETCH_FAILED_TITLE: &str = "Error fetching campaigns";
pub const FETCH_FAILED_DESCRIPTION: &str = "There was a problem loading your campaigns.";
pub const CREATE_CAMPAIGN_ROUTE: &str = "/campaigns/new";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn fetch_failed() -> Self {
        Self {
            title: FETCH_FAILED_TITLE.to_string(),
            description: FETCH_FAILED_DESCRIPTION.to_string(),
            severity: Severity::Destructive,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::debug!(path, "campaigns: navigation requested without a router");
    }
}

/// Receives whatever the controller decided to show.
pub trait CampaignPresenter {
    fn loading(&mut self);
    /// Shared "no campaigns found" placeholder, identical in both view modes.
    fn empty(&mut self, mode: ViewMode);
    fn card(&mut self, campaign: &Campaign);
    fn table(&mut self, campaigns: &[Campaign], view_details: &dyn Fn(&CampaignId));
}
