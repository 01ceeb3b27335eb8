//! Derivation of the visible campaign sequence from the loaded cache and the
//! active criteria.

use std::cmp::Ordering;

use shared::domain::Campaign;

use crate::criteria::{ListCriteria, SortKey};

/// Filters then stable-sorts `campaigns`. Pure; the input is left untouched.
pub fn derive_view(campaigns: &[Campaign], criteria: &ListCriteria) -> Vec<Campaign> {
    let needle = criteria.search_term.to_lowercase();
    let mut view: Vec<Campaign> = campaigns
        .iter()
        .filter(|campaign| {
            campaign.name.to_lowercase().contains(&needle)
                && criteria.status_filter.admits(campaign.status)
        })
        .cloned()
        .collect();
    sort_campaigns(&mut view, criteria.sort_key);
    view
}

/// `slice::sort_by` is stable, so equal keys keep their incoming order.
pub fn sort_campaigns(campaigns: &mut [Campaign], sort_key: SortKey) {
    match sort_key {
        SortKey::DateDesc => campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::DateAsc => campaigns.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::NameAsc => campaigns.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => campaigns.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortKey::AudienceDesc => campaigns.sort_by(|a, b| b.audience.cmp(&a.audience)),
        SortKey::AudienceAsc => campaigns.sort_by(|a, b| a.audience.cmp(&b.audience)),
        SortKey::Unsorted => {}
    }
}

/// Case-folded comparison, so "apple" and "Banana" order alphabetically
/// rather than by code point.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
