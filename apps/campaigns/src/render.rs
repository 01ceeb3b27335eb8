//! Plain-text grid and table renderers.

use std::fmt::Write as _;

use campaign_client::{CampaignPresenter, ViewMode};
use shared::domain::{Campaign, CampaignId};

pub const EMPTY_PLACEHOLDER: &str = "No campaigns found";

#[derive(Default)]
pub struct TextPresenter {
    out: String,
}

impl TextPresenter {
    pub fn into_output(self) -> String {
        self.out
    }
}

fn open_rate(campaign: &Campaign) -> String {
    campaign
        .open_rate()
        .map(|rate| format!("{rate:.1}%"))
        .unwrap_or_else(|| "-".to_string())
}

impl CampaignPresenter for TextPresenter {
    fn loading(&mut self) {
        self.out.push_str("Loading campaigns...\n");
    }

    fn empty(&mut self, _mode: ViewMode) {
        let _ = writeln!(self.out, "{EMPTY_PLACEHOLDER}");
    }

    fn card(&mut self, campaign: &Campaign) {
        let _ = writeln!(
            self.out,
            "[{}] {} ({})\n  audience {} | delivered {} | opened {} ({})\n  created {}\n",
            campaign.status,
            campaign.name,
            campaign.id,
            campaign.audience,
            campaign.delivered,
            campaign.opened,
            open_rate(campaign),
            campaign.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    fn table(&mut self, campaigns: &[Campaign], _view_details: &dyn Fn(&CampaignId)) {
        let headers = [
            "NAME",
            "STATUS",
            "AUDIENCE",
            "DELIVERED",
            "OPENED",
            "OPEN RATE",
            "CREATED",
        ];
        let rows: Vec<[String; 7]> = campaigns
            .iter()
            .map(|c| {
                [
                    c.name.clone(),
                    c.status.to_string(),
                    c.audience.to_string(),
                    c.delivered.to_string(),
                    c.opened.to_string(),
                    open_rate(c),
                    c.created_at.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header_cells = headers.map(str::to_string);
        for cells in std::iter::once(&header_cells).chain(&rows) {
            let line = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            let _ = writeln!(self.out, "{}", line.trim_end());
        }
    }
}
