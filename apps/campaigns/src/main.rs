use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use campaign_client::{
    config::{load_settings, DEFAULT_SETTINGS_FILE},
    CampaignListController, CampaignRepository, ListCriteria, Navigator, Notification, Notifier,
    RestCampaignRepository, Severity, SortKey, StatusFilter, StaticCampaignRepository, ViewMode,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod render;

use render::TextPresenter;

#[derive(Parser, Debug)]
#[command(about = "List marketing campaigns from the campaign store")]
struct Args {
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    store_url: Option<String>,
    /// Read rows from a JSON file instead of the store.
    #[arg(long)]
    fixture: Option<PathBuf>,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    /// date-desc, date-asc, name-asc, name-desc, audience-desc or audience-asc.
    #[arg(long, default_value = "date-desc")]
    sort: String,
    #[arg(long, default_value = "grid")]
    view: ViewMode,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Open the campaign creation flow instead of listing.
    #[arg(long)]
    create: bool,
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: &Notification) {
        let marker = match notification.severity {
            Severity::Destructive => "error",
            Severity::Info => "info",
        };
        eprintln!("{marker}: {}: {}", notification.title, notification.description);
    }
}

struct PrintingNavigator;

impl Navigator for PrintingNavigator {
    fn navigate_to(&self, path: &str) {
        println!("open {path}");
    }
}

fn load_fixture(path: &Path) -> Result<Vec<serde_json::Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("fixture '{}' is not a JSON array of campaign rows", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(store_url) = args.store_url {
        settings.store_url = store_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.fetch_timeout_secs = timeout_secs;
    }

    let repository: Arc<dyn CampaignRepository> = match &args.fixture {
        Some(path) => Arc::new(StaticCampaignRepository::from_values(load_fixture(path)?)),
        None => Arc::new(
            RestCampaignRepository::from_settings(&settings)
                .context("failed to configure campaign store client")?,
        ),
    };

    let criteria = ListCriteria {
        search_term: args.search,
        status_filter: args.status,
        sort_key: SortKey::parse_lenient(&args.sort),
        view_mode: args.view,
    };
    let mut controller = CampaignListController::new(
        repository,
        Arc::new(StderrNotifier),
        Arc::new(PrintingNavigator),
    )
    .with_fetch_timeout(settings.fetch_timeout())
    .with_criteria(criteria);

    if args.create {
        controller.create_campaign();
        return Ok(());
    }

    controller.activate().await;

    let summary = controller
        .counts()
        .into_iter()
        .map(|(status, count)| format!("{status}={count}"))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(
        shown = controller.view().len(),
        total = controller.campaigns().len(),
        %summary,
        "campaigns: listing rendered"
    );

    let mut presenter = TextPresenter::default();
    controller.render(&mut presenter);
    print!("{}", presenter.into_output());

    Ok(())
}
