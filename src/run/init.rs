//! Audit resource initialization.
//!
//! Everything that can fail before a page is opened happens here, in the
//! order that keeps a bad setup from touching the network: configuration,
//! domain policy, URL list, then resources and the run directory.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::info;

use crate::analyzer::AxeAnalyzer;
use crate::browser::PageProvider;
use crate::config::Config;
use crate::error_handling::{AuditError, ProcessingStats};
use crate::initialization::load_resources;
use crate::intake::{classify_urls, read_url_list, TargetUrl};
use crate::processor::{PageContext, PageSettings, RunDirectory};
use crate::report::{CsvReport, ReportRenderer};
use crate::scheduler::SchedulerSettings;
use crate::security::DomainPolicy;

use super::resources::{AuditAssets, AuditResources};

/// Validates the configuration and returns the accepted URLs.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a domain list entry
/// cannot be parsed, the URL list cannot be read, or no URL is accepted.
pub async fn prepare_targets(config: &Config) -> Result<Vec<TargetUrl>, AuditError> {
    config.validate()?;

    let policy = DomainPolicy::from_config(&config.allowed_domains, &config.blocked_domains)?;
    info!(
        "Domain policy: {} allowed, {} blocked entries",
        policy.allowed_count(),
        policy.blocked_count()
    );

    let text = read_url_list(&config.url_list).await?;
    let report = classify_urls(&text, &policy);
    report.log_summary();
    Ok(report.into_accepted()?)
}

/// Loads the report resources and creates the run directory and CSV log.
///
/// # Errors
///
/// Returns `AuditError::Resource` if a resource cannot be read or an output
/// path cannot be created.
pub async fn load_assets(config: &Config) -> Result<AuditAssets, AuditError> {
    let resources = load_resources(config).await?;
    let run_dir =
        RunDirectory::create(&config.output_directory, Utc::now(), config.enable_screenshots)
            .await?;
    let csv = if config.enable_csv {
        Some(CsvReport::create(&run_dir.csv_path(), &config.locale)?)
    } else {
        None
    };
    info!("Writing reports to {}", run_dir.root().display());

    Ok(AuditAssets {
        resources,
        run_dir,
        csv,
    })
}

/// Assembles the shared page context around a ready browser.
pub fn init_audit_resources(
    config: &Config,
    assets: AuditAssets,
    provider: Arc<dyn PageProvider>,
    targets: Vec<TargetUrl>,
) -> AuditResources {
    let AuditAssets {
        resources,
        run_dir,
        csv,
    } = assets;

    let analyzer = AxeAnalyzer::new(
        resources.axe_source,
        resources.axe_locale.as_deref(),
        &config.tags,
    );
    let renderer = ReportRenderer::new(resources.template, resources.styles);
    let run_directory = run_dir.root().to_path_buf();

    let ctx = Arc::new(PageContext {
        provider,
        analyzer,
        renderer,
        run_dir,
        csv,
        stats: Arc::new(ProcessingStats::new()),
        settings: PageSettings::from_config(config),
    });

    AuditResources {
        ctx,
        total_urls: targets.len(),
        targets,
        scheduler: SchedulerSettings::from_config(config),
        completed_urls: Arc::new(AtomicUsize::new(0)),
        run_directory,
        start_time: Instant::now(),
    }
}
