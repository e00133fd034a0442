use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use url::Url;
use vantage::handlers::save_reports;
use vantage_browser::{launch_browser, ChromiumSession, HeuristicAccessibilityAuditor};
use vantage_core::gate::{self, GateThresholds};
use vantage_core::print_banner;
use vantage_core::report;
use vantage_core::viewport::resolve_profiles;
use vantage_scanner::explorer::Explorer;
use vantage_scanner::pipeline::AuditPipeline;
use vantage_scanner::result::PageResult;

use commands::command_argument_builder;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<Url>("URL").unwrap();
    let depth = *sub_matches.get_one::<usize>("depth").unwrap();
    let max_links = *sub_matches.get_one::<usize>("max-links").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output").unwrap().clone();
    let viewports = sub_matches.get_one::<String>("viewports").unwrap();
    let format = sub_matches.get_one::<String>("format").unwrap();
    let max_critical = *sub_matches.get_one::<usize>("max-critical-a11y").unwrap();
    let max_broken = *sub_matches.get_one::<usize>("max-broken-links").unwrap();
    let page_timeout = *sub_matches.get_one::<u64>("page-timeout").unwrap();
    let headful = sub_matches.get_flag("headful");

    if !matches!(url.scheme(), "http" | "https") {
        eprintln!("{} only http and https URLs can be audited", "error:".red());
        std::process::exit(2);
    }

    let (profiles, unknown) = resolve_profiles(viewports);
    for name in &unknown {
        warn!("unknown viewport '{}', skipping", name);
    }
    if profiles.is_empty() {
        eprintln!(
            "{} no usable viewports in '{}' (known: desktop, mobile, tablet)",
            "error:".red(),
            viewports
        );
        std::process::exit(2);
    }

    if let Err(e) = report::clear_reports(&output) {
        eprintln!("{} could not prepare {}: {}", "error:".red(), output.display(), e);
        std::process::exit(1);
    }

    let (mut browser, handler_task) = match launch_browser(!headful).await {
        Ok(launched) => launched,
        Err(e) => {
            eprintln!("{} failed to launch browser: {}", "error:".red(), e);
            std::process::exit(1);
        }
    };

    if !quiet {
        println!(
            "🔎 Crawling {} (depth {}, {} links/page, viewports: {})\n",
            url, depth, max_links, viewports
        );
    }

    let mut results: Vec<PageResult> = Vec::new();

    // One fresh page per viewport, so device emulation never leaks
    // between passes.
    for profile in &profiles {
        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                eprintln!(
                    "{} could not open a page for viewport {}: {}",
                    "error:".red(),
                    profile.name,
                    e
                );
                continue;
            }
        };

        let session = Arc::new(ChromiumSession::new(page.clone()));
        if let Err(e) = session.apply_viewport(profile).await {
            warn!("viewport {} emulation failed: {}", profile.name, e);
        }
        let auditor = Arc::new(HeuristicAccessibilityAuditor::new(page.clone()));

        let pipeline = AuditPipeline::new(session, auditor)
            .with_viewport(profile.name)
            .with_screenshot_dir(output.join("screenshots"))
            .with_deadline(Duration::from_secs(page_timeout));

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        let viewport_name = profile.name;
        let spinner_handle = spinner.clone();
        let progress_callback = Arc::new(move |done: usize, current: String| {
            spinner_handle.set_message(format!(
                "{}: {} audited, visiting {}",
                viewport_name, done, current
            ));
        });

        let explorer = Explorer::new(pipeline)
            .with_max_depth(depth)
            .with_max_links_per_page(max_links)
            .with_progress_callback(progress_callback);

        let pass_results = explorer.explore(url.as_str()).await;
        spinner.finish_with_message(format!(
            "{}: {} page(s) audited",
            viewport_name,
            pass_results.len()
        ));
        results.extend(pass_results);

        if let Err(e) = page.close().await {
            warn!("could not close page for viewport {}: {}", profile.name, e);
        }
    }

    if let Err(e) = browser.close().await {
        warn!("browser shutdown error: {}", e);
    }
    handler_task.abort();

    save_reports(&results, &output, format);

    let thresholds = GateThresholds {
        max_critical_accessibility: max_critical,
        max_broken_links: max_broken,
    };
    let verdict = gate::evaluate(&results, &thresholds);

    if !quiet {
        println!(
            "\n{} {} page(s) audited across {} viewport(s)",
            "✓".green(),
            results.len(),
            profiles.len()
        );
        if verdict.failed_pages > 0 {
            println!(
                "{} {} page(s) could not be fully audited",
                "!".yellow(),
                verdict.failed_pages
            );
        }
        println!(
            "  critical accessibility violations: {}",
            verdict.critical_accessibility
        );
        println!("  broken links: {}", verdict.broken_links);
    }

    if verdict.passed {
        if !quiet {
            println!("\n{}", "Quality gate passed".green().bold());
        }
    } else {
        eprintln!("\n{}", "Quality gate failed".red().bold());
        for breach in &verdict.breaches {
            eprintln!("  {} {}", "✗".red(), breach);
        }
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
