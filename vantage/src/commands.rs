use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("vantage")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("vantage")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a site from a seed URL and audit every discovered page: \
                performance, accessibility, security headers, SEO and network weight.",
                )
                .arg(
                    arg!(<URL> "The seed URL to start crawling from")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum link depth to follow from the seed (0 = seed only)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(-l --"max-links" <NUM>)
                        .required(false)
                        .help("Maximum links followed per page, after filtering")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Directory for reports and screenshots")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value("reports"),
                )
                .arg(
                    arg!(-v --"viewports" <LIST>)
                        .required(false)
                        .help("Comma-separated viewports to audit: desktop, mobile, tablet")
                        .default_value("desktop"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format to generate")
                        .value_parser(["html", "json", "all"])
                        .default_value("all"),
                )
                .arg(
                    arg!(--"max-critical-a11y" <NUM>)
                        .required(false)
                        .help("Quality gate: critical accessibility violations allowed")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    arg!(--"max-broken-links" <NUM>)
                        .required(false)
                        .help("Quality gate: broken links allowed across the whole crawl")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"page-timeout" <SECONDS>)
                        .required(false)
                        .help("Per-page audit deadline in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("60"),
                )
                .arg(
                    arg!(--"headful")
                        .required(false)
                        .help("Run the browser with a visible window")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
