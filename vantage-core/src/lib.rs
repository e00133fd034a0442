pub mod gate;
pub mod report;
pub mod viewport;

pub use gate::{GateThresholds, GateVerdict};
pub use report::ReportFormat;
pub use viewport::ViewportProfile;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
 __   __ _    _  _  _____  _    ___  ___
 \ \ / // \  | \| ||_   _|/ \  / __|| __|
  \ V // _ \ | .` |  | | / _ \| (_ || _|
   \_//_/ \_\|_|\_|  |_|/_/ \_\\___||___|
"#;
    println!("{}", banner.cyan());
    println!(
        "  {} v{}",
        "Vantage - automated website audit crawler".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("  {}\n", "https://github.com/trapdoorsec/vantage".dimmed());
}
