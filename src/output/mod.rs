//! Output module for reporting crawl results
//!
//! This module handles:
//! - Listing discovered targets on the console
//! - Recording and printing crawl statistics

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

use crate::config::Target;

/// Formats a target list the way the CLI prints it
///
/// ```
/// use visreg::config::{Target, Viewport};
/// use visreg::output::format_targets;
///
/// let targets = vec![Target {
///     name: "homepage".to_string(),
///     url: "/".to_string(),
///     selector: "body".to_string(),
///     viewport: Viewport::default(),
/// }];
/// assert_eq!(format_targets(&targets), "Found 1 targets:\n  - homepage: /\n");
/// ```
pub fn format_targets(targets: &[Target]) -> String {
    let mut out = format!("Found {} targets:\n", targets.len());
    for target in targets {
        out.push_str(&format!("  - {}: {}\n", target.name, target.url));
    }
    out
}

/// Prints a target list to stdout
pub fn print_targets(targets: &[Target]) {
    print!("{}", format_targets(targets));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;

    fn target(name: &str, url: &str, selector: &str) -> Target {
        Target {
            name: name.to_string(),
            url: url.to_string(),
            selector: selector.to_string(),
            viewport: Viewport::default(),
        }
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_targets(&[]), "Found 0 targets:\n");
    }

    #[test]
    fn test_format_lists_name_and_url_only() {
        let targets = vec![
            target("homepage", "/", "body"),
            target("about", "/about", "body"),
            target("blog-x-1", "/blog?x=1", "main"),
        ];

        assert_eq!(
            format_targets(&targets),
            "Found 3 targets:\n  - homepage: /\n  - about: /about\n  - blog-x-1: /blog?x=1\n"
        );
    }
}
