use crate::results::{KeywordMatch, ResultSet, SiteRecord};
use crate::scanner;
use crate::utils::results_filename;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing results
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not write results: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not write results CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the results file
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    origin: &'a str,
    context: &'a str,
}

/// Scans every fetched homepage and keeps the sites that contain `keyword`
///
/// Sites are walked in list order, so the output order does not depend on
/// which fetch finished first. A site listed twice yields two rows.
pub fn collect_matches(
    sites: &[SiteRecord],
    results: &ResultSet,
    keyword: &str,
) -> Vec<KeywordMatch> {
    let with_content: Vec<&SiteRecord> = sites
        .iter()
        .filter(|site| {
            results
                .get(&site.origin)
                .is_some_and(|r| !r.body.is_empty())
        })
        .collect();
    ::log::info!(
        "Filtered to {} sites with homepage content.",
        with_content.len()
    );

    let matches: Vec<KeywordMatch> = with_content
        .into_iter()
        .filter_map(|site| {
            let result = results.get(&site.origin)?;
            let found = scanner::find_context(&result.body, keyword)?;
            ::log::debug!("{} matches on line {}", site.origin, found.line_index);
            Some(KeywordMatch {
                origin: site.origin.clone(),
                rank: site.rank,
                line_index: found.line_index,
                context: found.context,
            })
        })
        .collect();
    ::log::info!(
        "Found {} sites with the keyword '{}'.",
        matches.len(),
        keyword
    );

    matches
}

/// Prints matches to stdout, one origin per line with its context
pub fn print_matches(matches: &[KeywordMatch]) {
    if matches.is_empty() {
        println!("No matching sites.");
        return;
    }

    for line in format_matches(matches) {
        println!("{}", line);
    }
}

/// One line per match, origins padded to a common width in characters
fn format_matches(matches: &[KeywordMatch]) -> Vec<String> {
    let width = matches
        .iter()
        .map(|m| m.origin.chars().count())
        .max()
        .unwrap_or(0);
    matches
        .iter()
        .map(|m| format!("{:<width$}  {}", m.origin, m.context, width = width))
        .collect()
}

/// Path of the results file for `keyword` inside `dir`, stamped with the current minute
pub fn output_path(dir: &Path, keyword: &str) -> PathBuf {
    dir.join(results_filename(keyword, &Local::now()))
}

/// Writes `origin,context` rows for each match
pub fn write_matches(path: &Path, matches: &[KeywordMatch]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Header is written by hand so an empty result still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(["origin", "context"])?;
    for m in matches {
        writer.serialize(ResultRow {
            origin: &m.origin,
            context: &m.context,
        })?;
    }
    writer.flush()?;

    ::log::info!("Wrote {} results to {}", matches.len(), path.display());
    Ok(())
}
