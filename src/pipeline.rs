use crate::data_file::Shape;
use crate::dataset::{Dataset, QUERY_LABELS};
use crate::matching::{match_top_n, NEIGHBOR_COUNT};
use crate::report::Report;
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Finds the nearest template rows for every query of every subject.
pub fn match_subjects(dataset: &Dataset) -> Report {
    let mut report = Report::default();
    for subject in dataset.subjects() {
        for (query, label) in subject.queries.iter().zip(QUERY_LABELS) {
            let matched = match_top_n(&query.vector, &subject.template.rows, NEIGHBOR_COUNT);
            debug!(
                "subject: {}, query: {}, neighbors: {:?}",
                subject.index, query.file_name, matched
            );
            report.push(subject.index, label, &matched);
        }
    }
    report
}

/// Loads `data_dir`, matches every query and writes the report to
/// `report_path`. Returns the total elapsed time.
pub async fn run(data_dir: &Path, report_path: &Path, shape: Shape) -> Result<Duration> {
    let start = Instant::now();

    let dataset = Dataset::load(data_dir, shape).await?;
    let elapsed = start.elapsed().as_secs_f64();
    info!("load {} spends {}s", data_dir.display(), elapsed);

    let match_start = Instant::now();
    let report = match_subjects(&dataset);
    let elapsed = match_start.elapsed().as_secs_f64();
    info!("match {} queries spends {}s", report.lines().len(), elapsed);

    let total = start.elapsed();
    report.write(report_path, total).await?;
    info!("report written to {}", report_path.display());

    Ok(total)
}
