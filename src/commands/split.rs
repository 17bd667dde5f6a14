use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::SplitArgs;
use crate::model::{SegmentEntry, SplitRunManifest};
use crate::pdf::SourceDocument;
use crate::segment::plan_segments;
use crate::util::{
    ensure_directory, now_utc_string, sha256_file, utc_compact_string, write_json_pretty,
};

pub fn run(args: SplitArgs) -> Result<()> {
    let started_ts = Utc::now();

    info!(
        input = %args.input.display(),
        output_dir = %args.output_dir.display(),
        "starting split"
    );

    // A combined input that cannot be read aborts the whole run.
    let document = SourceDocument::load(&args.input)
        .with_context(|| format!("failed to open combined input {}", args.input.display()))?;

    ensure_directory(&args.output_dir)?;

    let page_numbers = document.page_numbers();
    let mut page_texts = Vec::with_capacity(page_numbers.len());
    for page in &page_numbers {
        match document.page_text(*page) {
            Ok(text) => page_texts.push(text),
            Err(err) => {
                warn!(page = *page, error = %err, "text extraction failed, treating page as empty");
                page_texts.push(String::new());
            }
        }
    }

    let plan = plan_segments(
        &page_texts,
        &args.marker,
        args.fuzzy_threshold,
        !args.no_flush_remainder,
    );

    if plan.segments.is_empty() {
        warn!("boundary marker not found on any page, nothing to write");
    }
    if plan.trailing_pages_dropped > 0 {
        warn!(
            pages = plan.trailing_pages_dropped,
            "dropping trailing pages after the last boundary"
        );
    }
    if plan.trailing_pages_flushed {
        warn!("document does not end on a boundary page, writing the remainder as a final report");
    }

    let mut segments = Vec::with_capacity(plan.segments.len());
    for (offset, segment) in plan.segments.iter().enumerate() {
        let index = offset + 1;
        let first_page = page_numbers[segment.first];
        let last_page = page_numbers[segment.last];
        let file_name = format!("informe_{index}.pdf");
        let output = args.output_dir.join(&file_name);

        document
            .write_page_range(first_page, last_page, &output)
            .with_context(|| format!("failed to write report {index} to {}", output.display()))?;

        info!(file = %output.display(), first_page, last_page, "wrote report");

        segments.push(SegmentEntry {
            index,
            first_page,
            last_page,
            output_file: file_name,
        });
    }

    let manifest = SplitRunManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        input_path: args.input.display().to_string(),
        input_sha256: sha256_file(&args.input)?,
        boundary_marker: args.marker.clone(),
        fuzzy_threshold: args.fuzzy_threshold,
        page_count: page_numbers.len(),
        segment_count: segments.len(),
        trailing_pages_flushed: plan.trailing_pages_flushed,
        trailing_pages_dropped: plan.trailing_pages_dropped,
        segments,
    };

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.output_dir
            .join("manifests")
            .join(format!("split_run_{}.json", utc_compact_string(started_ts)))
    });
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote split run manifest");
    info!(reports = manifest.segment_count, "split completed");

    Ok(())
}
