use anyhow::Result;
use tracing::info;

use crate::cli::{RenameArgs, RunArgs, SplitArgs};
use crate::commands::{rename, split};

/// Split the combined input, then rename the pieces in the same output
/// directory.
pub fn run(args: RunArgs) -> Result<()> {
    split::run(SplitArgs {
        input: args.input.clone(),
        output_dir: args.output_dir.clone(),
        marker: args.marker.clone(),
        fuzzy_threshold: args.fuzzy_threshold,
        no_flush_remainder: args.no_flush_remainder,
        manifest_path: args.split_manifest_path.clone(),
    })?;

    rename::run(RenameArgs {
        directory: args.output_dir.clone(),
        keywords: args.keywords.clone(),
        id_formats: args.id_formats.clone(),
        trailing_markers: args.trailing_markers.clone(),
        manifest_path: args.rename_manifest_path.clone(),
    })?;

    info!("run completed");
    Ok(())
}
