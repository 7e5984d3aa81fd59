use clap::Args;

use crate::cli::utils::{output_list, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::upload::prune_empty_dirs;

#[derive(Debug, Args)]
pub struct CleanUploadsArgs {
    #[arg(long, help = "List what would be removed without deleting anything")]
    pub dry_run: bool,
}

pub fn clean(args: CleanUploadsArgs, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let root = &config.upload.root_dir;
    let removed = prune_empty_dirs(root, args.dry_run)?;

    let paths: Vec<String> = removed
        .iter()
        .map(|p| p.strip_prefix(root).unwrap_or(p.as_path()).display().to_string())
        .collect();

    if matches!(output_format, OutputFormat::Text) {
        let verb = if args.dry_run { "Would remove" } else { "Removed" };
        output_success(
            &output_format,
            &format!("{} {} empty directories under {}", verb, paths.len(), root.display()),
            None,
        )?;
    }
    output_list(&output_format, "removed", &paths, "Nothing to clean")
}
