use crate::date::DateSpec;
use crate::error::GitanalError;
use crate::filter::{commit_filter, filter_commits};
use crate::git::{CommitSource, GitRepo};
use crate::model::{CommitRecord, FilterParams, GroupBy, OutputFormat, UserFilter};
use crate::render::{write_html_report, write_plain_report, Renderer};
use crate::scan::scan_repositories;
use anyhow::Context;
use chrono::Utc;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::PathBuf;

/// Everything one report run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub root: PathBuf,
    pub maxdepth: usize,
    pub since: DateSpec,
    pub users: UserFilter,
    pub output_format: OutputFormat,
    pub output_directory: PathBuf,
    pub group_by: GroupBy,
    pub server: bool,
    pub server_port: u16,
    pub repos: Option<HashSet<String>>,
    pub branches: Option<HashSet<String>>,
    pub templates: Option<PathBuf>,
}

pub fn exec(mut opts: ReportOptions) -> anyhow::Result<()> {
    if opts.server && opts.output_format != OutputFormat::Html {
        tracing::info!("Forcing output format to html");
        opts.output_format = OutputFormat::Html;
    }
    if opts.output_format == OutputFormat::Html && opts.group_by != GroupBy::User {
        return Err(GitanalError::InvalidGroupBy(opts.group_by.to_string()).into());
    }

    let renderer = match opts.output_format {
        OutputFormat::Html => Some(Renderer::new(opts.templates.as_deref()).context("Failed to load templates")?),
        OutputFormat::Plain => None,
    };

    let params = FilterParams {
        users: opts.users.clone(),
        since: Some(opts.since.resolve(Utc::now())),
    };

    let repos = scan_repositories(&opts.root, opts.maxdepth, opts.repos.as_ref())
        .with_context(|| format!("Failed to scan {}", opts.root.display()))?;

    let records = collect_records(&repos, &params, opts.branches.as_ref());

    match opts.output_format {
        OutputFormat::Plain => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_plain_report(&mut out, records, opts.group_by).context("Failed to write report")?;
        }
        OutputFormat::Html => {
            let renderer = renderer.context("HTML renderer not initialised")?;
            let written = write_html_report(&renderer, records, opts.group_by, &opts.output_directory)
                .context("Failed to write HTML report")?;
            eprintln!(
                "{} {} files to {}",
                style("Wrote").green().bold(),
                written.len(),
                opts.output_directory.display()
            );
        }
    }

    if opts.server {
        crate::serve::serve_directory(&opts.output_directory, opts.server_port)
            .context("Failed to serve report")?;
    }

    Ok(())
}

fn collect_records<'r>(
    repos: &'r [GitRepo],
    params: &FilterParams,
    branches: Option<&HashSet<String>>,
) -> Vec<CommitRecord<'r, GitRepo>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut records = Vec::new();
    for repo in repos {
        tracing::info!("Processing {}", repo.git_dir().display());
        pb.set_message(format!("Processing {}", repo.display_name()));
        let commits = filter_commits(repo, commit_filter, branches, params);
        records.extend(commits.into_iter().map(|commit| CommitRecord { repo, commit }));
        pb.tick();
    }

    pb.finish_and_clear();
    records
}
