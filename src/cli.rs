use crate::date::DateSpec;
use crate::model::{GroupBy, OutputFormat, UserFilter};
use crate::report::ReportOptions;
use crate::scan::DEFAULT_MAXDEPTH;
use crate::serve::DEFAULT_PORT;
use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitanal")]
#[command(about = "Tool to analyze git repositories")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true, action = ArgAction::Count, help = "More log output (-v debug, -vv trace)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(short = 'r', long, default_value = ".", help = "git repositories root")]
    pub root: PathBuf,

    #[arg(short = 'd', long, default_value_t = DEFAULT_MAXDEPTH, help = "How deep below the root to look for repositories")]
    pub maxdepth: usize,

    #[arg(short = 'S', long, help = "Since date (YYYY-MM-DD, RFC3339, now-7d, '3 days ago'); defaults to 7 days ago")]
    pub since: Option<DateSpec>,

    #[arg(short = 'F', long, default_value = "plain", help = "Output format: plain or html")]
    pub output_format: OutputFormat,

    #[arg(short = 'o', long, default_value = "gitanal_out", help = "Output directory")]
    pub output_directory: PathBuf,

    #[arg(short = 's', long, help = "Serve the HTML report after rendering")]
    pub server: bool,

    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT, help = "Port of the report server")]
    pub server_port: u16,

    #[arg(short = 'R', long = "repo", value_delimiter = ',', help = "Repository filter, comma-separated")]
    pub repo: Option<Vec<String>>,

    #[arg(short = 'B', long = "branch", value_delimiter = ',', help = "Branch filter, comma-separated")]
    pub branch: Option<Vec<String>>,

    #[arg(long, help = "Directory with users.html and repos_commits.html templates")]
    pub templates: Option<PathBuf>,
}

impl CommonArgs {
    fn into_options(self, users: UserFilter, group_by: GroupBy) -> ReportOptions {
        ReportOptions {
            root: self.root,
            maxdepth: self.maxdepth,
            since: self.since.unwrap_or_default(),
            users,
            output_format: self.output_format,
            output_directory: self.output_directory,
            group_by,
            server: self.server,
            server_port: self.server_port,
            repos: self.repo.map(|r| r.into_iter().collect::<HashSet<_>>()),
            branches: self.branch.map(|b| b.into_iter().collect::<HashSet<_>>()),
            templates: self.templates,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report commits of every repository below the root
    Report {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(short = 'U', long, help = "User filter comma-separated, ^ALL or ^CURRENT")]
        user: Option<UserFilter>,

        #[arg(short = 'G', long, default_value = "user", help = "Group by user or repo")]
        groupby: GroupBy,
    },
    /// Report your own commits, as configured by user.name in each repository
    Me {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(short = 'G', long, default_value = "repo", help = "Group by user or repo")]
        groupby: GroupBy,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("gitanal={}", self.log_level())));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub fn execute(self) -> Result<()> {
        let opts = match self.command {
            Commands::Report { common, user, groupby } => {
                common.into_options(user.unwrap_or_default(), groupby)
            }
            Commands::Me { common, groupby } => common.into_options(UserFilter::CurrentUser, groupby),
        };
        crate::report::exec(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(args: &[&str]) -> ReportOptions {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Report { common, user, groupby } => common.into_options(user.unwrap_or_default(), groupby),
            Commands::Me { common, groupby } => common.into_options(UserFilter::CurrentUser, groupby),
        }
    }

    #[test]
    fn report_defaults() {
        let opts = options(&["gitanal", "report"]);
        assert_eq!(opts.root, PathBuf::from("."));
        assert_eq!(opts.maxdepth, 2);
        assert_eq!(opts.since, DateSpec::default());
        assert_eq!(opts.users, UserFilter::Unrestricted);
        assert_eq!(opts.output_format, OutputFormat::Plain);
        assert_eq!(opts.output_directory, PathBuf::from("gitanal_out"));
        assert_eq!(opts.group_by, GroupBy::User);
        assert!(!opts.server);
        assert_eq!(opts.server_port, 5555);
        assert!(opts.repos.is_none() && opts.branches.is_none());
    }

    #[test]
    fn me_fixes_current_user_and_groups_by_repo() {
        let opts = options(&["gitanal", "me", "-S", "2024-01-01"]);
        assert_eq!(opts.users, UserFilter::CurrentUser);
        assert_eq!(opts.group_by, GroupBy::Repo);
    }

    #[test]
    fn list_flags_split_on_commas() {
        let opts = options(&["gitanal", "report", "-R", "alpha,beta", "-B", "main", "-U", "ann,bob"]);
        assert_eq!(opts.repos.unwrap().len(), 2);
        assert!(opts.branches.unwrap().contains("main"));
        assert_eq!(opts.users, UserFilter::Explicit(vec!["ann".into(), "bob".into()]));
    }

    #[test]
    fn invalid_enumerations_are_rejected_at_parse_time() {
        for args in [
            &["gitanal", "report", "-G", "team"][..],
            &["gitanal", "report", "-F", "json"][..],
            &["gitanal", "report", "-U", "^SOMEONE"][..],
            &["gitanal", "report", "-S", "whenever"][..],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn verbosity_selects_log_level() {
        assert_eq!(Cli::try_parse_from(["gitanal", "report"]).unwrap().log_level(), "info");
        assert_eq!(Cli::try_parse_from(["gitanal", "-vv", "report"]).unwrap().log_level(), "trace");
        assert_eq!(Cli::try_parse_from(["gitanal", "report", "-q"]).unwrap().log_level(), "warn");
    }
}
