pub mod html;
pub mod plain;

pub use html::write_html_report;
pub use plain::write_plain_report;

use crate::error::Result;
use minijinja::{context, Environment};
use serde::Serialize;
use std::path::Path;

pub const USERS_TEMPLATE: &str = "users.html";
pub const REPOS_COMMITS_TEMPLATE: &str = "repos_commits.html";

#[derive(Debug, Clone, Serialize)]
pub struct UserLink {
    pub username: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoSection {
    pub name: String,
    pub commits: Vec<CommitView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitView {
    pub message: String,
    pub sha: String,
    pub diff: Option<String>,
}

/// HTML page renderer. Uses the built-in templates unless a template directory is given.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(template_dir: Option<&Path>) -> Result<Self> {
        let mut env = Environment::new();
        match template_dir {
            Some(dir) => env.set_loader(minijinja::path_loader(dir)),
            None => {
                env.add_template(USERS_TEMPLATE, include_str!("templates/users.html"))?;
                env.add_template(
                    REPOS_COMMITS_TEMPLATE,
                    include_str!("templates/repos_commits.html"),
                )?;
            }
        }

        Ok(Self { env })
    }

    pub fn render_repos_commits(&self, title: &str, repos_commits: &[RepoSection]) -> Result<String> {
        let tmpl = self.env.get_template(REPOS_COMMITS_TEMPLATE)?;
        Ok(tmpl.render(context! { title => title, repos_commits => repos_commits })?)
    }

    pub fn render_users(&self, users: &[UserLink]) -> Result<String> {
        let tmpl = self.env.get_template(USERS_TEMPLATE)?;
        Ok(tmpl.render(context! { users => users })?)
    }
}
