use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitanalError>;

#[derive(Error, Debug)]
pub enum GitanalError {
    #[error("Not a valid git repository: {0}")]
    InvalidRepository(PathBuf),
    #[error("Cannot parse date string '{0}'")]
    DateParse(String),
    #[error("Invalid users filter: {0}")]
    InvalidFilterValue(String),
    #[error("Invalid parameter groupby: {0}")]
    InvalidGroupBy(String),
    #[error("Invalid parameter format: {0}")]
    InvalidOutputFormat(String),
    #[error("Error {message} while processing {repo}")]
    BranchTraversal { repo: String, message: String },
    #[error("Failed to write {path}: {source}")]
    RenderWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Server error: {0}")]
    Serve(String),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::object::find::existing::Error> for GitanalError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        GitanalError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GitanalError {
    fn from(err: gix::object::commit::Error) -> Self {
        GitanalError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GitanalError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GitanalError::RefFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GitanalError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GitanalError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GitanalError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GitanalError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for GitanalError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        GitanalError::DiffTreeToTree(Box::new(err))
    }
}
