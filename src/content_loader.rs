use std::path::{Path, PathBuf};

use gray_matter::{engine::YAML, Matter};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

use crate::models::{Meta, Post};

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk posts directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid front matter in {}: {message}", path.display())]
    FrontMatter { path: PathBuf, message: String },

    #[error("invalid post name {0:?}")]
    InvalidName(String),

    #[error("post listing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Read-only view of the posts directory. Every call goes back to disk.
#[derive(Debug, Clone)]
pub struct PostStore {
    root: PathBuf,
}

impl PostStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PostStore { root: root.into() }
    }

    /// Builds one summary per `.md` file under the root, recursively.
    /// The first unreadable or unparsable file fails the whole listing.
    pub async fn list(&self) -> Result<Vec<Post>, PostError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || walk_posts(&root)).await?
    }

    /// Loads the post linked as `/posts/<name>` and returns its metadata
    /// and markdown body. `<root>/<name>.md` wins; otherwise the first
    /// `<name>.md` in listing order under a subdirectory is used, so every
    /// link the listing produces resolves.
    pub async fn load(&self, name: &str) -> Result<(Meta, String), PostError> {
        if !is_valid_name(name) {
            return Err(PostError::InvalidName(name.to_string()));
        }
        let direct = self.root.join(format!("{}.md", name));
        let path = if fs::try_exists(&direct).await.unwrap_or(false) {
            direct
        } else {
            let root = self.root.clone();
            let stem = name.to_string();
            tokio::task::spawn_blocking(move || find_nested(&root, &stem))
                .await?
                .unwrap_or(direct)
        };
        let file_content = fs::read_to_string(&path)
            .await
            .map_err(|source| PostError::Io { path: path.clone(), source })?;
        split_front_matter(&path, &file_content)
    }
}

fn walk_posts(root: &Path) -> Result<Vec<Post>, PostError> {
    let mut posts = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_dir() || path.extension().map_or(true, |ext| ext != "md") {
            continue;
        }

        let file_content = std::fs::read_to_string(path)
            .map_err(|source| PostError::Io { path: path.to_path_buf(), source })?;
        let (meta, _body) = split_front_matter(path, &file_content)?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();

        debug!(path = %path.display(), "loaded post metadata");
        posts.push(Post::from_meta(meta, stem));
    }
    Ok(posts)
}

fn find_nested(root: &Path, stem: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .find(|path| {
            path.extension().map_or(false, |ext| ext == "md")
                && path.file_stem().map_or(false, |s| s == stem)
        })
}

/// Splits the YAML block off the top of a post. A file without one gets
/// empty metadata and keeps its whole text as the body.
pub fn split_front_matter(path: &Path, file_content: &str) -> Result<(Meta, String), PostError> {
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse::<Meta>(file_content)
        .map_err(|e| PostError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok((parsed.data.unwrap_or_default(), parsed.content))
}

// Path parameters arrive percent-decoded, so "..%2F" would otherwise
// escape the posts directory.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}
