//! Loads a project's `feedsmith.yaml` into a [`Config`].

use crate::feed::FeedConfig;
use crate::write::Format;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "feedsmith.yaml";

#[derive(Deserialize)]
#[serde(default)]
struct Project {
    #[serde(flatten)]
    feed: FeedConfig,

    /// The content collection to syndicate, a directory under `content/`.
    collection: String,

    /// Enables the footnote extension when rendering Markdown.
    footnotes: bool,

    format: Format,

    /// Where to write the feed, relative to the output directory.
    feed_path: PathBuf,

    /// Builds feed items on a thread pool.
    parallel: bool,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            feed: FeedConfig::default(),
            collection: "blog".to_owned(),
            footnotes: true,
            format: Format::default(),
            feed_path: PathBuf::from("blog/feed.xml"),
            parallel: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub feed: FeedConfig,
    pub collection_directory: PathBuf,
    pub output_path: PathBuf,
    pub footnotes: bool,
    pub format: Format,
    pub parallel: bool,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a [`PROJECT_FILE`]
    /// and loads the first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
                .with_context(|| format!("Loading configuration `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        Ok(Config {
            feed: project.feed,
            collection_directory: project_root.join("content").join(&project.collection),
            output_path: output_directory.join(&project.feed_path),
            footnotes: project.footnotes,
            format: project.format,
            parallel: project.parallel,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_project_file_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(PROJECT_FILE);
        fs::write(&path, "{}\n")?;

        let config = Config::from_project_file(&path, Path::new("/out"))?;
        assert_eq!(FeedConfig::default(), config.feed);
        assert_eq!(dir.path().join("content").join("blog"), config.collection_directory);
        assert_eq!(PathBuf::from("/out/blog/feed.xml"), config.output_path);
        assert_eq!(Format::Rss, config.format);
        assert!(config.footnotes);
        assert!(config.parallel);
        Ok(())
    }

    #[test]
    fn test_from_project_file_overrides() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(PROJECT_FILE);
        fs::write(
            &path,
            "title: Example\n\
             site: https://example.org/\n\
             full_render: false\n\
             collection: posts\n\
             format: atom\n\
             feed_path: feed.atom\n\
             parallel: false\n",
        )?;

        let config = Config::from_project_file(&path, Path::new("/out"))?;
        assert_eq!("Example", config.feed.title);
        assert_eq!("https://example.org/", config.feed.site.as_str());
        assert_eq!("en-us", config.feed.language);
        assert!(!config.feed.full_render);
        assert_eq!(dir.path().join("content").join("posts"), config.collection_directory);
        assert_eq!(PathBuf::from("/out/feed.atom"), config.output_path);
        assert_eq!(Format::Atom, config.format);
        assert!(!config.parallel);
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_ancestors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "title: Found\n")?;
        let nested = dir.path().join("content").join("blog");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested, Path::new("/out"))?;
        assert_eq!("Found", config.feed.title);
        Ok(())
    }

    #[test]
    fn test_from_project_file_invalid_site() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(PROJECT_FILE);
        fs::write(&path, "site: not a url\n")?;
        assert!(Config::from_project_file(&path, Path::new("/out")).is_err());
        Ok(())
    }
}
