//! Defines the [`ContentSource`] trait and [`DirectorySource`], which loads a
//! collection of [`Document`]s from Markdown files on disk.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::document::{Document, Metadata};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Supplies a collection of documents, ordered chronologically ascending by
/// id.
pub trait ContentSource {
    fn documents(&self) -> Result<Vec<Document>>;
}

/// Loads documents from a collection directory. Each Markdown file below the
/// directory is one document; its id is its path relative to the directory
/// with the extension removed (e.g., `{root}/2024/01/10/hello.md` has the id
/// `2024/01/10/hello`).
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(root: P) -> DirectorySource {
        DirectorySource { root: root.into() }
    }

    fn parse_file(&self, path: &Path) -> Result<Document> {
        match self._parse_file(path) {
            Ok(document) => Ok(document),
            Err(e) => Err(Error::Annotated(
                format!("parsing document `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_file(&self, path: &Path) -> Result<Document> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        // `path` always comes from walking `self.root`
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| Error::InvalidPath(path.to_owned()))?;
        Document::from_source(&document_id(relative)?, &contents)
    }
}

impl ContentSource for DirectorySource {
    /// Walks the collection directory and returns its documents sorted by id.
    /// Files must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title`, `preview`, and optionally
    ///    `link` and `slug`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Document body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// preview: Saying hello.
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    fn documents(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for result in WalkDir::new(&self.root) {
            let entry = result?;
            if entry.file_type().is_file() && is_markdown(entry.path()) {
                documents.push(self.parse_file(entry.path())?);
            }
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(
            root = %self.root.display(),
            count = documents.len(),
            "loaded documents"
        );
        Ok(documents)
    }
}

impl Document {
    /// Parses a single [`Document`] from its `id` and the full text of its
    /// source file (frontmatter plus body).
    pub fn from_source(id: &str, input: &str) -> Result<Document> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find(FENCE) {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        Ok(Document {
            id: id.to_owned(),
            slug: match frontmatter.slug {
                Some(slug) => slug,
                None => default_slug(id),
            },
            body: strip_line_break(&input[body_start..]).to_owned(),
            metadata: frontmatter.metadata,
        })
    }
}

#[derive(Deserialize)]
struct Frontmatter {
    /// Overrides the slug derived from the document id.
    #[serde(default)]
    slug: Option<String>,

    #[serde(flatten)]
    metadata: Metadata,
}

/// Drops the line break that ends the closing frontmatter fence, leaving
/// any indentation of the body's first line intact.
fn strip_line_break(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| MARKDOWN_EXTENSIONS.contains(&ext))
}

fn document_id(relative: &Path) -> Result<String> {
    let stem = relative.with_extension("");
    let mut segments = Vec::new();
    for component in stem.components() {
        segments.push(
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| Error::InvalidPath(relative.to_owned()))?,
        );
    }
    Ok(segments.join("/"))
}

/// Slugifies each `/`-separated segment of an id, keeping the separators.
fn default_slug(id: &str) -> String {
    id.split('/')
        .map(slug::slugify)
        .collect::<Vec<_>>()
        .join("/")
}

/// Represents the result of loading documents.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Document`] from a source.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when a source file is missing its starting frontmatter fence
    /// (`---`).
    #[error("document must begin with `---`")]
    FrontmatterMissingStartFence,

    /// Returned when a source file is missing its terminal frontmatter fence.
    #[error("missing closing `---`")]
    FrontmatterMissingEndFence,

    /// Returned when the frontmatter isn't valid YAML or is missing a
    /// required field.
    #[error(transparent)]
    DeserializeYaml(#[from] serde_yaml::Error),

    /// Returned for other I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned for errors walking the collection directory.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Returned when a source path can't be turned into a UTF-8 id.
    #[error("invalid document path: {0:?}")]
    InvalidPath(PathBuf),

    /// An error with an annotation.
    #[error("{0}: {1}")]
    Annotated(String, Box<Error>),
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) -> std::io::Result<()> {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(path, contents)
    }

    #[test]
    fn test_from_source() -> Result<()> {
        let document = Document::from_source(
            "2024/01/10/hello",
            "---\ntitle: Hello\npreview: Hi there\n---\n# Hi\n\nWorld\n",
        )?;
        assert_eq!("2024/01/10/hello", document.id);
        assert_eq!("2024/01/10/hello", document.slug);
        assert_eq!("# Hi\n\nWorld\n", document.body);
        assert_eq!(
            Metadata {
                title: "Hello".to_owned(),
                preview: "Hi there".to_owned(),
                link: None,
            },
            document.metadata
        );
        Ok(())
    }

    #[test]
    fn test_from_source_link_post_and_slug() -> Result<()> {
        let document = Document::from_source(
            "2024/01/10/x",
            "---\ntitle: X\npreview: P\nlink: https://example.com/x\nslug: custom\n---\n",
        )?;
        assert_eq!("custom", document.slug);
        assert_eq!(Some("https://example.com/x"), document.metadata.link.as_deref());
        assert_eq!("", document.body);
        Ok(())
    }

    #[test]
    fn test_from_source_keeps_leading_indentation() -> Result<()> {
        let document = Document::from_source(
            "2024/01/10/code",
            "---\ntitle: Code\npreview: P\n---\n    let x = 1;\n",
        )?;
        assert_eq!("    let x = 1;\n", document.body);

        let document = Document::from_source(
            "2024/01/10/crlf",
            "---\r\ntitle: Code\r\npreview: P\r\n---\r\n\tindented\r\n",
        )?;
        assert_eq!("\tindented\r\n", document.body);
        Ok(())
    }

    #[test]
    fn test_from_source_missing_fences() {
        assert!(matches!(
            Document::from_source("a", "title: X\n"),
            Err(Error::FrontmatterMissingStartFence)
        ));
        assert!(matches!(
            Document::from_source("a", "---\ntitle: X\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
    }

    #[test]
    fn test_from_source_missing_preview() {
        assert!(matches!(
            Document::from_source("a", "---\ntitle: X\n---\nbody"),
            Err(Error::DeserializeYaml(_))
        ));
    }

    #[test]
    fn test_default_slug() {
        assert_eq!("2024/01/10/hello-world", default_slug("2024/01/10/Hello World"));
    }

    #[test]
    fn test_directory_source() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let front = "---\ntitle: T\npreview: P\n---\nbody\n";
        write(dir.path(), "2024/02/01/second.md", front)?;
        write(dir.path(), "2023/12/31/first.mdx", front)?;
        write(dir.path(), "2024/03/01/notes.txt", "ignored")?;

        let documents = DirectorySource::new(dir.path()).documents()?;
        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(vec!["2023/12/31/first", "2024/02/01/second"], ids);
        Ok(())
    }

    #[test]
    fn test_directory_source_annotates_errors() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        write(dir.path(), "2024/02/01/broken.md", "no frontmatter")?;

        match DirectorySource::new(dir.path()).documents() {
            Err(Error::Annotated(annotation, err)) => {
                assert!(annotation.contains("broken.md"));
                assert!(matches!(*err, Error::FrontmatterMissingStartFence));
            }
            other => panic!("expected annotated error, got {:?}", other.map(|d| d.len())),
        }
        Ok(())
    }
}
