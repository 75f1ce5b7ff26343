pub mod query;
pub mod template;

use anyhow::{anyhow, bail, Context, Result};
use std::{fmt::Display, path::Path, path::PathBuf};
use tokio::fs;

use self::{query::parse_query, template::parse_template};

pub const ELEMENTS_PER_VECTOR: usize = 5632;
pub const VECTORS_PER_TEMPLATE: usize = 138;

/// File names containing this marker hold a subject template.
pub const TEMPLATE_MARKER: &str = "template";

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum FileType {
    Template,
    Query,
}

impl Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Template => write!(f, "TEMPLATE"),
            FileType::Query => write!(f, "QUERY"),
        }
    }
}

/// Number of rows and values per row expected in a data file.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const TEMPLATE: Shape = Shape {
        rows: VECTORS_PER_TEMPLATE,
        cols: ELEMENTS_PER_VECTOR,
    };

    pub fn value_count(&self) -> usize {
        self.rows * self.cols
    }
}

#[derive(Clone, Debug)]
pub struct DataFile {
    pub file_name: String,
    pub path: PathBuf,
    pub file_type: FileType,
}

impl Display for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {{ file_name: {}, path: {} }}",
            self.file_type,
            self.file_name,
            self.path.display()
        )
    }
}

pub fn match_file(file_name: String, path: PathBuf) -> DataFile {
    let file_type = if file_name.contains(TEMPLATE_MARKER) {
        FileType::Template
    } else {
        FileType::Query
    };
    DataFile {
        file_name,
        path,
        file_type,
    }
}

/// A parsed data file.
#[derive(Clone, Debug, PartialEq)]
pub enum Loaded {
    Template(Vec<Vec<f64>>),
    Query(Vec<f64>),
}

impl DataFile {
    /// Reads and parses the file. `shape` is the template shape; a query
    /// holds a single row of `shape.cols` values.
    pub async fn load(&self, shape: Shape) -> Result<Loaded> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("unable to open file {}", self.path.display()))?;
        let loaded = match self.file_type {
            FileType::Template => parse_template(&content, shape).map(Loaded::Template),
            FileType::Query => parse_query(&content, shape).map(Loaded::Query),
        };
        loaded.with_context(|| format!("failed to parse {}", self.path.display()))
    }
}

/// Lists every entry of `dir`, sorted byte-wise so files sharing a subject
/// prefix stay adjacent and subjects keep a stable order.
pub async fn collect_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut file_names = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("unable to open data directory {}", dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name().into_string().map_err(|name| {
            anyhow!(
                "data file name {:?} in {} is not valid UTF-8",
                name,
                dir.display()
            )
        })?;
        file_names.push(file_name);
    }
    file_names.sort();
    Ok(file_names)
}

/// Reads the first `shape.value_count()` whitespace separated numbers of `content`.
fn parse_values(content: &str, shape: Shape) -> Result<Vec<f64>> {
    let expected = shape.value_count();
    let mut values = Vec::with_capacity(expected);
    let mut tokens = content.split_whitespace();
    for (position, token) in tokens.by_ref().take(expected).enumerate() {
        let value = token
            .parse::<f64>()
            .map_err(|e| anyhow!("invalid number {:?} at position {}: {}", token, position, e))?;
        if !value.is_finite() {
            bail!("invalid number {:?} at position {}: not finite", token, position);
        }
        values.push(value);
    }
    if values.len() < expected {
        bail!("expected {} values, found {}", expected, values.len());
    }
    let surplus = tokens.count();
    if surplus > 0 {
        debug!("ignore {} values beyond the first {}", surplus, expected);
    }
    Ok(values)
}
