use crate::data_file::{collect_file_names, match_file, Loaded, Shape};
use anyhow::{bail, Result};
use std::path::Path;

pub const NUMBER_OF_TEMPLATES: usize = 47;
pub const QUERIES_PER_TEMPLATE: usize = 3;

/// Labels of the three action-unit queries, in positional order.
pub const QUERY_LABELS: [&str; QUERIES_PER_TEMPLATE] =
    ["_AU01_query", "_AU12_query", "_AU17_query"];

#[derive(Clone, Debug)]
pub struct Query {
    pub file_name: String,
    pub vector: Vec<f64>,
}

#[derive(Clone, Debug)]
pub struct Template {
    pub file_name: String,
    pub rows: Vec<Vec<f64>>,
}

/// Templates and queries in collector order.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub templates: Vec<Template>,
    pub queries: Vec<Query>,
}

/// A template paired with the queries scored against it. `index` is 1-based.
pub struct Subject<'a> {
    pub index: usize,
    pub template: &'a Template,
    pub queries: &'a [Query],
}

impl Dataset {
    pub async fn load(dir: &Path, shape: Shape) -> Result<Self> {
        let mut dataset = Dataset::default();
        for file_name in collect_file_names(dir).await? {
            let file = match_file(file_name.clone(), dir.join(&file_name));
            debug!("load {}", file);
            match file.load(shape).await? {
                Loaded::Template(rows) => dataset.templates.push(Template { file_name, rows }),
                Loaded::Query(vector) => dataset.queries.push(Query { file_name, vector }),
            }
        }
        dataset.check()?;
        info!(
            "loaded {} templates and {} queries from {}",
            dataset.templates.len(),
            dataset.queries.len(),
            dir.display()
        );
        Ok(dataset)
    }

    fn check(&self) -> Result<()> {
        if self.templates.is_empty() {
            bail!("no template files found");
        }
        let expected = self.templates.len() * QUERIES_PER_TEMPLATE;
        if self.queries.len() != expected {
            bail!(
                "{} templates need {} queries, found {}",
                self.templates.len(),
                expected,
                self.queries.len()
            );
        }
        if self.templates.len() != NUMBER_OF_TEMPLATES {
            warn!(
                "expected {} templates, found {}",
                NUMBER_OF_TEMPLATES,
                self.templates.len()
            );
        }
        for subject in self.subjects() {
            debug!("subject {}: {}", subject.index, subject.template.file_name);
            for (query, label) in subject.queries.iter().zip(QUERY_LABELS) {
                if !query.file_name.contains(label) {
                    warn!(
                        "subject {}: query {} is reported as {}",
                        subject.index, query.file_name, label
                    );
                }
            }
        }
        Ok(())
    }

    /// The i-th template owns queries 3i, 3i+1 and 3i+2.
    pub fn subjects(&self) -> impl Iterator<Item = Subject<'_>> {
        self.templates
            .iter()
            .zip(self.queries.chunks_exact(QUERIES_PER_TEMPLATE))
            .enumerate()
            .map(|(i, (template, queries))| Subject {
                index: i + 1,
                template,
                queries,
            })
    }
}
