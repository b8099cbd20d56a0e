//! Quote table loading and the three read-only lookup indexes.
//!
//! The table is a CSV file with the header
//! `quote,author,year_born,year_died,bio,date_spoken,source,topics,comments`.
//! Every row becomes a [`QuoteRecord`]; rows are indexed by folded author and
//! by every folded topic, and the first non-empty bio per author is kept.
//! Nothing here mutates after [`QuoteDataset::from_reader`] returns.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::domain::quote::QuoteRecord;
use crate::errors::DatasetError;
use crate::normalize::lookup_key;

pub const COLUMNS: [&str; 9] = [
    "quote",
    "author",
    "year_born",
    "year_died",
    "bio",
    "date_spoken",
    "source",
    "topics",
    "comments",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteDataset {
    quotes: Vec<QuoteRecord>,
    by_author: HashMap<String, BTreeSet<usize>>,
    by_topic: HashMap<String, BTreeSet<usize>>,
    bio_by_author: HashMap<String, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub quotes: usize,
    pub authors: usize,
    pub topics: usize,
    pub bios: usize,
}

struct ColumnLayout {
    width: usize,
    quote: usize,
    author: usize,
    bio: usize,
    topics: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let names: Vec<String> =
            headers.iter().map(|name| name.trim().to_ascii_lowercase()).collect();
        let position = |column: &'static str| {
            names.iter().position(|name| name == column).ok_or(DatasetError::MissingColumn(column))
        };

        for column in COLUMNS {
            position(column)?;
        }

        Ok(Self {
            width: headers.len(),
            quote: position("quote")?,
            author: position("author")?,
            bio: position("bio")?,
            topics: position("topics")?,
        })
    }
}

impl QuoteDataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| DatasetError::Open { path: path.to_path_buf(), source })?;
        let dataset = Self::from_reader(file)?;

        let stats = dataset.stats();
        debug!(
            path = %path.display(),
            quotes = stats.quotes,
            authors = stats.authors,
            topics = stats.topics,
            "quote dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
        let layout = ColumnLayout::from_headers(reader.headers()?)?;

        let mut dataset = Self::default();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            let row_number = index + 1;
            if row.len() != layout.width {
                return Err(DatasetError::FieldCount {
                    row: row_number,
                    found: row.len(),
                    expected: layout.width,
                });
            }

            let text = required_field(&row, layout.quote, row_number, "quote")?;
            let author = required_field(&row, layout.author, row_number, "author")?;
            let bio = row.get(layout.bio).unwrap_or_default();
            let topics = row.get(layout.topics).unwrap_or_default();

            dataset.index_row(text, author, bio, topics);
        }

        Ok(dataset)
    }

    fn index_row(&mut self, text: &str, author: &str, bio: &str, topics: &str) {
        let mut folded_topics: Vec<String> = Vec::new();
        for topic in topics.split(',').map(lookup_key).filter(|topic| !topic.is_empty()) {
            if !folded_topics.contains(&topic) {
                folded_topics.push(topic);
            }
        }

        let position = self.quotes.len();
        let author_key = lookup_key(author);

        self.by_author.entry(author_key.clone()).or_default().insert(position);
        for topic in &folded_topics {
            self.by_topic.entry(topic.clone()).or_default().insert(position);
        }

        let bio = bio.trim();
        if !bio.is_empty() {
            self.bio_by_author.entry(author_key).or_insert_with(|| bio.to_string());
        }

        self.quotes.push(QuoteRecord {
            text: text.to_string(),
            author: author.to_string(),
            topics: folded_topics,
        });
    }

    pub fn quotes(&self) -> &[QuoteRecord] {
        &self.quotes
    }

    pub fn get(&self, position: usize) -> Option<&QuoteRecord> {
        self.quotes.get(position)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Positions of every record by `author_key`. The key must already be folded.
    pub fn by_author(&self, author_key: &str) -> Option<&BTreeSet<usize>> {
        self.by_author.get(author_key)
    }

    pub fn by_topic(&self, topic_key: &str) -> Option<&BTreeSet<usize>> {
        self.by_topic.get(topic_key)
    }

    pub fn bio(&self, author_key: &str) -> Option<&str> {
        self.bio_by_author.get(author_key).map(String::as_str)
    }

    pub fn all_positions(&self) -> BTreeSet<usize> {
        (0..self.quotes.len()).collect()
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            quotes: self.quotes.len(),
            authors: self.by_author.len(),
            topics: self.by_topic.len(),
            bios: self.bio_by_author.len(),
        }
    }
}

fn required_field<'r>(
    row: &'r csv::StringRecord,
    position: usize,
    row_number: usize,
    column: &'static str,
) -> Result<&'r str, DatasetError> {
    let value = row.get(position).unwrap_or_default().trim();
    if value.is_empty() {
        return Err(DatasetError::EmptyField { row: row_number, column });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::QuoteDataset;
    use crate::errors::DatasetError;
    use crate::fixtures::{sample_dataset, SAMPLE_CSV};

    const HEADER: &str = "quote,author,year_born,year_died,bio,date_spoken,source,topics,comments\n";

    #[test]
    fn header_row_is_not_indexed() {
        let dataset = sample_dataset();
        assert!(dataset.quotes().iter().all(|record| record.text != "quote"));
        assert!(dataset.by_author("author").is_none());
    }

    #[test]
    fn author_index_uses_folded_names_and_keeps_display_casing() {
        let dataset = sample_dataset();

        let positions = dataset.by_author("grace hopper").expect("grace hopper is indexed");
        assert_eq!(positions.len(), 3);
        for position in positions {
            let record = dataset.get(*position).expect("indexed position exists");
            assert_eq!(record.author, "Grace Hopper");
        }
        assert!(dataset.by_author("Grace Hopper").is_none());
    }

    #[test]
    fn every_topic_in_a_row_is_indexed() {
        let dataset = sample_dataset();

        let analytical = dataset
            .quotes()
            .iter()
            .position(|record| record.text.starts_with("The Analytical Engine"))
            .expect("lovelace quote present");

        assert!(dataset.by_topic("mathematics").expect("topic").contains(&analytical));
        assert!(dataset.by_topic("poetry").expect("topic").contains(&analytical));
        assert_eq!(dataset.quotes()[analytical].topics, vec!["mathematics", "poetry"]);
    }

    #[test]
    fn topics_are_trimmed_lowercased_and_empty_fragments_dropped() {
        let csv = format!("{HEADER}\"Q\",Someone,,,,,,\" Alpha ,,BETA, alpha\",\n");
        let dataset = QuoteDataset::from_reader(csv.as_bytes()).expect("dataset loads");

        assert_eq!(dataset.quotes()[0].topics, vec!["alpha", "beta"]);
        assert!(dataset.by_topic("alpha").is_some());
        assert!(dataset.by_topic("beta").is_some());
        assert!(dataset.by_topic("").is_none());
    }

    #[test]
    fn first_non_empty_bio_wins() {
        let dataset = sample_dataset();

        let hopper = dataset.bio("grace hopper").expect("hopper bio");
        assert!(hopper.contains("computer scientist"));
        assert!(!hopper.contains("duplicate"));

        let johnson = dataset.bio("katherine johnson").expect("johnson bio");
        assert!(johnson.contains("NASA"));
    }

    #[test]
    fn loading_twice_yields_equal_datasets() {
        let first = QuoteDataset::from_reader(SAMPLE_CSV.as_bytes()).expect("first load");
        let second = QuoteDataset::from_reader(SAMPLE_CSV.as_bytes()).expect("second load");
        assert_eq!(first, second);
    }

    #[test]
    fn stats_count_distinct_index_keys() {
        let stats = sample_dataset().stats();
        assert_eq!(stats.quotes, 8);
        assert_eq!(stats.authors, 4);
        assert_eq!(stats.bios, 4);
        assert!(stats.topics >= 6);
    }

    #[test]
    fn header_only_table_is_an_empty_dataset() {
        let dataset = QuoteDataset::from_reader(HEADER.as_bytes()).expect("dataset loads");
        assert!(dataset.is_empty());
        assert!(dataset.all_positions().is_empty());
    }

    #[test]
    fn missing_header_column_is_rejected() {
        let csv = "quote,author,bio,topics\n\"Q\",A,B,t\n";
        let error = QuoteDataset::from_reader(csv.as_bytes()).expect_err("missing columns");
        assert!(matches!(error, DatasetError::MissingColumn("year_born")));
    }

    #[test]
    fn short_row_is_rejected_with_its_row_number() {
        let csv = format!("{HEADER}\"Q\",A,,,,,,t,\n\"Q2\",B,,\n");
        let error = QuoteDataset::from_reader(csv.as_bytes()).expect_err("short row");
        assert!(matches!(error, DatasetError::FieldCount { row: 2, found: 4, expected: 9 }));
    }

    #[test]
    fn empty_author_is_rejected() {
        let csv = format!("{HEADER}\"Q\",  ,,,,,,t,\n");
        let error = QuoteDataset::from_reader(csv.as_bytes()).expect_err("empty author");
        assert!(matches!(error, DatasetError::EmptyField { row: 1, column: "author" }));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = TempDir::new().expect("tempdir");
        let error = QuoteDataset::from_path(dir.path().join("absent.csv")).expect_err("no file");
        assert!(matches!(error, DatasetError::Open { .. }));
        assert!(error.to_string().contains("absent.csv"));
    }

    #[test]
    fn from_path_reads_the_same_table_as_from_reader() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("quotes.csv");
        fs::write(&path, SAMPLE_CSV).expect("write fixture");

        let from_path = QuoteDataset::from_path(&path).expect("load from path");
        assert_eq!(from_path, sample_dataset());
    }
}
