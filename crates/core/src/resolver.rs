use std::collections::BTreeSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::dataset::QuoteDataset;
use crate::domain::quote::QuoteRecord;
use crate::errors::FulfillmentError;

pub const MISSING_BIO_AUTHOR: &str = "No author parameter provided in request for bio.";

/// Read-only lookups over a loaded [`QuoteDataset`].
///
/// Keys passed in are expected to be folded already (see
/// [`crate::normalize::lookup_key`]); the request extractor does that.
#[derive(Clone, Copy, Debug)]
pub struct QuoteResolver<'a> {
    dataset: &'a QuoteDataset,
}

impl<'a> QuoteResolver<'a> {
    pub fn new(dataset: &'a QuoteDataset) -> Self {
        Self { dataset }
    }

    /// Positions of every record matching both filters. An absent filter
    /// matches everything; a filter naming an unknown key matches nothing.
    pub fn candidates(&self, author: Option<&str>, topic: Option<&str>) -> BTreeSet<usize> {
        let by_author = self.filter(author, QuoteDataset::by_author);
        let by_topic = self.filter(topic, QuoteDataset::by_topic);
        by_author.intersection(&by_topic).copied().collect()
    }

    pub fn resolve_quote(&self, author: Option<&str>, topic: Option<&str>) -> Option<&'a QuoteRecord> {
        self.resolve_quote_with(&mut rand::thread_rng(), author, topic)
    }

    /// Picks uniformly among all exact matches using `rng`.
    pub fn resolve_quote_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        author: Option<&str>,
        topic: Option<&str>,
    ) -> Option<&'a QuoteRecord> {
        let position = self.candidates(author, topic).into_iter().choose(rng)?;
        self.dataset.get(position)
    }

    pub fn resolve_bio(&self, author: Option<&str>) -> Result<Option<&'a str>, FulfillmentError> {
        let author = author.ok_or_else(|| FulfillmentError::bad_request(MISSING_BIO_AUTHOR))?;
        Ok(self.dataset.bio(author))
    }

    fn filter(
        &self,
        key: Option<&str>,
        index: fn(&'a QuoteDataset, &str) -> Option<&'a BTreeSet<usize>>,
    ) -> BTreeSet<usize> {
        match key {
            None => self.dataset.all_positions(),
            Some(key) => index(self.dataset, key).cloned().unwrap_or_default(),
        }
    }
}
