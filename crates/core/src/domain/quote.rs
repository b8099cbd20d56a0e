use serde::{Deserialize, Serialize};

/// One row of the quote table. `author` keeps the display casing from the
/// source; `topics` are already folded to lookup keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub text: String,
    pub author: String,
    pub topics: Vec<String>,
}

impl QuoteRecord {
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|candidate| candidate == topic)
    }
}
