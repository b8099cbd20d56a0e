//! Reply construction and the two wire shapes per dialect.
//!
//! | dialect | text                               | event                                        |
//! |---------|------------------------------------|----------------------------------------------|
//! | V1      | `{speech, displayText}`            | `{followupEvent: {name, data}}`              |
//! | V2      | `{fulfillmentText}`                | `{followupEventInput: {name, parameters}}`   |

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::domain::quote::QuoteRecord;
use crate::request::Dialect;

pub const NO_MATCHING_QUOTE: &str = "I have no matching quote.";
pub const NO_MATCHING_BIO: &str = "I have no matching bio.";

pub const EVENT_RESPOND_WITH_QUOTE: &str = "respond_with_quote";
pub const EVENT_QUOTE_NOT_FOUND: &str = "quote_not_found";
pub const EVENT_RESPOND_WITH_BIO: &str = "respond_with_bio";
pub const EVENT_BIO_NOT_FOUND: &str = "bio_not_found";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Event { name: &'static str, data: BTreeMap<&'static str, String> },
}

impl Reply {
    pub fn quote_text(quote: Option<&QuoteRecord>) -> Self {
        match quote {
            Some(quote) => Self::Text(format!("Here is a quote by {}: {}", quote.author, quote.text)),
            None => Self::Text(NO_MATCHING_QUOTE.to_string()),
        }
    }

    pub fn quote_event(quote: Option<&QuoteRecord>) -> Self {
        match quote {
            Some(quote) => Self::Event {
                name: EVENT_RESPOND_WITH_QUOTE,
                data: BTreeMap::from([
                    ("quote", quote.text.clone()),
                    ("author", quote.author.clone()),
                ]),
            },
            None => Self::Event { name: EVENT_QUOTE_NOT_FOUND, data: BTreeMap::new() },
        }
    }

    pub fn bio_text(bio: Option<&str>) -> Self {
        match bio {
            Some(bio) => Self::Text(format!("Here is the bio: {bio}")),
            None => Self::Text(NO_MATCHING_BIO.to_string()),
        }
    }

    pub fn bio_event(bio: Option<&str>) -> Self {
        match bio {
            Some(bio) => Self::Event {
                name: EVENT_RESPOND_WITH_BIO,
                data: BTreeMap::from([("bio", bio.to_string())]),
            },
            None => Self::Event { name: EVENT_BIO_NOT_FOUND, data: BTreeMap::new() },
        }
    }

    pub fn render(&self, dialect: Dialect) -> Value {
        match (self, dialect) {
            (Self::Text(text), Dialect::V1) => json!({ "speech": text, "displayText": text }),
            (Self::Text(text), Dialect::V2) => json!({ "fulfillmentText": text }),
            (Self::Event { name, data }, Dialect::V1) => {
                json!({ "followupEvent": { "name": name, "data": data } })
            }
            (Self::Event { name, data }, Dialect::V2) => {
                json!({ "followupEventInput": { "name": name, "parameters": data } })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Reply, NO_MATCHING_BIO, NO_MATCHING_QUOTE};
    use crate::domain::quote::QuoteRecord;
    use crate::request::Dialect;

    fn hopper() -> QuoteRecord {
        QuoteRecord {
            text: "It's easier to ask forgiveness than it is to get permission.".to_string(),
            author: "Grace Hopper".to_string(),
            topics: vec!["leadership".to_string()],
        }
    }

    #[test]
    fn quote_text_uses_display_author() {
        let reply = Reply::quote_text(Some(&hopper()));
        assert_eq!(
            reply.render(Dialect::V1),
            json!({
                "speech": "Here is a quote by Grace Hopper: It's easier to ask forgiveness than it is to get permission.",
                "displayText": "Here is a quote by Grace Hopper: It's easier to ask forgiveness than it is to get permission."
            })
        );
    }

    #[test]
    fn missing_quote_text_in_both_dialects() {
        let reply = Reply::quote_text(None);
        assert_eq!(
            reply.render(Dialect::V1),
            json!({ "speech": NO_MATCHING_QUOTE, "displayText": NO_MATCHING_QUOTE })
        );
        assert_eq!(reply.render(Dialect::V2), json!({ "fulfillmentText": NO_MATCHING_QUOTE }));
    }

    #[test]
    fn quote_event_carries_quote_and_author() {
        let reply = Reply::quote_event(Some(&hopper()));
        assert_eq!(
            reply.render(Dialect::V2),
            json!({
                "followupEventInput": {
                    "name": "respond_with_quote",
                    "parameters": {
                        "quote": "It's easier to ask forgiveness than it is to get permission.",
                        "author": "Grace Hopper"
                    }
                }
            })
        );
    }

    #[test]
    fn quote_not_found_event_has_empty_data() {
        let rendered = Reply::quote_event(None).render(Dialect::V1);
        assert_eq!(rendered, json!({ "followupEvent": { "name": "quote_not_found", "data": {} } }));
        assert!(rendered["followupEvent"]["data"].get("quote").is_none());
        assert!(rendered["followupEvent"]["data"].get("author").is_none());
    }

    #[test]
    fn bio_replies() {
        assert_eq!(
            Reply::bio_text(Some("A pioneer.")).render(Dialect::V2),
            json!({ "fulfillmentText": "Here is the bio: A pioneer." })
        );
        assert_eq!(
            Reply::bio_text(None).render(Dialect::V2),
            json!({ "fulfillmentText": NO_MATCHING_BIO })
        );
        assert_eq!(
            Reply::bio_event(Some("A pioneer.")).render(Dialect::V1),
            json!({ "followupEvent": { "name": "respond_with_bio", "data": { "bio": "A pioneer." } } })
        );
        assert_eq!(
            Reply::bio_event(None).render(Dialect::V2),
            json!({ "followupEventInput": { "name": "bio_not_found", "parameters": {} } })
        );
    }
}
