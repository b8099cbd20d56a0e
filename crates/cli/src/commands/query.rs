use std::sync::Arc;

use quotesearch_core::{Dialect, Fulfillment};
use serde_json::{json, Map, Value};

use crate::commands::{load_dataset, CommandResult, EXIT_BAD_REQUEST};

#[derive(Clone, Debug)]
pub struct QueryArgs {
    pub action: String,
    pub author: Option<String>,
    pub topic: Option<String>,
    pub dialect: Dialect,
}

impl QueryArgs {
    /// The envelope the conversational platform would POST for these slots.
    pub fn envelope(&self) -> Value {
        let mut parameters = Map::new();
        if let Some(author) = &self.author {
            parameters.insert("author".to_string(), Value::String(author.clone()));
        }
        if let Some(topic) = &self.topic {
            parameters.insert("topic".to_string(), Value::String(topic.clone()));
        }

        let mut envelope = Map::new();
        envelope.insert(
            self.dialect.wrapper_key().to_string(),
            json!({ "action": self.action, "parameters": parameters }),
        );
        Value::Object(envelope)
    }
}

pub fn run(args: QueryArgs) -> CommandResult {
    let (_, dataset) = match load_dataset("query") {
        Ok(loaded) => loaded,
        Err(result) => return result,
    };

    let fulfillment = Fulfillment::new(Arc::new(dataset));
    let body = args.envelope().to_string();

    match fulfillment.handle(body.as_bytes()) {
        Ok(fulfilled) => {
            let message = if fulfilled.found() { "match found" } else { "no match" };
            CommandResult::success_with_data("query", message, Some(fulfilled.body()))
        }
        Err(error) => {
            let message = error.message().to_string();
            let data = json!(error.into_body());
            CommandResult::failure_with_data(
                "query",
                "bad_request",
                message,
                EXIT_BAD_REQUEST,
                Some(data),
            )
        }
    }
}
