use std::sync::Arc;

use rand::Rng;
use serde_json::Value;

use crate::dataset::QuoteDataset;
use crate::errors::FulfillmentError;
use crate::request::{parse_request, Action, QueryParams, WebhookRequest};
use crate::resolver::QuoteResolver;
use crate::response::Reply;

/// Drives one webhook call: envelope → slots → lookup → reply.
///
/// Cloning is cheap; every clone shares the same read-only dataset.
#[derive(Clone, Debug)]
pub struct Fulfillment {
    dataset: Arc<QuoteDataset>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fulfilled {
    pub request: WebhookRequest,
    pub reply: Reply,
    found: bool,
}

impl Fulfilled {
    pub fn body(&self) -> Value {
        self.reply.render(self.request.dialect)
    }

    /// Whether the lookup matched a quote or bio.
    pub fn found(&self) -> bool {
        self.found
    }
}

impl Fulfillment {
    pub fn new(dataset: Arc<QuoteDataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &QuoteDataset {
        &self.dataset
    }

    pub fn handle(&self, body: &[u8]) -> Result<Fulfilled, FulfillmentError> {
        self.handle_with(&mut rand::thread_rng(), body)
    }

    pub fn handle_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        body: &[u8],
    ) -> Result<Fulfilled, FulfillmentError> {
        let request = parse_request(body)?;
        let (reply, found) = self.reply_with(rng, &request.params)?;
        Ok(Fulfilled { request, reply, found })
    }

    /// Resolves `params` and builds the reply, paired with whether a record matched.
    pub fn reply_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        params: &QueryParams,
    ) -> Result<(Reply, bool), FulfillmentError> {
        let resolver = QuoteResolver::new(&self.dataset);
        let author = params.author.as_deref();
        let topic = params.topic.as_deref();

        let outcome = match params.action {
            Action::GetQuoteResponse => {
                let quote = resolver.resolve_quote_with(rng, author, topic);
                (Reply::quote_text(quote), quote.is_some())
            }
            Action::GetQuoteEvent => {
                let quote = resolver.resolve_quote_with(rng, author, topic);
                (Reply::quote_event(quote), quote.is_some())
            }
            Action::GetBioResponse => {
                let bio = resolver.resolve_bio(author)?;
                (Reply::bio_text(bio), bio.is_some())
            }
            Action::GetBioEvent => {
                let bio = resolver.resolve_bio(author)?;
                (Reply::bio_event(bio), bio.is_some())
            }
        };
        Ok(outcome)
    }
}
