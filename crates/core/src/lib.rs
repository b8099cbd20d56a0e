pub mod config;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod fulfillment;
pub mod normalize;
pub mod request;
pub mod resolver;
pub mod response;

#[cfg(test)]
pub(crate) mod fixtures;

pub use dataset::{DatasetStats, QuoteDataset};
pub use domain::quote::QuoteRecord;
pub use errors::{DatasetError, ErrorBody, FulfillmentError};
pub use fulfillment::{Fulfilled, Fulfillment};
pub use request::{Action, Dialect, QueryParams, WebhookRequest};
pub use resolver::QuoteResolver;
pub use response::Reply;
