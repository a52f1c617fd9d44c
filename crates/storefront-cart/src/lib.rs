pub mod client;
pub mod controller;
pub mod error;
pub mod preview;
pub mod types;

pub use client::StorefrontClient;
pub use controller::{CartSubmissionController, SkipReason, SubmitOutcome};
pub use error::CartError;
pub use preview::CartPreview;
pub use types::{AddedItem, CartAddResult, CartRejection, SectionsPayload};
