pub mod backend;
pub mod backends;
pub mod types;

pub use backend::{BackendError, CatalogBackend};
pub use backends::HttpBackend;
pub use types::{CatalogItem, CollectionKind, FetchParams, InquiryPayload, ItemDetails};
