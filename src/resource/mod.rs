//! Resource client module
//!
//! A [`ResourceClient`] is a typed CRUD client for one REST collection:
//! - `index` lists one page, `get` reads one record through the cache
//! - `create`, `update` and `delete` write through the authenticated transport
//! - `get_all_pages_base_list` walks every page concurrently
//!
//! Transports and normalizers are supplied through [`ResourceCapabilities`].

mod capabilities;
mod client;
mod normalize;
mod types;

pub use capabilities::{
    default_list_normalizer, FilterNormalizer, ItemNormalizer, ListNormalizer,
    ResourceCapabilities, TransportFactory,
};
pub use client::ResourceClient;
pub use normalize::overlay;
pub use types::{
    Filters, GetOptions, ListResponse, Payload, DEFAULT_GET_TTL, DEFAULT_INDEX_LENGTH, LENGTH_KEY,
    OFFSET_KEY, WITH_TOTAL_KEY,
};
