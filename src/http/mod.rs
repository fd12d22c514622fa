//! HTTP plumbing: header disguise, the transport contract and its reqwest
//! implementation.

pub mod client;
pub mod disguise;
pub mod transport;

pub use client::StandardHttpClient;
pub use disguise::{DISGUISE_TABLE, HeaderSet, mask, reveal};
pub use transport::{FetchRequest, ResponseBody, ResponseMeta, ResponseType, Transport};
