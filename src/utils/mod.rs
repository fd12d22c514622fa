//! Utility modules shared by the fetchers and classifiers.

pub mod url;

pub use self::url::UrlUtils;
