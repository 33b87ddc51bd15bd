//! Typed endpoint wrappers over the request primitives.
//!
//! Each wrapper is a thin call through [`crate::ConnectClient::request`] or
//! [`crate::ConnectClient::request_all_pages`]: it builds the route and
//! query, then decodes resource attributes into a flat record type.

mod app_info;
mod apps;
mod iap;
mod reviews;
mod versions;

pub use app_info::{AppInfoLocalization, AppInfoLocalizationUpdate};
pub use apps::App;
pub use iap::{IapLocalization, IapLocalizationUpdate, InAppPurchase};
pub use reviews::{CustomerReview, ReviewResponse, ReviewSort};
pub use versions::{AppStoreVersion, VersionLocalization, VersionLocalizationUpdate};
