//! App Store Connect API access layer.
//!
//! A [`ConnectClient`] issues one logical request and returns one fully
//! materialized envelope: bearer auth, rate-limit backoff, transient-failure
//! retry, and multi-page aggregation all happen behind the two request
//! primitives. Typed endpoint wrappers for apps, localizations, in-app
//! purchases, and reviews sit on top.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::TokenCache;
pub use client::{ConnectClient, DEFAULT_BASE_URL};
pub use endpoints::{
    App, AppInfoLocalization, AppInfoLocalizationUpdate, AppStoreVersion, CustomerReview,
    IapLocalization, IapLocalizationUpdate, InAppPurchase, ReviewResponse, ReviewSort,
    VersionLocalization, VersionLocalizationUpdate,
};
pub use envelope::{ApiEnvelope, PageLinks, PrimaryData, Relationship, Resource, ResourceId};
pub use error::{ConnectError, Result};
