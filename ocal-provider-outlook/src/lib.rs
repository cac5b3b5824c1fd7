//! Microsoft Outlook calendar provider for ocal.
//!
//! Talks to the Microsoft Graph v1.0 REST API with a bearer token that
//! was obtained outside ocal (see [`auth`]).

pub mod auth;
pub mod client;
pub mod graph_event;
pub mod provider;

pub use auth::{ACCESS_TOKEN_ENV, StoredToken, TokenStore};
pub use client::GraphClient;
pub use provider::{OutlookProvider, PRIMARY_CALENDAR};
