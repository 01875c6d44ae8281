//! Core storefront client library (session, auth, routing, catalog sync).

pub mod api;
pub mod app;
pub mod auth;
pub mod blob;
pub mod catalog;
pub mod config;
pub mod notice;
pub mod routes;
pub mod session;
