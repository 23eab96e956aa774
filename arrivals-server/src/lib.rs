//! Live arrivals board server.
//!
//! A web application that answers: "when is the next train at this
//! station?" for MBTA subway and light rail stops.

pub mod config;
pub mod domain;
pub mod mbta;
pub mod stations;
pub mod view;
pub mod web;
