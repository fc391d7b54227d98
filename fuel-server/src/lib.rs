//! Fuel price server.
//!
//! A web application that answers: "Which stations near me sell the fuel I
//! want, and which is cheapest?" Prices come from the NSW FuelCheck API and
//! are cached in memory, refreshed lazily as queries arrive.

pub mod cache;
pub mod config;
pub mod domain;
pub mod upstream;
pub mod web;
