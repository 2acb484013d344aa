pub mod client;
pub mod http;

pub use client::{Itinerary, ItineraryClient, ItineraryClientError};
pub use http::HttpItineraryClient;
