pub mod auth;
pub mod itinerary;
