pub mod health;
pub mod itinerary;
pub mod location;
pub mod payment;
pub mod plan;
pub mod trip;
