pub mod gemini;
pub mod geocoding;
pub mod itinerary_ops;
pub mod photos;
pub mod plan_service;
pub mod response_decoder;
pub mod subscription_service;
pub mod trajectory;
pub mod trip_service;
pub mod validation;
