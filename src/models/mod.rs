pub mod request;
pub mod saved_trip;
pub mod subscription;
pub mod trip;
