pub mod batch;
pub mod compress;
pub mod fallback;
pub mod formats;
pub mod health;
