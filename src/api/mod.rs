pub mod volunteer;

pub use volunteer::ListingsClient;
