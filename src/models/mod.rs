pub mod asset;
pub mod row_model;
pub mod viewport;

pub use asset::*;
pub use row_model::*;
pub use viewport::*;
