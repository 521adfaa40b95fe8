pub mod justified;
pub mod layout_cache;

pub use justified::{JustifiedLayout, RowBreak};
pub use layout_cache::{CachedLayoutComputer, LayoutCache};
