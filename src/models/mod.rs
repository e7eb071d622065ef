pub mod history;
pub mod market;
pub mod summary;

pub use history::*;
pub use market::*;
pub use summary::*;
