pub mod color;
pub mod ids;

pub use color::Color;
pub use ids::{LayerId, PageId, VariableId};
