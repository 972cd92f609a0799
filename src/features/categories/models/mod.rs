mod category;

pub use category::{Category, CategoryLevel};
