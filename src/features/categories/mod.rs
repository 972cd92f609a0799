//! Three-level category taxonomy: the flat list fetched from the admin API,
//! the views derived from it, and the mutations that change it.

pub mod clients;
pub mod dtos;
pub mod models;
pub mod services;

pub use clients::{CategoryApiClient, CategoryBackend};
pub use dtos::CategoryTreeDto;
pub use models::{Category, CategoryLevel};
pub use services::{
    CategoryForm, CategoryService, CategoryStore, CategoryViewState, MutationPhase, NewCategory,
};
