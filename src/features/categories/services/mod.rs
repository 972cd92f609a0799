mod category_form;
mod category_service;
mod category_store;
pub mod taxonomy;
mod view_state;

pub use category_form::CategoryForm;
pub use category_service::{CategoryService, MutationPhase, NewCategory};
pub use category_store::CategoryStore;
pub use taxonomy::CategoryStats;
pub use view_state::CategoryViewState;
