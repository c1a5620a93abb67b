// Sessions: per-user form state, the generate pipeline, and the retained preview.

pub mod context;
pub mod handlers;
pub mod pipeline;
pub mod store;

pub use store::SessionStore;
