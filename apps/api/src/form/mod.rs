// Form layer: repeatable groups, validation gate, and extraction into the document model.

pub mod extract;
pub mod handlers;
pub mod sections;
pub mod validation;
