pub mod resume;
pub mod section;

pub use resume::{
    Achievement, Certification, DocumentModel, Education, Experience, Personal, Project,
};
pub use section::SectionKind;
