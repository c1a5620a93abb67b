// Template Renderer: model + named template → final markup.
// Rendering is a pure transform; loading the template is the only I/O.

pub mod formatter;
pub mod renderer;
pub mod templates;

pub use renderer::render_document;
pub use templates::{FsTemplateSource, TemplateError, TemplateSource, DEFAULT_TEMPLATE};
