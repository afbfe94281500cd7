//! Embedded static resources.
//!
//! - `template` - placeholder templates with typed variable sets
//! - `document` - Standalone HTML page wrapping exported markup and styles

mod template;

pub use template::{Template, TemplateVars};

pub mod document {
    use std::borrow::Cow;

    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for document.html.
    pub struct DocumentVars<'a> {
        pub title: &'a str,
        pub styles: &'a str,
        pub body: &'a str,
    }

    impl TemplateVars for DocumentVars<'_> {
        fn substitutions(&self) -> Vec<(&'static str, Cow<'_, str>)> {
            vec![
                ("__BODY__", Cow::Borrowed(self.body)),
                ("__STYLES__", Cow::Borrowed(self.styles)),
                ("__TITLE__", escape(self.title)),
            ]
        }
    }

    /// Standalone document template.
    pub const DOCUMENT_HTML: Template<DocumentVars<'static>> =
        Template::new(include_str!("document.html"));

}
