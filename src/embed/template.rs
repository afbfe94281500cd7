//! Placeholder templates with typed variable sets.

use std::borrow::Cow;
use std::marker::PhantomData;

/// Values for one template, as `(placeholder, value)` pairs.
///
/// Pairs are substituted in order and each placeholder only at its first
/// occurrence. List placeholders that sit later in the template first, so an
/// inserted value never shadows a placeholder still to be filled.
pub trait TemplateVars {
    fn substitutions(&self) -> Vec<(&'static str, Cow<'_, str>)>;
}

/// Static template text bound to one variable type.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.substitutions()
            .into_iter()
            .fold(self.content.to_owned(), |text, (placeholder, value)| {
                text.replacen(placeholder, &value, 1)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting<'a> {
        name: &'a str,
    }

    impl TemplateVars for Greeting<'_> {
        fn substitutions(&self) -> Vec<(&'static str, Cow<'_, str>)> {
            vec![("__NAME__", Cow::Borrowed(self.name))]
        }
    }

    #[test]
    fn test_first_occurrence_only() {
        let template: Template<Greeting> = Template::new("hi __NAME__, bye __NAME__");
        assert_eq!(template.render(&Greeting { name: "ada" }), "hi ada, bye __NAME__");
    }
}
