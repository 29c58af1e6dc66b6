use crate::core::geometry::Size;

/// What the resizer needs to know about a stored source image.
///
/// `context` and `provider_name` only ever show up in error messages; the
/// generator also uses `context` to pick the set of formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub id: String,
    pub context: String,
    pub provider_name: String,
    pub size: Size,
    pub reference: String,
}

impl Media {
    pub fn new(id: impl Into<String>, context: impl Into<String>, size: Size) -> Self {
        Self {
            id: id.into(),
            context: context.into(),
            provider_name: String::from("image"),
            size,
            reference: String::new(),
        }
    }

    pub fn provider(mut self, provider_name: impl Into<String>) -> Self {
        self.provider_name = provider_name.into();
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Label used when a request for this media is rejected.
    pub fn describe(&self) -> String {
        format!(
            "in context \"{}\" for provider \"{}\"",
            self.context, self.provider_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let media = Media::new("42", "news", Size::new(800, 600))
            .provider("youtube")
            .reference("news/source.jpg");
        assert_eq!(media.provider_name, "youtube");
        assert_eq!(media.reference, "news/source.jpg");
        assert_eq!(
            media.describe(),
            "in context \"news\" for provider \"youtube\""
        );
    }
}
