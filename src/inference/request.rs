//! Multimodal prompt assembly for the remote model.

/// A single piece of model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferencePart {
    /// Plain instruction or context text.
    Text(String),
    /// Raw binary content (e.g. a scanned bill) with its MIME type.
    Binary { mime_type: String, data: Vec<u8> },
}

/// Ordered multimodal prompt, immutable once built.
///
/// Parts are sent to the endpoint in insertion order. There is no mutation
/// API after construction; build a new request to change the content.
#[derive(Debug, Clone, Default)]
pub struct InferenceRequest {
    parts: Vec<InferencePart>,
}

impl InferenceRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Shorthand for a request holding a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    /// Append a text part.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(InferencePart::Text(text.into()));
        self
    }

    /// Append a binary part.
    pub fn with_binary(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.parts.push(InferencePart::Binary {
            mime_type: mime_type.into(),
            data,
        });
        self
    }

    /// Parts in send order.
    pub fn parts(&self) -> &[InferencePart] {
        &self.parts
    }

    /// Whether the request carries any content at all.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_keep_insertion_order() {
        let request = InferenceRequest::text("describe this")
            .with_binary("image/png", vec![1, 2, 3])
            .with_text("be brief");

        let parts = request.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], InferencePart::Text("describe this".to_string()));
        assert_eq!(
            parts[1],
            InferencePart::Binary {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            }
        );
        assert_eq!(parts[2], InferencePart::Text("be brief".to_string()));
    }

    #[test]
    fn test_empty_request() {
        let request = InferenceRequest::new();
        assert!(request.is_empty());
        assert!(request.parts().is_empty());
    }
}
