/// Data most recently received for a resource.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Entity {
    content: Vec<u8>,
    content_type: String,
}

impl Entity {
    pub fn new(content: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}
