//! Attachment URL list edited alongside a sample request form

/// Ordered attachment URLs for a request draft
///
/// Uploads append; removal only edits this list. Nothing is persisted until
/// the parent form is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentList {
    urls: Vec<String>,
}

impl AttachmentList {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Append freshly uploaded URLs in the order returned
    pub fn append(&mut self, uploaded: impl IntoIterator<Item = String>) {
        self.urls.extend(uploaded);
    }

    /// Remove the entry at `index`
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.urls.len()).then(|| self.urls.remove(index))
    }

    /// Remove the first entry equal to `url`
    pub fn remove_url(&mut self, url: &str) -> bool {
        match self.urls.iter().position(|u| u == url) {
            Some(index) => {
                self.urls.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}

impl From<Vec<String>> for AttachmentList {
    fn from(urls: Vec<String>) -> Self {
        Self::new(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_remove() {
        let mut list = AttachmentList::new(vec!["https://f/a.pdf".to_string()]);
        list.append(vec!["https://f/b.png".to_string(), "https://f/c.png".to_string()]);
        assert_eq!(list.len(), 3);

        assert_eq!(list.remove(1).as_deref(), Some("https://f/b.png"));
        assert_eq!(list.remove(5), None);
        assert!(list.remove_url("https://f/a.pdf"));
        assert!(!list.remove_url("https://f/a.pdf"));
        assert_eq!(list.into_urls(), vec!["https://f/c.png"]);
    }
}
