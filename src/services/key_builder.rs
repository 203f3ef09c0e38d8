use crate::domain::{
    errors::{AttachmentResult, ConfigurationError},
    models::Attachment,
    value_objects::{AttachmentId, AttachmentPath},
};

/// Derives identity, storage path and public URL of attachments
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    append_extension: bool,
    public_base_url: Option<String>,
}

impl KeyBuilder {
    /// Create a key builder. A public base URL must end with '/'.
    pub fn new(
        append_extension: bool,
        public_base_url: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(url) = &public_base_url {
            if !url.ends_with('/') {
                return Err(ConfigurationError::InvalidPublicUrl { url: url.clone() });
            }
        }

        Ok(Self {
            append_extension,
            public_base_url,
        })
    }

    /// Assign an id if none exists yet, then recompute path and public URL.
    ///
    /// Running this again on an initialized attachment changes nothing.
    pub fn init(&self, mut attachment: Attachment) -> AttachmentResult<Attachment> {
        let id = match attachment.id.take() {
            Some(id) => id,
            None => match attachment.extension.as_deref() {
                Some(extension) if self.append_extension => {
                    AttachmentId::generate_with_extension(extension)?
                }
                _ => AttachmentId::generate(),
            },
        };

        let path = AttachmentPath::join(&attachment.document_id, &id)?;

        attachment.public_url = self
            .public_base_url
            .as_ref()
            .map(|base| format!("{}{}", base, path));
        attachment.path = Some(path);
        attachment.id = Some(id);

        Ok(attachment)
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{errors::AttachmentError, value_objects::GENERATED_ID_LEN};

    #[test]
    fn test_init_assigns_id_and_path() {
        let keys = KeyBuilder::default();
        let attachment = keys.init(Attachment::new("42")).unwrap();

        let id = attachment.id.as_ref().unwrap();
        assert_eq!(id.as_str().len(), GENERATED_ID_LEN);
        assert_eq!(
            attachment.path.as_ref().unwrap().as_str(),
            format!("42/{}", id)
        );
        assert_eq!(attachment.public_url, None);
    }

    #[test]
    fn test_init_is_idempotent() {
        let keys = KeyBuilder::new(true, Some("https://cdn.example.com/files/".to_string()))
            .unwrap();
        let first = keys
            .init(Attachment::new("42").with_extension("txt"))
            .unwrap();
        let id = first.id.clone();
        let path = first.path.clone();
        let url = first.public_url.clone();

        let second = keys.init(keys.init(first).unwrap()).unwrap();
        assert_eq!(second.id, id);
        assert_eq!(second.path, path);
        assert_eq!(second.public_url, url);
    }

    #[test]
    fn test_existing_id_is_kept() {
        let keys = KeyBuilder::new(true, None).unwrap();
        let id = AttachmentId::new("file".to_string()).unwrap();
        let attachment = keys
            .init(Attachment::existing("42", id).with_extension("png"))
            .unwrap();

        assert_eq!(attachment.id.unwrap().as_str(), "file");
        assert_eq!(attachment.path.unwrap().as_str(), "42/file");
    }

    #[test]
    fn test_extension_only_when_enabled() {
        let with = KeyBuilder::new(true, None).unwrap();
        let without = KeyBuilder::new(false, None).unwrap();

        let suffixed = with
            .init(Attachment::new("42").with_extension("pdf"))
            .unwrap();
        assert!(suffixed.id.unwrap().as_str().ends_with(".pdf"));

        let plain = without
            .init(Attachment::new("42").with_extension("pdf"))
            .unwrap();
        assert_eq!(plain.id.unwrap().as_str().len(), GENERATED_ID_LEN);
    }

    #[test]
    fn test_public_url() {
        let keys = KeyBuilder::new(false, Some("https://cdn.example.com/".to_string())).unwrap();
        let id = AttachmentId::new("file".to_string()).unwrap();
        let attachment = keys.init(Attachment::existing("42", id)).unwrap();

        assert_eq!(
            attachment.public_url.as_deref(),
            Some("https://cdn.example.com/42/file")
        );
    }

    #[test]
    fn test_public_url_requires_trailing_slash() {
        assert_eq!(
            KeyBuilder::new(false, Some("https://cdn.example.com".to_string())).unwrap_err(),
            ConfigurationError::InvalidPublicUrl {
                url: "https://cdn.example.com".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_document_id() {
        let keys = KeyBuilder::default();
        assert!(matches!(
            keys.init(Attachment::new("")),
            Err(AttachmentError::Validation(_))
        ));
        assert!(matches!(
            keys.init(Attachment::new("42/")),
            Err(AttachmentError::Validation(_))
        ));
    }
}
