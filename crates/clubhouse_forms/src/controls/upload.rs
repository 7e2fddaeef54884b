//! File upload control

use clubhouse_core::FieldValue;

use super::FieldMeta;

/// Picks a file and keeps it in memory until the form is submitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    meta: FieldMeta,
    /// Show a preview of the picked file
    pub display: bool,
    /// Accepted MIME types; empty accepts anything
    pub accept: Vec<String>,
}

impl Upload {
    /// Create an upload control editing `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(field),
            display: false,
            accept: Vec::new(),
        }
    }

    /// Show a preview of the picked file
    pub fn display(mut self) -> Self {
        self.display = true;
        self
    }

    /// Restrict accepted MIME types
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.accept.push(content_type.into());
        self
    }

    /// Whether a file of `content_type` may be picked
    ///
    /// Patterns are exact MIME types or `type/*` wildcards, compared without
    /// regard to case.
    pub fn accepts(&self, content_type: &str) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        let content_type = content_type.trim().to_ascii_lowercase();
        self.accept.iter().any(|pattern| {
            let pattern = pattern.trim().to_ascii_lowercase();
            match pattern.strip_suffix("/*") {
                Some("*") => true,
                Some(major) => content_type
                    .split_once('/')
                    .is_some_and(|(ty, _)| ty == major),
                None => pattern == "*" || pattern == content_type,
            }
        })
    }

    /// Name of the picked file, for the preview line
    pub fn preview<'a>(&self, value: Option<&'a FieldValue>) -> Option<&'a str> {
        if !self.display {
            return None;
        }
        value
            .and_then(FieldValue::as_file)
            .map(|file| file.name.as_str())
    }
}

super::field_meta_builders!(Upload);

/// Create an upload control editing `field`
pub fn upload(field: impl Into<String>) -> Upload {
    Upload::new(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubhouse_core::FileBlob;

    #[test]
    fn test_preview_only_when_displayed() {
        let value = FieldValue::File(FileBlob::new("logo.png", "image/png", vec![0u8]));

        assert_eq!(upload("picture").preview(Some(&value)), None);
        assert_eq!(
            upload("picture").display().preview(Some(&value)),
            Some("logo.png")
        );
        assert_eq!(upload("picture").display().preview(None), None);
    }

    #[test]
    fn test_accepts_wildcards_and_exact_types() {
        let images = upload("picture").accept("image/*");
        assert!(images.accepts("image/png"));
        assert!(images.accepts("IMAGE/JPEG"));
        assert!(!images.accepts("application/pdf"));
        assert!(!images.accepts("imagefile"));

        let pdf = upload("charter").accept("application/pdf");
        assert!(pdf.accepts("application/pdf"));
        assert!(!pdf.accepts("application/zip"));

        assert!(upload("anything").accepts("application/octet-stream"));
        assert!(upload("anything").accept("*/*").accepts("text/plain"));
    }
}
