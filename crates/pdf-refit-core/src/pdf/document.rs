use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::source::SourceRole;

/// A parsed PDF document tied to the input role it was loaded for.
///
/// All failures raised through this type carry the role's error code, so the
/// caller always knows whether the content or the style file is at fault.
pub struct LoadedDocument {
    doc: Document,
    role: SourceRole,
    page_count: usize,
}

impl LoadedDocument {
    /// Parse a PDF from bytes.
    ///
    /// Fails with the role's parse error for malformed buffers and with the
    /// role's empty error for documents without pages.
    pub fn from_bytes(bytes: &[u8], role: SourceRole) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::parse(role, e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(Error::empty(role));
        }

        Ok(Self {
            doc,
            role,
            page_count,
        })
    }

    /// Read and parse a PDF from a file path.
    pub fn from_file(path: impl AsRef<Path>, role: SourceRole) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            Error::read(role, format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_bytes(&bytes, role)
    }

    /// Number of pages, always >= 1.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub const fn role(&self) -> SourceRole {
        self.role
    }

    /// Page object ids in original document order.
    #[must_use]
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.doc.get_pages().values().copied().collect()
    }

    /// Media box of a page as `[x0, y0, x1, y1]` in points.
    ///
    /// Walks the parent chain for inherited boxes; falls back to US Letter
    /// when no MediaBox exists anywhere.
    pub fn page_media_box(&self, page_id: ObjectId) -> Result<[f32; 4]> {
        let page = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::parse(self.role, format!("missing page object: {e}")))?;
        Ok(media_box(&self.doc, page))
    }

    /// Width and height of a page in points.
    pub fn page_size(&self, page_id: ObjectId) -> Result<(f32, f32)> {
        let mb = self.page_media_box(page_id)?;
        Ok((mb[2] - mb[0], mb[3] - mb[1]))
    }

    /// Width and height of the first page in points.
    pub fn first_page_size(&self) -> Result<(f32, f32)> {
        let first = self
            .page_ids()
            .into_iter()
            .next()
            .ok_or_else(|| Error::empty(self.role))?;
        self.page_size(first)
    }

    /// Access to the underlying lopdf document for composition.
    pub(crate) const fn document(&self) -> &Document {
        &self.doc
    }
}

impl std::fmt::Debug for LoadedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedDocument")
            .field("role", &self.role)
            .field("page_count", &self.page_count)
            .finish()
    }
}

/// Resolve a page's media box, checking parents for inherited values.
fn media_box(doc: &Document, dict: &Dictionary) -> [f32; 4] {
    if let Ok(Object::Array(arr)) = dict.get(b"MediaBox")
        && arr.len() == 4
    {
        let values: Vec<f32> = arr
            .iter()
            .filter_map(|o| match o {
                #[allow(clippy::cast_precision_loss)]
                Object::Integer(i) => Some(*i as f32),
                Object::Real(r) => Some(*r),
                _ => None,
            })
            .collect();

        if values.len() == 4 {
            return [values[0], values[1], values[2], values[3]];
        }
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent")
        && let Ok(Object::Dictionary(parent)) = doc.get_object(*parent_id)
    {
        return media_box(doc, parent);
    }

    // Default to US Letter size
    [0.0, 0.0, 612.0, 792.0]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pdf::compose::tests::fixture_pdf;

    #[test]
    fn test_load_rejects_garbage() {
        let err = LoadedDocument::from_bytes(&[0, 1, 2, 3], SourceRole::Content).unwrap_err();
        assert!(matches!(err, Error::ContentParse(_)));

        let err = LoadedDocument::from_bytes(&[0, 1, 2, 3], SourceRole::Style).unwrap_err();
        assert!(matches!(err, Error::StyleParse(_)));
    }

    #[test]
    fn test_load_rejects_empty_buffer() {
        let err = LoadedDocument::from_bytes(&[], SourceRole::Content).unwrap_err();
        assert!(matches!(err, Error::ContentParse(_)));
    }

    #[test]
    fn test_page_count_and_order() {
        let bytes = fixture_pdf(&[(200.0, 100.0), (300.0, 150.0)]);
        let doc = LoadedDocument::from_bytes(&bytes, SourceRole::Content).unwrap();
        assert_eq!(doc.page_count(), 2);

        let ids = doc.page_ids();
        assert_eq!(doc.page_size(ids[0]).unwrap(), (200.0, 100.0));
        assert_eq!(doc.page_size(ids[1]).unwrap(), (300.0, 150.0));
    }

    #[test]
    fn test_zero_page_document_rejected() {
        let bytes = crate::pdf::compose::tests::empty_fixture_pdf();

        let err = LoadedDocument::from_bytes(&bytes, SourceRole::Content).unwrap_err();
        assert!(matches!(err, Error::ContentEmpty));

        let err = LoadedDocument::from_bytes(&bytes, SourceRole::Style).unwrap_err();
        assert!(matches!(err, Error::StyleEmpty));
    }

    #[test]
    fn test_first_page_size() {
        let bytes = fixture_pdf(&[(595.0, 842.0), (100.0, 100.0)]);
        let doc = LoadedDocument::from_bytes(&bytes, SourceRole::Style).unwrap();
        assert_eq!(doc.first_page_size().unwrap(), (595.0, 842.0));
    }
}
