//! Page tree manipulation.
//!
//! This module handles the low-level page operations the merge needs:
//! - Locating the root `Pages` node
//! - Appending page references to a page tree
//! - Copying inherited page attributes onto the page itself
//! - Reading page geometry

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bound on parent links followed, so a cyclic tree cannot hang us.
const MAX_TREE_DEPTH: usize = 64;

/// Page tree inconsistencies.
#[derive(Debug, thiserror::Error)]
pub enum PageTreeError {
    /// The trailer has no usable catalog.
    #[error("Failed to get catalog: {0}")]
    MissingCatalog(lopdf::Error),

    /// The catalog has no `Pages` reference.
    #[error("Failed to get pages reference: {0}")]
    MissingPagesRoot(lopdf::Error),

    /// An object expected to be a dictionary is something else.
    #[error("Object {id:?} is not a dictionary")]
    NotADictionary {
        /// The offending object.
        id: ObjectId,
    },

    /// The `Kids` entry of the root is missing or not an array.
    #[error("Pages dictionary missing Kids array")]
    KidsNotArray,
}

/// Locate the root `Pages` node of `doc`.
pub fn pages_root(doc: &Document) -> Result<ObjectId, PageTreeError> {
    let catalog = doc.catalog().map_err(PageTreeError::MissingCatalog)?;
    catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(PageTreeError::MissingPagesRoot)
}

/// Append `page_ids` to the root page tree of `doc`, reparenting each page.
///
/// The pages must already live in `doc.objects`.
pub fn append_pages(doc: &mut Document, page_ids: &[ObjectId]) -> Result<(), PageTreeError> {
    let pages_id = pages_root(doc)?;

    for &page_id in page_ids {
        page_dict_mut(doc, page_id)?.set("Parent", Object::Reference(pages_id));
    }

    let dict = page_dict_mut(doc, pages_id)?;
    match dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => {
            kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));
        }
        _ => return Err(PageTreeError::KidsNotArray),
    }

    let current_count = dict.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + page_ids.len() as i64));

    Ok(())
}

/// Copy inheritable attributes from the ancestors of `page_id` onto the page.
///
/// After a page is moved under a different parent its inherited
/// `Resources`, `MediaBox`, `CropBox` and `Rotate` would otherwise be lost.
pub fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<(), PageTreeError> {
    let inherited = {
        let page = page_dict(doc, page_id)?;
        let missing: Vec<&[u8]> = INHERITABLE_KEYS
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();

        let mut found = Vec::new();
        for key in missing {
            if let Some(value) = find_inherited(doc, page, key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        found
    };

    if inherited.is_empty() {
        return Ok(());
    }

    let page = page_dict_mut(doc, page_id)?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

/// Width and height of a page in points, honouring inherited `MediaBox`.
pub fn page_size(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let page = page_dict(doc, page_id).ok()?;
    let media_box = match page.get(b"MediaBox") {
        Ok(value) => value,
        Err(_) => find_inherited(doc, page, b"MediaBox")?,
    };

    let media_box = match media_box {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };

    let values = media_box.as_array().ok()?;
    if values.len() < 4 {
        return None;
    }

    let coords: Vec<f32> = values
        .iter()
        .take(4)
        .map(|v| v.as_float().ok())
        .collect::<Option<_>>()?;

    Some(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
}

/// Walk up `Parent` links looking for `key`.
fn find_inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut current = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        let parent = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value);
        }
        current = parent;
    }
    None
}

fn page_dict(doc: &Document, id: ObjectId) -> Result<&Dictionary, PageTreeError> {
    doc.get_dictionary(id)
        .map_err(|_| PageTreeError::NotADictionary { id })
}

fn page_dict_mut(doc: &mut Document, id: ObjectId) -> Result<&mut Dictionary, PageTreeError> {
    doc.get_dictionary_mut(id)
        .map_err(|_| PageTreeError::NotADictionary { id })
}
