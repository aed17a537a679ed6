//! Composite document assembly.
//!
//! Every content page is embedded into a fresh output document as a Form
//! XObject and drawn, scaled and centered, onto a new page sized like the
//! style document's first page. Only that first style page matters; any
//! further style pages are ignored.
//!
//! PDF user space has its origin at the bottom-left corner, so the offsets
//! produced by the fit calculator can be used directly as the translation
//! part of the `cm` matrix.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::pdf::document::LoadedDocument;
use crate::pdf::fit::fit;

/// Build the composite document: one output page per content page, each
/// sized to the style document's first page.
///
/// Neither input document is mutated. The optional `progress` callback is
/// invoked with `(done, total)` after each page.
pub fn compose(
    content: &LoadedDocument,
    style: &LoadedDocument,
    pdf_version: &str,
    progress: Option<&dyn Fn(usize, usize)>,
) -> Result<Document> {
    let (target_width, target_height) = style.first_page_size()?;
    info!(
        "Composing {} pages onto {}x{} pt pages",
        content.page_count(),
        target_width,
        target_height
    );

    let mut output = Document::with_version(pdf_version);
    let pages_id = output.new_object_id();

    // One cache for the whole run: resources shared between source pages are
    // copied into the output document only once.
    let mut object_cache = HashMap::new();

    let page_ids = content.page_ids();
    let total = page_ids.len();
    let mut kids = Vec::with_capacity(total);

    for (index, page_id) in page_ids.into_iter().enumerate() {
        let new_page_id = compose_page(
            &mut output,
            content,
            page_id,
            index,
            (target_width, target_height),
            pages_id,
            &mut object_cache,
        )
        .map_err(|e| page_error(index, e))?;

        kids.push(Object::Reference(new_page_id));

        if let Some(callback) = progress {
            callback(index + 1, total);
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    let count = total as i64;
    let pages_dict = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    output.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    output.trailer.set("Root", Object::Reference(catalog_id));

    Ok(output)
}

/// Serialize the composite document to bytes.
pub fn serialize(mut doc: Document) -> Result<Vec<u8>> {
    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| Error::Save(e.to_string()))?;

    Ok(output)
}

/// Wrap a per-page failure, keeping already-classified page errors intact.
fn page_error(index: usize, source: Error) -> Error {
    match source {
        e @ Error::PageProcessing { .. } => e,
        e => Error::PageProcessing {
            page: index + 1,
            reason: e.to_string(),
        },
    }
}

/// Embed one content page and draw it onto a new target-sized page.
fn compose_page(
    output: &mut Document,
    content: &LoadedDocument,
    page_id: ObjectId,
    index: usize,
    target: (f32, f32),
    parent_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let media_box = content.page_media_box(page_id)?;
    let source_width = media_box[2] - media_box[0];
    let source_height = media_box[3] - media_box[1];

    let page_fit = fit(source_width, source_height, target.0, target.1)?;

    let wrap = |e: lopdf::Error| Error::PageProcessing {
        page: index + 1,
        reason: e.to_string(),
    };

    let xobject_id =
        embed_page_xobject(output, content.document(), page_id, media_box, cache).map_err(wrap)?;

    // The form keeps the source page's coordinate space, so a non-zero
    // MediaBox origin has to be folded into the translation.
    let tx = page_fit.offset_x - page_fit.scale * media_box[0];
    let ty = page_fit.offset_y - page_fit.scale * media_box[1];

    debug!(
        "page {}: {}x{} pt, scale {:.4}, origin ({:.2}, {:.2})",
        index + 1,
        source_width,
        source_height,
        page_fit.scale,
        tx,
        ty
    );

    let name = format!("P{index}");
    let ops = format!(
        "q\n{} 0 0 {} {} {} cm\n/{name} Do\nQ\n",
        page_fit.scale, page_fit.scale, tx, ty
    );
    let content_id = output.add_object(Stream::new(Dictionary::new(), ops.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set(name.as_bytes(), Object::Reference(xobject_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            0.into(),
            0.into(),
            Object::Real(target.0),
            Object::Real(target.1),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

/// Create a Form XObject from a source page, copying its content stream and
/// resources into the output document.
fn embed_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    media_box: [f32; 4],
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> lopdf::Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?.clone();

    let content_data = page_content(source, &page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(media_box.iter().map(|v| Object::Real(*v)).collect()),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = effective_resources(source, &page_dict) {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, &resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

/// Collect a page's content stream data, concatenating split streams.
///
/// Streams are stored decompressed because the resulting Form XObject
/// carries no Filter entry. A page without Contents is a valid blank page.
fn page_content(doc: &Document, page_dict: &Dictionary) -> lopdf::Result<Vec<u8>> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents {
        Object::Reference(id) => Ok(stream_data(doc.get_object(*id)?.as_stream()?)),
        Object::Stream(stream) => Ok(stream_data(stream)),
        Object::Array(arr) => {
            let mut result = Vec::new();
            for obj in arr {
                if let Object::Reference(id) = obj {
                    let stream = doc.get_object(*id)?.as_stream()?;
                    result.extend_from_slice(&stream_data(stream));
                    result.push(b'\n');
                }
            }
            Ok(result)
        }
        _ => Ok(Vec::new()),
    }
}

fn stream_data(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Resolve a page's resources, walking the parent chain for inherited ones.
fn effective_resources(doc: &Document, page_dict: &Dictionary) -> Option<Object> {
    if let Ok(resources) = page_dict.get(b"Resources") {
        return Some(resources.clone());
    }

    let mut parent = page_dict.get(b"Parent").ok().cloned();
    while let Some(Object::Reference(parent_id)) = parent {
        let dict = doc.get_dictionary(parent_id).ok()?;
        if let Ok(resources) = dict.get(b"Resources") {
            return Some(resources.clone());
        }
        parent = dict.get(b"Parent").ok().cloned();
    }

    None
}

/// Deep copy an object from source to output document, following references.
/// Uses a cache so shared objects are copied only once.
fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> lopdf::Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let referenced = source.get_object(*id)?.clone();
            // Reserve the target id before recursing so reference cycles
            // terminate instead of copying forever.
            let new_id = output.add_object(Object::Null);
            cache.insert(*id, new_id);

            let copied = copy_object_deep(output, source, &referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(copy_object_deep(output, source, item, cache)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Stream(Stream::new(new_dict, stream.content.clone())))
        }
        other => Ok(other.clone()),
    }
}

// =============================================================================
// Tests
// =============================================================================
