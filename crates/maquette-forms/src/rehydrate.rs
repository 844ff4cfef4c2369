//! Rehydration: edited form values → a new layout document.
//!
//! The inverse of derivation. Runs the identical traversal and naming
//! scheme over a deep copy of the original document, so every regenerated
//! field name targets exactly the object it was derived from, then
//! substitutes edited text into stories and uploaded URLs into image
//! sources.
//!
//! Fields absent from the edited map are left untouched, which makes
//! partial edits safe. Rehydration never adds or removes objects — it
//! only mutates `story` and `source.url` in place.

use indexmap::IndexMap;
use log::debug;

use maquette_core::document::{ImageObject, ImageSource, LayoutDocument, LayoutObject, TextObject};
use maquette_core::field::FieldValue;
use maquette_core::html::wrapper;
use maquette_core::semantic;

use crate::naming::FieldNamer;

/// Writes edited values back into a deep copy of `document`.
///
/// # Arguments
///
/// * `document` - The original layout document; not mutated
/// * `two_pager` - Must match the flag the spread was derived with, so
///   the regenerated field namespace lines up
/// * `edited` - Field name → edited value; text objects only consume
///   string or string-array values
/// * `image_urls` - Field name → newly uploaded image URL
pub fn rehydrate(
    document: &LayoutDocument,
    two_pager: bool,
    edited: &IndexMap<String, FieldValue>,
    image_urls: &IndexMap<String, String>,
) -> LayoutDocument {
    let mut copy = document.clone();

    if two_pager {
        let mut namer = FieldNamer::new();
        for page in &mut copy.pages {
            apply_to_page(page, &mut namer, edited, image_urls);
        }
    } else {
        // Each page is its own spread namespace.
        for page in &mut copy.pages {
            let mut namer = FieldNamer::new();
            apply_to_page(page, &mut namer, edited, image_urls);
        }
    }

    copy
}

fn apply_to_page(
    page: &mut maquette_core::document::LayoutPage,
    namer: &mut FieldNamer,
    edited: &IndexMap<String, FieldValue>,
    image_urls: &IndexMap<String, String>,
) {
    for objects in page.objects.values_mut() {
        for object in objects {
            apply_to_object(object, namer, edited, image_urls, true);
        }
    }
}

fn apply_to_object(
    object: &mut LayoutObject,
    namer: &mut FieldNamer,
    edited: &IndexMap<String, FieldValue>,
    image_urls: &IndexMap<String, String>,
    descend: bool,
) {
    match object {
        LayoutObject::Text(text) => apply_to_text(text, namer, edited),
        LayoutObject::Image(image) => apply_to_image(image, namer, image_urls),
        LayoutObject::Group(group) if descend => {
            for member in &mut group.objects {
                apply_to_object(member, namer, edited, image_urls, false);
            }
        }
        LayoutObject::Group(group) => {
            debug!(group_id = group.id; "Skipping nested group");
        }
    }
}

fn apply_to_text(
    text: &mut TextObject,
    namer: &mut FieldNamer,
    edited: &IndexMap<String, FieldValue>,
) {
    let role = text.text_type.trim();
    if role.is_empty() || semantic::is_page_number(role) {
        return;
    }

    // Naming must advance for every derivable object, edited or not, to
    // stay aligned with derivation.
    let name = namer.next(role);
    let replacement = match edited.get(&name) {
        Some(FieldValue::Text(value)) => value.clone(),
        Some(FieldValue::Items(items)) => items.join("\n"),
        Some(FieldValue::Null) | None => return,
    };

    text.story = match wrapper(&text.story) {
        Some(w) => format!("{}{}{}", w.open, replacement, w.close),
        None => replacement,
    };
}

fn apply_to_image(
    image: &mut ImageObject,
    namer: &mut FieldNamer,
    image_urls: &IndexMap<String, String>,
) {
    let role = image.image_type.trim();
    if role.is_empty() || semantic::is_page_number(role) {
        return;
    }

    let name = namer.next(role);
    if let Some(url) = image_urls.get(&name) {
        image
            .source
            .get_or_insert_with(ImageSource::default)
            .url = Some(url.clone());
    }
}
