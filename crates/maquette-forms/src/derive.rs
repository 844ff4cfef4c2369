//! Field schema derivation: layout document → editable form model.
//!
//! Walks a layout document in a fixed order — pages, then layers in map
//! key order, then objects in array order, recursing one level into
//! groups — and classifies every leaf by its semantic role. Each page
//! becomes a [`Spread`] with a flat, uniquely named field map plus the
//! default values extracted from existing content; a two-pager flattens
//! both pages into a single spread sharing one field namespace.
//!
//! Derivation is a pure function of the document: re-deriving from an
//! unmodified document reproduces identical field names and ordering.
//! Derived schemas are a view over the document and are never persisted.

use indexmap::IndexMap;
use log::debug;

use maquette_core::document::{ImageObject, LayoutDocument, LayoutObject, TextObject};
use maquette_core::field::{FieldConfig, FieldValue, Spread};
use maquette_core::html::strip_tags;
use maquette_core::semantic::{
    self, GENERIC_TEXT_MAX_CHARS, image_role_defaults, text_role_defaults,
};

use crate::naming::{FieldNamer, slug};

/// A derived spread together with the default values pulled from the
/// document's existing content.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSpread {
    pub spread: Spread,
    pub defaults: IndexMap<String, FieldValue>,
}

/// Derives the editable spreads of a layout document.
///
/// For a two-pager, all pages share one field namespace and yield one
/// spread; otherwise each page yields its own. Spreads with no derived
/// fields are dropped.
///
/// # Arguments
///
/// * `document` - The layout document to derive from
/// * `two_pager` - Whether the layout is a two-page spread
/// * `template_id` - Identifier recorded on each resulting [`Spread`]
pub fn derive_spreads(
    document: &LayoutDocument,
    two_pager: bool,
    template_id: &str,
) -> Vec<DerivedSpread> {
    if two_pager {
        let mut collector = SpreadCollector::new();
        for page in &document.pages {
            for object in page.iter_objects() {
                collector.visit(object);
            }
        }
        return collector.into_spreads(template_id);
    }

    document
        .pages
        .iter()
        .flat_map(|page| {
            let mut collector = SpreadCollector::new();
            for object in page.iter_objects() {
                collector.visit(object);
            }
            collector.into_spreads(template_id)
        })
        .collect()
}

/// Accumulates fields and defaults for one spread namespace.
struct SpreadCollector {
    namer: FieldNamer,
    fields: IndexMap<String, FieldConfig>,
    defaults: IndexMap<String, FieldValue>,
}

impl SpreadCollector {
    fn new() -> Self {
        Self {
            namer: FieldNamer::new(),
            fields: IndexMap::new(),
            defaults: IndexMap::new(),
        }
    }

    fn visit(&mut self, object: &LayoutObject) {
        match object {
            LayoutObject::Text(text) => self.add_text(text),
            LayoutObject::Image(image) => self.add_image(image),
            LayoutObject::Group(group) => {
                for member in &group.objects {
                    match member {
                        LayoutObject::Text(text) => self.add_text(text),
                        LayoutObject::Image(image) => self.add_image(image),
                        // Groups nest one level only; deeper groups are
                        // opaque.
                        LayoutObject::Group(nested) => {
                            debug!(group_id = nested.id; "Skipping nested group");
                        }
                    }
                }
            }
        }
    }

    fn add_text(&mut self, text: &TextObject) {
        let role = text.text_type.trim();
        if role.is_empty() || semantic::is_page_number(role) {
            return;
        }

        let name = self.namer.next(role);
        let defaults = text_role_defaults(role).unwrap_or_else(|| {
            debug!(role; "Unknown text role, using generic defaults");
            maquette_core::semantic::TextRoleDefaults {
                max_chars: GENERIC_TEXT_MAX_CHARS,
                mandatory: false,
                auto_from: None,
            }
        });

        let content = strip_tags(&text.story);
        let config = match defaults.auto_from {
            Some(source) => FieldConfig::auto_char(slug(source)),
            None => {
                let max_chars = if content.trim().is_empty() {
                    defaults.max_chars
                } else {
                    content.chars().count()
                };
                FieldConfig::text(max_chars, defaults.mandatory)
            }
        };

        self.fields.insert(name.clone(), config);
        self.defaults.insert(name, FieldValue::Text(content));
    }

    fn add_image(&mut self, image: &ImageObject) {
        let role = image.image_type.trim();
        if role.is_empty() || semantic::is_page_number(role) {
            return;
        }

        let name = self.namer.next(role);
        let defaults = image_role_defaults(role).unwrap_or_else(|| {
            debug!(role; "Unknown image role, using generic defaults");
            maquette_core::semantic::ImageRoleDefaults {
                ratio: None,
                mandatory: false,
            }
        });

        let config = FieldConfig::image(defaults.ratio.map(str::to_owned), defaults.mandatory);
        self.fields.insert(name.clone(), config);
        // Images are never pre-filled; they always require an explicit
        // upload.
        self.defaults.insert(name, FieldValue::Null);
    }

    fn into_spreads(self, template_id: &str) -> Vec<DerivedSpread> {
        if self.fields.is_empty() {
            return Vec::new();
        }
        vec![DerivedSpread {
            spread: Spread {
                template_id: template_id.to_owned(),
                fields: self.fields,
                preview_image: None,
            },
            defaults: self.defaults,
        }]
    }
}

#[cfg(test)]
mod tests {
    use maquette_core::document::{GroupObject, ImageSource, LayoutPage, PageSize};
    use maquette_core::field::FieldKind;
    use maquette_core::geometry::{Rect, Transform};

    use super::*;

    fn text(id: i64, role: &str, story: &str) -> LayoutObject {
        LayoutObject::Text(TextObject {
            id,
            geometry: Rect::new(0.0, 0.0, 100.0, 40.0),
            transform: Transform::IDENTITY,
            text_type: role.to_owned(),
            story: story.to_owned(),
        })
    }

    fn image(id: i64, role: &str) -> LayoutObject {
        LayoutObject::Image(ImageObject {
            id,
            geometry: Rect::new(0.0, 0.0, 160.0, 90.0),
            transform: Transform::IDENTITY,
            image_type: role.to_owned(),
            source: Some(ImageSource::default()),
        })
    }

    fn page(layers: Vec<(&str, Vec<LayoutObject>)>) -> LayoutPage {
        LayoutPage {
            objects: layers
                .into_iter()
                .map(|(name, objects)| (name.to_owned(), objects))
                .collect(),
        }
    }

    fn document(pages: Vec<LayoutPage>) -> LayoutDocument {
        LayoutDocument {
            page_size: PageSize {
                width: 595.0,
                height: 842.0,
            },
            pages,
        }
    }

    #[test]
    fn test_basic_derivation() {
        let doc = document(vec![page(vec![(
            "foreground",
            vec![
                text(1, "headline", "<h1>Spring issue</h1>"),
                text(2, "body copy", ""),
                image(3, "feature image"),
            ],
        )])]);

        let spreads = derive_spreads(&doc, false, "layout-7");
        assert_eq!(spreads.len(), 1);

        let derived = &spreads[0];
        assert_eq!(derived.spread.template_id, "layout-7");
        let names: Vec<&String> = derived.spread.fields.keys().collect();
        assert_eq!(names, ["headline", "body_copy", "feature_image"]);

        let headline = &derived.spread.fields["headline"];
        assert!(headline.mandatory);
        // Budget comes from the actual content length, not the role
        // default, because the object carries content.
        assert_eq!(headline.max_chars, Some("Spring issue".chars().count()));
        assert_eq!(
            derived.defaults["headline"],
            FieldValue::Text("Spring issue".into())
        );

        let body = &derived.spread.fields["body_copy"];
        assert_eq!(body.max_chars, Some(1200));
        assert!(!body.mandatory);

        let feature = &derived.spread.fields["feature_image"];
        assert_eq!(feature.kind, FieldKind::Image);
        assert_eq!(feature.ratio.as_deref(), Some("16:9"));
        assert!(feature.mandatory);
        assert_eq!(derived.defaults["feature_image"], FieldValue::Null);
    }

    #[test]
    fn test_repeated_roles_get_suffixes() {
        let doc = document(vec![page(vec![(
            "foreground",
            vec![
                text(1, "caption", "first"),
                text(2, "caption", "second"),
                text(3, "caption", "third"),
            ],
        )])]);

        let spreads = derive_spreads(&doc, false, "t");
        let names: Vec<&String> = spreads[0].spread.fields.keys().collect();
        assert_eq!(names, ["caption", "caption_2", "caption_3"]);
        assert_eq!(
            spreads[0].defaults["caption_2"],
            FieldValue::Text("second".into())
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let doc = document(vec![page(vec![
            ("background", vec![image(1, "background image")]),
            (
                "foreground",
                vec![
                    text(2, "headline", "A"),
                    text(3, "caption", "B"),
                    text(4, "caption", "C"),
                ],
            ),
        ])]);

        let first = derive_spreads(&doc, false, "t");
        let second = derive_spreads(&doc, false, "t");
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_number_and_unnamed_objects_skipped() {
        let doc = document(vec![page(vec![(
            "foreground",
            vec![
                text(1, "page number", "12"),
                text(2, "", "decoration"),
                text(3, "  ", "decoration"),
                image(4, "page number"),
                text(5, "headline", "Kept"),
            ],
        )])]);

        let spreads = derive_spreads(&doc, false, "t");
        let names: Vec<&String> = spreads[0].spread.fields.keys().collect();
        assert_eq!(names, ["headline"]);
    }

    #[test]
    fn test_group_members_recursed_one_level() {
        let nested = LayoutObject::Group(GroupObject {
            id: 20,
            geometry: Rect::default(),
            transform: Transform::IDENTITY,
            objects: vec![text(21, "caption", "too deep")],
        });
        let group = LayoutObject::Group(GroupObject {
            id: 10,
            geometry: Rect::default(),
            transform: Transform::IDENTITY,
            objects: vec![text(11, "byline", "By A. Writer"), nested],
        });
        let doc = document(vec![page(vec![("foreground", vec![group])])]);

        let spreads = derive_spreads(&doc, false, "t");
        let names: Vec<&String> = spreads[0].spread.fields.keys().collect();
        // The group's direct members derive fields; the nested group's
        // members do not.
        assert_eq!(names, ["byline"]);
    }

    #[test]
    fn test_two_pager_shares_one_namespace() {
        let doc = document(vec![
            page(vec![("foreground", vec![text(1, "headline", "Left")])]),
            page(vec![("foreground", vec![text(2, "headline", "Right")])]),
        ]);

        let spreads = derive_spreads(&doc, true, "t");
        assert_eq!(spreads.len(), 1);
        let names: Vec<&String> = spreads[0].spread.fields.keys().collect();
        assert_eq!(names, ["headline", "headline_2"]);
    }

    #[test]
    fn test_separate_pages_get_separate_namespaces() {
        let doc = document(vec![
            page(vec![("foreground", vec![text(1, "headline", "Left")])]),
            page(vec![("foreground", vec![text(2, "headline", "Right")])]),
        ]);

        let spreads = derive_spreads(&doc, false, "t");
        assert_eq!(spreads.len(), 2);
        assert!(spreads[0].spread.fields.contains_key("headline"));
        assert!(spreads[1].spread.fields.contains_key("headline"));
    }

    #[test]
    fn test_empty_spread_dropped() {
        let doc = document(vec![
            page(vec![("foreground", vec![text(1, "headline", "Kept")])]),
            page(vec![("background", vec![text(2, "page number", "3")])]),
        ]);

        let spreads = derive_spreads(&doc, false, "t");
        assert_eq!(spreads.len(), 1);
    }

    #[test]
    fn test_unknown_role_generic_fallback() {
        let doc = document(vec![page(vec![(
            "foreground",
            vec![text(1, "marginalia", ""), image(2, "hero collage")],
        )])]);

        let spreads = derive_spreads(&doc, false, "t");
        let marginalia = &spreads[0].spread.fields["marginalia"];
        assert_eq!(marginalia.max_chars, Some(GENERIC_TEXT_MAX_CHARS));
        assert!(!marginalia.mandatory);

        let collage = &spreads[0].spread.fields["hero_collage"];
        assert_eq!(collage.ratio, None);
        assert!(!collage.mandatory);
    }

    #[test]
    fn test_drop_cap_derives_auto_char() {
        let doc = document(vec![page(vec![(
            "foreground",
            vec![text(1, "drop cap", "L"), text(2, "body copy", "Long ago…")],
        )])]);

        let spreads = derive_spreads(&doc, false, "t");
        let drop_cap = &spreads[0].spread.fields["drop_cap"];
        assert_eq!(drop_cap.kind, FieldKind::Char);
        assert_eq!(drop_cap.max_chars, Some(1));
        assert_eq!(drop_cap.auto.as_deref(), Some("body_copy"));
    }
}
