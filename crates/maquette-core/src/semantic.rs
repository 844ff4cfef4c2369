//! Semantic content roles and their editorial defaults.
//!
//! Every text or image object in a layout carries a semantic role (its
//! `textType`/`imageType`): what the content *is* — a headline, body copy,
//! a feature image. The role drives field derivation: character budgets,
//! whether the field is mandatory, and image aspect ratios all come from
//! the tables in this module.
//!
//! The tables are editorial heuristics carried over from the product, not
//! derived from layout geometry. Roles missing from a table fall back to
//! the generic defaults.

/// Role whose content is auto-generated and never editable.
pub const PAGE_NUMBER_ROLE: &str = "page number";

/// Character budget for text roles not present in the table.
pub const GENERIC_TEXT_MAX_CHARS: usize = 200;

/// Editorial defaults for a text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRoleDefaults {
    /// Character budget used when the object carries no content to
    /// measure.
    pub max_chars: usize,
    /// Whether the derived field must be filled before submission.
    pub mandatory: bool,
    /// Single-character role auto-filled from another role's first
    /// character; the value is the source role.
    pub auto_from: Option<&'static str>,
}

/// Editorial defaults for an image role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRoleDefaults {
    /// Expected aspect ratio, e.g. `"16:9"`.
    pub ratio: Option<&'static str>,
    /// Whether the derived field must be filled before submission.
    pub mandatory: bool,
}

/// Normalizes a role for table lookup: trimmed and lowercased.
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}

/// Returns true when the role is the auto-generated page number.
pub fn is_page_number(role: &str) -> bool {
    normalize_role(role) == PAGE_NUMBER_ROLE
}

/// Looks up the editorial defaults for a text role.
///
/// Returns `None` for roles outside the table; callers apply the generic
/// fallback ([`GENERIC_TEXT_MAX_CHARS`], optional).
pub fn text_role_defaults(role: &str) -> Option<TextRoleDefaults> {
    let defaults = |max_chars, mandatory| TextRoleDefaults {
        max_chars,
        mandatory,
        auto_from: None,
    };
    match normalize_role(role).as_str() {
        "headline" => Some(defaults(80, true)),
        "masthead" => Some(defaults(60, true)),
        "section header" => Some(defaults(40, true)),
        "subheadline" => Some(defaults(120, false)),
        "standfirst" => Some(defaults(240, false)),
        "intro" => Some(defaults(400, false)),
        "body copy" => Some(defaults(1200, false)),
        "pull quote" => Some(defaults(160, false)),
        "caption" => Some(defaults(140, false)),
        "byline" => Some(defaults(50, false)),
        "kicker" => Some(defaults(30, false)),
        "quote attribution" => Some(defaults(40, false)),
        "drop cap" => Some(TextRoleDefaults {
            max_chars: 1,
            mandatory: false,
            auto_from: Some("body copy"),
        }),
        _ => None,
    }
}

/// Looks up the editorial defaults for an image role.
///
/// Returns `None` for roles outside the table; callers fall back to no
/// ratio, optional.
pub fn image_role_defaults(role: &str) -> Option<ImageRoleDefaults> {
    let defaults = |ratio, mandatory| ImageRoleDefaults { ratio, mandatory };
    match normalize_role(role).as_str() {
        "feature image" => Some(defaults(Some("16:9"), true)),
        "background image" => Some(defaults(Some("16:9"), false)),
        "portrait image" => Some(defaults(Some("3:4"), false)),
        "cutout" => Some(defaults(Some("3:4"), false)),
        "thumbnail" => Some(defaults(Some("1:1"), false)),
        "logo" => Some(defaults(Some("1:1"), false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_text_roles() {
        for role in ["headline", "masthead", "section header"] {
            assert!(text_role_defaults(role).unwrap().mandatory, "{role}");
        }
        for role in ["body copy", "caption", "byline"] {
            assert!(!text_role_defaults(role).unwrap().mandatory, "{role}");
        }
    }

    #[test]
    fn test_character_budgets() {
        assert_eq!(text_role_defaults("headline").unwrap().max_chars, 80);
        assert_eq!(text_role_defaults("body copy").unwrap().max_chars, 1200);
        assert_eq!(text_role_defaults("masthead").unwrap().max_chars, 60);
    }

    #[test]
    fn test_lookup_normalizes_case_and_whitespace() {
        assert_eq!(
            text_role_defaults("  Body Copy "),
            text_role_defaults("body copy")
        );
        assert!(is_page_number(" Page Number "));
    }

    #[test]
    fn test_unknown_roles_fall_back() {
        assert_eq!(text_role_defaults("marginalia"), None);
        assert_eq!(image_role_defaults("hero collage"), None);
    }

    #[test]
    fn test_feature_image_is_mandatory_16_9() {
        let feature = image_role_defaults("feature image").unwrap();
        assert!(feature.mandatory);
        assert_eq!(feature.ratio, Some("16:9"));

        let thumb = image_role_defaults("thumbnail").unwrap();
        assert!(!thumb.mandatory);
        assert_eq!(thumb.ratio, Some("1:1"));
    }

    #[test]
    fn test_drop_cap_is_auto_derived() {
        let drop_cap = text_role_defaults("drop cap").unwrap();
        assert_eq!(drop_cap.max_chars, 1);
        assert_eq!(drop_cap.auto_from, Some("body copy"));
    }
}
