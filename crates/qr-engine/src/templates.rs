//! Fixed catalog of named style presets.

use serde::Serialize;

use crate::style::{Color, ModuleShape, StyleConfig};

/// A named style preset. `id` is a stable external key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "styleConfig")]
    pub style: StyleConfig,
}

/// Older clients still send this id for `restaurant-theme`.
const LEGACY_RESTAURANT_ID: &str = "restaurant";

/// Every template, in display order.
pub fn list_templates() -> Vec<Template> {
    let base = StyleConfig::default();
    vec![
        Template {
            id: "classic",
            name: "Classic",
            description: "Standard black and white QR code",
            style: base.clone(),
        },
        Template {
            id: "rounded",
            name: "Rounded",
            description: "QR code with rounded dots",
            style: StyleConfig {
                shape: ModuleShape::Rounded,
                corner_radius: Some(2),
                ..base.clone()
            },
        },
        Template {
            id: "dots",
            name: "Dots",
            description: "QR code with circular dots",
            style: StyleConfig {
                shape: ModuleShape::Circle,
                ..base.clone()
            },
        },
        Template {
            id: "blue-gradient",
            name: "Blue Gradient",
            description: "QR code with blue gradient",
            style: StyleConfig {
                gradient_colors: Some([Color::rgb(0x00, 0x88, 0xCC), Color::rgb(0x00, 0x55, 0x77)]),
                ..base.clone()
            },
        },
        Template {
            id: "restaurant-theme",
            name: "Restaurant Theme",
            description: "QR code with restaurant-themed colors",
            style: StyleConfig {
                shape: ModuleShape::Rounded,
                corner_radius: Some(2),
                color_dark: Color::rgb(0x8B, 0x45, 0x13),
                color_light: Color::rgb(0xFF, 0xF8, 0xDC),
                ..base.clone()
            },
        },
        Template {
            id: "modern",
            name: "Modern",
            description: "Modern QR code with diamond dots",
            style: StyleConfig {
                shape: ModuleShape::Diamond,
                color_dark: Color::rgb(0x33, 0x33, 0x33),
                ..base
            },
        },
    ]
}

/// Look up a template by id.
pub fn find_template(id: &str) -> Option<Template> {
    let id = if id == LEGACY_RESTAURANT_ID {
        "restaurant-theme"
    } else {
        id
    };
    list_templates().into_iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn classic_is_plain_square() {
        let templates = list_templates();
        let classic = templates.iter().find(|t| t.id == "classic").unwrap();
        assert_eq!(classic.style.shape, ModuleShape::Square);
        assert_eq!(classic.style.gradient_colors, None);
    }

    #[test]
    fn catalog_is_stable() {
        assert_eq!(list_templates(), list_templates());
    }

    #[test]
    fn ids_are_unique() {
        let templates = list_templates();
        let ids: HashSet<_> = templates.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), templates.len());
        assert_eq!(templates.len(), 6);
    }

    #[test]
    fn every_template_is_valid() {
        for t in list_templates() {
            t.style.validate().unwrap();
        }
    }

    #[test]
    fn legacy_id_resolves() {
        assert_eq!(find_template("restaurant").unwrap().id, "restaurant-theme");
        assert!(find_template("missing").is_none());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(find_template("blue-gradient").unwrap()).unwrap();
        assert_eq!(json["id"], "blue-gradient");
        assert_eq!(json["styleConfig"]["shape"], "square");
        assert_eq!(json["styleConfig"]["gradientColors"][0], "#0088CC");
        assert_eq!(json["styleConfig"]["errorCorrectionLevel"], "M");
    }
}
