//! Redraws the three finder patterns after the module pass so custom module
//! shapes never distort the locators scanners rely on.

use tracing::debug;

use crate::paint::{Outline, Paint, fill_outline};
use crate::raster::Canvas;
use crate::style::{ModuleShape, StyleConfig};
use crate::symbol::{FINDER_SIZE, Symbol};

/// Overwrite each 7x7 finder region with the nested dark/light/dark squares.
///
/// Must run after [`crate::raster::rasterize`]. Rounded styles soften the
/// square corners; circle and diamond never apply to the locators.
pub fn enhance_finder_patterns(canvas: &mut Canvas, symbol: &Symbol, style: &StyleConfig) {
    let geometry = canvas.geometry;
    let scale = geometry.scale;
    let paint = Paint::for_style(style, geometry.margin_px, geometry.symbol_extent());
    let light = style.color_light.to_rgba();
    let rounded = style.shape == ModuleShape::Rounded;

    let outer = FINDER_SIZE as u32 * scale;
    let (outer_shape, inner_shape) = if rounded {
        let s = scale as f32;
        (
            Outline::RoundedRect { radius: s },
            Outline::RoundedRect { radius: s / 2.0 },
        )
    } else {
        (Outline::Rect, Outline::Rect)
    };

    for (row, col) in symbol.finder_origins() {
        let (x, y) = geometry.module_origin(row, col);
        let img = &mut canvas.image;

        fill_outline(img, x, y, outer, outer, Outline::Rect, |_, _| light);
        fill_outline(img, x, y, outer, outer, outer_shape, |px, py| {
            paint.color_at(px, py)
        });
        fill_outline(
            img,
            x + scale,
            y + scale,
            outer - 2 * scale,
            outer - 2 * scale,
            inner_shape,
            |_, _| light,
        );
        fill_outline(
            img,
            x + 2 * scale,
            y + 2 * scale,
            outer - 4 * scale,
            outer - 4 * scale,
            inner_shape,
            |px, py| paint.color_at(px, py),
        );
    }

    debug!(rounded, "Redrew finder patterns");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::rasterize;
    use crate::style::{Color, EccLevel};
    use crate::symbol::build_symbol;
    use image::Rgba;

    fn expected_dark(r: usize, c: usize) -> bool {
        r == 0 || r == 6 || c == 0 || c == 6 || ((2..=4).contains(&r) && (2..=4).contains(&c))
    }

    #[test]
    fn finder_regions_hold_nested_pattern_for_every_shape() {
        let symbol = build_symbol("https://qrmenu.example.com/r/r1?table=9", EccLevel::Q).unwrap();
        let dark = Rgba([0x33, 0x33, 0x33, 255]);
        let light = Rgba([255, 255, 255, 255]);

        for shape in [
            ModuleShape::Square,
            ModuleShape::Rounded,
            ModuleShape::Circle,
            ModuleShape::Diamond,
        ] {
            let style = StyleConfig {
                shape,
                color_dark: Color::rgb(0x33, 0x33, 0x33),
                ..StyleConfig::default()
            };
            let mut canvas = rasterize(&symbol, &style);
            enhance_finder_patterns(&mut canvas, &symbol, &style);

            let half = style.scale / 2;
            for (or, oc) in symbol.finder_origins() {
                for r in 0..7 {
                    for c in 0..7 {
                        let (x, y) = canvas.geometry.module_origin(or + r, oc + c);
                        let px = *canvas.image.get_pixel(x + half, y + half);
                        let want = if expected_dark(r, c) { dark } else { light };
                        assert_eq!(px, want, "{shape:?} finder ({or},{oc}) module ({r},{c})");
                    }
                }
            }
        }
    }

    #[test]
    fn square_finder_fills_module_corners() {
        let symbol = build_symbol("corner", EccLevel::M).unwrap();
        let style = StyleConfig {
            shape: ModuleShape::Circle,
            ..StyleConfig::default()
        };
        let mut canvas = rasterize(&symbol, &style);
        enhance_finder_patterns(&mut canvas, &symbol, &style);
        let (x, y) = canvas.geometry.module_origin(0, 0);
        // Circle modules would leave this pixel light; the locator does not.
        assert_eq!(*canvas.image.get_pixel(x, y), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn rounded_finder_softens_outer_corner() {
        let symbol = build_symbol("corner", EccLevel::M).unwrap();
        let style = StyleConfig {
            shape: ModuleShape::Rounded,
            ..StyleConfig::default()
        };
        let mut canvas = rasterize(&symbol, &style);
        enhance_finder_patterns(&mut canvas, &symbol, &style);
        let (x, y) = canvas.geometry.module_origin(0, 0);
        assert_eq!(*canvas.image.get_pixel(x, y), Rgba([255, 255, 255, 255]));
    }
}
