//! Abstract QR matrix built from a payload.

use qrcode::QrCode;
use qrcode::types::QrError as EncodeError;
use tracing::debug;

use crate::error::{QrError, Result};
use crate::style::EccLevel;

/// Side length of a finder pattern, in modules.
pub const FINDER_SIZE: usize = 7;

/// A square grid of dark/light modules. Never cached; rebuild per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    width: usize,
    modules: Vec<bool>,
    ecc: EccLevel,
}

impl Symbol {
    /// Modules per side (`N`). Always odd and at least 21.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ecc(&self) -> EccLevel {
        self.ecc
    }

    /// Whether the module at `(row, col)` is dark. Out-of-range is light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.width && col < self.width && self.modules[row * self.width + col]
    }

    /// Iterate `(row, col)` of every dark module in row-major order.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    /// Top-left module coordinates `(row, col)` of the three finder patterns.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width - FINDER_SIZE;
        [(0, 0), (0, far), (far, 0)]
    }
}

/// Encode `payload` at the requested error-correction level.
///
/// The version (and therefore `N`) is chosen by the encoder from payload
/// length and level alone.
pub fn build_symbol(payload: &str, ecc: EccLevel) -> Result<Symbol> {
    if payload.is_empty() {
        return Err(QrError::EmptyPayload);
    }

    let code = QrCode::with_error_correction_level(payload.as_bytes(), ecc.into()).map_err(
        |e| match e {
            EncodeError::DataTooLong => QrError::PayloadTooLarge {
                len: payload.len(),
                ecc,
            },
            other => QrError::Encode(other.to_string()),
        },
    )?;

    let width = code.width();
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();

    debug!(width, %ecc, len = payload.len(), "Built QR symbol");

    Ok(Symbol {
        width,
        modules,
        ecc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_square_and_odd() {
        for ecc in [EccLevel::L, EccLevel::M, EccLevel::Q, EccLevel::H] {
            let symbol = build_symbol("https://qrmenu.example.com/m/Ab3dE6gH", ecc).unwrap();
            assert!(symbol.width() >= 21);
            assert_eq!(symbol.width() % 2, 1);
            assert_eq!(symbol.modules.len(), symbol.width() * symbol.width());
        }
    }

    #[test]
    fn build_is_deterministic() {
        let a = build_symbol("table=7", EccLevel::Q).unwrap();
        let b = build_symbol("table=7", EccLevel::Q).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn higher_ecc_never_shrinks_symbol() {
        let payload = "https://qrmenu.example.com/r/demo-restaurant?table=12";
        let low = build_symbol(payload, EccLevel::L).unwrap();
        let high = build_symbol(payload, EccLevel::H).unwrap();
        assert!(high.width() >= low.width());
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            build_symbol("", EccLevel::M),
            Err(QrError::EmptyPayload)
        ));
    }

    #[test]
    fn oversized_payload_reports_capacity_error() {
        let payload = "x".repeat(3000);
        let err = build_symbol(&payload, EccLevel::H).unwrap_err();
        assert!(matches!(
            err,
            QrError::PayloadTooLarge {
                len: 3000,
                ecc: EccLevel::H
            }
        ));
    }

    #[test]
    fn finder_origins_match_corners() {
        let symbol = build_symbol("hello", EccLevel::M).unwrap();
        let far = symbol.width() - 7;
        assert_eq!(symbol.finder_origins(), [(0, 0), (0, far), (far, 0)]);
        // Finder pattern corners are always dark.
        for (r, c) in symbol.finder_origins() {
            assert!(symbol.is_dark(r, c));
            assert!(symbol.is_dark(r + 3, c + 3));
            assert!(!symbol.is_dark(r + 1, c + 1));
        }
    }

    #[test]
    fn dark_modules_agree_with_is_dark() {
        let symbol = build_symbol("menu", EccLevel::L).unwrap();
        for (r, c) in symbol.dark_modules() {
            assert!(symbol.is_dark(r, c));
        }
        let count = symbol.dark_modules().count();
        assert!(count > 0 && count < symbol.width() * symbol.width());
    }
}
