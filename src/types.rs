//! Geometry and color primitives shared by layout and emission

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Points per inch
pub const INCH: f64 = 72.0;

/// Rectangle with position and size (PDF space, origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn bottom(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Size with width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// US Letter, portrait
    pub fn letter() -> Self {
        Self::new(8.5 * INCH, 11.0 * INCH)
    }
}

/// Margins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self { top, bottom, left, right }
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn black() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0 }
    }

    pub fn grey() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }

    /// CSS `whitesmoke`
    pub fn white_smoke() -> Self {
        Self::rgb(0.96, 0.96, 0.96)
    }

    /// Brand blue, #005599
    pub fn brand_blue() -> Self {
        Self::rgb(0.0, 85.0 / 255.0, 153.0 / 255.0)
    }
}

/// Page size and margins, one instance per document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub size: Size,
    pub margins: Margins,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            size: Size::letter(),
            margins: Margins::new(1.0 * INCH, 1.15 * INCH, 0.75 * INCH, 0.75 * INCH),
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f64 {
        self.size.width - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> f64 {
        self.size.height - self.margins.top - self.margins.bottom
    }

    /// Y coordinate of the top edge of the flowing content area
    pub fn content_top(&self) -> f64 {
        self.size.height - self.margins.top
    }

    /// Reject geometry that leaves no room for content.
    pub fn validate(&self) -> ReportResult<()> {
        let values = [
            self.size.width,
            self.size.height,
            self.margins.top,
            self.margins.bottom,
            self.margins.left,
            self.margins.right,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ReportError::InvalidGeometry("non-finite page dimension".into()));
        }
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return Err(ReportError::InvalidGeometry(format!(
                "page size must be positive, got {}x{}",
                self.size.width, self.size.height
            )));
        }
        if values[2..].iter().any(|m| *m < 0.0) {
            return Err(ReportError::InvalidGeometry("margins must not be negative".into()));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(ReportError::InvalidGeometry(format!(
                "margins leave no content area ({:.1}x{:.1})",
                self.content_width(),
                self.content_height()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_letter() {
        let geometry = PageGeometry::default();
        assert_eq!(geometry.size, Size::new(612.0, 792.0));
        assert!((geometry.content_width() - 504.0).abs() < 1e-9);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_margins_consuming_page_are_rejected() {
        let mut geometry = PageGeometry::default();
        geometry.margins.top = 400.0;
        geometry.margins.bottom = 400.0;
        assert!(matches!(geometry.validate(), Err(ReportError::InvalidGeometry(_))));
    }
}
