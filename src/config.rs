//! Report configuration
//!
//! `ReportConfig::default()` is the standard field report layout. A host can override
//! any subset of it from JSON; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::text_layout::TextStyle;
use crate::types::{Color, PageGeometry, INCH};

pub const DISCLAIMER: &str = "THE VISUAL FIELD OBSERVATIONS BY THE STRUCTURAL ENGINEER SHALL NOT BE \
CONSTRUED AS A CONTINUOUS OR EXHAUSTIVE PROJECT REVIEW. THESE OBSERVATIONS ARE NOT A WAIVER OF THE \
GENERAL CONTRACTOR (OR ANY ENTITY FURNISHING MATERIALS OR PERFORMING WORK ON THE PROJECT) FROM \
RESPONSIBILITY AND/OR PERFORMANCE IN ACCORDANCE WITH THE REQUIREMENTS OF THE CONTRACT DOCUMENTS AND \
SPECIFICATIONS.";

pub const DEFAULT_FOOTER_ADDRESS: &str = "5177 RICHMOND AVENUE, SUITE 670, HOUSTON, TEXAS 77056";

/// Standard lead paragraph for grade beam visits. Hosts pass it as the payload's
/// observations template; the engine renders whatever template it is given.
pub const STANDARD_OBSERVATIONS_TEMPLATE: &str = "The purpose of this site visit was to observe and \
review the grade beams, and to determine whether the work of the contractor was in general conformance \
with the structural construction documents. See Figure 1.00 for the overview of the construction site. \
During the observation visit, the grade beams highlighted in figure 1.01 were observed. Typical grade \
beam reinforcement were provided in conformance with structural drawings. Grade beam excavation and \
reinforcing work for several grade beams were still ongoing at the time of visit. Overall construction \
matched the requirements of structural drawings in the observed area except as listed below:";

/// Fixed column widths, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnWidths {
    pub info_label: f64,
    pub info_value: f64,
    pub media_item: f64,
    pub media_photo: f64,
    pub media_comment: f64,
    /// Height of the photo bounding box
    pub photo_max_height: f64,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            info_label: 1.5 * INCH,
            info_value: 5.3 * INCH,
            media_item: 1.1 * INCH,
            media_photo: 2.5 * INCH,
            media_comment: 3.4 * INCH,
            photo_max_height: 2.1 * INCH,
        }
    }
}

impl ColumnWidths {
    pub fn info_total(&self) -> f64 {
        self.info_label + self.info_value
    }

    pub fn media_total(&self) -> f64 {
        self.media_item + self.media_photo + self.media_comment
    }
}

/// Inner cell padding, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellPadding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for CellPadding {
    fn default() -> Self {
        Self {
            left: 6.0,
            right: 6.0,
            top: 3.0,
            bottom: 3.0,
        }
    }
}

impl CellPadding {
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Footer and logo band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub disclaimer: String,
    pub default_address: String,
    pub disclaimer_size: f64,
    pub disclaimer_leading: f64,
    pub address_size: f64,
    pub address_leading: f64,
    pub page_number_size: f64,
    /// Baseline of the address line and the page number, above the bottom edge
    pub baseline: f64,
    /// Gap between the disclaimer's last line box and the address baseline
    pub disclaimer_gap: f64,
    pub color: Color,
    pub logo_width: f64,
    pub logo_padding: f64,
    pub logo_max_height: f64,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            disclaimer: DISCLAIMER.to_string(),
            default_address: DEFAULT_FOOTER_ADDRESS.to_string(),
            disclaimer_size: 7.0,
            disclaimer_leading: 9.0,
            address_size: 10.0,
            address_leading: 12.0,
            page_number_size: 9.0,
            baseline: 18.0,
            disclaimer_gap: 10.0,
            color: Color::brand_blue(),
            logo_width: 1.6 * INCH,
            logo_padding: 0.25 * INCH,
            logo_max_height: 0.625 * INCH,
        }
    }
}

/// Everything the engine treats as a compile-time constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub title: String,
    pub title_style: TextStyle,
    pub body_style: TextStyle,
    pub signature_style: TextStyle,
    pub sign_off_lines: Vec<String>,
    pub columns: ColumnWidths,
    pub padding: CellPadding,
    /// Gap below each info table row
    pub info_row_gap: f64,
    /// Gap between the info table and the sign-off
    pub section_gap: f64,
    pub grid_width: f64,
    pub grid_color: Color,
    pub header_background: Color,
    pub bullet_size: f64,
    /// Drawn in a photo cell whose image is missing or undecodable
    pub placeholder: String,
    pub footer: FooterConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            title: "F I E L D  R E P O R T".to_string(),
            title_style: TextStyle::new(crate::fonts::FontFace::Bold, 18.0, 22.0).with_spacing(0.0, 14.0),
            body_style: TextStyle::body(),
            signature_style: TextStyle::new(crate::fonts::FontFace::Bold, 11.0, 15.0).with_spacing(8.0, 0.0),
            sign_off_lines: vec!["Graduate Engineer".to_string(), "MSE".to_string()],
            columns: ColumnWidths::default(),
            padding: CellPadding::default(),
            info_row_gap: 6.0,
            section_gap: 8.0,
            grid_width: 0.3,
            grid_color: Color::grey(),
            header_background: Color::white_smoke(),
            bullet_size: 10.0,
            placeholder: "\u{2014}".to_string(),
            footer: FooterConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_json(json: &str) -> ReportResult<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Photo bounding box: photo column minus its horizontal padding, by the max height.
    pub fn photo_box(&self) -> (f64, f64) {
        (
            self.columns.media_photo - self.padding.horizontal(),
            self.columns.photo_max_height,
        )
    }

    /// Check geometry and every size the layout divides or wraps by.
    pub fn validate(&self) -> ReportResult<()> {
        self.geometry.validate()?;

        let content_width = self.geometry.content_width();
        let widths = [
            ("info label", self.columns.info_label),
            ("info value", self.columns.info_value),
            ("media item", self.columns.media_item),
            ("media photo", self.columns.media_photo),
            ("media comment", self.columns.media_comment),
        ];
        for (name, width) in widths {
            if !width.is_finite() || width <= self.padding.horizontal() {
                return Err(ReportError::InvalidGeometry(format!(
                    "{} column width {} leaves no room inside padding",
                    name, width
                )));
            }
        }
        for (name, total) in [
            ("info", self.columns.info_total()),
            ("media", self.columns.media_total()),
        ] {
            if total > content_width + 1e-6 {
                return Err(ReportError::InvalidGeometry(format!(
                    "{} table is {:.1}pt wide but content area is {:.1}pt",
                    name, total, content_width
                )));
            }
        }
        if !(self.columns.photo_max_height > 0.0) {
            return Err(ReportError::InvalidGeometry("photo height must be positive".into()));
        }

        for (name, style) in [
            ("title", &self.title_style),
            ("body", &self.body_style),
            ("signature", &self.signature_style),
        ] {
            if !(style.size > 0.0) || !(style.leading > 0.0) {
                return Err(ReportError::Config(format!(
                    "{} style needs positive size and leading",
                    name
                )));
            }
        }
        let footer = &self.footer;
        if !(footer.disclaimer_size > 0.0 && footer.address_size > 0.0 && footer.page_number_size > 0.0) {
            return Err(ReportError::Config("footer font sizes must be positive".into()));
        }
        if !(footer.logo_width > 0.0) || !(footer.logo_max_height > 0.0) {
            return Err(ReportError::Config("logo size must be positive".into()));
        }
        Ok(())
    }
}
