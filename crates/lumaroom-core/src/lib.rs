//! Lumaroom Core - Image processing library
//!
//! This crate provides the core image processing functionality for Lumaroom,
//! including the non-destructive edit/export pipeline, RAW preview extraction,
//! histogram computation, and image normalization.

pub mod decode;
pub mod encode;
pub mod histogram;
pub mod ingest;
pub mod luminance;
pub mod raw;
pub mod render;
pub mod session;

pub use render::{RenderError, Renderer};
pub use session::{EditDebouncer, EditSession, RenderGeneration};

/// Rectangular crop region in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Region width in pixels
    pub width: u32,
    /// Region height in pixels
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Placement of a text watermark on the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    Center,
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
    /// Repeat the text across the whole image, rotated -45 degrees.
    Tiled,
}

/// Text watermark settings baked into the output at render time.
///
/// The watermark is never a separate re-editable layer; compositing happens
/// as the last pixel stage before encoding.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Watermark {
    /// Whether the watermark is drawn at all
    pub enabled: bool,
    /// Text to draw; an empty string disables drawing
    pub text: String,
    /// Opacity (0 to 100)
    pub opacity: f32,
    /// Text size relative to image width (10 to 100)
    pub size: f32,
    /// Placement on the image
    pub position: WatermarkPosition,
    /// Text color as a `#rrggbb` hex string
    pub color: String,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            enabled: false,
            text: String::new(),
            opacity: 50.0,
            size: 30.0,
            position: WatermarkPosition::default(),
            color: "#ffffff".to_string(),
        }
    }
}

impl Watermark {
    /// True when this watermark should actually be composited.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.text.is_empty()
    }
}

/// Edit state driving the render pipeline.
///
/// Serializable, diffable, and side-effect-free to construct. Rendering is a
/// pure function of (source image, EditDescriptor, ExportOptions); the source
/// image is never mutated.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditDescriptor {
    /// Exposure adjustment (-100 to 100)
    pub brightness: f32,
    /// Contrast (-100 to 100)
    pub contrast: f32,
    /// Saturation (-100 to 100)
    pub saturation: f32,
    /// Vibrance (-100 to 100); self-limits on already-saturated pixels
    pub vibrance: f32,
    /// Shadow lift (-100 to 100)
    pub shadows: f32,
    /// Highlight recovery (-100 to 100)
    pub highlights: f32,
    /// Midtone local contrast (0 to 100)
    pub clarity: f32,
    /// Edge sharpening (0 to 100)
    pub sharpness: f32,
    /// Blur-based noise reduction (0 to 100)
    pub noise_reduction: f32,
    /// Absolute crop region; takes precedence over `aspect_ratio`
    pub crop: Option<CropRect>,
    /// Target width/height ratio for a derived centered crop
    pub aspect_ratio: Option<f32>,
    /// Optional text watermark
    pub watermark: Option<Watermark>,
}

impl EditDescriptor {
    /// Create a new EditDescriptor with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// True when any of the per-pixel tonal/color sliders is non-zero.
    pub fn has_tonal_adjustments(&self) -> bool {
        self.brightness != 0.0
            || self.contrast != 0.0
            || self.saturation != 0.0
            || self.vibrance != 0.0
            || self.shadows != 0.0
            || self.highlights != 0.0
    }

    /// True when the detail pass (blur / sharpen / clarity) has work to do.
    pub fn has_detail_adjustments(&self) -> bool {
        self.clarity > 0.0 || self.sharpness > 0.0 || self.noise_reduction > 0.0
    }
}

/// Output encoding format for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

/// Options controlling the final export encoding.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output format
    pub format: ExportFormat,
    /// JPEG quality (1 to 100); ignored for PNG
    pub quality: u8,
    /// Scale multiplier applied to the cropped region
    pub scale: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: 90,
            scale: 1.0,
        }
    }
}

/// Histogram data for an image
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Red channel histogram (256 bins)
    pub red: [u32; 256],
    /// Green channel histogram (256 bins)
    pub green: [u32; 256],
    /// Blue channel histogram (256 bins)
    pub blue: [u32; 256],
    /// Luminance histogram (256 bins)
    pub luminance: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luminance: [0; 256],
        }
    }
}

impl Histogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the maximum value across all channels for normalization
    pub fn max_value(&self) -> u32 {
        let max_r = *self.red.iter().max().unwrap_or(&0);
        let max_g = *self.green.iter().max().unwrap_or(&0);
        let max_b = *self.blue.iter().max().unwrap_or(&0);
        max_r.max(max_g).max(max_b)
    }

    /// Check for highlight clipping (values at 255)
    pub fn has_highlight_clipping(&self) -> bool {
        self.red[255] > 0 || self.green[255] > 0 || self.blue[255] > 0
    }

    /// Check for shadow clipping (values at 0)
    pub fn has_shadow_clipping(&self) -> bool {
        self.red[0] > 0 || self.green[0] > 0 || self.blue[0] > 0
    }
}
