// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Pixel dimensions of a decoded frame (source image space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Create new image size, rejecting empty frames
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::BadArgs(format!(
                "Image dimensions cannot be zero: {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel dimensions of the viewport the frame is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Canvas used when the viewport has not been laid out yet
    pub const DEFAULT: CanvasSize = CanvasSize {
        width: 900,
        height: 520,
    };

    /// Create new canvas size, rejecting empty viewports
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::BadArgs(format!(
                "Canvas dimensions cannot be zero: {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for CanvasSize {
    type Err = DomainError;

    /// Parse `WIDTHxHEIGHT`, e.g. `900x520`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| DomainError::BadArgs(format!("Expected WIDTHxHEIGHT, got '{}'", s)))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid canvas width '{}'", w)))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid canvas height '{}'", h)))?;
        Self::new(width, height)
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Crop region in source-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    /// Check that the box is non-empty and lies fully inside the image
    pub fn validate(&self, image: ImageSize) -> Result<(), DomainError> {
        if self.width == 0 || self.height == 0 {
            return Err(DomainError::BadArgs(format!(
                "Crop box must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.right() > image.width as u64 || self.bottom() > image.height as u64 {
            return Err(DomainError::BadArgs(format!(
                "Crop box {} exceeds frame {}",
                self, image
            )));
        }
        Ok(())
    }

    /// Whether the box fits inside the image
    pub fn fits(&self, image: ImageSize) -> bool {
        self.validate(image).is_ok()
    }

    /// Video filter argument understood by ffmpeg
    pub fn as_filter(&self) -> String {
        format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }
}

impl fmt::Display for CropBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for CropBox {
    type Err = DomainError;

    /// Parse `x,y,width,height`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(DomainError::BadArgs(format!(
                "Expected crop box as x,y,width,height, got '{}'",
                s
            )));
        }
        let mut values = [0u32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs(format!("Invalid crop box value '{}'", part)))?;
        }
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

/// Rectangle in canvas coordinates; corners may lie outside the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl CanvasRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Same rectangle with corners ordered so that (x0, y0) is top-left
    pub fn normalized(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

impl FromStr for CanvasRect {
    type Err = DomainError;

    /// Parse `x0,y0,x1,y1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(DomainError::BadArgs(format!(
                "Expected drag as x0,y0,x1,y1, got '{}'",
                s
            )));
        }
        let mut values = [0i32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<i32>()
                .map_err(|_| DomainError::BadArgs(format!("Invalid drag coordinate '{}'", part)))?;
        }
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

/// Positive width/height ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(ratio: f64) -> Result<Self, DomainError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Aspect ratio must be a positive number, got {}",
                ratio
            )));
        }
        Ok(Self(ratio))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl FromStr for AspectRatio {
    type Err = DomainError;

    /// Parse `W:H` (e.g. `16:9`) or a decimal ratio (e.g. `2.39`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((w, h)) = trimmed.split_once(':') {
            let w = w
                .trim()
                .parse::<f64>()
                .map_err(|_| DomainError::BadArgs(format!("Invalid ratio '{}'", s)))?;
            let h = h
                .trim()
                .parse::<f64>()
                .map_err(|_| DomainError::BadArgs(format!("Invalid ratio '{}'", s)))?;
            if h == 0.0 {
                return Err(DomainError::BadArgs(format!("Invalid ratio '{}'", s)));
            }
            return Self::new(w / h);
        }
        let ratio = trimmed
            .parse::<f64>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid ratio '{}'", s)))?;
        Self::new(ratio)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Named aspect-ratio presets offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectPreset {
    #[default]
    Freeform,
    CinemaScope,
    YouTube,
    InstagramReel,
    TikTok,
    Square,
}

impl AspectPreset {
    /// All presets in menu order
    pub const ALL: [AspectPreset; 6] = [
        AspectPreset::Freeform,
        AspectPreset::CinemaScope,
        AspectPreset::YouTube,
        AspectPreset::InstagramReel,
        AspectPreset::TikTok,
        AspectPreset::Square,
    ];

    /// Menu label
    pub fn name(&self) -> &'static str {
        match self {
            AspectPreset::Freeform => "Freeform",
            AspectPreset::CinemaScope => "CinemaScope 2.39:1",
            AspectPreset::YouTube => "YouTube 16:9",
            AspectPreset::InstagramReel => "Instagram Reel 9:16",
            AspectPreset::TikTok => "TikTok 9:16",
            AspectPreset::Square => "Square 1:1",
        }
    }

    /// Short identifier accepted on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            AspectPreset::Freeform => "freeform",
            AspectPreset::CinemaScope => "cinemascope",
            AspectPreset::YouTube => "youtube",
            AspectPreset::InstagramReel => "instagram-reel",
            AspectPreset::TikTok => "tiktok",
            AspectPreset::Square => "square",
        }
    }

    /// Pinned ratio, `None` for freeform
    pub fn ratio(&self) -> Option<AspectRatio> {
        let value = match self {
            AspectPreset::Freeform => return None,
            AspectPreset::CinemaScope => 2.39,
            AspectPreset::YouTube => 16.0 / 9.0,
            AspectPreset::InstagramReel | AspectPreset::TikTok => 9.0 / 16.0,
            AspectPreset::Square => 1.0,
        };
        Some(AspectRatio(value))
    }
}

impl FromStr for AspectPreset {
    type Err = DomainError;

    /// Accepts either the slug or the menu label, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AspectPreset::ALL
            .iter()
            .copied()
            .find(|p| p.slug() == wanted || p.name().to_lowercase() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = AspectPreset::ALL.iter().map(|p| p.slug()).collect();
                DomainError::BadArgs(format!(
                    "Unknown aspect preset '{}'. Valid presets: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Basic metadata of a loaded video, read-only after probing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub path: PathBuf,
    /// Duration in seconds
    pub duration: f64,
    /// Primary video stream width
    pub width: u32,
    /// Primary video stream height
    pub height: u32,
    pub format_name: Option<String>,
    pub codec: Option<String>,
}

impl VideoMetadata {
    /// Frame size of the primary stream
    pub fn frame_size(&self) -> Result<ImageSize, DomainError> {
        ImageSize::new(self.width, self.height)
    }

    /// File name shown to the user
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    /// Human-readable summary of the loaded file
    pub fn describe(&self) -> String {
        format!(
            "Loaded: {}\n{}x{} • {:.2}s",
            self.file_name(),
            self.width,
            self.height,
            self.duration
        )
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in seconds, MM:SS.ms or HH:MM:SS.ms
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 || !seconds.is_finite() {
                return Err(DomainError::BadArgs(
                    "Time must be a non-negative number".to_string(),
                ));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = parse_component(minutes, "minutes")?;
                let seconds = parse_seconds(seconds)?;
                Ok(Self::from_seconds(minutes * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = parse_component(hours, "hours")?;
                let minutes = parse_component(minutes, "minutes")?;
                if minutes >= 60.0 {
                    return Err(DomainError::BadArgs(
                        "Minutes must be less than 60".to_string(),
                    ));
                }
                let seconds = parse_seconds(seconds)?;
                Ok(Self::from_seconds(hours * 3600.0 + minutes * 60.0 + seconds))
            }
            _ => Err(DomainError::BadArgs(format!(
                "Invalid time '{}'. Supported formats: seconds (e.g., 12.5), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)",
                time_str
            ))),
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::utils::time::format_timecode(self.seconds))
    }
}

fn parse_component(part: &str, what: &str) -> Result<f64, DomainError> {
    part.trim()
        .parse::<u32>()
        .map(f64::from)
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format", what)))
}

fn parse_seconds(part: &str) -> Result<f64, DomainError> {
    let seconds = part
        .trim()
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs(
            "Seconds must be between 0 and 60".to_string(),
        ));
    }
    Ok(seconds)
}
