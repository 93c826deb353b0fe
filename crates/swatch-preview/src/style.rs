// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! How a color preview looks: its size, outline and border.

use serde::{Deserialize, Serialize};
use swatch_core::{Color, LoaderError};

/// Largest accepted preview edge, in pixels. A preview of this size is 64 MiB of RGBA.
pub const MAX_PREVIEW_SIZE: u32 = 4096;

/// The outline a preview is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewShape {
    /// A disc inscribed in the preview square.
    Circle,
    /// The full preview square.
    Square,
    /// A square whose corners are rounded with the given radius in pixels.
    RoundedSquare {
        /// Corner radius in pixels.
        radius: u32,
    },
}

impl PreviewShape {
    /// Signed distance from the point `(x, y)` to the outline of a shape filling a
    /// `size × size` square. Negative inside, positive outside, in pixels.
    pub fn distance(self, x: f32, y: f32, size: f32) -> f32 {
        let half = size / 2.0;
        let dx = (x - half).abs();
        let dy = (y - half).abs();

        match self {
            PreviewShape::Circle => (dx * dx + dy * dy).sqrt() - half,
            PreviewShape::Square => dx.max(dy) - half,
            PreviewShape::RoundedSquare { radius } => {
                let radius = (radius as f32).min(half);
                let qx = dx - (half - radius);
                let qy = dy - (half - radius);
                let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
                let inside = qx.max(qy).min(0.0);
                outside + inside - radius
            }
        }
    }
}

/// Everything that determines the pixels of a preview apart from its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewStyle {
    /// Width and height of the preview in pixels, at most [`MAX_PREVIEW_SIZE`].
    pub size: u32,
    /// Outline the preview is clipped to.
    pub shape: PreviewShape,
    /// Border thickness in pixels, drawn inside the outline. `0` disables it.
    pub border_width: u32,
    /// Border color. Its alpha blends the border over the fill.
    pub border_color: Color,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            size: 48,
            shape: PreviewShape::Circle,
            border_width: 1,
            border_color: Color::from_argb(0x3300_0000),
        }
    }
}

impl PreviewStyle {
    /// Rejects styles that cannot produce a meaningful preview.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.size == 0 {
            return Err(LoaderError::InvalidRequest(
                "preview size must be at least one pixel".into(),
            ));
        }
        if self.size > MAX_PREVIEW_SIZE {
            return Err(LoaderError::InvalidRequest(format!(
                "preview size of {}px exceeds the {MAX_PREVIEW_SIZE}px limit",
                self.size
            )));
        }
        if self.border_width.saturating_mul(2) > self.size {
            return Err(LoaderError::InvalidRequest(format!(
                "border of {}px does not fit a {}px preview",
                self.border_width, self.size
            )));
        }
        if let PreviewShape::RoundedSquare { radius } = self.shape {
            if radius.saturating_mul(2) > self.size {
                return Err(LoaderError::InvalidRequest(format!(
                    "corner radius of {radius}px does not fit a {}px preview",
                    self.size
                )));
            }
        }
        Ok(())
    }
}
