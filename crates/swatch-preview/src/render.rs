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

//! Renders color previews into RGBA bitmaps.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use swatch_core::{Color, ComputeError, LoaderError, ValueLoader};

use crate::style::PreviewStyle;

const CHECKER_LIGHT: [f32; 3] = [1.0, 1.0, 1.0];
const CHECKER_DARK: [f32; 3] = [0.8, 0.8, 0.8];

/// A [`ValueLoader`] turning a [`Color`] into a preview bitmap.
///
/// The style is fixed per loader because cached previews are keyed by color only.
/// Use one loader per style.
#[derive(Debug, Clone)]
pub struct ColorPreviewLoader {
    style: PreviewStyle,
}

impl ColorPreviewLoader {
    /// Creates a loader for a validated style.
    pub fn new(style: PreviewStyle) -> Result<Self, LoaderError> {
        style.validate()?;
        Ok(Self { style })
    }

    /// The style every preview of this loader is drawn with.
    pub fn style(&self) -> &PreviewStyle {
        &self.style
    }

    /// Draws `color` clipped to the style's shape, with its border.
    ///
    /// Pixels outside the shape are fully transparent; edge pixels are anti-aliased by
    /// coverage. Translucent colors are drawn over a checkerboard so their alpha shows.
    pub fn render(&self, color: Color) -> RgbaImage {
        let PreviewStyle {
            size,
            shape,
            border_width,
            border_color,
        } = self.style;

        let extent = size as f32;
        let cell = (size / 8).max(1);
        let fill = to_unit(color);
        let border = to_unit(border_color);

        let mut image = RgbaImage::new(size, size);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let distance = shape.distance(x as f32 + 0.5, y as f32 + 0.5, extent);
            let shape_coverage = coverage(distance);
            if shape_coverage <= 0.0 {
                continue;
            }

            let light = ((x / cell) + (y / cell)) % 2 == 0;
            let backdrop = if light { CHECKER_LIGHT } else { CHECKER_DARK };
            let mut rgb = blend(fill, backdrop);

            if border_width > 0 {
                // 0 on the inner side of the ring, 1 inside the ring.
                let ring = 1.0 - coverage(distance + border_width as f32);
                rgb = mix(rgb, [border[0], border[1], border[2]], border[3] * ring);
            }

            *pixel = Rgba([
                to_byte(rgb[0]),
                to_byte(rgb[1]),
                to_byte(rgb[2]),
                to_byte(shape_coverage),
            ]);
        }
        image
    }
}

impl ValueLoader for ColorPreviewLoader {
    type Key = Color;
    type Params = ();
    type Value = RgbaImage;

    fn compute(&self, key: &Color, _params: ()) -> Result<RgbaImage, ComputeError> {
        log::trace!("Rendering {}px preview for {key}.", self.style.size);
        Ok(self.render(*key))
    }
}

/// Writes a preview to disk as PNG.
pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write preview '{}'", path.display()))
}

/// Fraction of a pixel covered by a shape whose edge is `distance` away from its center.
fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}

fn to_unit(color: Color) -> [f32; 4] {
    color.to_rgba().map(|c| f32::from(c) / 255.0)
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Composites a straight-alpha color over an opaque backdrop.
fn blend(src: [f32; 4], backdrop: [f32; 3]) -> [f32; 3] {
    mix(backdrop, [src[0], src[1], src[2]], src[3])
}

fn mix(from: [f32; 3], to: [f32; 3], amount: f32) -> [f32; 3] {
    [
        from[0] + (to[0] - from[0]) * amount,
        from[1] + (to[1] - from[1]) * amount,
        from[2] + (to[2] - from[2]) * amount,
    ]
}
