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

//! Color previews on top of the keyed loader.
//!
//! [`ColorPreviewLoader`] renders a color into a small bitmap clipped to a shape with a
//! border; [`PreviewBoard`] owns the slots those bitmaps are shown in. Together with
//! [`AsyncKeyedLoader`] they form the usual setup: the board's owner requests a color
//! for a slot, and the bitmap shows up in that slot unless the slot asked for another
//! color or was removed in the meantime.

#![warn(missing_docs)]

pub mod board;
pub mod render;
pub mod style;

pub use board::{PreviewBoard, PreviewSlot, SlotId};
pub use render::{save_png, ColorPreviewLoader};
pub use style::{PreviewShape, PreviewStyle, MAX_PREVIEW_SIZE};

use swatch_core::LoaderError;
use swatch_loader::{AsyncKeyedLoader, LoaderConfig};

/// A keyed loader producing color previews for board slots.
pub type PreviewLoader = AsyncKeyedLoader<ColorPreviewLoader, SlotId>;

/// Starts a preview loader drawing every preview with `style`.
pub fn preview_loader(
    style: PreviewStyle,
    config: LoaderConfig,
) -> Result<PreviewLoader, LoaderError> {
    AsyncKeyedLoader::new(ColorPreviewLoader::new(style)?, config)
}
