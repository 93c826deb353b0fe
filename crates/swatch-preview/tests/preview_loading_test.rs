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

//! End-to-end: requesting previews for board slots through the loader.

use std::time::Duration;

use anyhow::Result;
use image::Rgba;
use swatch_core::Color;
use swatch_loader::{LoaderConfig, RequestOutcome};
use swatch_preview::{preview_loader, PreviewBoard, PreviewShape, PreviewStyle};

const WAIT: Duration = Duration::from_secs(5);

fn style() -> PreviewStyle {
    PreviewStyle {
        size: 24,
        shape: PreviewShape::Square,
        border_width: 0,
        border_color: Color::BLACK,
    }
}

fn config() -> LoaderConfig {
    LoaderConfig {
        worker_count: 2,
        cache_capacity: 8,
        thread_name_prefix: "preview-test".into(),
    }
}

#[test]
fn red_preview_reaches_its_slot_and_is_cached() -> Result<()> {
    let loader = preview_loader(style(), config())?;
    let mut board = PreviewBoard::new();
    let v1 = board.insert("V1");

    assert_eq!(
        loader.request(Color::RED, v1, (), &mut board)?,
        RequestOutcome::Scheduled
    );
    loader.dispatch_until_idle(&mut board, WAIT);

    let image = board.image(v1).expect("preview delivered");
    assert_eq!(image.dimensions(), (24, 24));
    assert_eq!(*image.get_pixel(12, 12), Rgba([255, 0, 0, 255]));
    assert_eq!(board.get(v1).unwrap().color, Some(Color::RED));
    assert!(loader.cached(&Color::RED).is_some());

    assert_eq!(
        loader.request(Color::RED, v1, (), &mut board)?,
        RequestOutcome::Delivered
    );
    assert_eq!(board.get(v1).unwrap().updates, 2);
    assert_eq!(loader.stats().computations, 1);
    Ok(())
}

#[test]
fn switching_color_before_completion_shows_only_the_latest() -> Result<()> {
    let loader = preview_loader(style(), config())?;
    let mut board = PreviewBoard::new();
    let v1 = board.insert("V1");

    loader.request(Color::RED, v1, (), &mut board)?;
    loader.request(Color::GREEN, v1, (), &mut board)?;
    loader.dispatch_until_idle(&mut board, WAIT);

    let slot = board.get(v1).unwrap();
    assert_eq!(slot.color, Some(Color::GREEN));
    assert_eq!(slot.updates, 1);
    assert_eq!(*slot.image.as_ref().unwrap().get_pixel(0, 0), Rgba([0, 255, 0, 255]));
    Ok(())
}

#[test]
fn shared_colors_share_one_bitmap() -> Result<()> {
    let loader = preview_loader(style(), config())?;
    let mut board = PreviewBoard::new();
    let slots: Vec<_> = (0..4).map(|i| board.insert(format!("slot-{i}"))).collect();

    loader.request(Color::BLUE, slots[0], (), &mut board)?;
    loader.dispatch_until_idle(&mut board, WAIT);
    for slot in &slots[1..] {
        assert_eq!(
            loader.request(Color::BLUE, *slot, (), &mut board)?,
            RequestOutcome::Delivered
        );
    }

    let first = board.image(slots[0]).unwrap();
    for slot in &slots[1..] {
        assert!(swatch_core::Handle::ptr_eq(first, board.image(*slot).unwrap()));
    }
    Ok(())
}

#[test]
fn removed_slot_never_receives_its_preview() -> Result<()> {
    let loader = preview_loader(style(), config())?;
    let mut board = PreviewBoard::new();
    let doomed = board.insert("doomed");

    loader.request(Color::WHITE, doomed, (), &mut board)?;
    board.remove(doomed);
    loader.release(&doomed);
    let reused = board.insert("reused");
    assert_eq!(reused.index, doomed.index);

    loader.dispatch_until_idle(&mut board, WAIT);
    assert!(board.image(reused).is_none());
    assert_eq!(loader.stats().discarded_stale, 1);
    Ok(())
}

#[test]
fn invalid_style_is_rejected_up_front() {
    let style = PreviewStyle {
        size: 4,
        border_width: 3,
        ..style()
    };
    assert!(preview_loader(style, config()).is_err());
}
