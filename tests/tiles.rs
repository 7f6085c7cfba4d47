//! Tile hover behavior at full grid scale.

use std::time::Duration;

use spark_folio::tiles::{ResetCause, TileGrid, TileLayout, TileSize, TransitionKind, TILE_COUNT};
use spark_folio::types::ClipRect;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn hovering_one_cell_touches_only_that_cell() {
    let mut grid = TileGrid::new(TileSize::Md);
    assert_eq!(grid.len(), TILE_COUNT);

    grid.pointer_over(1500, ms(0));
    assert_eq!(grid.highlighted(), vec![1500]);
    assert_eq!(grid.pending_timers(), 1);
}

#[test]
fn highlight_resets_once_after_two_seconds() {
    let mut grid = TileGrid::new(TileSize::Md);
    grid.pointer_over(1500, ms(0));

    assert!(grid.advance(ms(1000)).is_empty());
    let fired = grid.advance(ms(2000));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].index, 1500);
    assert_eq!(fired[0].kind, TransitionKind::Reset(ResetCause::Expired));

    assert!(grid.advance(ms(6000)).is_empty());
    assert!(grid.highlighted().is_empty());
}

#[test]
fn leaving_early_cancels_the_timer() {
    let mut grid = TileGrid::new(TileSize::Md);
    grid.pointer_over(1500, ms(0));
    grid.pointer_leave(1500, ms(800));

    assert_eq!(grid.pending_timers(), 0);
    assert!(grid.advance(ms(2000)).is_empty());
    assert!(grid.highlighted().is_empty());
}

#[test]
fn sweeping_the_pointer_highlights_a_trail() {
    let mut grid = TileGrid::new(TileSize::Sm);
    for (i, index) in (100..110).enumerate() {
        grid.pointer_at(Some(index), ms(i as u64 * 50));
    }
    grid.pointer_at(None, ms(500));

    // Leaving each cell resets it immediately; nothing stays armed
    assert!(grid.highlighted().is_empty());
    assert_eq!(grid.pending_timers(), 0);
    assert!(grid.is_animating(ms(600)));
    assert!(!grid.is_animating(ms(3000)));
}

#[test]
fn layout_hit_test_matches_grid_indices() {
    let layout = TileLayout::compute(ClipRect::new(0, 0, 120, 40), TileSize::Md);
    let mut grid = TileGrid::new(TileSize::Md);

    let hit = layout.hit_test(13, 7).unwrap();
    grid.pointer_at(Some(hit), ms(0));
    assert_eq!(grid.hovered(), Some(hit));

    let rect = layout.tile_rect(hit).unwrap();
    assert!(rect.contains(13, 7));
}
