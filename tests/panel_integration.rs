/*
 *  tests/panel_integration.rs
 *
 *  Integration tests for the panel state machine and animation driver
 *
 *  Matryx - every dot counts
 *  (c) 2020-26 Stuart Hunter
 */

use std::time::Duration;

use matryx::{DisplayMode, MatrixPanel, ScrollStyle};

const OVERFLOWING: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"; // 30 chars -> 179 cells

/// Panel on a 1000x200 surface: cell size 10, grid 1000x90.
async fn panel_1000x200() -> MatrixPanel {
    let mut panel = MatrixPanel::new().expect("font table is sane");
    panel.notify_resized(1000.0, 200.0).await;
    panel
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test]
async fn requires_scrolling_examples() {
    let mut panel = panel_1000x200().await;

    // empty text never scrolls
    assert!(!panel.requires_scrolling().await);

    // "HI": 5 + 1 + 5 = 11 cells -> 110px on a 1000px grid
    panel.set_text("HI").await;
    assert!(!panel.requires_scrolling().await);

    // 30 chars: 30*6 - 1 = 179 cells -> 1790px > 1000px
    panel.set_text(OVERFLOWING).await;
    assert!(panel.requires_scrolling().await);
}

#[tokio::test]
async fn text_is_uppercased() {
    let mut panel = panel_1000x200().await;
    panel.set_text("hello, matrix!").await;
    assert_eq!(panel.snapshot().await.text, "HELLO, MATRIX!");
}

#[tokio::test]
async fn enabling_scroll_starts_driver_immediately() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    assert!(!panel.is_animating().await);

    panel.set_scroll_enabled(true).await;
    assert!(panel.is_animating().await);

    panel.set_scroll_enabled(false).await;
    assert!(!panel.is_animating().await);
    assert_eq!(panel.snapshot().await.scroll_phase.offset, 0.0);
}

#[tokio::test]
async fn fitting_text_never_animates() {
    let mut panel = panel_1000x200().await;
    panel.set_text("HI").await;
    panel.set_scroll_enabled(true).await;
    assert!(!panel.is_animating().await);

    // empty text neither
    panel.set_text("").await;
    assert!(!panel.is_animating().await);
}

#[tokio::test(start_paused = true)]
async fn wrap_advances_one_cell_per_tick() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;

    // speed level 2 -> 50ms period; three ticks advance 3 cells of 10px
    advance(170).await;
    let offset = panel.snapshot().await.scroll_phase.offset;
    assert!((offset - 30.0).abs() < 1e-3, "offset was {offset}");
}

#[tokio::test(start_paused = true)]
async fn wrap_offset_stays_in_bounds() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;

    // wrap bound: text 1790 + grid 1000 = 2790px, reached after 279 ticks
    let wrap_width = 1790.0 + 1000.0;
    let mut previous = 0.0;
    // sample between tick deadlines, not on them
    advance(20).await;
    for _ in 0..300 {
        advance(50).await;
        let offset = panel.snapshot().await.scroll_phase.offset;
        assert!(offset >= 0.0 && offset < wrap_width, "offset was {offset}");
        let expected = (previous + 10.0) % wrap_width;
        assert!((offset - expected).abs() < 1e-3);
        previous = offset;
    }
}

#[tokio::test(start_paused = true)]
async fn bounce_clamps_and_flips_at_bounds() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_style(ScrollStyle::Bounce).await;
    panel.set_scroll_enabled(true).await;

    // range = 1790 - 1000 = 790px, reached after 79 ticks of 10px
    advance(79 * 50 + 20).await;
    let snapshot = panel.snapshot().await;
    assert_eq!(snapshot.scroll_phase.offset, 790.0);
    assert_eq!(snapshot.scroll_phase.direction, -1);

    // and back down to zero, flipping forward again
    advance(79 * 50 + 20).await;
    let snapshot = panel.snapshot().await;
    assert_eq!(snapshot.scroll_phase.offset, 0.0);
    assert_eq!(snapshot.scroll_phase.direction, 1);
}

#[tokio::test(start_paused = true)]
async fn entering_clock_mode_disables_scrolling() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;
    advance(120).await;
    assert!(panel.snapshot().await.scroll_phase.offset > 0.0);

    panel.set_mode(DisplayMode::Clock).await;
    let snapshot = panel.snapshot().await;
    assert_eq!(snapshot.mode, DisplayMode::Clock);
    assert!(!snapshot.scroll_enabled);
    assert_eq!(snapshot.scroll_phase.offset, 0.0);

    // the time is displayed immediately, before the first tick
    let text: Vec<char> = snapshot.text.chars().collect();
    assert_eq!(text.len(), 5);
    assert!(text[0].is_ascii_digit() && text[1].is_ascii_digit());
    assert!(text[2] == ':' || text[2] == ' ');
    assert!(text[3].is_ascii_digit() && text[4].is_ascii_digit());

    // clock keeps ticking at its fixed period
    assert!(panel.is_animating().await);
    advance(2100).await;
    assert!(panel.is_animating().await);
}

#[tokio::test(start_paused = true)]
async fn redundant_mode_set_is_a_no_op() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;
    advance(120).await;

    let before = panel.snapshot().await.scroll_phase.offset;
    assert!(before > 0.0);

    panel.set_mode(DisplayMode::Text).await;
    panel.set_mode(DisplayMode::Text).await;
    assert_eq!(panel.snapshot().await.scroll_phase.offset, before);
    assert!(panel.is_animating().await);
}

#[tokio::test(start_paused = true)]
async fn leaving_clock_mode_stops_the_driver() {
    let mut panel = panel_1000x200().await;
    panel.set_mode(DisplayMode::Clock).await;
    assert!(panel.is_animating().await);

    panel.set_mode(DisplayMode::Text).await;
    // clock text ("HH:MM", 29 cells) fits the grid, so no scroll restart
    assert!(!panel.is_animating().await);
}

#[tokio::test(start_paused = true)]
async fn scroll_toggle_is_ignored_in_clock_mode() {
    let mut panel = panel_1000x200().await;
    panel.set_mode(DisplayMode::Clock).await;

    panel.set_scroll_enabled(true).await;
    let snapshot = panel.snapshot().await;
    assert!(!snapshot.scroll_enabled);
    assert_eq!(snapshot.mode, DisplayMode::Clock);
}

#[tokio::test(start_paused = true)]
async fn resize_recomputes_cell_size_before_next_tick() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;
    advance(120).await;

    // halve the surface: cell size drops from 10 to 5 and the offset
    // restarts, so every subsequent step moves by the new cell size
    panel.notify_resized(500.0, 200.0).await;
    let snapshot = panel.snapshot().await;
    assert_eq!(snapshot.geometry().cell_size, 5.0);
    assert_eq!(snapshot.scroll_phase.offset, 0.0);
    assert!(panel.is_animating().await);

    advance(60).await;
    assert_eq!(panel.snapshot().await.scroll_phase.offset, 5.0);
}

#[tokio::test(start_paused = true)]
async fn degenerate_resize_is_ignored() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;

    panel.notify_resized(0.0, -4.0).await;
    let snapshot = panel.snapshot().await;
    assert_eq!(snapshot.surface_width, 1000.0);
    assert_eq!(snapshot.surface_height, 200.0);
    assert!(panel.is_animating().await);
}

#[tokio::test(start_paused = true)]
async fn speed_only_applies_while_running() {
    let mut panel = panel_1000x200().await;
    panel.set_text("HI").await; // fits: driver idle

    panel.set_scroll_speed(4).await;
    assert_eq!(panel.snapshot().await.speed_level, 2);

    // out-of-range levels are rejected even while running
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;
    panel.set_scroll_speed(0).await;
    panel.set_scroll_speed(9).await;
    assert_eq!(panel.snapshot().await.speed_level, 2);
}

#[tokio::test(start_paused = true)]
async fn speed_change_rescales_ticks_without_offset_reset() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;
    advance(120).await; // two 50ms ticks -> offset 20

    panel.set_scroll_speed(5).await; // 100ms * 2/5 = 20ms period
    let base = panel.snapshot().await.scroll_phase.offset;
    assert_eq!(base, 20.0); // offset survives the speed change

    advance(110).await; // five 20ms ticks
    let offset = panel.snapshot().await.scroll_phase.offset;
    assert!((offset - (base + 50.0)).abs() < 1e-3, "offset was {offset}");
}

#[tokio::test(start_paused = true)]
async fn set_text_resets_offset_and_reevaluates() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;
    advance(120).await;
    assert!(panel.snapshot().await.scroll_phase.offset > 0.0);

    // overflowing replacement: offset restarts, driver keeps running
    panel.set_text(&OVERFLOWING.repeat(2)).await;
    assert_eq!(panel.snapshot().await.scroll_phase.offset, 0.0);
    assert!(panel.is_animating().await);

    // fitting replacement: driver stops
    panel.set_text("HI").await;
    assert!(!panel.is_animating().await);
    assert_eq!(panel.snapshot().await.scroll_phase.offset, 0.0);
}

#[tokio::test(start_paused = true)]
async fn style_change_resets_phase() {
    let mut panel = panel_1000x200().await;
    panel.set_text(OVERFLOWING).await;
    panel.set_scroll_enabled(true).await;
    advance(120).await;

    panel.set_scroll_style(ScrollStyle::Bounce).await;
    let snapshot = panel.snapshot().await;
    assert_eq!(snapshot.scroll_phase.offset, 0.0);
    assert_eq!(snapshot.scroll_phase.direction, 1);
    assert!(panel.is_animating().await);

    // same style again is a no-op: phase keeps whatever it reached
    advance(120).await;
    let before = panel.snapshot().await.scroll_phase.offset;
    panel.set_scroll_style(ScrollStyle::Bounce).await;
    assert_eq!(panel.snapshot().await.scroll_phase.offset, before);
}

#[tokio::test]
async fn frames_are_published_on_state_changes() {
    let mut panel = panel_1000x200().await;
    let mut frames = panel.subscribe_frames();
    frames.borrow_and_update();

    panel.set_text("HI").await;
    assert!(frames.has_changed().unwrap());
    let frame = frames.borrow_and_update().clone();
    assert!(!frame.dots.is_empty());
    assert_eq!(frame.surface_width, 1000.0);

    // color change republishes with the new lit color on glyph dots
    panel
        .set_color(matryx::Rgb::new(255, 0, 0))
        .await;
    let frame = frames.borrow_and_update().clone();
    assert!(frame
        .dots
        .iter()
        .any(|dot| dot.color == matryx::Rgb::new(255, 0, 0)));
}
