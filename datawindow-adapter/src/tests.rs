use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::time::Duration;

use datawindow::{
    DataSource, DataWindowProvider, Direction, FetchOutcome, ItemId, Record, SkipListSource,
    WindowOptions,
};

use crate::ring::SlotRing;

const H: f32 = 10.0;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Row {
    id: ItemId,
}

impl Record for Row {
    fn id(&self) -> ItemId {
        self.id
    }
}

fn viewport() -> ViewportOptions {
    ViewportOptions::new(H, 10, 2)
}

fn source_of(n: i64, latency_ms: u64) -> Arc<SkipListSource<Row>> {
    let rows = (0..n).map(|id| Row { id }).collect();
    Arc::new(SkipListSource::from_vec(rows, Duration::from_millis(latency_ms)).unwrap())
}

async fn controller_of(n: i64, latency_ms: u64) -> ScrollController<SkipListSource<Row>> {
    ScrollController::connect(source_of(n, latency_ms), viewport())
        .await
        .unwrap()
}

fn visible_ids(c: &ScrollController<SkipListSource<Row>>) -> Vec<ItemId> {
    c.visible_items().into_iter().map(|row| row.id).collect()
}

fn provider_ids(c: &ScrollController<SkipListSource<Row>>) -> Vec<ItemId> {
    c.provider()
        .get_data_window_items(None)
        .iter()
        .map(|row| row.id)
        .collect()
}

#[derive(Debug)]
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range(&mut self, end_exclusive: u64) -> u64 {
        (self.next_u64() >> 33) % end_exclusive
    }
}

#[test]
fn ring_rotates_one_slot_per_push() {
    let mut ring = SlotRing::new();
    assert_eq!(ring.push_back(9), None);

    ring.reset((0..4).collect::<Vec<i32>>());
    assert_eq!(ring.push_back(4), Some(0));
    assert_eq!(ring.head(), 1);
    assert_eq!(ring.slots(), &[4, 1, 2, 3]);
    assert_eq!(ring.iter().map(|(_, v)| *v).collect::<Vec<_>>(), [1, 2, 3, 4]);

    assert_eq!(ring.push_front(0), Some(0));
    assert_eq!(ring.head(), 0);
    assert_eq!(ring.slots(), &[0, 1, 2, 3]);

    assert_eq!(ring.push_front(-1), Some(3));
    assert_eq!(ring.iter().map(|(_, v)| *v).collect::<Vec<_>>(), [-1, 0, 1, 2]);
    assert_eq!(ring.get(0), Some(&-1));
    assert_eq!(ring.get(4), None);
}

#[test]
fn viewport_options_validate() {
    let ok = viewport();
    assert!(ok.validate().is_ok());
    assert_eq!(ok.window_size(), 12);
    assert_eq!(ok.forward_limit(), -20.0);
    assert_eq!(ok.rest_offset(), -10.0);
    assert_eq!(ok.content_height(), 120.0);

    for bad in [
        ok.with_item_height(0.0),
        ok.with_item_height(-3.0),
        ok.with_item_height(f32::NAN),
        ok.with_item_height(f32::INFINITY),
        ViewportOptions::new(H, 0, 2),
        ok.with_boundary_multiple(1.5),
        ok.with_boundary_multiple(f32::NAN),
    ] {
        assert!(bad.validate().unwrap_err().is_invalid_argument(), "{bad:?}");
    }
}

#[tokio::test]
async fn controller_starts_at_offset_zero_with_the_first_window() {
    let c = controller_of(1000, 0).await;
    assert_eq!(c.translate_y(), 0.0);
    assert_eq!(c.ring_head(), 0);
    assert_eq!(c.boundary_state(), BoundaryState::WithinBounds);
    assert_eq!(visible_ids(&c), (0..12).collect::<Vec<_>>());
    assert_eq!(c.scroll_state().version, 0);
}

#[tokio::test]
async fn provider_with_a_different_window_size_is_rejected() {
    let provider = DataWindowProvider::new(source_of(100, 0), WindowOptions::new(8))
        .await
        .unwrap();
    let err = ScrollController::new(Arc::new(provider), viewport()).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn small_scrolls_only_move_the_offset() {
    let mut c = controller_of(1000, 0).await;
    assert_eq!(c.on_scroll(5.0).await.unwrap(), ScrollEffect::Offset);
    assert_eq!(c.translate_y(), -5.0);
    assert_eq!(c.on_scroll(-3.0).await.unwrap(), ScrollEffect::Offset);
    assert_eq!(c.translate_y(), -2.0);
    assert_eq!(c.provider().version(), 0);
    assert!(c.on_scroll(f32::NAN).await.unwrap_err().is_invalid_argument());
}

#[tokio::test]
async fn crossing_the_forward_limit_shifts_and_rewrites_one_slot() {
    let mut c = controller_of(1000, 0).await;
    let effect = c.on_scroll(2.0 * H).await.unwrap();
    assert_eq!(
        effect,
        ScrollEffect::Shifted {
            direction: Direction::Forward,
            slot: 0
        }
    );
    assert_eq!(c.translate_y(), -H);
    assert_eq!(c.ring_head(), 1);
    assert_eq!(c.slots()[0].id, 12);
    assert_eq!(visible_ids(&c), (1..13).collect::<Vec<_>>());
    assert_eq!(c.provider().head_id(), 1);
    assert!(!c.sync());
}

#[tokio::test]
async fn crossing_zero_backward_shifts_back() {
    let mut c = controller_of(1000, 0).await;
    c.on_scroll(2.0 * H).await.unwrap();

    let effect = c.on_scroll(-H).await.unwrap();
    assert_eq!(
        effect,
        ScrollEffect::Shifted {
            direction: Direction::Backward,
            slot: 0
        }
    );
    assert_eq!(c.translate_y(), -H);
    assert_eq!(c.ring_head(), 0);
    assert_eq!(visible_ids(&c), (0..12).collect::<Vec<_>>());
}

#[tokio::test]
async fn backward_at_the_start_clamps_to_zero() {
    let mut c = controller_of(1000, 0).await;
    let effect = c.on_scroll(-5.0).await.unwrap();
    assert_eq!(effect, ScrollEffect::Clamped(Direction::Backward));
    assert_eq!(c.translate_y(), 0.0);
    assert_eq!(c.boundary_state(), BoundaryState::AtBackwardBoundary);
    assert_eq!(c.provider().version(), 0);

    c.on_scroll(4.0).await.unwrap();
    assert_eq!(c.boundary_state(), BoundaryState::WithinBounds);
}

#[tokio::test]
async fn forward_at_the_end_clamps_to_the_limit() {
    let mut c = controller_of(1000, 0).await;
    assert_eq!(c.jump_to(988).await.unwrap(), FetchOutcome::Applied);
    assert_eq!(visible_ids(&c), (988..1000).collect::<Vec<_>>());

    c.on_scroll(5.0).await.unwrap();
    let effect = c.on_scroll(30.0).await.unwrap();
    assert_eq!(effect, ScrollEffect::Clamped(Direction::Forward));
    assert_eq!(c.translate_y(), -2.0 * H);
    assert_eq!(c.boundary_state(), BoundaryState::AtForwardBoundary);
    assert!(c.boundary_state().is_at_boundary());
    assert_eq!(visible_ids(&c), (988..1000).collect::<Vec<_>>());

    c.on_scroll(-3.0).await.unwrap();
    assert_eq!(c.translate_y(), -17.0);
    assert_eq!(c.boundary_state(), BoundaryState::WithinBounds);
}

#[tokio::test]
async fn jump_resets_offset_and_ring() {
    let mut c = controller_of(1000, 0).await;
    c.on_scroll(2.0 * H).await.unwrap();
    c.on_scroll(3.0).await.unwrap();
    assert_eq!(c.ring_head(), 1);

    c.jump_to(500).await.unwrap();
    assert_eq!(c.translate_y(), 0.0);
    assert_eq!(c.ring_head(), 0);
    assert_eq!(visible_ids(&c), (500..512).collect::<Vec<_>>());
    assert!(c.jump_to(-1).await.unwrap_err().is_invalid_argument());
    assert_eq!(visible_ids(&c), (500..512).collect::<Vec<_>>());
}

#[tokio::test]
async fn wheel_lines_scale_by_item_height() {
    let mut c = controller_of(1000, 0).await;
    assert_eq!(
        c.on_wheel(WheelDelta::Pixels(4.0)).await.unwrap(),
        ScrollEffect::Offset
    );
    assert!(
        c.on_wheel(WheelDelta::Lines(2.0))
            .await
            .unwrap()
            .touches_slots()
    );
    assert_eq!(c.provider().head_id(), 1);
}

#[tokio::test]
async fn touch_drag_scrolls_by_finger_distance() {
    let mut c = controller_of(1000, 0).await;
    assert_eq!(c.on_touch_move(50.0).await.unwrap(), ScrollEffect::Offset);
    assert_eq!(c.translate_y(), 0.0);

    c.on_touch_start(100.0);
    c.on_touch_move(95.0).await.unwrap();
    assert_eq!(c.translate_y(), -5.0);
    let effect = c.on_touch_move(80.0).await.unwrap();
    assert!(matches!(
        effect,
        ScrollEffect::Shifted {
            direction: Direction::Forward,
            ..
        }
    ));
    c.on_touch_end();
    assert_eq!(c.on_touch_move(0.0).await.unwrap(), ScrollEffect::Offset);
    assert_eq!(c.translate_y(), -H);
}

#[tokio::test]
async fn for_each_slot_lays_rows_out_from_the_offset() {
    let mut c = controller_of(1000, 0).await;
    c.on_scroll(2.0 * H).await.unwrap();

    let mut laid_out = Vec::new();
    c.for_each_slot(|s| laid_out.push((s.slot, s.index, s.item.id, s.y)));
    assert_eq!(laid_out.len(), 12);
    assert_eq!(laid_out[0], (1, 0, 1, -H));
    assert_eq!(laid_out[11], (0, 11, 12, 11.0 * H - H));
    assert!(laid_out.windows(2).all(|w| w[1].3 - w[0].3 == H));
}

#[tokio::test]
async fn partial_window_grows_and_resyncs() {
    let source = source_of(5, 0);
    let mut c = ScrollController::connect(source.clone(), viewport())
        .await
        .unwrap();
    assert_eq!(visible_ids(&c), [0, 1, 2, 3, 4]);

    let effect = c.on_scroll(2.0 * H).await.unwrap();
    assert_eq!(effect, ScrollEffect::Clamped(Direction::Forward));

    source.insert(Row { id: 5 }).unwrap();
    let effect = c.on_scroll(1.0).await.unwrap();
    assert_eq!(effect, ScrollEffect::Resynced);
    assert_eq!(visible_ids(&c), [0, 1, 2, 3, 4, 5]);
    assert_eq!(c.translate_y(), -H);
}

#[tokio::test]
async fn sync_picks_up_moves_made_elsewhere() {
    let mut c = controller_of(1000, 0).await;
    let provider = c.provider().clone();
    provider.move_forward().await.unwrap();
    provider.move_forward().await.unwrap();

    assert_eq!(visible_ids(&c), (0..12).collect::<Vec<_>>());
    assert!(c.sync());
    assert_eq!(visible_ids(&c), (2..14).collect::<Vec<_>>());
    assert_eq!(c.scroll_state().version, 2);
    assert!(!c.sync());
}

#[tokio::test]
async fn shift_after_an_unsynced_outside_move_reloads_the_ring() {
    let mut c = controller_of(100, 0).await;
    c.provider().move_forward().await.unwrap();

    let effect = c.on_scroll(100.0).await.unwrap();
    assert_eq!(effect, ScrollEffect::Resynced);
    assert_eq!(visible_ids(&c), provider_ids(&c));
    assert_eq!(visible_ids(&c), (2..14).collect::<Vec<_>>());
    assert_eq!(c.ring_head(), 0);
    assert_eq!(c.translate_y(), -H);
    assert!(!c.sync());

    let effect = c.on_scroll(2.0 * H).await.unwrap();
    assert!(matches!(effect, ScrollEffect::Shifted { .. }));
    assert_eq!(visible_ids(&c), provider_ids(&c));
}

#[tokio::test(start_paused = true)]
async fn shift_during_an_outside_move_is_pending() {
    let mut c = controller_of(1000, 10).await;
    let provider = c.provider().clone();

    let (moved, effect) = tokio::join!(provider.move_forward(), c.on_scroll(2.0 * H));
    assert_eq!(moved.unwrap().map(|row| row.id), Some(12));
    assert_eq!(effect.unwrap(), ScrollEffect::Pending(Direction::Forward));
    assert_eq!(c.translate_y(), -2.0 * H);
    assert_eq!(c.boundary_state(), BoundaryState::WithinBounds);

    assert!(c.sync());
    assert_eq!(visible_ids(&c), (1..13).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn jump_landing_mid_shift_resyncs_the_ring() {
    let mut c = controller_of(1000, 10).await;
    let provider = c.provider().clone();

    let (effect, jumped) = tokio::join!(c.on_scroll(2.0 * H), provider.set_data_window_position(500));
    assert_eq!(effect.unwrap(), ScrollEffect::Resynced);
    assert_eq!(jumped.unwrap(), FetchOutcome::Applied);
    assert_eq!(c.translate_y(), 0.0);

    assert!(c.sync());
    assert_eq!(visible_ids(&c), (500..512).collect::<Vec<_>>());
}

#[tokio::test]
async fn random_scrolling_keeps_ring_and_provider_in_step() {
    let mut c = controller_of(300, 0).await;
    let mut rng = Lcg(0xDA7A);

    for _ in 0..3000 {
        let delta = rng.gen_range(25) as f32 - 12.0;
        let effect = c.on_scroll(delta).await.unwrap();
        if let ScrollEffect::Shifted { direction, slot } = effect {
            let n = c.slots().len();
            let expected = match direction {
                Direction::Forward => (c.ring_head() + n - 1) % n,
                Direction::Backward => c.ring_head(),
            };
            assert_eq!(slot, expected);
        }

        let t = c.translate_y();
        assert!((-2.0 * H..=0.0).contains(&t), "translate_y {t}");
        assert_eq!(visible_ids(&c), provider_ids(&c));
        assert_eq!(c.slots().len(), 12);
    }
}
