//! Fuzz the whole canvas against an obviously correct model: a map from coordinate to colour, with undo history kept
//! as lists of before-colours.
//!
//! The configuration is chosen so that nothing is ever lossy (the pool can hold every chunk the operations touch and
//! the cache can hold everything else), which makes the model exact.
use std::collections::{HashMap, VecDeque};

use proptest::prelude::*;

use crate::*;

const SIZE: u32 = 2;
const UNDO_DEPTH: usize = 3;
/// Operations touch chunks in `0..EXTENT` on both axes.
const EXTENT: i32 = 4;

#[derive(Clone, Debug, proptest_derive::Arbitrary)]
enum Op {
    Paint {
        #[proptest(strategy = "proptest::collection::vec((0..EXTENT, 0..EXTENT), 1..4)")]
        coords: Vec<(i32, i32)>,
        shade: u8,
    },
    Reconcile {
        #[proptest(strategy = "-2..EXTENT + 2")]
        x: i32,
        #[proptest(strategy = "-2..EXTENT + 2")]
        y: i32,
    },
    Undo,
    Redo,
}

type ModelAction = Vec<(GridCoord, Rgba)>;

#[derive(Default)]
struct Model {
    chunks: HashMap<GridCoord, Rgba>,
    undo: VecDeque<ModelAction>,
    redo: Vec<ModelAction>,
}

impl Model {
    fn colour(&self, coord: GridCoord) -> Rgba {
        self.chunks.get(&coord).copied().unwrap_or(Rgba::PAPER)
    }

    fn paint(&mut self, coords: &[GridCoord], colour: Rgba) {
        let mut action: ModelAction = vec![];
        for c in coords {
            if !action.iter().any(|(seen, _)| seen == c) {
                action.push((*c, self.colour(*c)));
            }
            self.chunks.insert(*c, colour);
        }

        if self.undo.len() == UNDO_DEPTH {
            self.undo.pop_front();
        }
        self.undo.push_back(action);
        self.redo.clear();
    }

    fn apply(&mut self, action: ModelAction) -> ModelAction {
        action
            .into_iter()
            .map(|(c, colour)| {
                let previous = self.colour(c);
                self.chunks.insert(c, colour);
                (c, previous)
            })
            .collect()
    }

    fn undo(&mut self) {
        if let Some(a) = self.undo.pop_back() {
            let mirror = self.apply(a);
            self.redo.push(mirror);
        }
    }

    fn redo(&mut self) {
        if let Some(a) = self.redo.pop() {
            let mirror = self.apply(a);
            if self.undo.len() == UNDO_DEPTH {
                self.undo.pop_front();
            }
            self.undo.push_back(mirror);
        }
    }
}

fn view_of(x: i32, y: i32) -> Aabb<f64> {
    let origin = GridCoord::new(x, y).origin(SIZE);
    Aabb::from_points(origin, origin + V2::new(1.0, 1.0)).unwrap()
}

fn fuzz_canvas_impl(ops: Vec<Op>) -> proptest::test_runner::TestCaseResult {
    let mut canvas = Canvas::new(CanvasConfig {
        chunk_size: SIZE,
        pool_radius: 2,
        load_padding: 1,
        max_cached_chunks: 64,
        max_undo_actions: UNDO_DEPTH,
        background: Rgba::PAPER,
    })
    .unwrap();
    let mut model = Model::default();

    for op in ops {
        match op {
            Op::Paint { coords, shade } => {
                let colour = Rgba::new(shade, 0, 0, 255);
                let coords = coords
                    .into_iter()
                    .map(|(x, y)| GridCoord::new(x, y))
                    .collect::<Vec<_>>();
                canvas.begin_action();
                for c in coords.iter() {
                    prop_assert!(canvas.capture_chunk(*c));
                    canvas.surface_at(*c).unwrap().bitmap_mut().fill(colour);
                }
                prop_assert!(canvas.end_action());
                model.paint(&coords[..], colour);
            }
            Op::Reconcile { x, y } => {
                let report = canvas.reconcile(&view_of(x, y));
                prop_assert_eq!(report.dropped, 0);
                prop_assert_eq!(report.skipped, 0);
            }
            Op::Undo => {
                let expected = !model.undo.is_empty();
                prop_assert_eq!(canvas.undo(), expected);
                model.undo();
            }
            Op::Redo => {
                let expected = !model.redo.is_empty();
                prop_assert_eq!(canvas.redo(), expected);
                model.redo();
            }
        }

        prop_assert!(canvas.coordinator().active_and_cached_disjoint());
        let stats = canvas.stats();
        prop_assert_eq!(stats.undo_depth, model.undo.len());
        prop_assert_eq!(stats.redo_depth, model.redo.len());
        prop_assert!(stats.undo_depth <= UNDO_DEPTH);
        let model_snapshots = model
            .undo
            .iter()
            .chain(model.redo.iter())
            .map(|a| a.len())
            .sum::<usize>();
        prop_assert_eq!(stats.snapshots, model_snapshots);

        for x in -1..=EXTENT {
            for y in -1..=EXTENT {
                let c = GridCoord::new(x, y);
                let expected = model.colour(c);
                let origin = c.origin(SIZE);
                prop_assert_eq!(canvas.sample(origin), expected, "chunk {}", c);
                prop_assert_eq!(canvas.sample(origin + V2::new(1.5, 1.5)), expected, "chunk {}", c);
            }
        }

        for (c, bitmap) in canvas.active_chunks() {
            prop_assert!(bitmap.is_uniform(model.colour(c)), "chunk {}", c);
        }
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        ..Default::default()
    })]
    #[test]
    #[allow(unreachable_code)]
    fn fuzz_canvas(
        ops in proptest::collection::vec(any::<Op>(), 0..60usize),
    ) {
        return fuzz_canvas_impl(ops);
    }
}
