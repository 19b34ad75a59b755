//! Forward and reverse lookups stay consistent through inserts and removals.

use infigrid_world::{
    BlockAddress, GridObject, GridPoint, InfiniteGrid, LocalPoint, ObjectId, SequentialIds,
};
use num_bigint::BigInt;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert {
        base: BigInt,
        start: (i8, i8, i8),
        size: (u8, u8, u8),
        local: (f64, f64),
    },
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let base = prop_oneof![
        Just(BigInt::from(0)),
        Just(BigInt::from(-7)),
        Just(
            "98723894729837498273984723984792365432101234567890"
                .parse::<BigInt>()
                .unwrap()
        ),
    ];
    prop_oneof![
        3 => (
            base,
            any::<(i8, i8, i8)>(),
            (0u8..3, 0u8..3, 0u8..3),
            (0.0f64..1.0, 0.0f64..1.0),
        )
            .prop_map(|(base, start, size, local)| Op::Insert {
                base,
                start,
                size,
                local,
            }),
        2 => (0usize..32).prop_map(Op::Remove),
    ]
}

fn build(ids: &mut SequentialIds, op: &Op) -> Option<GridObject<u32>> {
    let Op::Insert {
        base,
        start,
        size,
        local,
    } = op
    else {
        return None;
    };
    let shift = |v: i8| base + BigInt::from(v % 4);
    let lo = BlockAddress {
        x: shift(start.0),
        y: shift(start.1),
        z: shift(start.2),
    };
    let hi = BlockAddress {
        x: &lo.x + u32::from(size.0),
        y: &lo.y + u32::from(size.1),
        z: &lo.z + u32::from(size.2),
    };
    // Equal blocks need ordered offsets; otherwise any offsets are valid.
    let (a, b) = if local.0 <= local.1 {
        *local
    } else {
        (local.1, local.0)
    };
    let start = GridPoint::new(lo, LocalPoint::new(a, a, a).unwrap());
    let end = GridPoint::new(hi, LocalPoint::new(b, b, b).unwrap());
    Some(GridObject::builder(start, end, 0).build_with(ids).unwrap())
}

fn assert_consistent<D>(grid: &InfiniteGrid<D>) {
    for object in grid.objects() {
        let uid = object.uid();
        let home = grid.home_block(uid).expect("tracked object has a home");
        assert_eq!(home, object.center_point().index());
        assert!(grid.get_block(home).unwrap().main().contains(uid));

        let overlaps = grid.overlap_blocks(uid).expect("tracked object has overlaps");
        assert_eq!(overlaps, &object.overlapping(false));
        for index in overlaps {
            assert!(grid.get_block(index).unwrap().overlapping().contains(uid));
        }
    }

    for block in grid.blocks() {
        assert!(!block.is_empty(), "empty block {} kept", block.index());
        for uid in block.main() {
            assert!(!block.overlapping().contains(uid));
            assert_eq!(grid.home_block(uid), Some(block.index()));
        }
        for uid in block.overlapping() {
            assert!(grid.overlap_blocks(uid).unwrap().contains(block.index()));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lookups_stay_consistent(ops in prop::collection::vec(op(), 1..40)) {
        let mut ids = SequentialIds::new("p");
        let mut grid = InfiniteGrid::default();
        let mut inserted: Vec<ObjectId> = Vec::new();

        for op in &ops {
            match op {
                Op::Insert { .. } => {
                    let object = build(&mut ids, op).unwrap();
                    inserted.push(object.uid().clone());
                    prop_assert!(grid.insert_object(object).unwrap());
                }
                Op::Remove(i) => {
                    if let Some(uid) = inserted.get(*i) {
                        let was_tracked = grid.contains(uid);
                        prop_assert_eq!(grid.remove_object(uid).is_some(), was_tracked);
                    }
                }
            }
            assert_consistent(&grid);
        }

        for uid in &inserted {
            grid.remove_object(uid);
        }
        prop_assert!(grid.is_empty());
        prop_assert_eq!(grid.block_count(), 0);
    }
}

#[test]
fn insert_then_remove_leaves_no_trace() {
    let far: BigInt = "-22222223423423894789589237948729348728934792222222222222"
        .parse()
        .unwrap();
    let start =
        GridPoint::from_parts(BlockAddress::new(far.clone(), 0, 0), [0.9, 0.1, 0.1]).unwrap();
    let end = GridPoint::from_parts(BlockAddress::new(&far + 1, 1, 0), [0.2, 0.3, 0.5]).unwrap();
    let object = GridObject::builder(start, end, "ship")
        .uid("ship-1")
        .build()
        .unwrap();

    let mut grid = InfiniteGrid::default();
    grid.insert_object(object).unwrap();
    assert_eq!(grid.block_count(), 4);

    let uid = ObjectId::from("ship-1");
    assert!(grid.remove_object(&uid).is_some());
    assert_eq!(grid.block_count(), 0);
    assert!(grid.blocks().all(|block| !block.contains(&uid)));
}

#[test]
fn viewport_style_query_unions_both_roles() {
    let mut ids = SequentialIds::new("v");
    let centred = GridObject::builder(
        GridPoint::from_parts(BlockAddress::new(0, 0, 0), [0.1; 3]).unwrap(),
        GridPoint::from_parts(BlockAddress::new(0, 0, 0), [0.9; 3]).unwrap(),
        (),
    )
    .build_with(&mut ids)
    .unwrap();
    let reaching = GridObject::builder(
        GridPoint::from_parts(BlockAddress::new(-1, 0, 0), [0.1; 3]).unwrap(),
        GridPoint::from_parts(BlockAddress::new(0, 0, 0), [0.0, 0.5, 0.5]).unwrap(),
        (),
    )
    .build_with(&mut ids)
    .unwrap();
    // centre x = (-0.9 + 0.0) / 2, so block -1 is home and block 0 an overlap
    let grid = InfiniteGrid::from_objects([centred, reaching]).unwrap();

    let mut seen: Vec<String> = grid
        .objects_in_block(BlockAddress::new(0, 0, 0))
        .into_iter()
        .map(|uid| uid.as_str().to_owned())
        .collect();
    seen.sort();
    assert_eq!(seen, ["v-1", "v-2"]);
}
