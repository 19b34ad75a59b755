//! Property-based tests against independent high-precision references.

use infigrid_core::{
    div_floor, int_frac_distance, isqrt, BlockAddress, BlockIndex, Error, GridPoint, LocalPoint,
};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::Signed;
use proptest::prelude::*;

/// Fixed-point bits used by the reference computations
const REFERENCE_BITS: u32 = 100;

/// Arbitrary signed integers of up to 256 bits
fn big_int() -> impl Strategy<Value = BigInt> {
    (any::<bool>(), prop::collection::vec(any::<u32>(), 0..8)).prop_map(|(negative, digits)| {
        let magnitude = BigInt::from(BigUint::new(digits));
        if negative {
            -magnitude
        } else {
            magnitude
        }
    })
}

fn block_address() -> impl Strategy<Value = BlockAddress> {
    (big_int(), big_int(), big_int()).prop_map(|(x, y, z)| BlockAddress { x, y, z })
}

/// Block coordinates small enough to exercise carries between neighbours
fn near_address() -> impl Strategy<Value = BlockAddress> {
    (-4i64..4, -4i64..4, -4i64..4).prop_map(|(x, y, z)| BlockAddress::new(x, y, z))
}

fn local_point() -> impl Strategy<Value = LocalPoint> {
    (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0).prop_map(|(x, y, z)| LocalPoint::new(x, y, z).unwrap())
}

fn grid_point() -> impl Strategy<Value = GridPoint> {
    (prop_oneof![block_address(), near_address()], local_point())
        .prop_map(|(block, local)| GridPoint::new(block, local))
}

/// `floor(sqrt(n) * 2^53) mod 2^53` as a fraction, using num-bigint's own root.
fn reference_fraction(squared: &BigUint) -> f64 {
    let scaled = (squared << (2 * REFERENCE_BITS)).sqrt();
    let integer = &scaled >> REFERENCE_BITS;
    let residue = (scaled - (integer << REFERENCE_BITS)) >> (REFERENCE_BITS - 53);
    let bits: u64 = residue.try_into().unwrap();
    bits as f64 / (1u64 << 53) as f64
}

/// World coordinate scaled by `2^REFERENCE_BITS`.
fn scaled_world(tile: &BigInt, local: f64) -> BigInt {
    let fixed = (local * 2f64.powi(60)).round() as u64;
    (tile << REFERENCE_BITS) + (BigInt::from(fixed) << (REFERENCE_BITS - 60))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn isqrt_brackets_the_root(n in big_int()) {
        let n = n.abs();
        let root = isqrt(&n).unwrap();
        prop_assert!(&root * &root <= n);
        prop_assert!(n < (&root + 1) * (&root + 1));
        prop_assert_eq!(root, n.sqrt());
    }

    #[test]
    fn isqrt_rejects_negatives(n in big_int()) {
        let negative: BigInt = -(n.abs() + BigInt::from(1));
        prop_assert!(matches!(isqrt(&negative), Err(Error::Domain(_))));
    }

    #[test]
    fn div_floor_brackets_the_quotient(n in big_int(), d in big_int()) {
        prop_assume!(d != BigInt::from(0));
        let q = div_floor(&n, &d).unwrap();
        if d > BigInt::from(0) {
            prop_assert!(&q * &d <= n);
            prop_assert!(n < (&q + 1) * &d);
        } else {
            prop_assert!(&q * &d >= n);
            prop_assert!(n > (&q + 1) * &d);
        }
        prop_assert_eq!(q, Integer::div_floor(&n, &d));
    }

    #[test]
    fn div_floor_rejects_zero(n in big_int()) {
        prop_assert!(matches!(div_floor(&n, &BigInt::from(0)), Err(Error::Domain(_))));
    }

    #[test]
    fn index_roundtrip(address in block_address()) {
        let index = address.to_index();
        prop_assert_eq!(index.to_address().unwrap(), address);
        let reparsed: BlockIndex = index.as_str().parse().unwrap();
        prop_assert_eq!(reparsed, index);
    }

    #[test]
    fn index_rejects_wrong_token_count(parts in prop::collection::vec(-1000i64..1000, 0..7)) {
        prop_assume!(parts.len() != 3);
        let encoded = parts.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        prop_assert!(matches!(encoded.parse::<BlockIndex>(), Err(Error::Format(_))));
    }

    #[test]
    fn distance_matches_reference(a in block_address(), b in block_address()) {
        let squared: BigUint = [(&b.x - &a.x), (&b.y - &a.y), (&b.z - &a.z)]
            .iter()
            .map(|d| d.magnitude() * d.magnitude())
            .sum();
        let (integer, fraction) = int_frac_distance(&a, &b);
        prop_assert_eq!(&integer, &BigInt::from(squared.sqrt()));
        prop_assert!((0.0..1.0).contains(&fraction));
        prop_assert!((fraction - reference_fraction(&squared)).abs() < 1e-12);
    }

    #[test]
    fn near_distance_matches_reference(a in near_address(), b in near_address()) {
        let squared: BigUint = [(&b.x - &a.x), (&b.y - &a.y), (&b.z - &a.z)]
            .iter()
            .map(|d| d.magnitude() * d.magnitude())
            .sum();
        let (_, fraction) = int_frac_distance(&a, &b);
        prop_assert!((fraction - reference_fraction(&squared)).abs() < 1e-12);
    }

    #[test]
    fn midpoint_is_commutative(p1 in grid_point(), p2 in grid_point()) {
        let forward = GridPoint::midpoint(&p1, &p2);
        let backward = GridPoint::midpoint(&p2, &p1);
        prop_assert_eq!(forward.index(), backward.index());
        for (f, b) in forward.local().to_array().iter().zip(backward.local().to_array()) {
            prop_assert_eq!(f.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn midpoint_reconstructs_true_midpoint(p1 in grid_point(), p2 in grid_point()) {
        let mid = GridPoint::midpoint(&p1, &p2);
        let tolerance = BigInt::from((1e-12 * 2f64.powi(REFERENCE_BITS as i32)) as u128);
        for axis in infigrid_core::Axis::ALL {
            let local = mid.local().get(axis).get();
            prop_assert!((0.0..1.0).contains(&local));

            let expected = (scaled_world(p1.block().get(axis), p1.local().get(axis).get())
                + scaled_world(p2.block().get(axis), p2.local().get(axis).get()))
                / 2;
            let rebuilt = scaled_world(mid.block().get(axis), local);
            let diff: BigInt = rebuilt - expected;
            prop_assert!(diff.abs() <= tolerance);
        }
    }

    #[test]
    fn point_order_is_consistent(p1 in grid_point(), p2 in grid_point()) {
        prop_assert_eq!(p1.point_le(&p2), p2.point_ge(&p1));
        prop_assert!(p1.point_le(&p1) && p1.point_ge(&p1));
    }
}
