//! Property tests for hex coordinates and map indexing

use proptest::prelude::*;
use slice_draft::map::hex::HexCoord;
use slice_draft::map::index::{hex_at, index_of};

fn hex() -> impl Strategy<Value = HexCoord> {
    (-60i32..=60, -60i32..=60).prop_map(|(q, r)| HexCoord::new(q, r))
}

proptest! {
    #[test]
    fn test_position_round_trip(h in hex()) {
        prop_assert_eq!(HexCoord::from_position(h.to_position()), h);
    }

    #[test]
    fn test_cube_invariant_from_position(x in -500.0f32..500.0, y in -500.0f32..500.0) {
        let h = HexCoord::from_position(glam::Vec2::new(x, y));
        prop_assert_eq!(h.q() + h.r() + h.s(), 0);
    }

    #[test]
    fn test_neighbors_keep_invariant_and_symmetry(h in hex()) {
        for n in h.neighbors() {
            prop_assert_eq!(n.q() + n.r() + n.s(), 0);
            prop_assert_eq!(h.distance(&n), 1);
            prop_assert!(n.neighbors().contains(&h));
        }
    }

    #[test]
    fn test_key_round_trip(h in hex()) {
        let key = h.to_string();
        prop_assert_eq!(key.parse::<HexCoord>().unwrap(), h);
    }

    #[test]
    fn test_map_index_round_trip(index in 0usize..2000) {
        prop_assert_eq!(index_of(hex_at(index)), index);
    }
}

#[test]
fn test_malformed_keys_rejected() {
    for key in ["", "<1,2>", "<1,1,1>", "1,-1,0", "<a,b,c>", "<1,-1,0"] {
        assert!(key.parse::<HexCoord>().is_err(), "{} parsed", key);
    }
}
