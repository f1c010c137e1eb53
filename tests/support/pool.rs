use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use showdown::domain::{Player, PlayerPool, Position};

/// Seven players over two teams: X = {A, B, F}, Y = {C, D, E, G}.
pub fn sample_players() -> Vec<Player> {
    vec![
        Player::new("A", "X", Position::Qb, 10_000, 20.0),
        Player::new("B", "X", Position::Wr, 8_000, 15.0),
        Player::new("C", "Y", Position::Rb, 7_000, 12.0),
        Player::new("D", "Y", Position::Wr, 6_000, 10.0),
        Player::new("E", "Y", Position::Te, 5_000, 8.0),
        Player::new("F", "X", Position::Dst, 4_000, 9.0),
        Player::new("G", "Y", Position::K, 3_000, 5.0),
    ]
}

/// CSV rows for [`sample_players`].
pub const SAMPLE_ROWS: [&str; 7] = [
    "A,X,QB,10000,20.0",
    "B,X,WR,8000,15.0",
    "C,Y,RB,7000,12.0",
    "D,Y,WR,6000,10.0",
    "E,Y,TE,5000,8.0",
    "F,X,DST,4000,9.0",
    "G,Y,K,3000,5.0",
];

pub fn sample_pool() -> Arc<PlayerPool> {
    Arc::new(PlayerPool::new(sample_players()).expect("sample pool"))
}

/// A reproducible two-team slate of `size` players with realistic salaries.
pub fn random_players(seed: u64, size: usize) -> Vec<Player> {
    const POSITIONS: [Position; 6] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::K,
        Position::Dst,
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|index| {
            let team = if index % 2 == 0 { "HOME" } else { "AWAY" };
            let position = POSITIONS[rng.gen_range(0..POSITIONS.len())];
            let salary = rng.gen_range(10..=120) * 100;
            let fpts = f64::from(rng.gen_range(25..=300_u32)) / 10.0;
            Player::new(format!("P{index:02}"), team, position, salary, fpts)
        })
        .collect()
}

pub fn random_pool(seed: u64, size: usize) -> Arc<PlayerPool> {
    Arc::new(PlayerPool::new(random_players(seed, size)).expect("random pool"))
}
