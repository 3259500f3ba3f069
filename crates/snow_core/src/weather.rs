//! Seeded snowfall generator.
//!
//! Clouds of a few random types wander the board, each living for a limited
//! span of days and dropping snow through a square stencil of per-offset
//! probabilities. The generated case is fully determined by its seed.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_seeder::Seeder;
use serde::Serialize;

use crate::action::Direction;
use crate::config::RunParams;
use crate::world::Cell;

/// Length of the reference run, in days.
pub const SIMULATION_DAYS: usize = 2_000;

const MIN_CLOUD_SIZE: u32 = 1;
const MAX_CLOUD_SIZE: u32 = 3;
const MIN_CLOUD_TIME: usize = 10;
const MAX_CLOUD_TIME: usize = 25;
const MIN_CLOUD_TYPES: usize = 1;
const MAX_CLOUD_TYPES: usize = 10;
const MIN_CLOUD_COUNT: usize = 50;
const MAX_CLOUD_COUNT: usize = 200;
const MIN_BOARD_SIZE: u32 = 20;
const MAX_BOARD_SIZE: u32 = 50;
const MIN_SALARY: u32 = 10;
const MAX_SALARY: u32 = 100;
const MIN_SNOW_FINE: u32 = 10;
const MAX_SNOW_FINE: u32 = 100;

/// Cloud drift directions in the order their weights are drawn.
const DRIFT: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Up,
    Direction::Right,
];

#[derive(Clone, Debug)]
struct CloudType {
    size: u32,
    live_time: usize,
    snow_prob_global: f64,
    snow_prob_local: Vec<Vec<f64>>,
    move_weights: [u32; 4],
}

impl CloudType {
    fn sample<R: Rng>(rng: &mut R) -> Self {
        let size = rng.gen_range(MIN_CLOUD_SIZE..=MAX_CLOUD_SIZE);
        let live_time = rng.gen_range(MIN_CLOUD_TIME..=MAX_CLOUD_TIME);
        let snow_prob_global = rng.gen::<f64>();
        let span = (2 * size + 1) as usize;
        let snow_prob_local = (0..span)
            .map(|_| (0..span).map(|_| rng.gen::<f64>()).collect())
            .collect();
        let mut move_weights = [0u32; 4];
        for weight in &mut move_weights {
            let x = rng.gen::<f64>();
            *weight = ((100.0 * x * x).ceil() as u32).max(1);
        }
        Self {
            size,
            live_time,
            snow_prob_global,
            snow_prob_local,
            move_weights,
        }
    }

    fn drift<R: Rng>(&self, rng: &mut R) -> Direction {
        let total: u32 = self.move_weights.iter().sum();
        let mut value = rng.gen_range(0..total);
        for (direction, &weight) in DRIFT.iter().zip(&self.move_weights) {
            if value < weight {
                return *direction;
            }
            value -= weight;
        }
        DRIFT[DRIFT.len() - 1]
    }
}

/// A complete generated test case.
#[derive(Clone, Debug, Serialize)]
pub struct Forecast {
    pub params: RunParams,
    /// Per-day snowfall, de-duplicated and sorted row-major.
    pub snowfall: Vec<Vec<Cell>>,
}

impl Forecast {
    pub fn generate(seed: u64) -> Self {
        Self::from_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Build a case from an arbitrary phrase, hashed into the generator seed.
    pub fn from_phrase(phrase: &str) -> Self {
        let mut rng: ChaCha8Rng = Seeder::from(phrase).make_rng();
        Self::from_rng(&mut rng)
    }

    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let board_size = rng.gen_range(MIN_BOARD_SIZE..=MAX_BOARD_SIZE);
        let salary = rng.gen_range(MIN_SALARY..=MAX_SALARY);
        let fine = rng.gen_range(MIN_SNOW_FINE..=MAX_SNOW_FINE);
        let params = RunParams {
            board_size,
            salary,
            fine,
        };

        let type_count = rng.gen_range(MIN_CLOUD_TYPES..=MAX_CLOUD_TYPES);
        let types: Vec<CloudType> = (0..type_count).map(|_| CloudType::sample(rng)).collect();
        let cloud_count = rng.gen_range(MIN_CLOUD_COUNT..=MAX_CLOUD_COUNT);

        let mut days = vec![BTreeSet::new(); SIMULATION_DAYS];
        let size = i64::from(board_size);
        for _ in 0..cloud_count {
            let cloud = &types[rng.gen_range(0..types.len())];
            let mut row = i64::from(rng.gen_range(0..board_size));
            let mut col = i64::from(rng.gen_range(0..board_size));
            let start = rng.gen_range(0..SIMULATION_DAYS);
            let reach = i64::from(cloud.size);

            for day in start..(start + cloud.live_time).min(SIMULATION_DAYS) {
                if rng.gen::<f64>() < cloud.snow_prob_global {
                    for (r, probs) in cloud.snow_prob_local.iter().enumerate() {
                        for (c, &prob) in probs.iter().enumerate() {
                            if rng.gen::<f64>() < prob {
                                let snow_row = row + r as i64 - reach;
                                let snow_col = col + c as i64 - reach;
                                if (0..size).contains(&snow_row) && (0..size).contains(&snow_col) {
                                    days[day].insert(Cell::new(snow_row as u32, snow_col as u32));
                                }
                            }
                        }
                    }
                }
                // Clouds may drift off the board and keep snowing from there.
                let (dr, dc) = cloud.drift(rng).delta();
                row += dr;
                col += dc;
            }
        }

        Self {
            params,
            snowfall: days.into_iter().map(|day| day.into_iter().collect()).collect(),
        }
    }

    pub fn days(&self) -> usize {
        self.snowfall.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_forecast() {
        let first = Forecast::generate(7);
        let second = Forecast::generate(7);
        assert_eq!(first.params, second.params);
        assert_eq!(first.snowfall, second.snowfall);
        assert_ne!(Forecast::generate(8).snowfall, first.snowfall);
    }

    #[test]
    fn parameters_stay_in_range() {
        for seed in 0..20 {
            let forecast = Forecast::generate(seed);
            let params = forecast.params;
            assert!((MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&params.board_size));
            assert!((MIN_SALARY..=MAX_SALARY).contains(&params.salary));
            assert!((MIN_SNOW_FINE..=MAX_SNOW_FINE).contains(&params.fine));
            assert_eq!(forecast.days(), SIMULATION_DAYS);
        }
    }

    #[test]
    fn snowfall_is_sorted_unique_and_on_board() {
        let forecast = Forecast::from_phrase("blizzard");
        let size = forecast.params.board_size;
        let mut total = 0;
        for day in &forecast.snowfall {
            assert!(day.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(day.iter().all(|cell| cell.row < size && cell.col < size));
            total += day.len();
        }
        assert!(total > 0, "a full run should see some snow");
    }
}
