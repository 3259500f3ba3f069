use snow_core::action::{Action, Direction};
use snow_core::config::{EngineConfig, RunParams};
use snow_core::engine::Controller;
use snow_core::hiring::{Throttle, MAX_WORKERS};
use snow_core::weather::{Forecast, SIMULATION_DAYS};
use snow_core::world::Cell;

fn params(board_size: u32, salary: u32, fine: u32) -> RunParams {
    RunParams {
        board_size,
        salary,
        fine,
    }
}

fn render(actions: &[Action]) -> Vec<String> {
    actions.iter().map(ToString::to_string).collect()
}

#[test]
fn fine_below_salary_never_acts() {
    let mut controller = Controller::new(params(3, 50, 10), EngineConfig::default());
    for day in 0..SIMULATION_DAYS as u32 {
        let snowfall = [Cell::new(day % 3, (day / 3) % 3), Cell::new(1, 1)];
        assert!(controller.next_day(&snowfall).is_empty(), "day {day} acted");
    }
    assert_eq!(controller.world().worker_count(), 0);
}

#[test]
fn first_snow_is_met_with_a_hire() {
    let mut controller = Controller::new(params(3, 10, 50), EngineConfig::default());
    let actions = controller.next_day(&[Cell::new(0, 0)]);
    assert_eq!(render(&actions), vec!["H 0 0"]);
    assert_eq!(controller.world().position(0), Some(Cell::new(0, 0)));
    assert!(!controller.world().grid.is_snowed(Cell::new(0, 0)));
}

#[test]
fn adjacent_idle_worker_steps_onto_new_snow() {
    let mut controller = Controller::new(params(3, 10, 50), EngineConfig::default());
    controller.next_day(&[Cell::new(0, 0)]);
    let actions = controller.next_day(&[Cell::new(0, 1)]);
    assert_eq!(render(&actions), vec!["M 0 R"]);
    assert_eq!(
        actions,
        vec![Action::Move {
            worker: 0,
            direction: Direction::Right
        }]
    );
    let world = controller.world();
    assert_eq!(world.position(0), Some(Cell::new(0, 1)));
    assert_eq!(world.grid.occupant_of(Cell::new(0, 0)), None);
    assert!(!world.grid.is_snowed(Cell::new(0, 1)));
}

#[test]
fn no_hires_past_the_hard_cap() {
    let mut controller = Controller::new(params(20, 10, 50), EngineConfig::default());
    let mut snowfall: Vec<Cell> = (0..5)
        .flat_map(|row| (0..20).map(move |col| Cell::new(row, col)))
        .collect();
    snowfall.push(Cell::new(5, 0));

    let actions = controller.next_day(&snowfall);
    assert_eq!(actions.iter().filter(|a| a.is_hire()).count(), MAX_WORKERS as usize);
    assert_eq!(controller.world().worker_count(), MAX_WORKERS);
    assert!(controller.world().grid.is_snowed(Cell::new(5, 0)));

    let actions = controller.next_day(&[Cell::new(19, 19)]);
    assert_eq!(render(&actions), vec!["M 80 D"]);

    for _ in 0..10 {
        let actions = controller.next_day(&[Cell::new(19, 19)]);
        assert!(actions.iter().all(|action| !action.is_hire()));
    }
    assert!(controller.world().grid.is_snowed(Cell::new(19, 19)));
    assert_eq!(controller.world().worker_count(), MAX_WORKERS);
}

#[test]
fn throttle_defers_the_eleventh_hire_until_the_next_slice() {
    let config = EngineConfig {
        throttle: Some(Throttle {
            slice_days: 20,
            workers_per_slice: 10,
        }),
        ..EngineConfig::default()
    };
    let mut controller = Controller::new(params(20, 10, 50), config);
    let mut snowfall: Vec<Cell> = (0..10).map(|i| Cell::new(0, 2 * i)).collect();
    snowfall.push(Cell::new(2, 0));

    let actions = controller.next_day(&snowfall);
    assert_eq!(actions.len(), 10);
    assert!(controller.world().grid.is_snowed(Cell::new(2, 0)));

    for day in 1..20 {
        assert!(controller.next_day(&[]).is_empty(), "day {day} hired early");
    }
    assert_eq!(controller.day(), 20);
    let actions = controller.next_day(&[]);
    assert_eq!(render(&actions), vec!["H 2 0"]);
    assert_eq!(controller.world().worker_count(), 11);
}

#[test]
fn replaying_a_forecast_reproduces_every_action() {
    let forecast = Forecast::generate(2_024);
    let params = RunParams {
        fine: forecast.params.salary.max(forecast.params.fine),
        ..forecast.params
    };

    for config in [
        EngineConfig::default(),
        serde_json::from_str(r#"{"search": {"kind": "window", "half_extent": 4}, "scan": "pending_queue"}"#)
            .expect("config parses"),
    ] {
        let run = || {
            let mut controller = Controller::new(params, config.clone());
            forecast
                .snowfall
                .iter()
                .map(|snowfall| render(&controller.next_day(snowfall)))
                .collect::<Vec<_>>()
        };
        let first = run();
        let second = run();
        assert_eq!(first, second);
        assert!(first.iter().any(|day| !day.is_empty()));
    }
}
