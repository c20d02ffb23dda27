use hive::rules::{self, LiftedView};
use hive::{Bug, Cell, Color, Engine, EngineConfig, MimicryPolicy, RuleError};
use std::collections::BTreeSet;

use Bug::*;
use Color::{Black, White};

fn c(x: i32, y: i32) -> Cell {
    Cell::new(x, y)
}

fn cells(list: &[(i32, i32)]) -> BTreeSet<Cell> {
    list.iter().map(|&p| Cell::from(p)).collect()
}

fn position(pieces: &[(Color, Bug, (i32, i32))]) -> Engine {
    position_with(EngineConfig::default(), pieces)
}

fn position_with(config: EngineConfig, pieces: &[(Color, Bug, (i32, i32))]) -> Engine {
    let pieces: Vec<(Color, Bug, Cell)> = pieces
        .iter()
        .map(|&(owner, kind, cell)| (owner, kind, Cell::from(cell)))
        .collect();
    Engine::from_position(config, &pieces).expect("test position should be valid")
}

#[test]
fn test_ant_walks_to_far_side_in_corner() {
    let mut engine = position(&[(White, Queen, (0, 0)), (White, Ant, (1, 0))]);

    // The only other on-board cell touching the queen is (0,1)
    assert_eq!(engine.query_legal_destinations(c(1, 0)).unwrap(), cells(&[(0, 1)]));
    assert_eq!(
        engine.request_move(White, Ant, c(1, 0), c(1, 1)),
        Err(RuleError::GeometryInvalid { kind: Ant, from: c(1, 0), to: c(1, 1) })
    );
    engine.request_move(White, Ant, c(1, 0), c(0, 1)).unwrap();
    assert_eq!(engine.board().top(c(0, 1)).map(|p| p.kind), Some(Ant));
}

#[test]
fn test_ant_circles_the_queen() {
    let engine = position(&[(White, Queen, (4, 4)), (White, Ant, (5, 4))]);
    let expected: BTreeSet<Cell> = c(4, 4)
        .neighbors()
        .into_iter()
        .filter(|n| *n != c(5, 4))
        .collect();
    assert_eq!(engine.query_legal_destinations(c(5, 4)).unwrap(), expected);
}

#[test]
fn test_ant_stopped_by_narrow_gap() {
    // A pocket at (5,5) whose only open side (6,5) sits between (6,4) and (5,6)
    let mut engine = position(&[
        (White, Queen, (5, 4)),
        (White, Spider, (6, 4)),
        (White, Spider, (4, 5)),
        (White, Grasshopper, (4, 6)),
        (White, Grasshopper, (5, 6)),
        (White, Ant, (7, 4)),
    ]);

    let reachable = engine.query_legal_destinations(c(7, 4)).unwrap();
    assert!(reachable.contains(&c(6, 5)));
    assert!(!reachable.contains(&c(5, 5)));

    let before = engine.clone();
    assert_eq!(
        engine.request_move(White, Ant, c(7, 4), c(5, 5)),
        Err(RuleError::GeometryInvalid { kind: Ant, from: c(7, 4), to: c(5, 5) })
    );
    assert_eq!(engine, before);
    assert!(engine.request_move(White, Ant, c(7, 4), c(6, 5)).is_ok());
}

#[test]
fn test_grasshopper_needs_adjacent_piece() {
    let mut engine = position(&[(White, Queen, (4, 4)), (White, Grasshopper, (5, 4))]);
    assert_eq!(
        engine.request_move(White, Grasshopper, c(5, 4), c(7, 4)),
        Err(RuleError::GeometryInvalid { kind: Grasshopper, from: c(5, 4), to: c(7, 4) })
    );
    assert!(engine.request_move(White, Grasshopper, c(5, 4), c(3, 4)).is_ok());
}

#[test]
fn test_single_piece_is_never_pinned() {
    let mut engine = position(&[(White, Queen, (4, 4))]);
    assert!(hive::connectivity::stays_connected_if_removed(engine.board(), c(4, 4)));
    // Connected, but a queen with nothing to slide along has nowhere to go
    assert!(engine.query_legal_destinations(c(4, 4)).unwrap().is_empty());
    assert_eq!(
        engine.request_move(White, Queen, c(4, 4), c(5, 4)),
        Err(RuleError::GeometryInvalid { kind: Queen, from: c(4, 4), to: c(5, 4) })
    );
}

#[test]
fn test_beetle_steps_off_stack() {
    let mut engine = position(&[
        (Black, Queen, (0, 0)),
        (White, Beetle, (0, 0)),
        (White, Queen, (1, 0)),
    ]);
    let beetle = engine.board().top(c(0, 0)).unwrap().id;
    let queen = engine.board().stack(c(0, 0))[0];

    engine.request_move(White, Beetle, c(0, 0), c(0, 1)).unwrap();

    assert_eq!(engine.board().stack(c(0, 0)), &[queen]);
    assert_eq!(engine.board().top(c(0, 0)).map(|p| (p.owner, p.kind)), Some((Black, Queen)));
    assert_eq!(engine.board().stack(c(0, 1)), &[beetle]);
    assert_eq!(engine.board().pieces().len(), 3);
}

#[test]
fn test_piece_under_beetle_cannot_move() {
    let mut engine = position(&[
        (Black, Queen, (4, 4)),
        (White, Beetle, (4, 4)),
        (White, Queen, (5, 4)),
    ]);
    assert_eq!(
        engine.request_move(Black, Queen, c(4, 4), c(4, 5)),
        Err(RuleError::NoSuchPiece { kind: Queen, cell: c(4, 4) })
    );
}

#[test]
fn test_mosquito_takes_union_of_neighbours() {
    let engine = position(&[
        (White, Queen, (6, 4)),
        (White, Grasshopper, (5, 4)),
        (White, Spider, (4, 5)),
        (White, Mosquito, (4, 4)),
    ]);
    let view = LiftedView::new(engine.board(), c(4, 4));
    let mut expected = rules::destinations(&view, Grasshopper).unwrap();
    expected.extend(rules::destinations(&view, Spider).unwrap());

    let moves = engine.query_legal_destinations(c(4, 4)).unwrap();
    assert_eq!(moves, expected);
    // Jumps east over two pieces and south-east over the spider
    assert!(moves.contains(&c(7, 4)));
    assert!(moves.contains(&c(4, 6)));
}

#[test]
fn test_mosquito_next_to_ant_moves_as_ant() {
    let engine = position(&[
        (White, Queen, (4, 4)),
        (White, Ant, (5, 4)),
        (White, Mosquito, (6, 4)),
    ]);
    let view = LiftedView::new(engine.board(), c(6, 4));
    // The ant is its only neighbour
    assert_eq!(
        engine.query_legal_destinations(c(6, 4)).unwrap(),
        rules::destinations(&view, Ant).unwrap()
    );
}

#[test]
fn test_transient_mimicry_keeps_kind() {
    let mut engine = position(&[
        (White, Queen, (6, 4)),
        (White, Grasshopper, (5, 4)),
        (White, Mosquito, (4, 4)),
    ]);
    assert_eq!(engine.query_legal_destinations(c(4, 4)).unwrap(), cells(&[(7, 4)]));
    engine.request_move(White, Mosquito, c(4, 4), c(7, 4)).unwrap();
    let piece = engine.board().top(c(7, 4)).unwrap();
    assert_eq!(piece.kind, Mosquito);
    assert_eq!(piece.born_as, Mosquito);
}

#[test]
fn test_persistent_mimicry_rewrites_kind() {
    let config = EngineConfig { mimicry: MimicryPolicy::Persistent, ..EngineConfig::default() };
    let mut engine = position_with(
        config,
        &[
            (White, Queen, (6, 4)),
            (White, Grasshopper, (5, 4)),
            (White, Mosquito, (4, 4)),
        ],
    );
    engine.request_move(White, Mosquito, c(4, 4), c(7, 4)).unwrap();
    let piece = engine.board().top(c(7, 4)).unwrap();
    assert_eq!(piece.kind, Grasshopper);
    assert_eq!(piece.born_as, Mosquito);

    assert_eq!(
        engine.request_move(White, Mosquito, c(7, 4), c(5, 4)),
        Err(RuleError::NoSuchPiece { kind: Mosquito, cell: c(7, 4) })
    );
}

/// White pillbug at (4,4) between its queen at (3,4), the black queen at
/// (4,3) and a black ant at (5,4).
fn pillbug_position() -> Engine {
    position(&[
        (White, Queen, (3, 4)),
        (White, Pillbug, (4, 4)),
        (Black, Queen, (4, 3)),
        (Black, Ant, (5, 4)),
    ])
}

#[test]
fn test_pillbug_carries_enemy_piece() {
    let mut engine = pillbug_position();
    let queen = engine.board().top(c(4, 3)).unwrap().id;

    // (3,5) is two cells from the black queen: out of reach for its own rule
    assert!(!engine.query_legal_destinations(c(4, 3)).unwrap().contains(&c(3, 5)));
    engine.request_pillbug_special(White, c(4, 4), c(4, 3), c(3, 5)).unwrap();

    assert_eq!(engine.board().top(c(3, 5)).map(|p| p.id), Some(queen));
    assert!(!engine.board().is_occupied(c(4, 3)));
    assert_eq!(engine.player(Black).queen_position(), Some(c(3, 5)));
    assert!(hive::connectivity::is_hive_connected(engine.board()));

    // A piece that was just carried cannot move on the next turn
    assert_eq!(
        engine.request_move(Black, Queen, c(3, 5), c(4, 5)),
        Err(RuleError::JustMoved(c(3, 5)))
    );
    assert!(engine.query_legal_destinations(c(3, 5)).unwrap().is_empty());
}

#[test]
fn test_pillbug_cannot_carry_piece_that_just_moved() {
    let mut engine = pillbug_position();
    engine.request_move(Black, Ant, c(5, 4), c(4, 5)).unwrap();

    let before = engine.clone();
    assert_eq!(
        engine.request_pillbug_special(White, c(4, 4), c(4, 5), c(5, 4)),
        Err(RuleError::JustMoved(c(4, 5)))
    );
    assert_eq!(engine, before);

    // The black queen stayed put, so it can still be carried
    assert!(engine.request_pillbug_special(White, c(4, 4), c(4, 3), c(5, 4)).is_ok());
}

#[test]
fn test_pillbug_rejections() {
    let mut engine = pillbug_position();
    assert_eq!(
        engine.request_pillbug_special(Black, c(4, 4), c(5, 4), c(3, 5)),
        Err(RuleError::NotOwner { cell: c(4, 4), owner: White })
    );
    assert_eq!(
        engine.request_pillbug_special(White, c(3, 4), c(4, 4), c(3, 5)),
        Err(RuleError::NoSuchPiece { kind: Pillbug, cell: c(3, 4) })
    );
    // The white queen may be lifted, but (2,4) is not next to the pillbug
    assert_eq!(
        engine.request_pillbug_special(White, c(4, 4), c(3, 4), c(2, 4)),
        Err(RuleError::GeometryInvalid { kind: Queen, from: c(3, 4), to: c(2, 4) })
    );
    assert_eq!(
        engine.request_pillbug_special(White, c(4, 4), c(4, 5), c(3, 5)),
        Err(RuleError::EmptyCell(c(4, 5)))
    );
}

#[test]
fn test_pillbug_cannot_split_hive() {
    // The ant at (5,4) is the only link to the black queen at (6,4)
    let mut engine = position(&[
        (White, Queen, (3, 4)),
        (White, Pillbug, (4, 4)),
        (Black, Ant, (5, 4)),
        (Black, Queen, (6, 4)),
    ]);
    assert_eq!(
        engine.request_pillbug_special(White, c(4, 4), c(5, 4), c(4, 5)),
        Err(RuleError::WouldDisconnectHive(c(5, 4)))
    );
}

#[test]
fn test_pillbug_cannot_lift_stack() {
    let mut engine = position(&[
        (White, Queen, (3, 4)),
        (White, Pillbug, (4, 4)),
        (Black, Queen, (5, 4)),
        (Black, Beetle, (5, 4)),
    ]);
    assert_eq!(
        engine.request_pillbug_special(White, c(4, 4), c(5, 4), c(4, 5)),
        Err(RuleError::StackedTarget(c(5, 4)))
    );
    assert!(engine.legal_throws(White).iter().all(|(_, target, _)| *target != c(5, 4)));
}

#[test]
fn test_mosquito_borrows_pillbug_power() {
    let mut engine = position(&[
        (White, Queen, (3, 4)),
        (White, Mosquito, (4, 4)),
        (White, Pillbug, (4, 3)),
        (Black, Queen, (5, 4)),
    ]);
    assert!(engine.legal_throws(White).contains(&(c(4, 4), c(5, 4), c(4, 5))));
    engine.request_pillbug_special(White, c(4, 4), c(5, 4), c(4, 5)).unwrap();
    assert_eq!(engine.player(Black).queen_position(), Some(c(4, 5)));
}

#[test]
fn test_beetle_drop_flag() {
    let opening = |config: EngineConfig| {
        let mut engine = Engine::new(config).unwrap();
        engine.request_placement(White, Queen, c(4, 4)).unwrap();
        engine.request_placement(Black, Queen, c(5, 4)).unwrap();
        engine.request_placement(White, Ant, c(3, 4)).unwrap();
        engine.request_placement(Black, Ant, c(6, 4)).unwrap();
        engine
    };

    let mut engine = opening(EngineConfig::default());
    assert_eq!(
        engine.request_placement(White, Spider, c(3, 4)),
        Err(RuleError::OccupiedIllegally(c(3, 4)))
    );
    // Dropping onto the black ant would touch an opposing piece
    assert_eq!(
        engine.request_placement(White, Beetle, c(6, 4)),
        Err(RuleError::AdjacentToOpponent(c(6, 4)))
    );
    engine.request_placement(White, Beetle, c(3, 4)).unwrap();
    assert_eq!(engine.board().height(c(3, 4)), 2);

    let config = EngineConfig { beetle_drop: false, ..EngineConfig::default() };
    let mut engine = opening(config);
    assert_eq!(
        engine.request_placement(White, Beetle, c(3, 4)),
        Err(RuleError::OccupiedIllegally(c(3, 4)))
    );
}

#[test]
fn test_queen_deadline_disabled() {
    let config = EngineConfig { queen_deadline: 0, ..EngineConfig::default() };
    let mut engine = Engine::new(config).unwrap();
    let line = [(4, 4), (5, 4), (3, 4), (6, 4), (2, 4), (7, 4), (1, 4), (8, 4)];
    let kinds = [Ant, Ant, Ant, Ant, Ant, Ant, Spider, Spider];
    for (i, (&cell, &kind)) in line.iter().zip(kinds.iter()).enumerate() {
        let owner = if i % 2 == 0 { White } else { Black };
        engine.request_placement(owner, kind, cell.into()).unwrap();
    }
    assert!(!engine.player(White).is_queen_placed());
    assert_eq!(engine.player(White).placements(), 4);
}
