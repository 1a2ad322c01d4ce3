//! Tests for lattice addressing.

use eos_rules::{Cell, CoordinateError, Direction};

#[test]
fn test_parse_format_round_trip_for_every_cell() {
    for cell in Cell::all() {
        assert_eq!(Cell::parse(&cell.format()), Ok(cell));
    }
}

#[test]
fn test_validity_follows_parity() {
    for cell in Cell::all() {
        assert_eq!(cell.is_valid(), (cell.col() + cell.row()) % 2 == 1, "{}", cell);
    }
    assert_eq!(Cell::playable().count(), 111);
}

#[test]
fn test_alternating_row_widths() {
    for row in 1..=13u8 {
        let width = Cell::playable().filter(|c| c.row() == row).count();
        let expected = if row % 2 == 1 { 9 } else { 8 };
        assert_eq!(width, expected, "row {}", row);
    }
}

#[test]
fn test_parse_rejects_out_of_bounds_and_garbage() {
    assert_eq!(Cell::parse(""), Err(CoordinateError::Empty));
    assert!(matches!(Cell::parse("R1"), Err(CoordinateError::Column { .. })));
    assert!(matches!(Cell::parse("A0"), Err(CoordinateError::Row { .. })));
    assert!(matches!(Cell::parse("A14"), Err(CoordinateError::Row { .. })));
    assert!(matches!(Cell::parse("A1x"), Err(CoordinateError::Row { .. })));
    assert!(matches!(Cell::parse("1A"), Err(CoordinateError::Column { .. })));
}

#[test]
fn test_parse_accepts_lower_case_and_off_lattice_cells() {
    assert_eq!(Cell::parse("q13").unwrap().to_string(), "Q13");
    let off_lattice = Cell::parse("A2").unwrap();
    assert!(!off_lattice.is_valid());
}

#[test]
fn test_step_stops_at_edges() {
    let corner = Cell::parse("A1").unwrap();
    assert_eq!(corner.step(Direction::SouthWest, 1), None);
    assert_eq!(corner.step(Direction::NorthWest, 1), None);
    assert_eq!(corner.step(Direction::NorthEast, 3), Cell::parse("D4").ok());
    assert_eq!(corner.step(Direction::NorthEast, 0), Some(corner));
    assert_eq!(corner.step(Direction::NorthEast, 13), None);
}

#[test]
fn test_steps_stay_on_lattice() {
    for cell in Cell::playable() {
        for direction in Direction::ALL {
            for distance in 1..=4 {
                if let Some(next) = cell.step(direction, distance) {
                    assert!(next.is_valid(), "{} -> {}", cell, next);
                }
            }
        }
    }
}
