use super::*;

#[test]
fn test_parse_and_format() {
    let m = parse_move("e2e4").unwrap();
    assert_eq!(m, Move::new(4, 1, 4, 3));
    assert_eq!(format_move(m), "e2e4");
    assert_eq!(m.to_string(), "e2e4");
    assert_eq!("a1h8".parse::<Move>().unwrap(), Move::new(0, 0, 7, 7));
}

#[test]
fn test_upper_case_and_trailing_whitespace() {
    assert_eq!(parse_move("E2E4").unwrap(), Move::new(4, 1, 4, 3));
    assert_eq!(parse_move("g1f3 \n").unwrap(), Move::new(6, 0, 5, 2));
}

#[test]
fn test_rejects_bad_text() {
    assert_eq!(parse_move("e2e"), Err(MoveTextError::WrongLength(3)));
    assert_eq!(parse_move(""), Err(MoveTextError::WrongLength(0)));
    assert!(matches!(parse_move("e9e4"), Err(MoveTextError::OutOfRange(_))));
    assert!(matches!(parse_move("i2e4"), Err(MoveTextError::OutOfRange(_))));
    assert!(matches!(parse_move(" e2e4"), Err(MoveTextError::OutOfRange(_))));
    assert!(matches!(parse_move("\te2e4\n"), Err(MoveTextError::OutOfRange(_))));
    assert!(matches!(
        parse_move("e7e8q"),
        Err(MoveTextError::TrailingGarbage(_))
    ));
    assert!(matches!(
        parse_move("e2e4 e7e5"),
        Err(MoveTextError::TrailingGarbage(_))
    ));
}

#[test]
fn test_round_trip_all_squares() {
    for x1 in 0..8 {
        for y1 in 0..8 {
            let m = Move::new(x1, y1, 7 - x1, 7 - y1);
            assert_eq!(parse_move(&format_move(m)).unwrap(), m);
        }
    }
}
