//! The format mini-language contract: symbols, escapes, validation.

use tempus_format::{analyze, FormatError, TimeUnitType};

#[test]
fn the_four_unit_symbols_are_recognized() {
    let semantic = analyze("HH:MM:SS.LLL").unwrap();
    for unit in TimeUnitType::ALL {
        assert!(semantic.has(unit), "{unit:?} should be configured");
    }
    assert_eq!(semantic.smallest_unit(), TimeUnitType::RemMillis);
    assert_eq!(semantic.largest_unit(), TimeUnitType::Hours);
}

#[test]
fn any_other_character_is_literal_text() {
    let semantic = analyze("elapsed MM min SS sec").unwrap();
    assert_eq!(semantic.stripped_format(), "elapsed MM min SS sec");
    assert!(!semantic.has(TimeUnitType::Hours));
    assert!(semantic.has(TimeUnitType::Minutes));
}

#[test]
fn hash_escapes_a_following_unit_symbol() {
    let semantic = analyze("H#H MM").unwrap();
    // One unescaped hours run; the escaped letter is plain text.
    assert_eq!(semantic.stripped_format(), "HH MM");
    let hours = semantic.position_of(TimeUnitType::Hours);
    assert_eq!((hours.start(), hours.end()), (0, 0));
}

#[test]
fn hash_before_anything_else_stays_literal() {
    let semantic = analyze("## SS").unwrap();
    assert_eq!(semantic.stripped_format(), "## SS");
}

#[test]
fn fully_escaped_formats_are_rejected() {
    assert!(matches!(
        analyze("#H#M#S#L"),
        Err(FormatError::NoNecessarySymbols { .. })
    ));
}

#[test]
fn split_runs_are_rejected() {
    assert!(matches!(
        analyze("SS:LL SS"),
        Err(FormatError::NonContiguousFormatSymbols { symbol: 'S', .. })
    ));
}

#[test]
fn hours_with_seconds_but_no_minutes_is_rejected() {
    assert!(matches!(
        analyze("HH:SS"),
        Err(FormatError::IllegalCombination { .. })
    ));
}

#[test]
fn skipping_seconds_before_subseconds_is_rejected() {
    for format in ["HH:MM:LL", "MM:LL"] {
        assert!(
            matches!(analyze(format), Err(FormatError::IllegalCombination { .. })),
            "{format} should be rejected"
        );
    }
}

#[test]
fn validation_failures_never_produce_a_semantic() {
    // Errors are synchronous and permanent: the same input fails the same
    // way every time.
    let first = analyze("HH:SS").unwrap_err();
    let second = analyze("HH:SS").unwrap_err();
    assert_eq!(first, second);
}
