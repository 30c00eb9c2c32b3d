//! Behavioral tests for the assertion chain, driven through a recording reporter.

#![allow(clippy::panic, clippy::panic_in_result_fn)]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use chrono::{FixedOffset, Local, TimeDelta, TimeZone, Utc};
use fluent_assert::{Config, Detail, Recorder, Value, that};
use pretty_assertions::assert_eq;

struct Case {
    x: Value,
    y: Value,
    pass: bool,
}

fn case(x: impl Into<Value>, y: impl Into<Value>, pass: bool) -> Case {
    Case {
        x: x.into(),
        y: y.into(),
        pass,
    }
}

#[track_caller]
fn assert_failed(recorder: &Recorder) {
    assert!(
        recorder.did_fail(),
        "expected the test to fail, but didn't fail"
    );
}

#[track_caller]
fn assert_passed(recorder: &Recorder) {
    assert!(
        !recorder.did_fail(),
        "expected the test to pass, but failed: {}",
        recorder.fail_message()
    );
}

#[track_caller]
fn assert_failure_message(recorder: &Recorder, expected: &str) {
    let message = recorder.fail_message();
    assert!(
        !message.is_empty(),
        "expected failure message to be like '{expected}' but was empty"
    );

    let Some((_, body)) = message.split_once("× Recorder") else {
        panic!("invalid failure message '{message}'");
    };

    assert!(
        body.trim().contains(expected),
        "expected failure message to be like '{expected}' but was like '{}'",
        body.trim()
    );
}

#[track_caller]
fn assert_exact_failure(recorder: &Recorder, expected: &str) {
    assert_eq!(
        recorder.fail_message(),
        format!("\n\n× Recorder\n{expected}\n\n")
    );
}

#[track_caller]
fn assert_helper_count(recorder: &Recorder, count: usize) {
    assert_eq!(
        recorder.helper_call_count(),
        count,
        "unexpected helper call count"
    );
}

#[test]
fn is_equal_to() {
    let cases = [
        case(4, 3, false),
        case(4, 4, true),
        case(4, 4i16, false),
        case("Hello", 4, false),
        case("Hello", "Hello", true),
        case("Hellp", "Hello", false),
        case(Value::Nil, 4, false),
        case(Value::Nil, Value::Nil, true),
        case(Value::Nil, None::<i32>, false),
        case(None::<i32>, None::<i32>, true),
        case(None::<i32>, None::<i16>, false),
    ];

    for case in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, case.x.clone()).is_equal_to(case.y.clone());

        if case.pass {
            assert_passed(&recorder);
            assert_helper_count(&recorder, 2);
        } else {
            assert_failed(&recorder);
            assert_failure_message(
                &recorder,
                &format!("Expected {} to be equal to {}", case.x, case.y),
            );
            assert_helper_count(&recorder, 3);
        }
    }
}

#[test]
fn is_equal_to_names_differing_types() {
    let mut recorder = Recorder::new();
    that(&mut recorder, 4).is_equal_to(4i16);

    assert_failure_message(&recorder, "Expected 4 to be equal to 4\nx: i32\ny: i16");
}

#[test]
fn is_not_equal_to() {
    let cases = [
        case(4, 3, true),
        case(4, 4, false),
        case("Hello", 4, true),
        case("Hello", "Hello", false),
        case("Hellp", "Hello", true),
        case(Value::Nil, 4, true),
        case(Value::Nil, Value::Nil, false),
        case(Value::Nil, None::<i32>, true),
    ];

    for case in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, case.x.clone()).is_not_equal_to(case.y.clone());

        if case.pass {
            assert_passed(&recorder);
            assert_helper_count(&recorder, 2);
        } else {
            assert_failed(&recorder);
            assert_failure_message(
                &recorder,
                &format!("Expected {} to not be equal to {}", case.x, case.y),
            );
            assert_helper_count(&recorder, 3);
        }
    }
}

#[test]
fn is_nil() {
    let cases: [(Value, bool); 6] = [
        (4.into(), false),
        ("Hello".into(), false),
        (None::<String>.into(), true),
        (Value::Nil, true),
        (None::<i32>.into(), true),
        (Some(4).into(), false),
    ];

    for (x, pass) in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, x.clone()).is_nil();

        if pass {
            assert_passed(&recorder);
            assert_helper_count(&recorder, 2);
        } else {
            assert_failed(&recorder);
            assert_failure_message(&recorder, &format!("Expected {x} to be <nil>"));
            assert_helper_count(&recorder, 3);
        }
    }
}

#[test]
fn is_not_nil() {
    let cases: [(Value, bool); 6] = [
        (4.into(), true),
        ("Hello".into(), true),
        (None::<String>.into(), false),
        (Value::Nil, false),
        (None::<i32>.into(), false),
        (Some(4).into(), true),
    ];

    for (x, pass) in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, x).is_not_nil();

        if pass {
            assert_passed(&recorder);
            assert_helper_count(&recorder, 2);
        } else {
            assert_failed(&recorder);
            assert_failure_message(&recorder, "Expected subject to not be <nil>, but was");
            assert_helper_count(&recorder, 3);
        }
    }
}

#[derive(Debug, PartialEq)]
struct Empty;

#[test]
fn has_equivalent_sequence_to_expects_slices() {
    let mut recorder = Recorder::new();

    that(&mut recorder, 5).has_equivalent_sequence_to(Value::opaque(Empty));

    assert_failed(&recorder);
    assert_helper_count(&recorder, 3);
    assert_failure_message(
        &recorder,
        "Expected both subject and comparator to be slices, but subject was a i32 and comparator was a struct",
    );
}

#[test]
fn has_equivalent_sequence_to_expects_same_slice_type() {
    let mut recorder = Recorder::new();

    that(&mut recorder, vec![1, 2, 3]).has_equivalent_sequence_to(vec![1u8, 2, 3]);

    assert_failed(&recorder);
    assert_helper_count(&recorder, 3);
    assert_failure_message(&recorder, "Expected subject to have type like [u8] but was [i32]");
}

#[test]
fn has_equivalent_sequence_to_expects_equal_length() {
    let mut recorder = Recorder::new();

    that(&mut recorder, vec![1u8, 2, 3]).has_equivalent_sequence_to(vec![1u8, 2, 3, 4]);

    assert_failed(&recorder);
    assert_helper_count(&recorder, 3);
    assert_failure_message(&recorder, "Expected subject to have length 4 but had length 3");
}

#[test]
fn has_equivalent_sequence_to_expects_same_sequence() {
    let mut recorder = Recorder::new();

    that(&mut recorder, vec![1u8, 2, 3]).has_equivalent_sequence_to(vec![1u8, 2, 4]);

    assert_failed(&recorder);
    assert_helper_count(&recorder, 3);
    assert_failure_message(
        &recorder,
        "Expected sequence of elements in\n\n[1 2 3]\n\nto be equal to sequence of elements in\n\n[1 2 4]",
    );
}

#[test]
fn has_equivalent_sequence_to_success() {
    let mut recorder = Recorder::new();

    that(&mut recorder, vec![1u8, 2, 3]).has_equivalent_sequence_to(&[1u8, 2, 3][..]);

    assert_passed(&recorder);
    assert_helper_count(&recorder, 2);
}

#[test]
fn is_true_non_boolean() {
    let cases: [Value; 5] = [
        4.into(),
        "Hello".into(),
        Value::Nil,
        None::<bool>.into(),
        Some(true).into(),
    ];

    for x in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, x).is_true();

        assert_failed(&recorder);
        assert_failure_message(&recorder, "Expected <true>, but was not a boolean");
        assert_helper_count(&recorder, 3);
    }
}

#[test]
#[allow(clippy::eq_op)]
fn is_true() {
    let cases = [(4 == 4, true), ("Hello" == "Hello", true), (4 == 5, false), (true, true)];

    for (x, pass) in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, x).is_true();

        if pass {
            assert_passed(&recorder);
            assert_helper_count(&recorder, 2);
        } else {
            assert_failed(&recorder);
            assert_failure_message(&recorder, "Expected <true>, but was <false>");
            assert_helper_count(&recorder, 3);
        }
    }
}

#[test]
fn is_false_non_boolean() {
    let cases: [Value; 5] = [
        4.into(),
        "Hello".into(),
        Value::Nil,
        None::<bool>.into(),
        Some(false).into(),
    ];

    for x in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, x).is_false();

        assert_failed(&recorder);
        assert_failure_message(&recorder, "Expected <false>, but was not a boolean");
        assert_helper_count(&recorder, 3);
    }
}

#[test]
#[allow(clippy::eq_op)]
fn is_false() {
    let cases = [(4 == 4, false), ("Hello" == "Hello", false), (4 == 5, true), (true, false)];

    for (x, pass) in cases {
        let mut recorder = Recorder::new();
        that(&mut recorder, x).is_false();

        if pass {
            assert_passed(&recorder);
            assert_helper_count(&recorder, 2);
        } else {
            assert_failed(&recorder);
            assert_failure_message(&recorder, "Expected <false>, but was <true>");
            assert_helper_count(&recorder, 3);
        }
    }
}

struct OrderedCase {
    x: Value,
    y: Value,
    gt: bool,
    gte: bool,
    lt: bool,
    lte: bool,
}

fn ordered(x: impl Into<Value>, y: impl Into<Value>, expected: [bool; 4]) -> OrderedCase {
    let [gt, gte, lt, lte] = expected;
    OrderedCase {
        x: x.into(),
        y: y.into(),
        gt,
        gte,
        lt,
        lte,
    }
}

#[track_caller]
fn assert_outcome(recorder: &Recorder, pass: bool) {
    if pass {
        assert_passed(recorder);
    } else {
        assert_failed(recorder);
    }
}

#[test]
fn ordered_comparisons() {
    let fixed_time = Utc::now();
    let second = TimeDelta::seconds(1);
    let minute = TimeDelta::minutes(1);

    let cases = [
        ordered(5, 5, [false, true, false, true]),
        ordered(4, 5, [false, false, true, true]),
        ordered(6, 5, [true, true, false, false]),
        ordered(5.5, 5.5, [false, true, false, true]),
        ordered(4.5, 5.5, [false, false, true, true]),
        ordered(6.5, 5.5, [true, true, false, false]),
        ordered(5u8, 5i64, [false, true, false, true]),
        ordered(4i16, 5u8, [false, false, true, true]),
        ordered(6i32, 5usize, [true, true, false, false]),
        ordered(5.5f64, 5.5f32, [false, true, false, true]),
        ordered(4.5, 5.5f64, [false, false, true, true]),
        ordered(6.5f32, 5.5, [true, true, false, false]),
        ordered(fixed_time + second, fixed_time, [true, true, false, false]),
        ordered(
            fixed_time + second,
            fixed_time + minute,
            [false, false, true, true],
        ),
        ordered(fixed_time, fixed_time, [false, true, false, true]),
    ];

    for case in cases {
        let mut rgt = Recorder::new();
        let mut rgte = Recorder::new();
        let mut rlt = Recorder::new();
        let mut rlte = Recorder::new();

        that(&mut rgt, case.x.clone()).is_greater_than(case.y.clone());
        that(&mut rgte, case.x.clone()).is_greater_than_or_equal_to(case.y.clone());
        that(&mut rlt, case.x.clone()).is_less_than(case.y.clone());
        that(&mut rlte, case.x.clone()).is_less_than_or_equal_to(case.y.clone());

        assert_outcome(&rgt, case.gt);
        assert_outcome(&rgte, case.gte);
        assert_outcome(&rlt, case.lt);
        assert_outcome(&rlte, case.lte);
    }
}

#[test]
fn ordering_failure_names_the_relation() {
    let mut recorder = Recorder::new();
    that(&mut recorder, 4).is_greater_than_or_equal_to(5);

    assert_failed(&recorder);
    assert_helper_count(&recorder, 3);
    assert_failure_message(&recorder, "Expected 4 to be greater than or equal to 5");
}

#[test]
fn non_ordered_types() {
    let mut recorder = Recorder::new();

    that(&mut recorder, 5.5).is_greater_than(5);

    assert_failed(&recorder);
    assert_helper_count(&recorder, 3);
    assert_failure_message(&recorder, "Expected two comparable types\nx: f64\ny: i32");
}

#[test]
fn type_lines_name_the_dynamic_types() {
    let mut recorder = Recorder::new();
    that(&mut recorder, 4).is_nil();
    assert_exact_failure(&recorder, "Expected 4 to be <nil>\nx: i32");

    let mut recorder = Recorder::new();
    that(&mut recorder, Some(4)).is_nil();
    assert_exact_failure(&recorder, "Expected 4 to be <nil>\nx: Option<i32>");

    let mut recorder = Recorder::new();
    that(&mut recorder, None::<i32>).is_not_nil();
    assert_exact_failure(
        &recorder,
        "Expected subject to not be <nil>, but was\nx: Option<i32>",
    );

    let mut recorder = Recorder::new();
    that(&mut recorder, Value::Nil).is_not_nil();
    assert_exact_failure(&recorder, "Expected subject to not be <nil>, but was\nx: <nil>");

    let mut recorder = Recorder::new();
    that(&mut recorder, Value::Nil).is_true();
    assert_exact_failure(&recorder, "Expected <true>, but was not a boolean\nx: <nil>");

    let mut recorder = Recorder::new();
    that(&mut recorder, "Hello").is_false();
    assert_exact_failure(&recorder, "Expected <false>, but was not a boolean\nx: String");

    let mut recorder = Recorder::new();
    that(&mut recorder, false).is_true();
    assert_exact_failure(&recorder, "Expected <true>, but was <false>");

    let mut recorder = Recorder::new();
    that(&mut recorder, 4).is_not_equal_to(4);
    assert_exact_failure(&recorder, "Expected 4 to not be equal to 4\nx: i32\ny: i32");
}

#[test]
fn compact_detail_omits_type_lines() {
    let compact = Config::default().with_detail(Detail::Compact);

    let mut recorder = Recorder::new();
    that(&mut recorder, 4)
        .with_config(compact)
        .is_not_equal_to(4);
    assert_exact_failure(&recorder, "Expected 4 to not be equal to 4");

    let mut recorder = Recorder::new();
    that(&mut recorder, 4).with_config(compact).is_nil();
    assert_exact_failure(&recorder, "Expected 4 to be <nil>");
}

#[test]
fn ordered_comparisons_across_time_representations() -> Result<()> {
    let offset = FixedOffset::east_opt(5 * 3600 + 1800)
        .ok_or_else(|| anyhow::anyhow!("invalid offset"))?;
    let fixed_time = Utc::now();
    let second = TimeDelta::seconds(1);

    let cases = [
        ordered(
            (fixed_time + second).with_timezone(&offset),
            fixed_time,
            [true, true, false, false],
        ),
        ordered(
            fixed_time,
            (fixed_time + second).with_timezone(&offset),
            [false, false, true, true],
        ),
        ordered(
            fixed_time.with_timezone(&offset),
            fixed_time,
            [false, true, false, true],
        ),
        ordered(
            (fixed_time - second).with_timezone(&Local),
            fixed_time,
            [false, false, true, true],
        ),
        ordered(
            fixed_time.with_timezone(&Local),
            fixed_time.with_timezone(&offset),
            [false, true, false, true],
        ),
        ordered(
            SystemTime::from(fixed_time + second),
            fixed_time.with_timezone(&Local),
            [true, true, false, false],
        ),
        ordered(
            SystemTime::from(fixed_time),
            fixed_time.with_timezone(&offset),
            [false, true, false, true],
        ),
        ordered(
            SystemTime::from(fixed_time),
            SystemTime::from(fixed_time + second),
            [false, false, true, true],
        ),
    ];

    for case in cases {
        let mut rgt = Recorder::new();
        let mut rgte = Recorder::new();
        let mut rlt = Recorder::new();
        let mut rlte = Recorder::new();

        that(&mut rgt, case.x.clone()).is_greater_than(case.y.clone());
        that(&mut rgte, case.x.clone()).is_greater_than_or_equal_to(case.y.clone());
        that(&mut rlt, case.x.clone()).is_less_than(case.y.clone());
        that(&mut rlte, case.x.clone()).is_less_than_or_equal_to(case.y.clone());

        assert_outcome(&rgt, case.gt);
        assert_outcome(&rgte, case.gte);
        assert_outcome(&rlt, case.lt);
        assert_outcome(&rlte, case.lte);
    }

    Ok(())
}

#[test]
fn same_instant_in_different_zones_is_not_equal() {
    let now = Utc::now();

    let mut recorder = Recorder::new();
    that(&mut recorder, now).is_equal_to(now.with_timezone(&Local));

    assert_failed(&recorder);
    assert_failure_message(&recorder, "x: DateTime<Utc>\ny: DateTime<Local>");
}

#[test]
fn ordering_failure_prints_instants() -> Result<()> {
    let instant = Utc
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous instant"))?;
    let offset = FixedOffset::east_opt(3600).ok_or_else(|| anyhow::anyhow!("invalid offset"))?;

    let mut recorder = Recorder::new();
    that(&mut recorder, instant).is_greater_than(instant.with_timezone(&offset));
    assert_exact_failure(
        &recorder,
        "Expected 2024-01-02 03:04:05 UTC to be greater than 2024-01-02 04:04:05 +01:00",
    );

    let mut recorder = Recorder::new();
    that(&mut recorder, SystemTime::from(instant)).is_less_than(instant);
    assert_exact_failure(
        &recorder,
        "Expected 2024-01-02 03:04:05 UTC to be less than 2024-01-02 03:04:05 UTC",
    );

    Ok(())
}

#[test]
fn system_times_beyond_the_utc_range() {
    let far = UNIX_EPOCH + Duration::from_secs(1 << 50);

    let mut recorder = Recorder::new();
    that(&mut recorder, far).is_greater_than(UNIX_EPOCH);
    assert_passed(&recorder);

    let mut recorder = Recorder::new();
    that(&mut recorder, far).is_greater_than(Utc::now());
    assert_failed(&recorder);
    assert_failure_message(
        &recorder,
        "Expected two comparable types\nx: SystemTime\ny: DateTime<Utc>",
    );

    let mut recorder = Recorder::new();
    that(&mut recorder, far).is_equal_to(4);
    assert_failed(&recorder);
    assert_failure_message(&recorder, "Expected SystemTime {");
    assert_failure_message(&recorder, "x: SystemTime\ny: i32");
}
