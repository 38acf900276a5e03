use super::*;

fn cycler(phrases: &[&str]) -> TypingCycler {
    TypingCycler::new(phrases.iter().copied()).expect("cycler")
}

/// Ticks until the text next becomes empty, checking the prefix invariant
/// on every step. Returns the texts observed along the way.
fn run_one_phrase(cycler: &mut TypingCycler) -> Vec<String> {
    let mut seen = Vec::new();
    loop {
        let phrase = cycler.current_phrase().to_string();
        cycler.tick();
        if cycler.displayed().is_empty() {
            return seen;
        }
        assert!(
            phrase.starts_with(cycler.displayed()),
            "{:?} is not a prefix of {phrase:?}",
            cycler.displayed()
        );
        seen.push(cycler.displayed().to_string());
    }
}

#[test]
fn rejects_empty_phrase_list() {
    let err = TypingCycler::new(Vec::<String>::new()).expect_err("must fail");
    assert_eq!(err, TypingError::NoPhrases);
}

#[test]
fn rejects_zero_delays() {
    let timing = TypingTiming {
        delete_delay: Duration::ZERO,
        ..TypingTiming::default()
    };
    let err = TypingCycler::with_timing(["hi"], timing).expect_err("must fail");
    assert_eq!(err, TypingError::ZeroDelay);
}

#[test]
fn starts_empty_and_typing_on_first_phrase() {
    let cycler = cycler(&["abc", "de"]);
    assert_eq!(cycler.displayed(), "");
    assert_eq!(cycler.phrase_index(), 0);
    assert_eq!(cycler.mode(), TypingMode::Typing);
    assert_eq!(cycler.initial_delay(), DEFAULT_TYPE_DELAY);
}

#[test]
fn types_holds_then_deletes_with_declared_delays() {
    let mut cycler = cycler(&["abc", "de"]);

    assert_eq!(cycler.tick(), DEFAULT_TYPE_DELAY);
    assert_eq!(cycler.displayed(), "a");
    assert_eq!(cycler.tick(), DEFAULT_TYPE_DELAY);
    assert_eq!(cycler.displayed(), "ab");

    assert_eq!(cycler.tick(), DEFAULT_HOLD);
    assert_eq!(cycler.displayed(), "abc");
    assert_eq!(cycler.mode(), TypingMode::Paused);

    assert_eq!(cycler.tick(), DEFAULT_DELETE_DELAY);
    assert_eq!(cycler.displayed(), "ab");
    assert_eq!(cycler.mode(), TypingMode::Deleting);
    assert_eq!(cycler.tick(), DEFAULT_DELETE_DELAY);
    assert_eq!(cycler.displayed(), "a");

    assert_eq!(cycler.tick(), DEFAULT_TYPE_DELAY);
    assert_eq!(cycler.displayed(), "");
    assert_eq!(cycler.mode(), TypingMode::Typing);
    assert_eq!(cycler.phrase_index(), 1);
    assert_eq!(cycler.current_phrase(), "de");
}

#[test]
fn length_strictly_increases_while_typing_and_decreases_while_deleting() {
    let mut cycler = cycler(&["portfolio"]);
    let mut previous = cycler.displayed_len();
    for _ in 0..200 {
        let mode = cycler.mode();
        cycler.tick();
        let now = cycler.displayed_len();
        match mode {
            TypingMode::Typing => assert_eq!(now, previous + 1),
            TypingMode::Paused | TypingMode::Deleting => assert_eq!(now + 1, previous),
        }
        previous = now;
    }
}

#[test]
fn wraps_from_last_phrase_to_first() {
    let phrases = ["one", "two", "three"];
    let mut cycler = cycler(&phrases);
    let mut order = Vec::new();
    for _ in 0..4 {
        order.push(cycler.current_phrase().to_string());
        let seen = run_one_phrase(&mut cycler);
        assert!(seen.iter().any(|text| text == order.last().expect("phrase")));
    }
    assert_eq!(order, ["one", "two", "three", "one"]);
    assert_eq!(cycler.phrase_index(), 1);
}

#[test]
fn single_phrase_list_cycles_onto_itself() {
    let mut cycler = cycler(&["solo"]);
    run_one_phrase(&mut cycler);
    assert_eq!(cycler.phrase_index(), 0);
    assert_eq!(cycler.mode(), TypingMode::Typing);
}

#[test]
fn single_character_phrase_holds_then_clears() {
    let mut cycler = cycler(&["x", "yz"]);
    assert_eq!(cycler.tick(), DEFAULT_HOLD);
    assert_eq!(cycler.displayed(), "x");
    assert_eq!(cycler.tick(), DEFAULT_TYPE_DELAY);
    assert_eq!(cycler.displayed(), "");
    assert_eq!(cycler.current_phrase(), "yz");
}

#[test]
fn empty_phrase_is_held_and_skipped() {
    let mut cycler = cycler(&["", "ok"]);
    assert_eq!(cycler.tick(), DEFAULT_HOLD);
    assert_eq!(cycler.mode(), TypingMode::Paused);
    assert_eq!(cycler.tick(), DEFAULT_TYPE_DELAY);
    assert_eq!(cycler.current_phrase(), "ok");
}

#[test]
fn multibyte_phrases_never_split_a_char() {
    let mut cycler = cycler(&["héllo wörld", "日本"]);
    for _ in 0..100 {
        cycler.tick();
        assert!(cycler.current_phrase().starts_with(cycler.displayed()));
        assert_eq!(cycler.displayed().chars().count(), cycler.displayed_len());
    }
}

#[test]
fn progress_applies_due_ticks_and_carries_remainder() {
    let mut cycler = cycler(&["abcd"]);

    assert_eq!(cycler.progress(Duration::from_millis(100)), 0);
    assert_eq!(cycler.displayed(), "");

    assert_eq!(cycler.progress(Duration::from_millis(50)), 1);
    assert_eq!(cycler.displayed(), "a");

    assert_eq!(cycler.progress(Duration::from_millis(450)), 3);
    assert_eq!(cycler.displayed(), "abcd");
    assert_eq!(cycler.mode(), TypingMode::Paused);

    assert_eq!(cycler.progress(Duration::from_millis(1999)), 0);
    assert_eq!(cycler.progress(Duration::from_millis(1 + 30)), 2);
    assert_eq!(cycler.displayed(), "ab");
}

#[test]
fn custom_timing_is_reported_by_tick() {
    let timing = TypingTiming {
        type_delay: Duration::from_millis(10),
        delete_delay: Duration::from_millis(5),
        hold: Duration::from_millis(100),
    };
    let mut cycler = TypingCycler::with_timing(["ab"], timing).expect("cycler");
    assert_eq!(cycler.initial_delay(), Duration::from_millis(10));
    assert_eq!(cycler.tick(), Duration::from_millis(10));
    assert_eq!(cycler.tick(), Duration::from_millis(100));
    assert_eq!(cycler.tick(), Duration::from_millis(5));
}
