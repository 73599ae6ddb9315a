//! Responder behavior over the built-in rule table.

use kozi_core::{FALLBACK_CATEGORY, Responder, RuleTable};
use kozi_test_utils::SequenceRandom;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn responder(draws: Vec<usize>) -> Responder {
    Responder::new(RuleTable::builtin(), Arc::new(SequenceRandom::new(draws)))
}

#[test]
fn classification_follows_rule_order() {
    let responder = Responder::default();
    let cases = [
        ("Hi", "greeting"),
        ("Good Morning!", "greeting"),
        ("I need support", "help"),
        ("career advice", "job"),
        ("edit profile", "profile"),
        ("premium plan", "payment"),
        ("privacy policy", "guidelines"),
        ("I appreciate it", "thanks"),
        ("farewell", "goodbye"),
        ("qqq", FALLBACK_CATEGORY),
    ];
    for (input, expected) in cases {
        assert_eq!(responder.classify(input), expected, "input: {input}");
    }
}

#[test]
fn draws_select_each_reply_in_turn() {
    let responder = responder(vec![0, 1, 2, 3]);
    let replies: Vec<String> = (0..4).map(|_| responder.respond("bye")).collect();
    let expected = RuleTable::builtin()
        .category("goodbye")
        .expect("goodbye")
        .replies()
        .to_vec();
    assert_eq!(replies, expected);
}

#[test]
fn fallback_covers_unmatched_input() {
    let responder = responder(vec![5]);
    assert_eq!(
        responder.respond("qqq"),
        "That's a good question! Could you provide more context so I can give you the best answer?"
    );
}

#[test]
fn out_of_range_draws_wrap_into_category() {
    let responder = responder(vec![7]);
    assert_eq!(
        responder.respond("thank you"),
        "Glad I could help! Let me know if you have other questions."
    );
}
