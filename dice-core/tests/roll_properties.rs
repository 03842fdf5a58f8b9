//! Behavioral tests for complete rolls through the controller.
//!
//! Every test drives a real `DiceController` with manual time and a seeded
//! RNG, so they are deterministic and need no audio or speech hardware.

use dice_core::testing::{SpeechEvent, TestHarness};
use dice_core::{DieValue, RollerConfig, TickOutcome, Verdict, VoiceInfo};

fn voice(id: &str, lang: &str) -> VoiceInfo {
    VoiceInfo {
        id: id.to_string(),
        name: id.to_string(),
        lang: lang.to_string(),
    }
}

#[test]
fn test_final_dice_match_count_and_range() {
    for count in 1..=8u8 {
        for seed in 0..20 {
            let mut h = TestHarness::with_seed(seed);
            h.set_count(count);
            let (outcome, _) = h.roll_to_completion();

            assert!(outcome.is_some());
            let dice = h.controller.dice();
            assert_eq!(dice.len(), count as usize);
            assert!(dice
                .values()
                .iter()
                .all(|v| (DieValue::MIN..=DieValue::MAX).contains(&v.get())));
        }
    }
}

#[test]
fn test_total_is_sum_of_final_dice() {
    for seed in 0..50 {
        let mut h = TestHarness::with_seed(seed);
        h.set_count(5);
        let (outcome, _) = h.roll_to_completion();
        let outcome = outcome.unwrap();

        let sum: u32 = h.controller.dice().values().iter().map(|v| v.get() as u32).sum();
        assert_eq!(outcome.total, sum);
        assert_eq!(h.controller.total(), Some(sum));
    }
}

#[test]
fn test_verdict_follows_threshold() {
    for count in 1..=8u8 {
        for seed in 0..20 {
            let mut h = TestHarness::with_seed(seed * 31 + count as u64);
            h.set_count(count);
            let (outcome, _) = h.roll_to_completion();
            let outcome = outcome.unwrap();

            let expected = if outcome.total >= count as u32 * 3 {
                Verdict::Win
            } else {
                Verdict::Lose
            };
            assert_eq!(outcome.verdict, expected);
        }
    }
}

#[test]
fn test_three_dice_scenario() {
    let mut h = TestHarness::with_seed(9);
    h.set_count(3);
    let (outcome, shuffles) = h.roll_to_completion();
    let outcome = outcome.unwrap();

    assert!((3..=18).contains(&outcome.total));
    assert_eq!(outcome.verdict.is_win(), outcome.total >= 9);
    assert_eq!(shuffles, 12);
}

#[test]
fn test_single_die_scenario() {
    for seed in 0..30 {
        let mut h = TestHarness::with_seed(seed);
        let (outcome, _) = h.roll_to_completion();
        let outcome = outcome.unwrap();

        let face = h.controller.dice().values()[0].get() as u32;
        assert_eq!(outcome.total, face);
        assert_eq!(outcome.verdict.is_win(), face >= 3);
    }
}

#[test]
fn test_count_clamps_at_bounds() {
    let mut h = TestHarness::with_seed(0);
    h.controller.adjust(-1);
    assert_eq!(h.controller.count().get(), 1);

    h.controller.adjust(20);
    assert_eq!(h.controller.count().get(), 8);
    h.controller.adjust(1);
    assert_eq!(h.controller.count().get(), 8);
    assert_eq!(h.controller.dice().len(), 8);
}

#[test]
fn test_count_change_clears_total() {
    let mut h = TestHarness::with_seed(4);
    h.set_count(2);
    h.roll_to_completion();
    assert!(h.controller.total().is_some());

    h.controller.adjust(1);
    assert_eq!(h.controller.total(), None);
    assert_eq!(h.controller.verdict(), None);
}

#[test]
fn test_clamped_adjust_keeps_total() {
    let mut h = TestHarness::with_seed(4);
    h.roll_to_completion();
    let total = h.controller.total();
    assert!(total.is_some());

    // Already at the minimum: the count does not change, so nothing clears.
    h.controller.adjust(-1);
    assert_eq!(h.controller.total(), total);
}

#[test]
fn test_growing_preserves_existing_and_pads_ones() {
    let mut h = TestHarness::with_seed(12);
    h.set_count(3);
    h.roll_to_completion();
    let before = h.controller.dice().values().to_vec();

    h.set_count(6);
    let after = h.controller.dice().values();
    assert_eq!(&after[..3], before.as_slice());
    assert!(after[3..].iter().all(|v| *v == DieValue::ONE));
}

#[test]
fn test_shrinking_keeps_prefix() {
    let mut h = TestHarness::with_seed(13);
    h.set_count(7);
    h.roll_to_completion();
    let before = h.controller.dice().values().to_vec();

    h.set_count(4);
    assert_eq!(h.controller.dice().values(), &before[..4]);
}

#[test]
fn test_adjust_and_roll_are_noops_while_rolling() {
    let mut h = TestHarness::with_seed(5);
    h.set_count(2);
    h.controller.roll();
    h.fire();

    let dice = h.controller.dice().clone();
    let pending = h.timer.pending();
    let scheduled = h.timer.scheduled_count();

    h.controller.adjust(1);
    h.controller.adjust(-1);
    h.controller.roll();

    assert_eq!(h.controller.count().get(), 2);
    assert_eq!(h.controller.dice(), &dice);
    assert_eq!(h.timer.pending(), pending);
    assert_eq!(h.timer.scheduled_count(), scheduled);
    assert!(h.controller.is_rolling());
    assert_eq!(h.controller.total(), None);
}

#[test]
fn test_three_increments_from_one() {
    let mut h = TestHarness::with_seed(21);
    h.roll_to_completion();
    let first = h.controller.dice().values()[0];

    for _ in 0..3 {
        h.controller.adjust(1);
    }

    assert_eq!(h.controller.count().get(), 4);
    assert_eq!(
        h.controller.dice().values(),
        &[first, DieValue::ONE, DieValue::ONE, DieValue::ONE]
    );
    assert_eq!(h.controller.total(), None);
}

#[test]
fn test_total_absent_while_rolling() {
    let mut h = TestHarness::with_seed(2);
    h.roll_to_completion();
    assert!(h.controller.total().is_some());

    h.controller.roll();
    assert_eq!(h.controller.total(), None);
    while let Some(outcome) = h.fire() {
        if outcome == TickOutcome::Shuffle {
            assert_eq!(h.controller.total(), None);
        }
    }
    assert!(h.controller.total().is_some());
}

#[test]
fn test_one_burst_per_tick_and_audio_opened_once() {
    let mut h = TestHarness::with_seed(8);
    assert_eq!(h.audio.open_count(), 0);

    // Every shuffle plus the settling tick rattles.
    let (_, shuffles) = h.roll_to_completion();
    assert_eq!(shuffles, 12);
    assert_eq!(h.audio.burst_count(), shuffles + 1);
    assert_eq!(h.audio.open_count(), 1);

    let (_, more) = h.roll_to_completion();
    assert_eq!(h.audio.burst_count(), shuffles + more + 2);
    assert_eq!(h.audio.open_count(), 1);
}

#[test]
fn test_settling_tick_rattles() {
    let mut h = TestHarness::with_seed(8);
    h.controller.roll();

    let mut bursts_before = 0;
    while let Some(outcome) = h.fire() {
        if outcome == TickOutcome::Settle {
            assert_eq!(h.audio.burst_count(), bursts_before + 1);
            break;
        }
        bursts_before = h.audio.burst_count();
    }
    assert!(h.controller.total().is_some());
}

#[test]
fn test_audio_opened_by_first_adjust() {
    let mut h = TestHarness::with_seed(8);
    h.controller.adjust(1);
    assert_eq!(h.audio.open_count(), 1);
    assert!(h.controller.audio_active());
}

#[test]
fn test_verdict_spoken_once_per_roll() {
    let mut h = TestHarness::with_seed(17);
    h.set_count(4);
    let (outcome, _) = h.roll_to_completion();
    let outcome = outcome.unwrap();

    let spoken = h.speech.spoken();
    assert_eq!(spoken.len(), 1);
    let config = RollerConfig::default();
    let expected = if outcome.verdict.is_win() {
        &config.speech.win_phrase
    } else {
        &config.speech.lose_phrase
    };
    assert_eq!(&spoken[0].text, expected);
    assert_eq!(spoken[0].pitch, 1.6);
    assert_eq!(spoken[0].rate, 1.1);
    assert_eq!(spoken[0].lang, "en-US");
    // Empty voice list: engine default.
    assert!(spoken[0].voice.is_none());
    assert_eq!(h.speech.cancel_count(), 1);
}

#[test]
fn test_speech_cancelled_before_each_verdict() {
    let mut h = TestHarness::with_seed(17);
    h.roll_to_completion();
    h.roll_to_completion();

    let events = h.speech.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], SpeechEvent::Cancel);
    assert!(matches!(events[1], SpeechEvent::Speak(_)));
    assert_eq!(events[2], SpeechEvent::Cancel);
    assert!(matches!(events[3], SpeechEvent::Speak(_)));
}

#[test]
fn test_voice_list_loaded_after_first_roll() {
    let mut h = TestHarness::with_seed(23);

    // Nothing loaded yet: engine default, no retry.
    h.roll_to_completion();
    assert_eq!(h.speech.spoken().len(), 1);
    assert!(h.speech.last_spoken().unwrap().voice.is_none());

    h.speech
        .set_voices(vec![voice("fr", "fr-FR"), voice("gb", "en-GB")]);
    h.roll_to_completion();

    let last = h.speech.last_spoken().unwrap();
    assert_eq!(h.speech.spoken().len(), 2);
    assert_eq!(last.voice.map(|v| v.id), Some("gb".to_string()));
    assert_eq!(last.lang, "en-US");
}

#[test]
fn test_exact_language_voice_preferred() {
    let mut config = RollerConfig::default();
    config.speech.lang = "fr-CA".to_string();
    let mut h = TestHarness::new(config, 2);
    h.speech.set_voices(vec![
        voice("fr", "fr-FR"),
        voice("ca", "fr_CA"),
        voice("us", "en-US"),
    ]);

    h.roll_to_completion();
    let last = h.speech.last_spoken().unwrap();
    assert_eq!(last.voice.map(|v| v.id), Some("ca".to_string()));
}

#[test]
fn test_disabled_capabilities_still_roll() {
    let mut config = RollerConfig::default();
    config.audio.enabled = false;
    config.speech.enabled = false;

    let mut h = TestHarness::new(config, 3);
    h.set_count(3);
    let (outcome, _) = h.roll_to_completion();

    assert!(outcome.is_some());
    assert_eq!(h.audio.open_count(), 0);
    assert_eq!(h.audio.burst_count(), 0);
    assert!(h.speech.spoken().is_empty());
}

#[test]
fn test_shutdown_mid_roll() {
    let mut h = TestHarness::with_seed(6);
    h.controller.roll();
    h.fire();
    let (delay, token) = h.timer.pending().unwrap();

    h.controller.shutdown();
    assert!(h.timer.pending().is_none());
    assert!(!h.controller.audio_active());
    assert!(h.speech.cancel_count() >= 1);

    h.clock.advance(delay);
    let dice = h.controller.dice().clone();
    assert_eq!(h.controller.on_tick(token), TickOutcome::Stale);
    assert_eq!(h.controller.dice(), &dice);
    assert_eq!(h.controller.total(), None);
}

#[test]
fn test_drop_cancels_pending_tick() {
    let h = TestHarness::with_seed(6);
    let timer = h.timer.clone();
    let TestHarness { mut controller, .. } = h;
    controller.roll();
    assert!(timer.pending().is_some());

    drop(controller);
    assert!(timer.pending().is_none());
}
