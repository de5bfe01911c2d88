use assert_approx_eq::assert_approx_eq;

use tetrad::chord::Chord;
use tetrad::chord::ChordSpace;
use tetrad::chord::VirtualFundamentalFilter;
use tetrad::complexity::Complexity;
use tetrad::fraction::Fraction;
use tetrad::limit::Limit;
use tetrad::math;
use tetrad::voicing;
use tetrad::voicing::PivotVoice;
use tetrad::voicing::VoicingSession;

fn default_space(limit: Limit) -> ChordSpace {
    ChordSpace {
        limit,
        equave_ratio: 2.0,
        complexity: Complexity::Tenney,
        hide_unison_voices: false,
        omit_octaves: false,
        virtual_fundamental_filter: None,
    }
}

fn sample_spaces() -> Vec<ChordSpace> {
    let mut spaces = vec![
        default_space(Limit::odd(9)),
        default_space(Limit::integer(10)),
        default_space(Limit::prime(vec![2, 3, 5], 3)),
    ];
    spaces.push(ChordSpace {
        hide_unison_voices: true,
        omit_octaves: true,
        ..default_space(Limit::odd(7))
    });
    spaces.push(ChordSpace {
        virtual_fundamental_filter: Some("1...4".parse::<VirtualFundamentalFilter>().unwrap()),
        ..default_space(Limit::integer(8))
    });
    spaces
}

#[test]
fn emitted_chords_are_irreducible() {
    for space in sample_spaces() {
        for point in space.enumerate() {
            let gcd = point
                .chord
                .members()
                .map(u64::from)
                .into_iter()
                .fold(0, math::gcd_u64);
            assert_eq!(gcd, 1, "{} is reducible", point.chord);
        }
    }
}

#[test]
fn emitted_chords_are_non_decreasing() {
    for space in sample_spaces() {
        for point in space.enumerate() {
            let members = point.chord.members();
            assert!(
                members.windows(2).all(|pair| pair[0] <= pair[1]),
                "{} is not ordered",
                point.chord
            );
        }
    }
}

#[test]
fn emitted_chords_stay_within_the_equave() {
    for space in sample_spaces() {
        for point in space.enumerate() {
            let members = point.chord.members();
            let span = f64::from(members[3]) / f64::from(members[0]);
            assert!(
                span <= space.equave_ratio + 1e-9,
                "{} spans {span}, beyond the equave",
                point.chord
            );
        }
    }
}

#[test]
fn emitted_intervals_comply_with_the_limit() {
    for space in sample_spaces() {
        for point in space.enumerate() {
            for interval in point.chord.intervals() {
                assert!(
                    space.limit.allows(interval),
                    "{} contains {interval}, beyond the {}",
                    point.chord,
                    space.limit
                );
            }
        }
    }
}

#[test]
fn five_odd_limit_accepts_five_over_four_and_rejects_seven_over_four() {
    let five_limit = Limit::odd(5);
    assert!(five_limit.allows(Fraction::new(5, 4)));
    assert!(!five_limit.allows(Fraction::new(7, 4)));

    let chords = default_space(five_limit)
        .enumerate()
        .into_iter()
        .map(|point| point.chord)
        .collect::<Vec<_>>();
    assert!(chords.contains(&"4:5:6:8".parse::<Chord>().unwrap()));
    assert!(!chords.contains(&"4:5:6:7".parse::<Chord>().unwrap()));
}

#[test]
fn tenney_complexity_is_monotonic_in_the_product() {
    assert_approx_eq!(Complexity::Tenney.rate(Fraction::new(1, 1)), 0.0);

    let mut reduced = vec![];
    for numer in 1..40u64 {
        for denom in 1..40u64 {
            if math::gcd_u64(numer, denom) == 1 {
                reduced.push(Fraction::new(numer, denom));
            }
        }
    }
    for &a in &reduced {
        for &b in &reduced {
            if a.numer() * a.denom() < b.numer() * b.denom() {
                assert!(Complexity::Tenney.rate(a) < Complexity::Tenney.rate(b));
            }
        }
    }
}

#[test]
fn pivot_voice_frequency_is_invariant_across_the_chord_change() {
    // The prior chord is 4:5:6:8 voiced at base 260 Hz.
    let prior = [260.0, 325.0, 390.0, 520.0];
    let frequencies = voicing::resolve_frequencies(
        "3:4:5:6".parse().unwrap(),
        PivotVoice::Bass,
        Some(&prior),
        voicing::DEFAULT_BASE_FREQ_HZ,
    );
    assert_approx_eq!(frequencies[0], 260.0);
    assert_approx_eq!(frequencies[1], 260.0 * 4.0 / 3.0);
    assert_approx_eq!(frequencies[2], 260.0 * 5.0 / 3.0);
    assert_approx_eq!(frequencies[3], 260.0 * 6.0 / 3.0);
}

#[test]
fn first_chord_bootstraps_from_the_initial_base() {
    for (label, pivot) in [
        ("4:5:6:7", PivotVoice::Bass),
        ("3:4:5:6", PivotVoice::Soprano),
        ("5:6:7:9", PivotVoice::Alto),
    ] {
        let chord = label.parse::<Chord>().unwrap();
        let frequencies = voicing::resolve_frequencies(chord, pivot, None, 100.0);
        let members = chord.members().map(f64::from);
        for (voice, frequency) in frequencies.iter().enumerate() {
            assert_approx_eq!(frequency, 100.0 * members[voice] / members[0]);
        }
    }
}

#[test]
fn re_enumeration_is_idempotent() {
    for space in sample_spaces() {
        let first = space.enumerate();
        let second = space.enumerate();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.chord, b.chord);
            assert_eq!(a.cents, b.cents);
            assert_eq!(a.complexity, b.complexity);
        }
    }
}

#[test]
fn malformed_chord_labels_are_rejected_without_touching_the_session() {
    let mut session = VoicingSession::new(100.0);

    assert!("0:4:5:6".parse::<Chord>().is_err());
    assert!("4:5:6".parse::<Chord>().is_err());
    assert!("4:5:6:x".parse::<Chord>().is_err());
    assert_eq!(session.last_frequencies(), None);

    // A valid chord still bootstraps from the initial base afterwards.
    let frequencies = session.play("1:2:3:4".parse().unwrap(), PivotVoice::Bass);
    assert_approx_eq!(frequencies[0], 100.0);
}

#[test]
fn resolved_frequencies_never_degenerate() {
    let mut session = VoicingSession::default();
    let chords = ["1:1:1:1", "3:4:5:6", "7:9:11:13", "1:2:3:4", "5:5:5:7"];
    for (index, label) in chords.iter().cycle().take(50).enumerate() {
        let pivot = PivotVoice::ALL[index % 4];
        let frequencies = session.play(label.parse().unwrap(), pivot);
        assert!(frequencies
            .iter()
            .all(|frequency| frequency.is_finite() && *frequency > 0.0));
    }
}
