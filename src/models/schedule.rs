//! Interval-ladder spaced repetition.
//!
//! Every card sits on one rung of a fixed ladder of retry intervals:
//! - A first answer in a learn session always puts the card on rung 1
//! - In practice sessions a correct answer climbs one rung, a wrong one drops one rung
//! - The rung is clamped to the ladder at both ends
//! - The next due time is `now + ladder[rung]` minutes
//!
//! A card whose accuracy is below 70% is always ready, whatever its due time.

use super::{Card, SessionKind};
use chrono::{DateTime, Duration, Utc};

/// Retry intervals in minutes, from one hour up to six months.
pub const LADDER_MINUTES: [i64; 13] = [
    60, 300, 720, 1440, 2880, 4320, 10080, 20160, 43200, 129600, 172800, 216000, 259200,
];

/// Cards answered with lower accuracy skip the timer.
pub const WEAK_SUCCESS_RATE: f64 = 0.7;

const TOP_RUNG: usize = LADDER_MINUTES.len() - 1;

/// Records one answer on `card` and moves it along the ladder.
pub fn apply_outcome(card: &mut Card, is_correct: bool, kind: SessionKind, now: DateTime<Utc>) {
    card.times_shown += 1;
    if is_correct {
        card.correct_count += 1;
    } else {
        card.wrong_count += 1;
    }
    card.success_rate = card.computed_success_rate();
    card.last_asked_at = Some(now);

    card.schedule_index = match kind {
        SessionKind::Learn => {
            card.practiced = true;
            1
        }
        SessionKind::Practice if is_correct => (card.schedule_index + 1).min(TOP_RUNG),
        SessionKind::Practice => card.schedule_index.min(TOP_RUNG).saturating_sub(1),
    };

    card.next_due_at = Some(now + interval_for(card.schedule_index));
}

/// Length of the wait on a rung. Out-of-range rungs use the top rung.
pub fn interval_for(rung: usize) -> Duration {
    Duration::minutes(LADDER_MINUTES[rung.min(TOP_RUNG)])
}

/// Practiced, not known, and either weak or due.
pub fn is_ready_to_practice(card: &Card, now: DateTime<Utc>) -> bool {
    if !card.practiced || card.known {
        return false;
    }
    if card.success_rate < WEAK_SUCCESS_RATE {
        return true;
    }
    match card.next_due_at {
        Some(due) => now >= due,
        None => true,
    }
}

/// Never answered in a learn session and not known.
pub fn is_new(card: &Card) -> bool {
    !card.practiced && !card.known
}
