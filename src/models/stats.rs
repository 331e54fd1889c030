//! Read-only projections over a list's cards: dashboard counters and the statistics table.

use super::Card;
use super::schedule::{WEAK_SUCCESS_RATE, is_new, is_ready_to_practice};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub total: usize,
    pub never_practiced: usize,
    pub ready_to_practice: usize,
    pub known: usize,
}

impl Dashboard {
    pub fn from_cards(cards: &[Card], now: DateTime<Utc>) -> Self {
        Self {
            total: cards.len(),
            never_practiced: cards.iter().filter(|c| is_new(c)).count(),
            ready_to_practice: cards.iter().filter(|c| is_ready_to_practice(c, now)).count(),
            known: cards.iter().filter(|c| c.known).count(),
        }
    }

    pub fn can_learn(&self) -> bool {
        self.never_practiced > 0
    }

    pub fn can_practice(&self) -> bool {
        self.ready_to_practice > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatsFilter {
    #[default]
    AvailableNow,
    NeverPracticed,
    Known,
    All,
}

impl StatsFilter {
    pub const ALL: [StatsFilter; 4] = [
        StatsFilter::AvailableNow,
        StatsFilter::NeverPracticed,
        StatsFilter::Known,
        StatsFilter::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatsFilter::AvailableNow => "Available Now",
            StatsFilter::NeverPracticed => "Never Practiced",
            StatsFilter::Known => "Known Words",
            StatsFilter::All => "All Cards",
        }
    }

    fn accepts(&self, card: &Card, now: DateTime<Utc>) -> bool {
        match self {
            StatsFilter::AvailableNow => is_ready_to_practice(card, now),
            StatsFilter::NeverPracticed => is_new(card),
            StatsFilter::Known => card.known,
            StatsFilter::All => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Word,
    Meaning,
    Gender,
    Note,
    Practiced,
    SuccessRate,
    NextDue,
    Known,
}

impl SortColumn {
    pub const ALL: [SortColumn; 8] = [
        SortColumn::Word,
        SortColumn::Meaning,
        SortColumn::Gender,
        SortColumn::Note,
        SortColumn::Practiced,
        SortColumn::SuccessRate,
        SortColumn::NextDue,
        SortColumn::Known,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Word => "Word",
            SortColumn::Meaning => "Meaning",
            SortColumn::Gender => "Gender",
            SortColumn::Note => "Note",
            SortColumn::Practiced => "Practiced",
            SortColumn::SuccessRate => "Success Rate",
            SortColumn::NextDue => "Next Due",
            SortColumn::Known => "Known",
        }
    }

    fn compare(&self, a: &Card, b: &Card) -> Ordering {
        match self {
            SortColumn::Word => a.word.cmp(&b.word),
            SortColumn::Meaning => a.meaning.cmp(&b.meaning),
            SortColumn::Gender => a.gender.as_str().cmp(b.gender.as_str()),
            SortColumn::Note => a.note.cmp(&b.note),
            SortColumn::Practiced => a.practiced.cmp(&b.practiced),
            SortColumn::SuccessRate => a.success_rate.total_cmp(&b.success_rate),
            // unscheduled cards sort as the epoch
            SortColumn::NextDue => due_millis(a).cmp(&due_millis(b)),
            SortColumn::Known => a.known.cmp(&b.known),
        }
    }
}

fn due_millis(card: &Card) -> i64 {
    card.next_due_at.map(|d| d.timestamp_millis()).unwrap_or(0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuccessLabel {
    NotAvailable,
    Good,
    NeedsWork,
    Poor,
}

impl SuccessLabel {
    pub fn text(&self) -> &'static str {
        match self {
            SuccessLabel::NotAvailable => "N/A",
            SuccessLabel::Good => "Good",
            SuccessLabel::NeedsWork => "Needs work",
            SuccessLabel::Poor => "Poor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DueLabel {
    NotScheduled,
    Overdue,
    DueSoon,
    Scheduled,
}

impl DueLabel {
    pub fn text(&self) -> &'static str {
        match self {
            DueLabel::NotScheduled => "Not scheduled",
            DueLabel::Overdue => "Overdue",
            DueLabel::DueSoon => "Due soon",
            DueLabel::Scheduled => "Scheduled",
        }
    }
}

const NOTE_PREVIEW_CHARS: usize = 50;

/// One row of the statistics table.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsRow {
    pub card_id: String,
    pub word: String,
    pub meaning: String,
    pub gender: &'static str,
    pub note_preview: String,
    pub practiced: bool,
    pub success_rate: Option<f64>,
    pub success_label: SuccessLabel,
    pub next_due_at: Option<DateTime<Utc>>,
    pub due_label: DueLabel,
    pub known: bool,
}

impl StatsRow {
    pub fn from_card(card: &Card, now: DateTime<Utc>) -> Self {
        let (success_rate, success_label) = if card.practiced && card.times_shown > 0 {
            let label = if card.success_rate >= WEAK_SUCCESS_RATE {
                SuccessLabel::Good
            } else if card.success_rate >= 0.5 {
                SuccessLabel::NeedsWork
            } else {
                SuccessLabel::Poor
            };
            (Some(card.success_rate), label)
        } else {
            (None, SuccessLabel::NotAvailable)
        };

        let due_label = match card.next_due_at {
            None => DueLabel::NotScheduled,
            Some(due) if due < now => DueLabel::Overdue,
            Some(due) if due - now < Duration::hours(24) => DueLabel::DueSoon,
            Some(_) => DueLabel::Scheduled,
        };

        Self {
            card_id: card.id.clone(),
            word: card.word.clone(),
            meaning: card.meaning.clone(),
            gender: card.gender.label(),
            note_preview: preview(&card.note),
            practiced: card.practiced,
            success_rate,
            success_label,
            next_due_at: card.next_due_at,
            due_label,
            known: card.known,
        }
    }
}

fn preview(note: &str) -> String {
    if note.chars().count() > NOTE_PREVIEW_CHARS {
        let head: String = note.chars().take(NOTE_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        note.to_string()
    }
}

/// Filters, then sorts when a column is given. Unsorted rows keep list order.
pub fn statistics(
    cards: &[Card],
    filter: StatsFilter,
    sort: Option<(SortColumn, SortOrder)>,
    now: DateTime<Utc>,
) -> Vec<StatsRow> {
    let mut selected: Vec<&Card> = cards.iter().filter(|c| filter.accepts(c, now)).collect();
    if let Some((column, order)) = sort {
        selected.sort_by(|a, b| {
            let ordering = column.compare(a, b);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }
    selected
        .into_iter()
        .map(|c| StatsRow::from_card(c, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn cards() -> Vec<Card> {
        let fresh = Card::new("l", "Apfel", "apple");

        let mut known = Card::new("l", "Baum", "tree");
        known.known = true;
        known.practiced = true;

        let mut due = Card::new("l", "Haus", "house");
        due.practiced = true;
        due.times_shown = 4;
        due.correct_count = 3;
        due.wrong_count = 1;
        due.success_rate = 0.75;
        due.next_due_at = Some(now() - Duration::hours(1));

        let mut waiting = Card::new("l", "Zug", "train");
        waiting.practiced = true;
        waiting.times_shown = 2;
        waiting.correct_count = 2;
        waiting.success_rate = 1.0;
        waiting.next_due_at = Some(now() + Duration::hours(5));

        vec![fresh, known, due, waiting]
    }

    #[test]
    fn test_dashboard_counts() {
        let dashboard = Dashboard::from_cards(&cards(), now());
        assert_eq!(dashboard.total, 4);
        assert_eq!(dashboard.never_practiced, 1);
        assert_eq!(dashboard.ready_to_practice, 1);
        assert_eq!(dashboard.known, 1);
        assert!(dashboard.can_learn());
        assert!(dashboard.can_practice());
    }

    #[test]
    fn test_filters() {
        let cards = cards();
        let words = |filter| -> Vec<String> {
            statistics(&cards, filter, None, now())
                .into_iter()
                .map(|r| r.word)
                .collect()
        };
        assert_eq!(words(StatsFilter::AvailableNow), vec!["Haus"]);
        assert_eq!(words(StatsFilter::NeverPracticed), vec!["Apfel"]);
        assert_eq!(words(StatsFilter::Known), vec!["Baum"]);
        assert_eq!(words(StatsFilter::All).len(), 4);
    }

    #[test]
    fn test_sort_by_next_due_treats_none_as_epoch() {
        let rows = statistics(
            &cards(),
            StatsFilter::All,
            Some((SortColumn::NextDue, SortOrder::Descending)),
            now(),
        );
        assert_eq!(rows[0].word, "Zug");
        assert_eq!(rows[1].word, "Haus");
    }

    #[test]
    fn test_sort_by_word_ascending() {
        let rows = statistics(
            &cards(),
            StatsFilter::All,
            Some((SortColumn::Word, SortOrder::Ascending)),
            now(),
        );
        let words: Vec<&str> = rows.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["Apfel", "Baum", "Haus", "Zug"]);
    }

    #[test]
    fn test_row_labels() {
        let cards = cards();
        let fresh = StatsRow::from_card(&cards[0], now());
        assert_eq!(fresh.success_label, SuccessLabel::NotAvailable);
        assert_eq!(fresh.due_label, DueLabel::NotScheduled);

        let due = StatsRow::from_card(&cards[2], now());
        assert_eq!(due.success_label, SuccessLabel::Good);
        assert_eq!(due.due_label, DueLabel::Overdue);

        let waiting = StatsRow::from_card(&cards[3], now());
        assert_eq!(waiting.due_label, DueLabel::DueSoon);
    }

    #[test]
    fn test_note_preview_truncates() {
        let mut card = Card::new("l", "a", "b");
        card.note = "x".repeat(60);
        let row = StatsRow::from_card(&card, now());
        assert_eq!(row.note_preview.len(), 53);
        assert!(row.note_preview.ends_with("..."));
    }
}
