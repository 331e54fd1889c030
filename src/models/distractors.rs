//! Wrong options for multiple-choice questions.
use super::{AnswerOption, Card, Direction};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

pub const DISTRACTOR_COUNT: usize = 3;

/// Uniform sample, without replacement, of up to three sibling cards:
/// same list, not the target, not known.
pub fn pick_distractors<'a, R: Rng + ?Sized>(
    card: &Card,
    pool: &'a [Card],
    rng: &mut R,
) -> Vec<&'a Card> {
    let candidates: Vec<&Card> = pool
        .iter()
        .filter(|c| c.id != card.id && c.list_id == card.list_id && !c.known)
        .collect();

    candidates
        .choose_multiple(rng, DISTRACTOR_COUNT)
        .copied()
        .collect()
}

/// The target plus its distractors, shuffled, as displayed answers.
pub fn build_options<R: Rng + ?Sized>(
    card: &Card,
    distractors: &[&Card],
    direction: Direction,
    rng: &mut R,
) -> Vec<AnswerOption> {
    let mut options: Vec<AnswerOption> = std::iter::once(card)
        .chain(distractors.iter().copied())
        .map(|c| AnswerOption {
            card_id: c.id.clone(),
            value: direction.answer_of(c).to_string(),
            image: c.image.trim().to_string(),
        })
        .collect();
    options.shuffle(rng);
    options
}
