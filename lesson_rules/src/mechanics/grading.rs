//! Answer grading for quiz and exercise scenes.
//!
//! A grading function returns `Ok(true)` for a correct answer, `Ok(false)` for a
//! wrong one, and `Err` when the answer is malformed and should not be judged at all.

use std::collections::HashSet;
use thiserror::Error;

use crate::content::DragItem;

/// Reasons an answer cannot be graded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("option {index} does not exist, there are {count} options")]
    OptionOutOfRange { index: usize, count: usize },

    #[error("expected {expected} selections, got {actual}")]
    WrongSelectionCount { expected: usize, actual: usize },

    #[error("option {0} was selected more than once")]
    DuplicateSelection(usize),

    #[error("only {placed} of {total} items have been placed")]
    Incomplete { placed: usize, total: usize },
}

fn check_index(index: usize, count: usize) -> Result<(), AnswerError> {
    if index >= count {
        return Err(AnswerError::OptionOutOfRange { index, count });
    }
    Ok(())
}

/// Check that `indexes` has exactly `expected` distinct entries below `count`.
fn check_distinct(indexes: &[usize], expected: usize, count: usize) -> Result<(), AnswerError> {
    if indexes.len() != expected {
        return Err(AnswerError::WrongSelectionCount {
            expected,
            actual: indexes.len(),
        });
    }
    let mut seen = HashSet::new();
    for &index in indexes {
        check_index(index, count)?;
        if !seen.insert(index) {
            return Err(AnswerError::DuplicateSelection(index));
        }
    }
    Ok(())
}

/// Single-answer multiple choice.
pub fn grade_choice(correct: usize, chosen: usize, option_count: usize) -> Result<bool, AnswerError> {
    check_index(chosen, option_count)?;
    Ok(chosen == correct)
}

pub fn grade_true_false(answer: bool, given: bool) -> bool {
    answer == given
}

/// The selection must have as many entries as there are correct options,
/// and then match them exactly.
pub fn grade_multi_select(
    correct: &[usize],
    selected: &[usize],
    option_count: usize,
) -> Result<bool, AnswerError> {
    check_distinct(selected, correct.len(), option_count)?;
    let wanted: HashSet<_> = correct.iter().collect();
    Ok(selected.iter().all(|s| wanted.contains(s)))
}

/// Lowercase, trim, and collapse runs of whitespace.
pub fn normalize_answer(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn grade_fill_blank(accepted: &[String], answer: &str) -> bool {
    let answer = normalize_answer(answer);
    !answer.is_empty() && accepted.iter().any(|a| normalize_answer(a) == answer)
}

/// `placements[i]` is the target item `i` currently sits on.
pub fn grade_drag_drop(items: &[DragItem], placements: &[Option<usize>]) -> Result<bool, AnswerError> {
    let placed = placements.iter().filter(|p| p.is_some()).count();
    if placements.len() != items.len() || placed != items.len() {
        return Err(AnswerError::Incomplete {
            placed,
            total: items.len(),
        });
    }
    Ok(items
        .iter()
        .zip(placements)
        .all(|(item, placed)| *placed == Some(item.target)))
}

/// `order` lists step indexes as the player arranged them.
pub fn grade_sequence(step_count: usize, order: &[usize]) -> Result<bool, AnswerError> {
    check_distinct(order, step_count, step_count)?;
    Ok(order.iter().enumerate().all(|(position, step)| position == *step))
}

/// `pairs` holds `(left, right)` links; every left term must be linked once.
pub fn grade_matching(count: usize, pairs: &[(usize, usize)]) -> Result<bool, AnswerError> {
    let lefts: Vec<usize> = pairs.iter().map(|(l, _)| *l).collect();
    let rights: Vec<usize> = pairs.iter().map(|(_, r)| *r).collect();
    check_distinct(&lefts, count, count)?;
    check_distinct(&rights, count, count)?;
    Ok(pairs.iter().all(|(l, r)| l == r))
}
