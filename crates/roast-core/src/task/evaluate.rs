//! Task response evaluation.

use super::model::{TaskCheck, TaskResolution, TherapyTask};
use once_cell::sync::Lazy;
use regex::Regex;

/// Appended when a task is skipped or its countdown runs out.
pub const SKIP_ROAST: &str = "Can't even complete a simple task? This explains SO much about your life. Moving on... 🙄\n\nWhat other failures would you like to discuss?";

const GENERIC_SUCCESS_ROAST: &str = "Well, you somehow managed to complete that task. Color me surprised! Your incompetence has limits after all! 🎉";

static COUNT_TO_TEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"1.*2.*3.*4.*5.*6.*7.*8.*9.*10").expect("count-to-ten pattern is valid")
});

/// Canonical form used by exact-match tasks: trimmed, lowercased, internal
/// whitespace collapsed to single spaces, trailing `.`/`!`/`?` dropped.
pub fn canonicalize(text: &str) -> String {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed
        .trim_end_matches(['.', '!', '?'])
        .trim_end()
        .to_string()
}

/// Judges a reply against the task's predicate.
pub fn evaluate(task: &TherapyTask, response: &str) -> bool {
    match &task.check {
        TaskCheck::Exact => match &task.expected_response {
            Some(expected) => canonicalize(response) == canonicalize(expected),
            None => false,
        },
        TaskCheck::CountToTen => {
            let squashed: String = response
                .to_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            COUNT_TO_TEN.is_match(&squashed)
        }
        TaskCheck::MinDigits(min) => response.chars().filter(char::is_ascii_digit).count() >= *min,
        TaskCheck::OpenEnded(min) => response.trim().chars().count() >= *min,
    }
}

/// Reward text on success (generic line if the task has none), punishment
/// text otherwise.
pub fn roast_for(task: &TherapyTask, completed: bool) -> String {
    if completed {
        task.reward_roast
            .clone()
            .unwrap_or_else(|| GENERIC_SUCCESS_ROAST.to_string())
    } else {
        task.punishment_roast.clone()
    }
}

/// Evaluates a reply and picks the matching roast.
pub fn resolve(task: &TherapyTask, response: &str) -> TaskResolution {
    let completed = evaluate(task, response);
    TaskResolution {
        task_id: task.id.clone(),
        completed,
        roast: roast_for(task, completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use crate::task::catalog::task_by_id;

    fn task(id: &str) -> TherapyTask {
        task_by_id(id, &ScriptedRandom::constant(0.0)).unwrap()
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("  I   am\tWorthy  "), "i am worthy");
        assert_eq!(canonicalize("THERAPIST!"), "therapist");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_spell_therapist_case_insensitive() {
        let spell = task("task_spell_therapist");
        assert!(evaluate(&spell, "therapist"));
        assert!(evaluate(&spell, "  THERAPIST "));
        assert!(!evaluate(&spell, "therapits"));
        assert!(!evaluate(&spell, "the rapist"));
    }

    #[test]
    fn test_exact_expected_round_trip() {
        for id in ["task_spell_therapist", "task_affirmation_fail", "task_count_failures"] {
            let t = task(id);
            let expected = t.expected_response.clone().unwrap();
            assert!(evaluate(&t, &canonicalize(&expected)), "{id}");
            assert!(evaluate(&t, &expected), "{id}");
        }
    }

    #[test]
    fn test_exact_rejects_different_canonical_form() {
        let affirmation = task("task_affirmation_fail");
        assert!(evaluate(&affirmation, "i am worthy of love and respect."));
        assert!(!evaluate(&affirmation, "I am worthy of love"));
        assert!(!evaluate(&affirmation, "I am not worthy of love and respect"));
    }

    #[test]
    fn test_count_to_ten() {
        let count = task("task_count_failures");
        assert!(evaluate(&count, "1 2 3 4 5 6 7 8 9 10"));
        assert!(evaluate(&count, "1,2,3,4,5,6,7,8,9,10"));
        assert!(evaluate(&count, "12345678910"));
        assert!(!evaluate(&count, "1 2 3 4 5 6 7 8 9"));
        assert!(!evaluate(&count, "10 9 8 7 6 5 4 3 2 1"));
    }

    #[test]
    fn test_phone_number_digits() {
        let phone = task("task_phone_number");
        assert!(evaluate(&phone, "(555) 123-4567 ext 9"));
        assert!(evaluate(&phone, "5551234567"));
        assert!(!evaluate(&phone, "555-1234"));
    }

    #[test]
    fn test_open_ended_length() {
        let regret = task("task_biggest_regret");
        assert!(evaluate(&regret, "bought crypto"));
        assert!(evaluate(&regret, "  abcdefghij  "));
        assert!(!evaluate(&regret, "  nothing  "));
    }

    #[test]
    fn test_roast_for_branches() {
        let spell = task("task_spell_therapist");
        assert_eq!(roast_for(&spell, true), spell.reward_roast.clone().unwrap());
        assert_eq!(roast_for(&spell, false), spell.punishment_roast);

        let mut bare = spell.clone();
        bare.reward_roast = None;
        assert_eq!(roast_for(&bare, true), GENERIC_SUCCESS_ROAST);
    }

    #[test]
    fn test_resolve() {
        let spell = task("task_spell_therapist");
        let resolution = resolve(&spell, "therapist");
        assert!(resolution.completed);
        assert_eq!(resolution.task_id, "task_spell_therapist");
    }
}
