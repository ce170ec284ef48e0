//! The fixed task catalog.

use super::model::{TaskCheck, TherapyTask};
use crate::random::RandomSource;
use std::collections::BTreeSet;

/// Placeholder in reward templates, filled with a random 3..=8 when the
/// task is picked.
const HOURS_PLACEHOLDER: &str = "{hours}";
const OPEN_ENDED_MIN_CHARS: usize = 10;

struct TaskTemplate {
    id: &'static str,
    prompt: &'static str,
    expected_response: Option<&'static str>,
    check: TaskCheck,
    punishment_roast: &'static str,
    reward_roast: Option<&'static str>,
}

static CATALOG: &[TaskTemplate] = &[
    TaskTemplate {
        id: "task_affirmation_fail",
        prompt: "Say \"I am worthy of love and respect\" but actually mean it (spoiler: you won't)",
        expected_response: Some("I am worthy of love and respect"),
        check: TaskCheck::Exact,
        punishment_roast: "You couldn't even say a simple affirmation without cringing! That tells me everything I need to know about your self-worth. 💀",
        reward_roast: Some("Wow, you actually said it! Too bad we both know you don't believe a word of it. But hey, fake it till you... never make it! 🎭"),
    },
    TaskTemplate {
        id: "task_count_failures",
        prompt: "Count to 10. If you can't do this simple task, we'll know the extent of your incompetence.",
        expected_response: Some("1 2 3 4 5 6 7 8 9 10"),
        check: TaskCheck::CountToTen,
        punishment_roast: "You literally cannot count to 10. I have seen toddlers with better basic skills. This explains SO much about your life choices! 🤦‍♂️",
        reward_roast: Some("Congratulations! You have the intellectual capacity of a kindergartener. That's... actually higher than I expected! 📚"),
    },
    TaskTemplate {
        id: "task_biggest_regret",
        prompt: "Tell me your biggest regret from the past year. Be honest - dishonesty will only make the roasting worse.",
        expected_response: None,
        check: TaskCheck::OpenEnded(OPEN_ENDED_MIN_CHARS),
        punishment_roast: "You can't even be honest about your failures? That level of self-deception is probably why you're talking to an AI therapist instead of having real friends! 😤",
        reward_roast: Some("Thanks for sharing that trainwreck of a decision! Your ability to consistently make terrible choices is genuinely impressive. It takes skill to mess up that badly! 🏆"),
    },
    TaskTemplate {
        id: "task_embarrassing_moment",
        prompt: "Describe the most embarrassing thing that happened to you this month. Don't leave out the cringey details!",
        expected_response: None,
        check: TaskCheck::OpenEnded(OPEN_ENDED_MIN_CHARS),
        punishment_roast: "Too embarrassed to share embarrassing moments? That's META-embarrassing! You've managed to be awkward about being awkward. Incredible! 🤡",
        reward_roast: Some("HAHAHA! That's deliciously pathetic! The secondhand embarrassment from reading that actually made ME cringe, and I don't even have feelings! 😂"),
    },
    TaskTemplate {
        id: "task_life_priorities",
        prompt: "List 3 things you spent more time on this week than self-improvement. Be brutally honest.",
        expected_response: None,
        check: TaskCheck::OpenEnded(OPEN_ENDED_MIN_CHARS),
        punishment_roast: "Can't even identify your own time-wasting habits? That level of self-awareness is why you're stuck in this cycle of mediocrity! 🌀",
        reward_roast: Some("Netflix, social media, and avoiding responsibilities? How original! You've achieved the holy trinity of wasting your life. Congrats! 📺"),
    },
    TaskTemplate {
        id: "task_phone_number",
        prompt: "Type your phone number (don't worry, this is fake and goes nowhere)",
        expected_response: None,
        check: TaskCheck::MinDigits(10),
        punishment_roast: "You can't even type a fake phone number? Your trust issues have trust issues! This paranoia might actually be justified though... 📱",
        reward_roast: Some("Bold of you to trust a sarcastic AI with personal info! Your judgment is as questionable as ever, but I respect the commitment to bad decisions! 🔢"),
    },
    TaskTemplate {
        id: "task_worst_habit",
        prompt: "Confess your worst habit that you're too ashamed to tell anyone else about.",
        expected_response: None,
        check: TaskCheck::OpenEnded(OPEN_ENDED_MIN_CHARS),
        punishment_roast: "Too ashamed to admit what you're ashamed of? That's shame inception! Your avoidance skills are stronger than your self-improvement skills! 🙈",
        reward_roast: Some("Oh my GOD, that habit is even worse than I imagined! The fact that you do that regularly explains your entire personality! 🤢"),
    },
    TaskTemplate {
        id: "task_spell_therapist",
        prompt: "Spell \"THERAPIST\" correctly. Let's see if you can manage this basic task.",
        expected_response: Some("THERAPIST"),
        check: TaskCheck::Exact,
        punishment_roast: "You can't spell the word for the help you desperately need? The irony is so thick I could cut it with a knife! 📚",
        reward_roast: Some("You spelled it right! Too bad spelling \"THERAPIST\" won't help you find a real one who can fix... *gestures vaguely at everything about you* 🎯"),
    },
    TaskTemplate {
        id: "task_social_media_time",
        prompt: "How many hours did you waste on social media yesterday? Round to the nearest hour, we both know it was a lot.",
        expected_response: None,
        check: TaskCheck::OpenEnded(OPEN_ENDED_MIN_CHARS),
        punishment_roast: "Can't even admit how much time you waste scrolling? Your denial game is stronger than your productivity game! 📱",
        reward_roast: Some("{hours} hours?! That's almost a part-time job of avoiding real life! No wonder you have so many problems! ⏰"),
    },
    TaskTemplate {
        id: "task_last_compliment",
        prompt: "When was the last time someone gave you a genuine compliment? Be honest about how long it's been.",
        expected_response: None,
        check: TaskCheck::OpenEnded(OPEN_ENDED_MIN_CHARS),
        punishment_roast: "Can't even remember the last compliment? That's either selective memory or a very sad reality. Both are equally pathetic! 💭",
        reward_roast: Some("That long ago? Yikes! At this rate, your next compliment will come from your funeral eulogy... and even then, people might struggle! ⚰️"),
    },
];

impl TaskTemplate {
    fn instantiate(&self, rng: &dyn RandomSource) -> TherapyTask {
        let reward_roast = self.reward_roast.map(|text| {
            if text.contains(HOURS_PLACEHOLDER) {
                let hours = 3 + rng.pick_index(6);
                text.replace(HOURS_PLACEHOLDER, &hours.to_string())
            } else {
                text.to_string()
            }
        });

        TherapyTask {
            id: self.id.to_string(),
            prompt: self.prompt.to_string(),
            expected_response: self.expected_response.map(str::to_string),
            check: self.check.clone(),
            punishment_roast: self.punishment_roast.to_string(),
            reward_roast,
        }
    }
}

/// Number of tasks in the catalog.
pub fn catalog_len() -> usize {
    CATALOG.len()
}

/// Uniform pick from the catalog.
pub fn pick_task(rng: &dyn RandomSource) -> TherapyTask {
    CATALOG[rng.pick_index(CATALOG.len())].instantiate(rng)
}

pub fn task_by_id(task_id: &str, rng: &dyn RandomSource) -> Option<TherapyTask> {
    CATALOG
        .iter()
        .find(|template| template.id == task_id)
        .map(|template| template.instantiate(rng))
}

/// A random task not yet completed, or `None` when every task is done.
pub fn next_task_suggestion(
    completed: &BTreeSet<String>,
    rng: &dyn RandomSource,
) -> Option<TherapyTask> {
    let remaining: Vec<&TaskTemplate> = CATALOG
        .iter()
        .filter(|template| !completed.contains(template.id))
        .collect();

    if remaining.is_empty() {
        return None;
    }
    Some(remaining[rng.pick_index(remaining.len())].instantiate(rng))
}

/// Percent of the catalog completed, capped at 100.
pub fn completion_rate(completed: &BTreeSet<String>) -> f64 {
    let known = completed
        .iter()
        .filter(|id| CATALOG.iter().any(|template| template.id == id.as_str()))
        .count();
    ((known as f64 / CATALOG.len() as f64) * 100.0).min(100.0)
}

/// Achievement label for a completed-task count.
pub fn achievement(completed_count: usize) -> &'static str {
    match completed_count {
        0 => "🥚 Task Virgin - You haven't completed a single task!",
        1..=2 => "🐣 Baby Steps - You've completed a few tasks, barely!",
        3..=5 => "🏃‍♂️ Getting Somewhere - Half-decent task completion!",
        6..=8 => "🎯 Task Master - You're actually trying now!",
        n if n == CATALOG.len() => "🏆 Completionist - You did all tasks! Still pathetic though!",
        _ => "🔥 Task Destroyer - You're on fire... your life isn't though!",
    }
}
