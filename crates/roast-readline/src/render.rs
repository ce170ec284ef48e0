//! Terminal rendering of transcript entries and prompts.

use std::time::Duration;

use colored::{ColoredString, Colorize};
use roast_application::{StatusReport, TurnOutcome};
use roast_core::conversation::IgnoreReason;
use roast_core::paywall::PaywallPrompt;
use roast_core::session::{Message, RoastTier, Sender};
use roast_core::task::TherapyTask;

fn tier_color(text: &str, tier: Option<RoastTier>) -> ColoredString {
    match tier {
        Some(RoastTier::Nuclear) => text.bright_red(),
        Some(RoastTier::Medium) => text.yellow(),
        _ => text.bright_blue(),
    }
}

pub fn message(message: &Message) {
    match message.sender {
        Sender::User => println!("{}", format!("> {}", message.content).green()),
        Sender::Ai => {
            let label = match message.roast_tier {
                Some(tier) => format!("[!THERAPIST · {}]", tier.as_str().to_uppercase()),
                None => "[!THERAPIST]".to_string(),
            };
            println!("{}", label.bright_magenta());
            for line in message.content.lines() {
                if message.is_paywall_response {
                    println!("{}", line.magenta());
                } else if message.is_task {
                    println!("{}", line.cyan());
                } else {
                    println!("{}", tier_color(line, message.roast_tier));
                }
            }
            println!();
        }
    }
}

/// AI messages only; user lines were already echoed at the prompt.
pub fn outcome(outcome: &TurnOutcome, countdown: Duration) {
    if let Some(reason) = outcome.ignored {
        ignored(reason);
        return;
    }
    for entry in outcome.messages.iter().filter(|m| !m.is_from_user()) {
        message(entry);
    }
    if let Some(prompt) = &outcome.paywall {
        paywall(prompt);
    }
    if let Some(assigned) = &outcome.task {
        task(assigned, countdown);
    }
}

pub fn ignored(reason: IgnoreReason) {
    let text = match reason {
        IgnoreReason::Busy => "Hold on, still composing your last roast.",
        IgnoreReason::EmptyInput => "Silence. Bold choice.",
        IgnoreReason::NothingPending => "There's nothing to respond to right now.",
    };
    println!("{}", text.bright_black());
}

pub fn paywall(prompt: &PaywallPrompt) {
    println!("{}", "═".repeat(48).bright_red());
    for line in prompt.message.lines() {
        println!("{}", line.bright_red().bold());
    }
    println!("{}", prompt.confession_prompt.yellow());
    println!(
        "{}",
        format!(
            "/pay to send {} · /confess <text> · /dismiss · or just type your answer",
            prompt.payment_amount
        )
        .bright_black()
    );
    println!("{}", "═".repeat(48).bright_red());
}

pub fn task(task: &TherapyTask, countdown: Duration) {
    println!("{}", "🧠 THERAPY TASK".bright_cyan().bold());
    println!("{}", task.prompt.cyan());
    println!(
        "{}",
        format!(
            "You have {} seconds. Type your answer or /skip.",
            countdown.as_secs()
        )
        .bright_black()
    );
}

pub fn status(report: &StatusReport) {
    println!("{}", "=== Session Status ===".bright_magenta().bold());
    println!("User:          {}", report.username);
    println!("Messages:      {}", report.message_count);
    println!("Roast tier:    {}", tier_color(report.tier.as_str(), Some(report.tier)));
    println!(
        "Paywall:       hit={} paid={} confessed={}",
        report.has_hit_paywall, report.has_paid, report.has_confessed
    );
    println!("Session age:   {} min", report.session_minutes);
    println!(
        "Tasks:         {}/{} ({:.0}%)",
        report.completed_tasks, report.total_tasks, report.completion_rate
    );
    println!("Achievement:   {}", report.achievement);
    if let Some(task) = &report.next_task {
        println!("Try next:      {}", task.prompt.bright_cyan());
    }
    if let Some(remark) = report.paywall_remark {
        println!("{}", remark.yellow());
    }
}

pub fn help() {
    println!("{}", "Just type to talk. Commands:".bright_black());
    for (cmd, text) in [
        ("/pay", "pay the (fake) paywall"),
        ("/confess <text>", "confess instead of paying"),
        ("/dismiss", "close the paywall without answering"),
        ("/skip", "skip the current therapy task"),
        ("/status", "show session stats"),
        ("/reset", "forget everything and start over"),
        ("quit", "leave"),
    ] {
        println!("  {}{}", format!("{:<18}", cmd).bright_cyan(), text.bright_black());
    }
}
