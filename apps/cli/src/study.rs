//! Interactive study loops.
//!
//! Both modes run on the same [`SessionDriver`]; the only differences
//! are the rating prompt and which cards the driver fetched.

use std::io::{self, BufRead, Write};

use anyhow::Context;

use study_core::session::{SessionDriver, SessionProgress, StudyBackend};
use study_core::types::{Quality, StudyMode};

use crate::client::ApiClient;

/// Run one study session to completion.
pub async fn run(set_id: i64, mode: StudyMode, client: ApiClient) -> anyhow::Result<()> {
    let mut driver = SessionDriver::new(client);
    driver.start(set_id, mode).await.context("could not start session")?;

    match driver.progress() {
        SessionProgress::NoCardsDue => {
            if mode == StudyMode::Spaced {
                println!("No cards due for review. Come back later.");
            } else {
                println!("This set has no flashcards yet.");
            }
            return Ok(());
        }
        SessionProgress::Reviewing { total, .. } => {
            println!("Studying {total} card(s) in {} mode.\n", mode.as_str());
        }
        _ => return Ok(()),
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(card) = driver.current_card() {
        let card_id = card.id;
        let front = card.front.clone();
        let back = card.back.clone();

        let (position, total) = match driver.progress() {
            SessionProgress::Reviewing { position, total } => (position, total),
            _ => break,
        };

        println!("Card {} of {}", position + 1, total);
        println!("  Q: {front}");
        prompt("  [enter to flip] ")?;
        lines.next();
        println!("  A: {back}");

        let quality = match mode {
            StudyMode::Simple => read_simple_rating(&mut lines)?,
            StudyMode::Spaced => read_quality_rating(&mut lines)?,
        };

        match driver.record_review(card_id, quality).await {
            Ok(outcome) => {
                if mode == StudyMode::Spaced {
                    if let Some(days) = outcome.and_then(|o| o.interval_days) {
                        println!("  Next review in {days} day(s).");
                    }
                }
            }
            // Cursor did not move; the same card comes up again.
            Err(err) => println!("  Review failed: {err}. Try again."),
        }
        println!();
    }

    if driver.is_complete() {
        driver.end().await.context("could not end session")?;
        print_summary(&driver);
    }
    Ok(())
}

fn print_summary<B: StudyBackend>(driver: &SessionDriver<B>) {
    let Some(record) = driver.session() else { return };
    println!("Session complete.");
    println!("  Studied: {}", record.cards_studied);
    println!("  Correct: {}", record.cards_correct);
    if let Some(accuracy) = record.accuracy() {
        println!("  Accuracy: {accuracy:.0}%");
    }
    if let Some(minutes) = record.duration_minutes() {
        println!("  Duration: {minutes:.1} min");
    }
}

fn read_simple_rating(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> anyhow::Result<Quality> {
    loop {
        prompt("  Did you get it right? [y/n] ")?;
        let line = next_line(lines)?;
        match line.trim() {
            "y" | "Y" | "yes" => return Ok(Quality::from_simple(true)),
            "n" | "N" | "no" => return Ok(Quality::from_simple(false)),
            _ => println!("  Please answer y or n."),
        }
    }
}

fn read_quality_rating(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> anyhow::Result<Quality> {
    loop {
        prompt("  How well did you recall it? [0-5] ")?;
        let line = next_line(lines)?;
        if let Some(quality) = line.trim().parse::<u8>().ok().and_then(Quality::new) {
            return Ok(quality);
        }
        println!("  Please enter a number from 0 (blackout) to 5 (perfect).");
    }
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> anyhow::Result<String> {
    lines
        .next()
        .transpose()
        .context("failed to read input")?
        .context("input closed")
}

fn prompt(text: &str) -> anyhow::Result<()> {
    print!("{text}");
    io::stdout().flush().context("failed to flush stdout")
}
