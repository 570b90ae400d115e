use std::io::{self, Write};

use quiz_core::model::{PromptId, QuizPrompt, RoundSummary};
use quiz_core::{FeedbackSignal, QuizEvent};
use services::{RoundEvent, RoundProgress};

/// Parse a typed answer; `None` for anything that is not a yes/no word.
pub fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Line-oriented renderer for round events.
pub struct Terminal<W: Write> {
    out: W,
    json: bool,
    color: bool,
    shown_second: Option<(PromptId, u32)>,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            color: !json,
            shown_second: None,
        }
    }

    #[must_use]
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// `position` is 1-based.
    pub fn prompt(&mut self, prompt: &QuizPrompt, position: usize, total: usize) -> io::Result<()> {
        if self.json {
            return self.json_line(&RoundEvent::Presented(prompt.clone()));
        }
        self.shown_second = None;
        writeln!(self.out)?;
        writeln!(self.out, "[{position}/{total}] {}", prompt.text())?;
        writeln!(self.out, "  true or false? (y/n)")?;
        self.out.flush()
    }

    pub fn event(&mut self, event: &RoundEvent) -> io::Result<()> {
        if self.json {
            return self.json_line(event);
        }
        match event {
            RoundEvent::Quiz(QuizEvent::Tick {
                prompt_id,
                remaining_ms,
            }) => self.tick(*prompt_id, *remaining_ms),
            RoundEvent::Quiz(QuizEvent::Feedback(signal)) => self.feedback(signal),
            RoundEvent::Quiz(_) => Ok(()),
            RoundEvent::Recorded { progress, .. } => self.progress(progress),
            // Rendered through `prompt`, which knows the position.
            RoundEvent::Presented(_) => Ok(()),
            RoundEvent::Completed { summary, .. } => self.summary(summary),
        }
    }

    pub fn note(&mut self, message: &str) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "  ({message})")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn tick(&mut self, prompt_id: PromptId, remaining_ms: u32) -> io::Result<()> {
        let second = remaining_ms.div_ceil(1_000);
        if self.shown_second == Some((prompt_id, second)) {
            return Ok(());
        }
        self.shown_second = Some((prompt_id, second));
        writeln!(self.out, "  {second}s")?;
        self.out.flush()
    }

    fn feedback(&mut self, signal: &FeedbackSignal) -> io::Result<()> {
        if signal.haptic.is_some() && self.color {
            write!(self.out, "\x07")?;
        }
        if self.color {
            let c = signal.color;
            writeln!(
                self.out,
                "  \x1b[1;38;2;{};{};{}m{}\x1b[0m",
                c.r, c.g, c.b, signal.label
            )?;
        } else {
            writeln!(self.out, "  {}", signal.label)?;
        }
        if let Some(explanation) = &signal.explanation {
            writeln!(self.out, "  {explanation}")?;
        }
        self.out.flush()
    }

    fn progress(&mut self, progress: &RoundProgress) -> io::Result<()> {
        if progress.correct_streak >= 3 {
            writeln!(self.out, "  streak: {}", progress.correct_streak)?;
        }
        Ok(())
    }

    fn summary(&mut self, summary: &RoundSummary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Round complete")?;
        writeln!(
            self.out,
            "  correct {} / incorrect {} / timed out {} of {}",
            summary.correct(),
            summary.incorrect(),
            summary.timed_out(),
            summary.total()
        )?;
        writeln!(self.out, "  accuracy {:.0}%", summary.accuracy())?;
        if let Some(avg) = summary.average_response_ms() {
            writeln!(self.out, "  average answer time {:.1}s", f64::from(avg) / 1_000.0)?;
        }
        self.out.flush()
    }

    fn json_line(&mut self, event: &RoundEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
