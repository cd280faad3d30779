//! Line-oriented front end for the estimate wizard.
//!
//! Each step prompts for its fields, showing the draft value in brackets;
//! an empty answer keeps it. Typing `back` at any prompt returns to the
//! previous step without losing anything already entered.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use estimate_core::wizard::{EstimateDraft, EstimateSession, WizardStep};
use estimate_core::{ProjectType, Timeline};
use tracing::debug;

enum Answer {
    Value(String),
    Back,
}

enum Flow {
    Advance,
    Back,
}

struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn ask(&mut self, label: &str, current: &str) -> Result<Answer> {
        if current.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{current}]: ")?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input ended before the estimate was finished");
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("back") {
            Ok(Answer::Back)
        } else if answer.is_empty() {
            Ok(Answer::Value(current.to_string()))
        } else {
            Ok(Answer::Value(answer.to_string()))
        }
    }

    fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref())?;
        Ok(())
    }
}

/// Asks one question; `back` short-circuits the enclosing step.
macro_rules! ask {
    ($prompter:expr, $label:expr, $current:expr) => {
        match $prompter.ask($label, $current)? {
            Answer::Value(value) => value,
            Answer::Back => return Ok(Flow::Back),
        }
    };
}

/// A menu number, or a code typed out.
fn pick_project_type(answer: &str) -> Option<ProjectType> {
    if answer.trim().is_empty() {
        return None;
    }
    match answer.trim().parse::<usize>() {
        Ok(n) => ProjectType::all().get(n.wrapping_sub(1)).cloned(),
        Err(_) => Some(ProjectType::parse(answer)),
    }
}

fn pick_timeline(answer: &str) -> Option<Timeline> {
    match answer.trim().parse::<usize>() {
        Ok(n) => Timeline::all().get(n.wrapping_sub(1)).copied(),
        Err(_) => Timeline::parse(answer),
    }
}

fn prompt_step<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    draft: &mut EstimateDraft,
    step: WizardStep,
) -> Result<Flow> {
    match step {
        WizardStep::ProjectType => {
            for (i, project_type) in ProjectType::all().iter().enumerate() {
                prompter.say(format!("  {}) {}", i + 1, project_type.label()))?;
            }
            let current = draft
                .project_type
                .as_ref()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default();
            let answer = ask!(prompter, "Project type", &current);
            draft.project_type = pick_project_type(&answer);
        }
        WizardStep::Location => {
            draft.location = ask!(prompter, "Project location (city, state)", &draft.location);
        }
        WizardStep::Details => {
            let current = match draft.square_footage {
                0 => String::new(),
                n => n.to_string(),
            };
            let answer = ask!(prompter, "Square footage", &current);
            draft.set_square_footage_input(&answer);

            let answer = ask!(prompter, "Stories", &draft.stories.to_string());
            draft.set_stories_input(&answer);

            let answer = ask!(
                prompter,
                "Construction type (basic/standard/premium/luxury)",
                draft.construction_type.as_str()
            );
            draft.set_construction_type_input(&answer);

            draft.special_requirements = ask!(
                prompter,
                "Special requirements (optional)",
                &draft.special_requirements
            );
        }
        WizardStep::Contact => {
            draft.name = ask!(prompter, "Name", &draft.name);
            draft.email = ask!(prompter, "Email", &draft.email);
            draft.phone = ask!(prompter, "Phone", &draft.phone);
            draft.company = ask!(prompter, "Company (optional)", &draft.company);

            for (i, timeline) in Timeline::all().iter().enumerate() {
                prompter.say(format!("  {}) {}", i + 1, timeline.label()))?;
            }
            let current = draft.timeline.map(|t| t.as_str()).unwrap_or_default();
            let answer = ask!(prompter, "Timeline", current);
            draft.timeline = pick_timeline(&answer);
        }
        WizardStep::Results => {}
    }
    Ok(Flow::Advance)
}

/// Walks `session` to the results step, prompting on `output` and reading
/// answers from `input`. Validation messages are shown and the step repeats.
pub async fn run_interactive<R: BufRead, W: Write>(
    session: &mut EstimateSession,
    input: R,
    output: W,
) -> Result<()> {
    let mut prompter = Prompter { input, output };

    while !session.wizard().is_complete() {
        let step = session.wizard().step();
        prompter.say("")?;
        prompter.say(format!(
            "Step {} of {}: {}",
            step.number(),
            WizardStep::COUNT,
            step.title()
        ))?;

        match prompt_step(&mut prompter, session.wizard_mut().draft_mut(), step)? {
            Flow::Back => {
                debug!(step = step.number(), "user went back");
                session.previous();
                continue;
            }
            Flow::Advance => {}
        }

        if step == WizardStep::Contact {
            prompter.say("Analyzing your project...")?;
        }
        if let Err(reason) = session.next().await {
            prompter.say(format!("  ! {reason}"))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use estimate_core::wizard::SessionConfig;
    use estimate_core::{ConstructionType, Region};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn session() -> EstimateSession {
        EstimateSession::new(SessionConfig {
            processing_delay: Duration::ZERO,
        })
    }

    async fn drive(script: &str) -> (EstimateSession, String, Result<()>) {
        let mut session = session();
        let mut output = Vec::new();
        let result = run_interactive(&mut session, Cursor::new(script), &mut output).await;
        (session, String::from_utf8(output).unwrap(), result)
    }

    #[tokio::test]
    async fn answers_walk_through_every_step() {
        let script = "1\nTacoma, WA\n2,000\n\n\n\nSam Rivera\nsam@example.com\n253-555-0100\n\n2\n";

        let (session, output, result) = drive(script).await;

        result.unwrap();
        let wizard = session.wizard();
        assert!(wizard.is_complete());
        assert_eq!(wizard.record().project_type, Some(ProjectType::Commercial));
        assert_eq!(wizard.record().region, Some(Region::Washington));
        assert_eq!(wizard.record().stories, 1);
        assert_eq!(wizard.record().construction_type, ConstructionType::Standard);
        assert_eq!(wizard.record().timeline, Some(Timeline::OneToThreeMonths));
        assert_eq!(wizard.estimate().unwrap().low, dec!(280500));
        assert!(output.contains("Analyzing your project..."));
    }

    #[tokio::test]
    async fn invalid_answer_repeats_the_step() {
        let script = "1\nWA\nTacoma, WA\n2000\n\n\n\nSam\nsam@example.com\n2535550100\n\nimmediate\n";

        let (session, output, result) = drive(script).await;

        result.unwrap();
        assert!(output.contains("  ! enter a valid location"));
        assert_eq!(output.matches("Step 2 of 5").count(), 2);
        assert_eq!(session.wizard().record().location, "Tacoma, WA");
    }

    #[tokio::test]
    async fn back_keeps_earlier_answers() {
        // Step 2 goes back to step 1, which keeps its answer, then carries on.
        let script = "winery\nback\n\nBoise, ID\n5000\n\n\n\nAna\nana@example.com\n2085550100\n\n4\n";

        let (session, output, result) = drive(script).await;

        result.unwrap();
        assert_eq!(output.matches("Step 1 of 5").count(), 2);
        assert!(output.contains("Project type [winery]: "));
        assert_eq!(session.wizard().record().project_type, Some(ProjectType::Winery));
        assert_eq!(session.wizard().record().timeline, Some(Timeline::SixMonthsPlus));
    }

    #[tokio::test]
    async fn eof_mid_flow_is_an_error() {
        let (session, _, result) = drive("2\nPortland, OR\n").await;

        assert!(result.is_err());
        assert_eq!(session.wizard().step(), WizardStep::Details);
    }

    #[test]
    fn picks_by_number_or_code() {
        assert_eq!(pick_project_type("2"), Some(ProjectType::Medical));
        assert_eq!(pick_project_type("9"), None);
        assert_eq!(pick_project_type("0"), None);
        assert_eq!(
            pick_project_type("barn"),
            Some(ProjectType::Other("barn".to_string()))
        );
        assert_eq!(pick_timeline("3"), Some(Timeline::ThreeToSixMonths));
        assert_eq!(pick_timeline("6months+"), Some(Timeline::SixMonthsPlus));
        assert_eq!(pick_timeline("soon"), None);
    }
}
