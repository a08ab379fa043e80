//! The `confquiz play` command.
//!
//! Runs one session in the terminal: every question is shown with lettered
//! options, answered, then rated for confidence. Once all questions are
//! answered the session is submitted, rendered, and exported.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use confquiz_client::load_config_from;
use confquiz_core::model::{Confidence, Locale};
use confquiz_core::options::{option_label, parse_option_label};
use confquiz_core::{SessionController, SessionOutcome};
use confquiz_report::{text, SessionResult};

pub async fn execute(
    config_path: Option<PathBuf>,
    language: Option<Locale>,
    seed: Option<u64>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let service = Arc::new(config.create_service()?);

    let mut controller = SessionController::new(service);
    if let Some(seed) = seed {
        controller = controller.with_shuffle_seed(seed);
    }
    let locale = language.unwrap_or(config.language);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    let Some(outcome) = play(&controller, locale, &mut input, &mut output).await? else {
        return Ok(());
    };

    let result = SessionResult::from_outcome(&outcome);
    println!("\n{}", text::render(&result));
    let path = result.export(&config.output_dir)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

enum Step {
    Next,
    Quit,
}

/// Drive `controller` from `input` until the session is submitted or the
/// user quits. Returns `None` when the session was abandoned.
pub(crate) async fn play<R: BufRead, W: Write>(
    controller: &SessionController,
    mut locale: Locale,
    input: &mut R,
    out: &mut W,
) -> Result<Option<SessionOutcome>> {
    while let Err(e) = controller.start().await {
        let message = controller.last_error().unwrap_or_else(|| e.to_string());
        writeln!(out, "Could not start quiz: {message}")?;
        if !ask_retry(input, out)? {
            return Ok(None);
        }
        controller.dismiss_error();
    }

    let total = controller.questions().len();
    writeln!(
        out,
        "Quiz {} started with {total} questions.",
        controller.quiz_id().unwrap_or_default()
    )?;

    while let Some(index) = (0..total).find(|&i| controller.answer(i).is_none()) {
        if let Step::Quit = ask_question(controller, index, &mut locale, input, out)? {
            controller.restart()?;
            writeln!(out, "Session abandoned.")?;
            return Ok(None);
        }
    }

    writeln!(out, "\nAll {total} questions answered. Submitting...")?;
    while let Err(e) = controller.submit().await {
        let message = controller.last_error().unwrap_or_else(|| e.to_string());
        writeln!(out, "Could not submit quiz: {message}")?;
        if !ask_retry(input, out)? {
            controller.restart()?;
            writeln!(out, "Session abandoned.")?;
            return Ok(None);
        }
        controller.dismiss_error();
    }

    Ok(controller.outcome())
}

fn ask_question<R: BufRead, W: Write>(
    controller: &SessionController,
    index: usize,
    locale: &mut Locale,
    input: &mut R,
    out: &mut W,
) -> Result<Step> {
    controller.set_focus(index)?;
    let questions = controller.questions();
    let question = &questions[index];
    let options = controller.presented_options(index)?;
    let last = option_label(options.len().saturating_sub(1));

    loop {
        let progress = controller.progress();
        writeln!(
            out,
            "\nQuestion {}/{} ({}% answered)",
            index + 1,
            progress.total,
            progress.percent()
        )?;
        writeln!(out, "{}", question.text(*locale))?;
        for (i, option) in options.iter().enumerate() {
            writeln!(out, "  {}) {option}", option_label(i))?;
        }
        write!(out, "Answer [A-{last}], l = switch language, q = quit: ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(Step::Quit);
        };
        match line.to_ascii_lowercase().as_str() {
            "q" => return Ok(Step::Quit),
            "l" => {
                *locale = locale.toggled();
                continue;
            }
            _ => {}
        }
        match parse_option_label(&line) {
            Some(choice) if choice < options.len() => {
                controller.select_option_at(index, choice)?;
                break;
            }
            _ => writeln!(out, "Please pick one of the listed options.")?,
        }
    }

    loop {
        write!(out, "Confidence [1 = not confident .. 5 = very confident]: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(Step::Quit);
        };
        match line.parse::<Confidence>() {
            Ok(confidence) => {
                controller.set_confidence(index, confidence)?;
                return Ok(Step::Next);
            }
            Err(e) => writeln!(out, "{e}")?,
        }
    }
}

fn ask_retry<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    loop {
        write!(out, "[r]etry or [q]uit: ")?;
        out.flush()?;
        match read_line(input)?.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("r") => return Ok(true),
            Some("q") | None => return Ok(false),
            _ => {}
        }
    }
}

/// Next trimmed input line, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}
