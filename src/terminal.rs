use crate::share::ShareTarget;
use crate::sink::ResultsSink;
use crate::utils::{
    log_intro, log_name_prompt, log_newline, log_question, log_results, log_save_status,
    log_share,
};
use crate::wizard::{Step, Wizard};
use console::Term;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Answer(u8),
    Next,
    Prev,
    Abandon,
    Save,
    Share(ShareTarget),
    Restart,
    Quit,
    Unknown,
}

fn parse_command(step: Step, input: &str) -> Command {
    let input = input.trim().to_lowercase();
    match step {
        Step::Intro => Command::Unknown,
        Step::Questioning(_) => match input.as_str() {
            "" | "n" => Command::Next,
            "p" => Command::Prev,
            "q" => Command::Abandon,
            other => other
                .parse::<u8>()
                .map(Command::Answer)
                .unwrap_or(Command::Unknown),
        },
        Step::Results => match input.as_str() {
            "s" => Command::Save,
            "w" => Command::Share(ShareTarget::WhatsApp),
            "c" => Command::Share(ShareTarget::CopyLink),
            "r" => Command::Restart,
            "q" => Command::Quit,
            _ => Command::Unknown,
        },
    }
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Drives `wizard` from line input until the user quits or input ends.
/// The screen is cleared only after a transition has happened.
pub async fn run_session<S: ResultsSink>(
    input: &mut impl BufRead,
    term: &Term,
    wizard: &mut Wizard,
    sink: &S,
    share_url: &str,
) -> io::Result<()> {
    loop {
        let step = wizard.step();

        if step == Step::Intro {
            log_intro();
            log_name_prompt();
            let Some(name) = read_line(input)? else {
                return Ok(());
            };
            wizard.set_subject_name(&name);
            if wizard.start() {
                term.clear_screen()?;
            }
            continue;
        }

        if step == Step::Results {
            log_results(wizard);
        } else {
            log_question(wizard);
        }

        let Some(line) = read_line(input)? else {
            return Ok(());
        };

        let changed = match parse_command(step, &line) {
            Command::Answer(value) => wizard.record_answer(value),
            Command::Next => wizard.next(),
            Command::Prev => wizard.prev(),
            Command::Abandon => wizard.abandon(),
            Command::Restart => wizard.restart(),
            Command::Save => {
                if let Some(result) = wizard.begin_save() {
                    log_save_status(wizard.save_status());
                    let outcome = sink.persist(&result).await;
                    wizard.finish_save(outcome);
                }
                log_newline();
                false
            }
            Command::Share(target) => {
                if let Some(payload) = wizard.share(target, share_url) {
                    log_share(target, &payload);
                    log_newline();
                }
                false
            }
            Command::Quit => return Ok(()),
            Command::Unknown => false,
        };

        if changed {
            term.clear_screen()?;
        }
    }
}
