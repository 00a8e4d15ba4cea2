use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::Assistant;
use crate::core::AppConfig;

const GREETING: &str = "Hello! I'm your CodeCrux Bot. I can help you with programming questions and help to debug your code. I can also help you prepare for your programming exams with mock exercise questions.";

/// True when the user wants to leave the session.
pub fn is_goodbye(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("goodbye")
}

/// Adds `line` to the editor's recall list. Returns false if that
/// failed; the session carries on without it.
fn remember(rl: &mut DefaultEditor, line: &str) -> bool {
    match rl.add_history_entry(line) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to add line to readline history");
            false
        }
    }
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let assistant = Assistant::from_config(config)?;
    let mut rl = DefaultEditor::new()?;

    println!("{}", GREETING);
    println!("Type '.help' to know what exactly I can do.");
    println!("Type 'goodbye' to exit.\n");

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let utterance = line.trim();
                if is_goodbye(utterance) {
                    break;
                }
                if utterance.is_empty() {
                    continue;
                }
                remember(&mut rl, utterance);

                let reply = assistant.handle(utterance).await;
                println!("{}", reply);
                println!();
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                tracing::error!("Readline failed: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye! Have a great day!");

    Ok(())
}
