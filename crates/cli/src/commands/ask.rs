//! `dost ask`: single-question mode.

use std::path::PathBuf;

pub async fn run(message: String, pdf: Option<PathBuf>) -> dost_core::Result<()> {
    let super::Startup {
        config,
        mut session,
        renderer,
        ..
    } = super::start()?;

    eprint!("  Thinking...");
    let outcome = session.submit(message).await;
    eprint!("\r              \r");

    let failure = match outcome {
        Ok(reply) => {
            println!("{}", reply.content);
            None
        }
        Err(e) => {
            if let Some(turn) = session.transcript().last() {
                println!("{}", turn.content);
            }
            Some(e)
        }
    };

    if let Some(path) = pdf {
        let written = super::export(&session, &renderer, &config.export.title, &path)?;
        eprintln!("  Saved transcript to {}", written.display());
    }

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
