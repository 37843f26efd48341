//! `clqy send` -- one-shot conversational turn from the terminal.

use colloquy_types::exchange::{SendMessage, REPLY_BACKEND};

use crate::state::AppState;

/// Run a single turn and print the reply (or clarifying question).
pub async fn send(
    state: &AppState,
    user: String,
    message: String,
    app_id: Option<String>,
    notes: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let reply = state
        .orchestrator
        .send_message(SendMessage {
            user_id: user,
            message,
            app_id,
            context: None,
            conversation_history: None,
            notes,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    println!();
    if reply.needs_clarification {
        println!(
            "  {} {}",
            console::style("?").yellow().bold(),
            reply.response
        );
        println!(
            "  {}",
            console::style("Answer with another `clqy send` to continue.").dim()
        );
    } else {
        println!("  {}", reply.response);
        if let Some(backend) = reply.context.get(REPLY_BACKEND).and_then(|v| v.as_str()) {
            println!();
            println!(
                "  {}",
                console::style(format!("served by '{backend}'")).dim()
            );
        }
    }
    println!();

    Ok(())
}
