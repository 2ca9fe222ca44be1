use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use starling::{ChatEngine, Role, SessionStore, WebhookBackend};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let backend = WebhookBackend::from_env().ok_or_else(|| {
        anyhow::anyhow!("CHAT_WEBHOOK_URL is not set. Point it at your chat webhook endpoint.")
    })?;
    let engine = ChatEngine::new(Arc::new(backend), SessionStore::new());

    println!("starling chat (/clear starts a fresh conversation, /quit exits)");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        match line.trim() {
            "/quit" => break,
            "/clear" => {
                engine.clear_messages();
                println!("(conversation cleared)");
            }
            "" => {}
            text => {
                engine.send_message(text).await;
                if let Some(reply) = engine
                    .messages()
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::Assistant)
                {
                    println!("{}", reply.content);
                }
                if let Some(err) = engine.last_error() {
                    eprintln!("({err})");
                }
            }
        }
    }
    Ok(())
}
