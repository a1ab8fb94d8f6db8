//! Interactive terminal front-end over the conversation engine.
//!
//! Wires the HTTP workflow client, the JSON file store, and the webhook
//! report sink into one engine with a fresh anonymous reporter, then
//! drives it from stdin. Slash commands map to engine operations;
//! everything else is a dialogue turn.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use civis::adapters::report::WebhookReportSink;
use civis::adapters::storage::JsonFileTicketStore;
use civis::adapters::workflow::{HttpChatWorkflow, WorkflowClientConfig};
use civis::application::{ConversationEngine, EngineError, SessionSnapshot};
use civis::config::AppConfig;
use civis::domain::conversation::SessionState;
use civis::domain::foundation::ReporterId;

const HELP: &str = "\
Comenzi:
  /new            conversație nouă
  /confirm        trimite raportul (din ecranul de confirmare)
  /edit           înapoi la editare (din ecranul de confirmare)
  /regen <index>  regenerează răspunsul de la indexul dat
  /help           acest mesaj
  /quit           ieșire";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let workflow = HttpChatWorkflow::new(
        WorkflowClientConfig::new(config.workflow.chat_webhook_url.clone())
            .with_timeout(config.workflow.timeout()),
    );
    let store = JsonFileTicketStore::new(config.storage.path());
    let sink = WebhookReportSink::new(config.workflow.report_webhook_url.clone());

    let engine = ConversationEngine::new(
        Arc::new(workflow),
        Arc::new(store),
        Arc::new(sink),
        ReporterId::anonymous(),
    );

    println!("Civis — raportează o problemă. Cu ce te pot ajuta?");
    println!("{HELP}\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed_turns = 0usize;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" => break,
            "/help" => {
                println!("{HELP}");
                continue;
            }
            "/new" => {
                match engine.new_conversation().await {
                    Ok(snapshot) => {
                        render(&snapshot, &mut printed_turns);
                        println!("Conversație nouă. Descrie problema.");
                    }
                    Err(err) => report(Err(err), &mut printed_turns),
                }
                continue;
            }
            "/confirm" => {
                report(engine.confirm().await, &mut printed_turns);
                continue;
            }
            "/edit" => {
                report(engine.edit_requested().await, &mut printed_turns);
                continue;
            }
            _ => {}
        }

        if let Some(index) = input.strip_prefix("/regen ") {
            match index.trim().parse::<usize>() {
                Ok(index) => report(engine.regenerate(index).await, &mut printed_turns),
                Err(_) => println!("Folosește: /regen <index>"),
            }
            continue;
        }

        let result = match engine.snapshot().await.state {
            SessionState::Main => engine.submit_initial(input, None).await,
            _ => engine.submit_turn(input).await,
        };
        report(result, &mut printed_turns);
    }

    Ok(())
}

/// Prints the outcome of one engine operation.
fn report(result: Result<SessionSnapshot, EngineError>, printed_turns: &mut usize) {
    match result {
        Ok(snapshot) => render(&snapshot, printed_turns),
        Err(EngineError::RequestInFlight) => {
            println!("(încă procesez mesajul anterior, o clipă)")
        }
        Err(EngineError::EmptyMessage) => println!("(scrie un mesaj mai întâi)"),
        Err(EngineError::InvalidState { .. }) => {
            println!("(comanda nu e disponibilă acum — /help pentru comenzi)")
        }
        Err(err @ EngineError::Finalize(_)) => {
            tracing::error!(error = %err, "finalize failed");
            println!("Nu am putut salva raportul. Te rog să încerci din nou.");
        }
    }
}

/// Prints bot turns added since the last render, plus screen changes.
fn render(snapshot: &SessionSnapshot, printed_turns: &mut usize) {
    if snapshot.turns.len() < *printed_turns {
        *printed_turns = 0;
    }
    for turn in &snapshot.turns[*printed_turns..] {
        if turn.is_bot() {
            println!("bot> {}", turn.content);
        }
    }
    *printed_turns = snapshot.turns.len();

    match snapshot.state {
        SessionState::Confirmation => {
            if let Some(ticket) = &snapshot.ticket {
                println!("--- Verifică raportul ---");
                print_field("Categorie", ticket.category.as_deref());
                print_field("Subcategorie", ticket.subcategory.as_deref());
                print_field(
                    "Severitate",
                    ticket.severity.map(|s| s.as_str()),
                );
                print_field("Județ", ticket.location_county.as_deref());
                print_field("Oraș", ticket.location_city.as_deref());
                print_field("Instituție", ticket.institution.as_deref());
                print_field("Rezumat", ticket.summary.as_deref());
                println!("/confirm pentru trimitere, /edit pentru modificări");
            }
        }
        SessionState::Success => {
            let reference = snapshot
                .ticket
                .as_ref()
                .and_then(|t| t.public_reference())
                .unwrap_or("-");
            println!("Raport trimis. Referință: {reference}");
            println!("/new pentru o conversație nouă");
        }
        SessionState::Main | SessionState::Chatting => {}
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("  {label}: {value}");
    }
}
