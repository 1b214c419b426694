//! Command-line study client.

mod client;
mod study;

use anyhow::{bail, Context};

use study_core::types::StudyMode;

use crate::client::ApiClient;

const USAGE: &str = "\
Usage: studynotes <command> [args]

Commands:
  register [NAME]                 create an account, print its token
  sets                            list flashcard sets
  add-set NAME [DESCRIPTION]      create a flashcard set
  add-card SET_ID FRONT BACK      add a flashcard to a set
  study SET_ID [simple|spaced]    run a study session (default: simple)

Environment:
  STUDY_BACKEND_URL   backend address (default http://localhost:3000)
  STUDY_TOKEN         account token (all commands except register)
";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("STUDY_BACKEND_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprint!("{USAGE}");
        std::process::exit(2);
    };

    match command {
        "register" => {
            let name = args.get(1).cloned();
            let creds = ApiClient::register(&base_url, name).await?;
            println!("Account {} registered.", creds.account_id);
            println!("export STUDY_TOKEN={}", creds.token);
        }
        "sets" => {
            let client = authenticated(&base_url)?;
            let sets = client.list_sets().await?;
            if sets.is_empty() {
                println!("No flashcard sets yet.");
            }
            for set in sets {
                println!("{:>5}  {} ({} cards)", set.id, set.name, set.card_count);
            }
        }
        "add-set" => {
            let name = args.get(1).context("add-set requires a NAME")?;
            let description = args.get(2).map(String::as_str);
            let client = authenticated(&base_url)?;
            let set = client.create_set(name, description).await?;
            println!("Created set {} ({})", set.name, set.id);
        }
        "add-card" => {
            let [set_id, front, back] = &args[1..] else {
                bail!("add-card requires SET_ID FRONT BACK");
            };
            let set_id: i64 = set_id.parse().context("SET_ID must be a number")?;
            let client = authenticated(&base_url)?;
            let card = client.create_card(set_id, front, back, None).await?;
            println!("Added card {}", card.id);
        }
        "study" => {
            let set_id: i64 = args
                .get(1)
                .context("study requires a SET_ID")?
                .parse()
                .context("SET_ID must be a number")?;
            let mode = match args.get(2).map(String::as_str) {
                None => StudyMode::Simple,
                Some(s) => StudyMode::from_str(s)
                    .with_context(|| format!("unknown mode '{s}', expected simple or spaced"))?,
            };
            let client = authenticated(&base_url)?;
            study::run(set_id, mode, client).await?;
        }
        other => {
            eprintln!("Unknown command '{other}'.\n");
            eprint!("{USAGE}");
            std::process::exit(2);
        }
    }
    Ok(())
}

fn authenticated(base_url: &str) -> anyhow::Result<ApiClient> {
    let token = std::env::var("STUDY_TOKEN")
        .context("STUDY_TOKEN is not set; run `studynotes register` first")?;
    Ok(ApiClient::new(base_url.to_string(), token))
}
