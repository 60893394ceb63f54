use clap::Parser;
use dotenvy::dotenv;
use log::{error, info};
use storefront_server::{
    auth::TokenIssuer,
    cli::{display_help, Arguments, Command},
    config::ServerConfig,
    server::{connect_and_migrate, run_server},
};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let command = Arguments::parse().command();
    if command == Command::Help {
        display_help();
        return;
    }
    let config = ServerConfig::from_env_or_default();
    if let Some(actor) = command.token_actor() {
        match TokenIssuer::new(&config.auth).issue_token(&actor) {
            Ok(token) => println!("{token}"),
            Err(e) => error!("🚀️ Could not issue a token for {}. {e}", actor.id),
        }
        return;
    }
    match command {
        Command::Migrate => match connect_and_migrate(&config).await {
            Ok(db) => {
                db.close().await;
                println!("Database at {} is up to date.", config.database_url);
            },
            Err(e) => eprintln!("{e}"),
        },
        _ => {
            info!("🚀️ Starting server on {}:{}", config.host, config.port);
            match run_server(config).await {
                Ok(_) => println!("Bye!"),
                Err(e) => eprintln!("{e}"),
            }
        },
    }
}
