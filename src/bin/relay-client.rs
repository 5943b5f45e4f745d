//! Relay Chat Client - Entry Point
//!
//! Interactive terminal client: asks for a name, then sends every typed line
//! and prints every message relayed by the server.

use std::io::{self, Write};
use std::process;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use relay_chat::RelayConfig;
use relay_chat::client::connect;
use relay_chat::error::{handle_error, is_fatal};
use relay_chat::protocol::EXIT_COMMAND;
use relay_chat::utils::setup_logging;

fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

async fn read_name(input: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    prompt("Veuillez entrer votre nom : ");
    loop {
        let line = input.next_line().await.ok()??;
        let name = line.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
        prompt("Nom invalide, veuillez réessayer : ");
    }
}

#[tokio::main]
async fn main() {
    setup_logging();

    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            handle_error(&e);
            process::exit(1);
        }
    };

    let session = match connect(&config.socket_addr()).await {
        Ok(session) => session,
        Err(e) => {
            handle_error(&e);
            if is_fatal(&e) {
                eprintln!("[ERREUR] Connexion refusée ! Assurez-vous que le serveur est démarré.");
            }
            process::exit(1);
        }
    };

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let Some(name) = read_name(&mut input).await else {
        return;
    };

    let (receiver, mut sender) = session.split_with_buffer(config.buffer_size);
    if let Err(e) = sender.send_line(&name).await {
        handle_error(&e);
        process::exit(if is_fatal(&e) { 1 } else { 2 });
    }

    let mut receiving = tokio::spawn(receiver.receive_loop(|message| {
        println!("\n{}", message);
        prompt("> ");
    }));

    loop {
        prompt(&format!("{} : ", name));

        tokio::select! {
            line = input.next_line() => {
                let Ok(Some(line)) = line else {
                    break;
                };

                if line.trim().is_empty() {
                    println!("Message vide, veuillez réessayer.");
                    continue;
                }

                if let Err(e) = sender.send_line(&line).await {
                    handle_error(&e);
                    break;
                }

                if line.eq_ignore_ascii_case(EXIT_COMMAND) {
                    println!("Déconnexion...");
                    break;
                }
            }
            result = &mut receiving => {
                if let Ok(Err(e)) = result {
                    handle_error(&e);
                }
                println!("[ERREUR] Le serveur a été fermé.");
                let _ = sender.close().await;
                return;
            }
        }
    }

    let _ = sender.close().await;
    receiving.abort();
}
