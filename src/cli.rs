//! CLI module
//!
//! This module provides the command-line interface for the handover tool:
//! running the HTTP gateway, chatting with the bot from a terminal, and
//! printing the current notes.

use std::io::{self, Write};
use std::net::IpAddr;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    api::{serve, Client, ClientConfig, CoreClient, HttpClientImpl, ServerConfig},
    controller::{Button, Event, Response},
    session::UserKey,
    Core,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server URL
    #[arg(
        short,
        long,
        env = "HANDOVER_SERVER",
        default_value = "http://localhost:3000"
    )]
    server: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the handover HTTP gateway
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "HANDOVER_PORT", default_value_t = 3000)]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
    },

    /// Talk to the bot from this terminal
    Chat {
        /// Identity to chat as; sessions are kept per user
        #[arg(short, long, env = "HANDOVER_USER", default_value = "console")]
        user: String,

        /// Run the bot in this process instead of talking to a server
        #[arg(long)]
        local: bool,
    },

    /// Print every section's notes
    Show,

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run the CLI application
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { port, host } => {
            println!("Starting handover gateway on {}:{}...", host, port);

            let config = ServerConfig {
                address: (*host, *port).into(),
            };
            serve(Core::default(), config).await?;
            Ok(())
        }

        Commands::Chat { user, local } => {
            let user = UserKey::from(user.as_str());
            if *local {
                chat(&CoreClient::default(), &user).await
            } else {
                chat(&create_client(&cli.server), &user).await
            }
        }

        Commands::Show => {
            let client = create_client(&cli.server);
            let board = client.board().await?;
            print!("{}", board.render());
            Ok(())
        }

        Commands::Completions { shell } => {
            // Generate completions for the specified shell
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn create_client(server_url: &str) -> HttpClientImpl {
    let config = ClientConfig {
        base_url: server_url.to_string(),
    };

    HttpClientImpl::with_config(config)
}

/// One line typed into the console gateway
#[derive(Debug, PartialEq, Eq)]
enum ConsoleInput {
    Send(Event),
    Quit,
    Skip,
    Invalid(String),
}

/// `/name` is a command, `#N` presses button N of the last menu, anything
/// else is a text message.
fn parse_console_input(line: &str, menu: &[Button]) -> ConsoleInput {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleInput::Skip;
    }
    if line == "quit" || line == "exit" {
        return ConsoleInput::Quit;
    }
    if let Some(command) = line.strip_prefix('/') {
        return ConsoleInput::Send(Event::Command(command.to_string()));
    }
    if let Some(number) = line.strip_prefix('#') {
        return match number.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= menu.len() => {
                ConsoleInput::Send(Event::ButtonPress(menu[n - 1].callback_id.clone()))
            }
            _ => ConsoleInput::Invalid(format!("No button {} in the current menu.", number)),
        };
    }
    ConsoleInput::Send(Event::TextMessage(line.to_string()))
}

/// Prints a response and returns the buttons it offers
fn render(response: &Response) -> Vec<Button> {
    if response.edit_in_place {
        println!("{}", "~ (updated)".dimmed());
    }
    println!("{}", response.text.trim_end());
    let mut buttons = print_menu(response.menu.as_deref());

    if response.show_menu_after {
        let main = Response::main_menu();
        println!("{}", main.text);
        buttons = print_menu(main.menu.as_deref());
    }
    buttons
}

fn print_menu(menu: Option<&[Button]>) -> Vec<Button> {
    let menu = menu.unwrap_or_default();
    for (i, button) in menu.iter().enumerate() {
        println!("  {} {}", format!("#{}", i + 1).cyan().bold(), button.label);
    }
    menu.to_vec()
}

async fn chat<C: Client>(client: &C, user: &UserKey) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{}",
        "Type /start to begin, #N to press a button, quit to leave.".dimmed()
    );

    let mut menu: Vec<Button> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".green().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_console_input(&line, &menu) {
            ConsoleInput::Quit => break,
            ConsoleInput::Skip => continue,
            ConsoleInput::Invalid(message) => println!("{}", message.red()),
            ConsoleInput::Send(event) => match client.send_event(user, event).await {
                Ok(response) => {
                    let offered = render(&response);
                    if !offered.is_empty() {
                        menu = offered;
                    }
                }
                Err(e) => println!("{}", format!("Error: {}", e).red()),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::main_menu;

    #[test]
    fn test_parse_console_input() {
        let menu = main_menu();

        assert_eq!(
            parse_console_input("/start", &menu),
            ConsoleInput::Send(Event::Command("start".to_string()))
        );
        assert_eq!(
            parse_console_input("#2", &menu),
            ConsoleInput::Send(Event::ButtonPress("add_progress".to_string()))
        );
        assert_eq!(
            parse_console_input("  printer jammed ", &menu),
            ConsoleInput::Send(Event::TextMessage("printer jammed".to_string()))
        );
        assert_eq!(parse_console_input("", &menu), ConsoleInput::Skip);
        assert_eq!(parse_console_input("quit", &menu), ConsoleInput::Quit);
        assert!(matches!(
            parse_console_input("#99", &menu),
            ConsoleInput::Invalid(_)
        ));
        assert!(matches!(
            parse_console_input("#1", &[]),
            ConsoleInput::Invalid(_)
        ));
    }

    #[test]
    fn test_render_returns_main_menu_when_requested() {
        let buttons = render(&Response::reply("Added to Issue: x").then_menu());
        assert_eq!(buttons, main_menu());

        let buttons = render(&Response::reply("Please use the menu to select a section first."));
        assert!(buttons.is_empty());
    }

    #[test]
    fn test_cli_parses_serve_flags() {
        let cli = Cli::try_parse_from(["handover", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, 8080);
                assert_eq!(host.to_string(), "127.0.0.1");
            }
            _ => panic!("expected serve"),
        }
    }
}
