//! Example client for the handover API

use handover::api::{Client, HttpClientImpl};
use handover::callback::Callback;
use handover::{Event, Section, UserKey};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a client with default configuration (localhost:3000)
    let client = HttpClientImpl::new();
    let user = UserKey::from("client-example");
    println!("Handover API Client Example");
    println!("---------------------------");

    println!("\nSelecting the Issue section...");
    let response = client
        .send_event(&user, Event::ButtonPress(Callback::Add(Section::Issue).to_string()))
        .await?;
    println!("{}", response.text);

    println!("\nSending the note text...");
    let response = client
        .send_event(&user, Event::TextMessage("Client example note".to_string()))
        .await?;
    println!("{}", response.text);

    println!("\nFetching the board...");
    let board = client.board().await?;
    print!("{}", board.render());

    println!("Session is back to: {:?}", client.session(&user).await?);
    Ok(())
}
