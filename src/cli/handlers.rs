//! Command handlers for all CLI operations
//!
//! Each handler builds one blocking client, performs its calls and prints the
//! relay's JSON answers on stdout.

use super::{CliContext, Commands};
use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use wecom_notify::client::{ApiResponse, Envelope, Message};

const DEMO_TEXT: &str = "This is a test message sent by the wecom-notify client";

const DEMO_MARKDOWN: &str = r#"
# wecom-notify client test

This markdown message was sent by the **wecom-notify** client

## Features

- ✅ Text messages
- ✅ Image messages
- ✅ Markdown messages

## Example

```rust
client.send_text("Hello World")?;
```
"#;

/// Coordinates all command handling operations with dependency injection via CliContext
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their appropriate handlers
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Health => self.handle_health(),
            Commands::Text { text, to_user } => {
                self.handle_send(Message::text(text, self.context.recipient(to_user.as_deref())))
            }
            Commands::Markdown { markdown, to_user } => {
                let markdown = read_argument_or_stdin(&markdown)?;
                self.handle_send(Message::markdown(
                    markdown,
                    self.context.recipient(to_user.as_deref()),
                ))
            }
            Commands::Image { path, to_user } => self.handle_image(path, to_user),
            Commands::Dispatch => self.handle_dispatch(),
            Commands::Demo { image } => self.handle_demo(image),
        }
    }

    fn handle_health(&self) -> Result<()> {
        let client = self.context.build_client()?;
        let response = client.health_check()?;
        self.report(response)
    }

    fn handle_send(&self, message: Message) -> Result<()> {
        let client = self.context.build_client()?;
        let response = client.send(&message)?;
        self.report(response)
    }

    fn handle_image(&self, path: PathBuf, to_user: Option<String>) -> Result<()> {
        // Read before touching the network so a bad path never sends anything.
        let message = Message::image_from_path(&path, self.context.recipient(to_user.as_deref()))?;
        debug!("Loaded image from {}", path.display());
        self.handle_send(message)
    }

    fn handle_dispatch(&self) -> Result<()> {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read envelope from stdin")?;

        let envelope: Envelope =
            serde_json::from_str(buffer.trim()).context("Failed to parse message envelope")?;
        info!("Dispatching {} message", envelope.kind);

        self.handle_send(Message::from(envelope))
    }

    /// Health check, text, markdown and optionally an image, printing each result.
    fn handle_demo(&self, image: Option<PathBuf>) -> Result<()> {
        let client = self.context.build_client()?;
        let to_user = self.context.recipient(None);
        let mut failures = Vec::new();

        println!("Health check...");
        let response = client.health_check()?;
        print_result(&response, &mut failures)?;

        println!("Sending text message...");
        let response = client.send_text_to(DEMO_TEXT, to_user.clone())?;
        print_result(&response, &mut failures)?;

        println!("Sending markdown message...");
        let response = client.send_markdown_to(DEMO_MARKDOWN, to_user.clone())?;
        print_result(&response, &mut failures)?;

        if let Some(path) = image {
            println!("Sending image message...");
            let response = client.send_image_to(&path, to_user)?;
            print_result(&response, &mut failures)?;
        }

        println!("Demo finished!");

        if self.context.fail_on_error {
            if let Some(first) = failures.into_iter().next() {
                return Err(first.into());
            }
        }
        Ok(())
    }

    /// Print the body and apply `--fail-on-error`.
    fn report(&self, response: ApiResponse) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(response.body()).context("Failed to format response")?
        );

        if !response.is_success() {
            warn!(status = response.status(), "Relay did not accept the request");
            if self.context.fail_on_error {
                response.into_result()?;
            }
        }
        Ok(())
    }
}

fn print_result(
    response: &ApiResponse,
    failures: &mut Vec<wecom_notify::AppError>,
) -> Result<()> {
    println!(
        "Result: {}",
        serde_json::to_string(response.body()).context("Failed to format response")?
    );
    println!();

    if let Err(e) = response.clone().into_result() {
        failures.push(e);
    }
    Ok(())
}

/// `-` means read the whole of stdin.
fn read_argument_or_stdin(value: &str) -> Result<String> {
    if value != "-" {
        return Ok(value.to_string());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read content from stdin")?;
    Ok(buffer)
}
