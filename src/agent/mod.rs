//! Agent interaction loop
//!
//! Consumes the bootstrap hand-off: a runtime config, a constructed
//! memory backend, and a chat client. The loop itself is deliberately
//! thin — authorization gating, memory recall/record around each LLM
//! exchange, and cycle accounting. Command execution lives outside this
//! crate.

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::llm::{ChatClient, ChatMessage};
use crate::memory::MemoryBackend;
use crate::prompt::{build_system_prompt, TRIGGERING_PROMPT};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Number of recalled memory entries injected per cycle
const RELEVANT_MEMORY_K: usize = 5;

/// History messages kept when trimming the rolling window
const HISTORY_WINDOW: usize = 20;

/// The running assistant
pub struct Agent {
    ai_name: String,
    system_prompt: String,
    history: Vec<ChatMessage>,
    memory: Box<dyn MemoryBackend>,
    client: ChatClient,
    continuous: bool,
    continuous_limit: Option<u32>,
    skip_reprompt: bool,
}

impl Agent {
    /// Assemble an agent from the bootstrap hand-off
    pub fn new(config: &RuntimeConfig, memory: Box<dyn MemoryBackend>, client: ChatClient) -> Self {
        Self {
            ai_name: config.profile.ai_name.clone(),
            system_prompt: build_system_prompt(&config.profile),
            history: Vec::new(),
            memory,
            client,
            continuous: config.continuous,
            continuous_limit: config.continuous_limit,
            skip_reprompt: config.skip_reprompt,
        }
    }

    /// Run cycles until the continuous limit is reached or the operator
    /// declines authorization
    pub async fn start_interaction_loop(&mut self) -> Result<()> {
        let mut cycles: u32 = 0;

        loop {
            if self.continuous {
                if let Some(limit) = self.continuous_limit {
                    if cycles >= limit {
                        tracing::info!(limit, "continuous limit reached, stopping");
                        break;
                    }
                }
            } else {
                // First cycle can be pre-authorized with -y; every later
                // cycle asks again.
                let pre_authorized = cycles == 0 && self.skip_reprompt;
                if !pre_authorized && !self.authorize().await? {
                    tracing::info!("operator declined authorization, stopping");
                    break;
                }
            }

            let reply = self.run_cycle().await?;
            println!("{}: {reply}", self.ai_name);

            cycles += 1;
        }

        Ok(())
    }

    /// One think cycle: recall, complete, record
    async fn run_cycle(&mut self) -> Result<String> {
        let relevant = self
            .memory
            .get_relevant(TRIGGERING_PROMPT, RELEVANT_MEMORY_K)
            .await?;

        let mut messages = vec![ChatMessage::system(&self.system_prompt)];
        if !relevant.is_empty() {
            messages.push(ChatMessage::system(format!(
                "This reminds you of these events from your past:\n{}",
                relevant.join("\n")
            )));
        }
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(TRIGGERING_PROMPT));

        let reply = self.client.complete(&messages).await?;

        self.memory
            .add(&format!("Assistant reply: {reply}"))
            .await?;
        self.history.push(ChatMessage::user(TRIGGERING_PROMPT));
        self.history.push(ChatMessage::assistant(reply.clone()));
        if self.history.len() > HISTORY_WINDOW {
            let excess = self.history.len() - HISTORY_WINDOW;
            self.history.drain(..excess);
        }

        Ok(reply)
    }

    /// Ask the operator to authorize the next cycle
    async fn authorize(&self) -> Result<bool> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(
                format!(
                    "{}: input 'y' to authorise the next cycle, anything else to exit: ",
                    self.ai_name
                )
                .as_bytes(),
            )
            .await?;
        stdout.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
