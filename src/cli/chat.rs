//! Interactive chat session.
//!
//! Reads one message per line, lets the agent act on it, and renders the
//! reply. An empty line, `exit`, `quit`, or end of input ends the session.

use std::io::{self, BufRead, Write};

use anyhow::bail;

use super::Context;
use crate::agent::{Agent, KeywordAgent};
use crate::error::Result;
use crate::task::{Message, Role};
use crate::tools::ToolBox;
use crate::trace::ChatTraceSink;
use crate::ui::{BubbleRole, Renderer};

pub struct ChatOptions {
    pub quiet: bool,
}

/// Session behaviour switches
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionSettings {
    pub show_trace: bool,
    pub record_conversation: bool,
}

pub fn run(ctx: &Context, opts: ChatOptions) -> Result<()> {
    let chat = &ctx.config.chat;
    let mut tools = ToolBox::new(ctx.open_registry());
    let mut agent = KeywordAgent::new(chat.assistant_name.as_str());
    let mut renderer = Renderer::stdout(chat.bubble_width);
    let settings = SessionSettings {
        show_trace: chat.show_trace && !opts.quiet,
        record_conversation: ctx.config.state.record_conversation,
    };

    renderer.banner(agent.name())?;
    let stdin = io::stdin();
    session(&mut agent, &mut tools, &mut renderer, stdin.lock(), settings)
}

/// Drive a session until the user leaves.
pub(crate) fn session<A, R, W>(
    agent: &mut A,
    tools: &mut ToolBox,
    renderer: &mut Renderer<W>,
    mut input: R,
    settings: SessionSettings,
) -> Result<()>
where
    A: Agent,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        renderer.prompt_box()?;
        line.clear();
        let read = input.read_line(&mut line)?;
        renderer.close_prompt()?;

        let message = line.trim();
        if read == 0 || is_exit(message) {
            renderer.line("Goodbye!")?;
            return Ok(());
        }

        renderer.chat_bubble(message, BubbleRole::User)?;

        match handle_turn(agent, tools, renderer, message, settings) {
            Ok(reply) => {
                renderer.chat_bubble(&reply, reply_role(&reply))?;
            }
            Err(err) => {
                tracing::debug!(error = %err, "turn failed");
                renderer.chat_bubble(&format!("Error: {err:#}"), BubbleRole::Error)?;
            }
        }
    }
}

fn reply_role(reply: &str) -> BubbleRole {
    if reply.starts_with("warning:") {
        BubbleRole::Warning
    } else {
        BubbleRole::Assistant
    }
}

fn is_exit(message: &str) -> bool {
    message.is_empty()
        || message.eq_ignore_ascii_case("exit")
        || message.eq_ignore_ascii_case("quit")
}

fn handle_turn<A, W>(
    agent: &mut A,
    tools: &mut ToolBox,
    renderer: &mut Renderer<W>,
    message: &str,
    settings: SessionSettings,
) -> anyhow::Result<String>
where
    A: Agent,
    W: Write,
{
    let thinking = renderer.thinking()?;
    let mut sink = ChatTraceSink::new(renderer, Some(thinking), settings.show_trace);
    let result = agent.run(message, tools, &mut sink);
    if let Some(leftover) = sink.finish() {
        renderer.erase(leftover)?;
    }
    let reply = result?;

    if message.eq_ignore_ascii_case("test error") {
        bail!("Test error");
    }

    if settings.record_conversation {
        let user = Message::new(Role::User, message).to_value()?;
        let assistant = Message::new(Role::Assistant, reply.final_output.as_str()).to_value()?;
        tools
            .registry_mut()
            .store_mut()
            .update(|state| state.conversation.extend([user, assistant]))?;
    }

    Ok(reply.final_output)
}
