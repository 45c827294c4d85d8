//! Agent activity tracing.
//!
//! Agents report what they do through a [`TraceSink`]. The chat sink draws
//! a small bubble per event and, on the first event, erases the thinking
//! indicator it was handed.

use std::io::Write;

use crate::tools::tool_summary;
use crate::ui::{Renderer, ThinkingIndicator, TraceKind};

/// Events emitted while an agent handles one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Started,
    Tool(String),
    Agent(String),
}

impl TraceEvent {
    pub fn kind(&self) -> TraceKind {
        match self {
            TraceEvent::Started => TraceKind::Trace,
            TraceEvent::Tool(_) => TraceKind::Tool,
            TraceEvent::Agent(_) => TraceKind::Agent,
        }
    }

    /// Short human description, e.g. `tool: adding item`.
    pub fn describe(&self) -> String {
        match self {
            TraceEvent::Started => "trace: started".to_string(),
            TraceEvent::Tool(name) => format!("tool: {}", tool_summary(name)),
            TraceEvent::Agent(name) => format!("agent: {name}"),
        }
    }
}

/// Receiver for agent trace events
pub trait TraceSink {
    fn on_event(&mut self, event: &TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn on_event(&mut self, _event: &TraceEvent) {}
}

/// Keeps every event, in order.
#[derive(Debug, Default)]
pub struct RecordingTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for RecordingTraceSink {
    fn on_event(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}

/// Draws trace bubbles into a chat session.
pub struct ChatTraceSink<'a, W: Write> {
    renderer: &'a mut Renderer<W>,
    thinking: Option<ThinkingIndicator>,
    show: bool,
}

impl<'a, W: Write> ChatTraceSink<'a, W> {
    pub fn new(
        renderer: &'a mut Renderer<W>,
        thinking: Option<ThinkingIndicator>,
        show: bool,
    ) -> Self {
        Self {
            renderer,
            thinking,
            show,
        }
    }

    /// Hand back the thinking indicator if no event ever cleared it.
    pub fn finish(self) -> Option<ThinkingIndicator> {
        self.thinking
    }
}

impl<W: Write> TraceSink for ChatTraceSink<'_, W> {
    fn on_event(&mut self, event: &TraceEvent) {
        if let Some(indicator) = self.thinking.take() {
            if let Err(err) = self.renderer.erase(indicator) {
                tracing::debug!(error = %err, "failed to erase thinking indicator");
            }
        }
        if !self.show {
            return;
        }
        if let Err(err) = self.renderer.trace_bubble(&event.describe(), event.kind()) {
            tracing::debug!(error = %err, "failed to draw trace bubble");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_uses_tool_summaries() {
        assert_eq!(
            TraceEvent::Tool("add_todo".into()).describe(),
            "tool: adding item"
        );
        assert_eq!(
            TraceEvent::Tool("something_else".into()).describe(),
            "tool: something_else"
        );
        assert_eq!(TraceEvent::Started.describe(), "trace: started");
    }

    #[test]
    fn chat_sink_takes_indicator_on_first_event() {
        let mut renderer = Renderer::plain(Vec::new(), 30);
        let indicator = renderer.thinking().unwrap();
        let mut sink = ChatTraceSink::new(&mut renderer, Some(indicator), true);

        sink.on_event(&TraceEvent::Started);
        sink.on_event(&TraceEvent::Tool("format_list".into()));

        assert!(sink.finish().is_none());
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("trace: started"));
        assert!(out.contains("tool: formatting list"));
    }

    #[test]
    fn chat_sink_returns_untouched_indicator() {
        let mut renderer = Renderer::plain(Vec::new(), 30);
        let indicator = renderer.thinking().unwrap();
        let sink = ChatTraceSink::new(&mut renderer, Some(indicator), false);

        let leftover = sink.finish().expect("indicator");
        renderer.erase(leftover).unwrap();
    }

    #[test]
    fn hidden_sink_draws_nothing() {
        let mut renderer = Renderer::plain(Vec::new(), 30);
        let mut sink = ChatTraceSink::new(&mut renderer, None, false);
        sink.on_event(&TraceEvent::Agent("Todo List Assistant".into()));
        drop(sink);
        assert!(renderer.writer().is_empty());
    }
}
