//! Chat session — the turn pipeline.
//!
//! One turn at a time: command parse → credential gate → context
//! capture → prompt → gateway → parse → dispatch → aggregate → append.
//! `submit` takes `&mut self` and `&mut S`, so a second in-flight turn
//! cannot exist; hosts that want queuing serialize outside the session.
//!
//! Every path through a turn resolves to an assistant message. Nothing
//! here propagates as an unhandled fault to the caller.

use gridmate_config::{CredentialStore, Credentials, Settings};
use gridmate_surface::SheetSurface;

use crate::context::SheetContext;
use crate::conversation::Conversation;
use crate::dispatch::execute_operations;
use crate::gateway::ModelGateway;
use crate::parser::parse_model_response;
use crate::prompt::build_system_prompt;

/// Chat command that stores the credential.
const SET_KEY_PREFIX: &str = "set ai key ";

/// Chat command that erases the credential.
const CLEAR_KEY_COMMAND: &str = "clear ai key";

pub struct ChatSession<C: CredentialStore> {
    conversation: Conversation,
    gateway: ModelGateway,
    store: C,
    api_key: Option<String>,
}

impl<C: CredentialStore> ChatSession<C> {
    /// Create a session, loading any saved credential from the store.
    pub fn new(settings: Settings, store: C) -> Self {
        let api_key = store.load().map(|creds| creds.api_key);
        Self {
            conversation: Conversation::new(),
            gateway: ModelGateway::new(&settings),
            store,
            api_key,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Startup message for the presentation layer.
    pub fn greeting(&self) -> String {
        if self.has_credential() {
            "✅ AI ready! Try: \"create revenue table\", \"sum column B\", \"put hello in B3\""
                .to_string()
        } else {
            "🔑 Please set an API key first: type \"set ai key YOUR_KEY_HERE\"".to_string()
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    /// Run one full turn. Appends the user message and the resulting
    /// assistant message to the conversation and returns the reply.
    pub fn submit<S: SheetSurface>(&mut self, surface: &mut S, input: &str) -> String {
        let input = input.trim();
        self.conversation.push_user(input);
        self.conversation.set_typing(true);

        let reply = self.respond(surface, input);

        self.conversation.push_assistant(&reply);
        self.conversation.set_typing(false);
        reply
    }

    fn respond<S: SheetSurface>(&mut self, surface: &mut S, input: &str) -> String {
        if let Some(key) = strip_set_key_command(input) {
            return self.set_key(key);
        }

        if input.eq_ignore_ascii_case(CLEAR_KEY_COMMAND) {
            return self.clear_key();
        }

        let Some(api_key) = self.api_key.clone() else {
            return "⚠️ No API key configured. Type: set ai key YOUR_KEY_HERE".to_string();
        };

        let context = SheetContext::capture(surface);
        let system_prompt = build_system_prompt(&context, input);

        let raw = match self.gateway.complete(&api_key, &system_prompt, input) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("gateway failure: {}", e);
                return "Sorry, I'm experiencing technical issues. Please try again later."
                    .to_string();
            }
        };

        let response = parse_model_response(&raw, input);
        let results = execute_operations(surface, &response.operations);

        format!(
            "🤖 AI: {}\n\n✅ Results:\n{}",
            response.explanation,
            results.join("\n")
        )
    }

    fn set_key(&mut self, key: &str) -> String {
        if key.is_empty() {
            return "❌ Invalid API key.".to_string();
        }
        if let Err(e) = self.store.save(&Credentials::new(key.to_string())) {
            return format!("❌ Failed to save API key: {}", e);
        }
        self.api_key = Some(key.to_string());
        "✅ API key saved. You can start typing requests.".to_string()
    }

    fn clear_key(&mut self) -> String {
        if let Err(e) = self.store.clear() {
            return format!("❌ Failed to clear API key: {}", e);
        }
        self.api_key = None;
        "✅ API key cleared.".to_string()
    }
}

/// Match the set-key command ASCII-case-insensitively and return the
/// key text. The prefix is compared byte-for-byte against `input`
/// itself, never a lowercased copy, so offsets stay aligned and
/// non-ASCII look-alikes (e.g. U+212A for 'k') do not match.
fn strip_set_key_command(input: &str) -> Option<&str> {
    let prefix_len = SET_KEY_PREFIX.len();
    if input.len() >= prefix_len
        && input.is_char_boundary(prefix_len)
        && input[..prefix_len].eq_ignore_ascii_case(SET_KEY_PREFIX)
    {
        Some(input[prefix_len..].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmate_config::MemoryCredentialStore;
    use gridmate_surface::MemorySurface;

    fn session(store: MemoryCredentialStore) -> ChatSession<MemoryCredentialStore> {
        ChatSession::new(Settings::default(), store)
    }

    #[test]
    fn test_greeting_depends_on_credential() {
        let without = session(MemoryCredentialStore::new());
        assert!(without.greeting().contains("set ai key"));

        let with = session(MemoryCredentialStore::with_key("sk-x"));
        assert!(with.greeting().contains("AI ready"));
    }

    #[test]
    fn test_set_key_command_persists_and_confirms() {
        let mut session = session(MemoryCredentialStore::new());
        let mut surface = MemorySurface::new();

        let reply = session.submit(&mut surface, "set ai key ABC123");
        assert!(reply.contains("API key saved"), "got {}", reply);
        assert!(session.has_credential());
        assert_eq!(session.store.load().unwrap().api_key, "ABC123");
    }

    #[test]
    fn test_set_key_preserves_case() {
        let mut session = session(MemoryCredentialStore::new());
        let mut surface = MemorySurface::new();
        session.submit(&mut surface, "Set AI Key MiXeDcAsE");
        assert_eq!(session.store.load().unwrap().api_key, "MiXeDcAsE");
    }

    #[test]
    fn test_unicode_lookalike_is_not_a_key_command() {
        // U+212A (kelvin sign) lowercases to ASCII 'k'; a lowercased
        // prefix check would treat this as the command and slice the
        // key at a misaligned byte offset.
        let mut session = session(MemoryCredentialStore::new());
        let mut surface = MemorySurface::new();

        let reply = session.submit(&mut surface, "set ai \u{212A}ey SECRET");
        assert!(!session.has_credential());
        assert!(reply.contains("No API key configured"), "got {}", reply);
    }

    #[test]
    fn test_multibyte_char_straddling_prefix_length_is_safe() {
        // "set ai key" is 10 bytes; 'é' occupies bytes 10-11, so the
        // prefix length lands mid-character. Must not panic on slicing.
        let mut session = session(MemoryCredentialStore::new());
        let mut surface = MemorySurface::new();
        let reply = session.submit(&mut surface, "set ai keyé FOO");
        assert!(!session.has_credential());
        assert!(reply.contains("No API key configured"), "got {}", reply);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut session = session(MemoryCredentialStore::new());
        let mut surface = MemorySurface::new();
        let reply = session.submit(&mut surface, "set ai key    ");
        assert!(reply.contains("Invalid API key"));
        assert!(!session.has_credential());
    }

    #[test]
    fn test_clear_key_command() {
        let mut session = session(MemoryCredentialStore::with_key("sk-x"));
        let mut surface = MemorySurface::new();

        let reply = session.submit(&mut surface, "clear ai key");
        assert!(reply.contains("cleared"));
        assert!(!session.has_credential());
        assert!(session.store.load().is_none());
    }

    #[test]
    fn test_missing_credential_short_circuits() {
        let mut session = session(MemoryCredentialStore::new());
        let mut surface = MemorySurface::new();

        // Endpoint is unreachable in tests; reaching the gateway would
        // return the technical-issues message instead.
        let reply = session.submit(&mut surface, "sum column B");
        assert!(reply.contains("No API key configured"), "got {}", reply);
    }

    #[test]
    fn test_turn_appends_both_messages() {
        let mut session = session(MemoryCredentialStore::new());
        let mut surface = MemorySurface::new();

        session.submit(&mut surface, "set ai key k");
        assert_eq!(session.conversation().len(), 2);
        assert!(!session.conversation().is_typing());
    }
}
