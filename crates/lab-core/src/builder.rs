//! Level-Aware Conversation Assembly
//!
//! One constructor per learning level. Each produces a complete ordered
//! [`Conversation`] ready to send to a provider; none of them validate
//! content length or window the history (deliberately out of scope).

use crate::message::{Conversation, Message, Role};

/// Introduces retrieved snippets inside the system prompt (level 5).
pub const CONTEXT_DELIMITER: &str =
    "\n\nThe following documents are relevant to the question. Answer based on their contents:\n\n";

/// Joins individual retrieved snippets (level 5).
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Level 1: plain chat, no system prompt at all.
pub fn plain(user_message: &str) -> Conversation {
    let mut conv = Conversation::new();
    conv.push(Message::user(user_message));
    conv
}

/// Level 2: system prompt followed by the user turn.
pub fn with_system_prompt(system_prompt: &str, user_message: &str) -> Conversation {
    let mut conv = Conversation::with_system_prompt(system_prompt);
    conv.push(Message::user(user_message));
    conv
}

/// Level 3: few-shot examples seeded as (user, assistant) pairs.
///
/// Example order is preserved exactly as supplied; no deduplication or
/// ranking. For N pairs the result has `1 + 2N + 1` turns.
pub fn few_shot(
    system_prompt: &str,
    examples: &[(String, String)],
    user_message: &str,
) -> Conversation {
    let mut conv = Conversation::with_system_prompt(system_prompt);

    for (user, assistant) in examples {
        conv.push(Message::user(user));
        conv.push(Message::assistant(assistant));
    }

    conv.push(Message::user(user_message));
    conv
}

/// Level 4: replayed multi-turn history.
///
/// History entries are (role, content) pairs in original order. Entries with
/// a role other than `user` or `assistant` are silently dropped.
pub fn with_history(
    system_prompt: &str,
    history: &[(String, String)],
    user_message: &str,
) -> Conversation {
    let mut conv = Conversation::with_system_prompt(system_prompt);

    for (role, content) in history {
        match role.as_str() {
            "user" => conv.push(Message::user(content)),
            "assistant" => conv.push(Message::assistant(content)),
            other => tracing::debug!(role = other, "Dropping history turn with unknown role"),
        }
    }

    conv.push(Message::user(user_message));
    conv
}

/// Level 5: context-augmented (RAG-style) chat.
///
/// The retrieved snippets are folded into the system turn, joined in
/// caller-supplied order. Retrieval and ranking happen upstream; this only
/// formats whatever ordered list it is handed.
pub fn context_augmented(
    system_prompt: &str,
    snippets: &[String],
    user_message: &str,
) -> Conversation {
    let mut prompt = String::from(system_prompt);
    prompt.push_str(CONTEXT_DELIMITER);
    prompt.push_str(&snippets.join(CONTEXT_SEPARATOR));

    let mut conv = Conversation::with_system_prompt(prompt);
    conv.push(Message::user(user_message));
    conv
}

/// Shared check used by tests and the agent: does the first turn carry the
/// system prompt, and does the conversation end on the newest user turn?
pub fn ends_with_user(conv: &Conversation) -> bool {
    conv.last().map(|m| &m.role) == Some(&Role::User)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_has_no_system_turn() {
        let conv = plain("hello");
        assert_eq!(conv.len(), 1);
        assert!(!conv.has_system_prompt());
        assert!(ends_with_user(&conv));
    }

    #[test]
    fn test_system_prompt_is_first() {
        let conv = with_system_prompt("You are a pirate.", "hello");
        assert_eq!(conv.len(), 2);
        assert!(conv.has_system_prompt());
        assert_eq!(conv.messages()[0].content, "You are a pirate.");
        assert!(ends_with_user(&conv));
    }

    #[test]
    fn test_few_shot_turn_count() {
        let examples = vec![
            ("1+1".to_string(), "2".to_string()),
            ("2+2".to_string(), "4".to_string()),
            ("3+3".to_string(), "6".to_string()),
        ];
        let conv = few_shot("Answer with just the number.", &examples, "4+4");

        // 1 system + 2N example turns + 1 final user
        assert_eq!(conv.len(), 1 + 2 * examples.len() + 1);
        assert_eq!(conv.messages()[1].content, "1+1");
        assert_eq!(conv.messages()[2].role, Role::Assistant);
        assert_eq!(conv.messages()[2].content, "2");
        assert!(ends_with_user(&conv));
    }

    #[test]
    fn test_history_drops_unknown_roles() {
        let history = vec![
            ("user".to_string(), "first".to_string()),
            ("system".to_string(), "should vanish".to_string()),
            ("assistant".to_string(), "second".to_string()),
            ("function".to_string(), "should vanish too".to_string()),
        ];
        let conv = with_history("sys", &history, "third");

        // 1 system + 2 valid history turns + 1 final user
        assert_eq!(conv.len(), 1 + 2 + 1);
        assert_eq!(conv.messages()[1].content, "first");
        assert_eq!(conv.messages()[2].content, "second");
    }

    #[test]
    fn test_history_preserves_order() {
        let history = vec![
            ("user".to_string(), "a".to_string()),
            ("assistant".to_string(), "b".to_string()),
            ("user".to_string(), "c".to_string()),
            ("assistant".to_string(), "d".to_string()),
        ];
        let conv = with_history("sys", &history, "e");
        let contents: Vec<_> = conv.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_context_augmented_folds_snippets_into_system() {
        let snippets = vec!["doc one".to_string(), "doc two".to_string()];
        let conv = context_augmented("You answer from documents.", &snippets, "question");

        assert_eq!(conv.len(), 2);
        let system = &conv.messages()[0].content;
        assert!(system.starts_with("You answer from documents."));
        assert!(system.contains("doc one"));
        assert!(system.contains(CONTEXT_SEPARATOR));
        assert!(system.contains("doc two"));
        // Snippet order is the caller's order
        assert!(system.find("doc one").unwrap() < system.find("doc two").unwrap());
    }
}
