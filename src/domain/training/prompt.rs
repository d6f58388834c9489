//! Prompt assembly, transcript windowing, and reply extraction.
//!
//! Pure functions over domain values; the engine decides when to call them
//! and what to do with the results.

use super::{PersonaContext, TurnRecord};

/// Label for trainee lines in the transcript.
pub const TRAINEE_LABEL: &str = "Salesperson";

/// Generic label for persona lines in the transcript.
pub const PERSONA_LABEL: &str = "Customer";

/// Delimiter the opening prompt ends with; the generator's reply follows it.
pub const OPENING_DELIMITER: &str = "Assistant:";

/// Default number of transcript lines presented to the generator.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Builds the fixed-shape prompt that opens a session.
///
/// Frames the persona as the one initiating the exchange and ends with the
/// opening delimiter so the reply can be cut out of the raw output.
pub fn opening_prompt(context: &PersonaContext) -> String {
    let system = "This is a chat between a salesperson and a customer AI. \
         The AI customer will ask relevant questions about the product to assess \
         if it matches their interests.";
    let framing = format!(
        "The customer is named {}, who is {} and {}. The product, {}, offers {}.",
        context.persona_name,
        context.primary_trait.to_lowercase(),
        context.persona_description.to_lowercase(),
        context.product_name,
        context.product_description,
    );
    let instruction = "Start the conversation as a customer interested in learning more \
         about the product. Respond and behave as a real customer.";

    format!(
        "System: {}\n\nContext: {}\n\nUser: {}\n\n{}",
        system, framing, instruction, OPENING_DELIMITER
    )
}

/// Renders prior turns plus the new trainee input as labelled transcript lines.
///
/// For each stored turn the trainee line wins if the trainee spoke, otherwise
/// the persona line is used; turns where both sides are empty are skipped.
/// Order follows the stored turn positions.
pub fn transcript_lines(history: &[TurnRecord], trainee_input: &str) -> Vec<String> {
    let mut lines: Vec<String> = history
        .iter()
        .filter(|turn| !turn.is_empty())
        .map(|turn| {
            if turn.has_trainee_input() {
                format!("{}: {}", TRAINEE_LABEL, turn.trainee_input)
            } else {
                format!("{}: {}", PERSONA_LABEL, turn.persona_reply)
            }
        })
        .collect();
    lines.push(format!("{}: {}", TRAINEE_LABEL, trainee_input));
    lines
}

/// Keeps only the `window` most recent lines. Oldest lines are dropped, not
/// summarized.
pub fn window_lines(lines: &[String], window: usize) -> &[String] {
    let start = lines.len().saturating_sub(window);
    &lines[start..]
}

/// Builds the continuation prompt: persona framing, windowed transcript, and
/// a trailing persona-name cue for the generator to complete.
pub fn continuation_prompt(context: &PersonaContext, lines: &[String]) -> String {
    let system = format!(
        "As {}, you are {}. You are interested in {}, which is {}. \
         At this level, you require more detailed information and convincing arguments. \
         You must strictly behave as a customer only.",
        context.persona_name,
        context.persona_description,
        context.product_name,
        context.product_description,
    );

    format!(
        "{}\n\nConversation history:\n{}\n{}:",
        system,
        lines.join("\n"),
        context.persona_name
    )
}

/// Stop sequences that bound generation to a single persona reply.
pub fn stop_sequences(persona_name: &str) -> Vec<String> {
    vec![
        format!("{}:", persona_name),
        format!("{}:", TRAINEE_LABEL),
        format!("{}:", PERSONA_LABEL),
        "\n\n".to_string(),
    ]
}

/// Extracts the reply from raw generator output.
///
/// The reply is everything after the last occurrence of `delimiter`, trimmed.
/// When the delimiter never appears the whole output is the reply (degraded
/// path, still a success). A dangling trainee-label artifact at the end is
/// stripped.
pub fn extract_reply(raw: &str, delimiter: &str) -> String {
    let tail = match raw.rfind(delimiter) {
        Some(idx) => &raw[idx + delimiter.len()..],
        None => raw,
    };
    let tail = tail.trim();

    let dangling = format!("\n{}:", TRAINEE_LABEL);
    match tail.strip_suffix(&dangling) {
        Some(stripped) => stripped.trim().to_string(),
        None => tail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ProductId, SessionId, Timestamp};
    use crate::domain::training::persona::test_context;
    use crate::domain::training::{Level, TurnPosition};
    use proptest::prelude::*;

    fn record(position: u64, trainee: &str, persona: &str) -> TurnRecord {
        TurnRecord {
            session_id: SessionId::new(),
            position: TurnPosition::new(position),
            recorded_at: Timestamp::from_unix_secs(position),
            product_id: ProductId::new("p1").unwrap(),
            level: Level::ONE,
            trainee_input: trainee.to_string(),
            persona_reply: persona.to_string(),
        }
    }

    #[test]
    fn opening_prompt_embeds_persona_and_product() {
        let prompt = opening_prompt(&test_context());
        assert!(prompt.contains("Maria"));
        assert!(prompt.contains("skeptical"));
        assert!(prompt.contains("SolarMax Panels"));
        assert!(prompt.contains("residential solar panels"));
        assert!(prompt.ends_with(OPENING_DELIMITER));
    }

    #[test]
    fn transcript_prefers_trainee_line_when_present() {
        let history = vec![
            record(1, "", "Hi, what does it cost?"),
            record(2, "It starts at $99", "Any discounts?"),
        ];
        let lines = transcript_lines(&history, "We offer 10% off this month");

        assert_eq!(
            lines,
            vec![
                "Customer: Hi, what does it cost?",
                "Salesperson: It starts at $99",
                "Salesperson: We offer 10% off this month",
            ]
        );
    }

    #[test]
    fn transcript_skips_fully_empty_turns() {
        let history = vec![record(1, "", ""), record(2, "", "Hello")];
        let lines = transcript_lines(&history, "Hi Maria");
        assert_eq!(lines, vec!["Customer: Hello", "Salesperson: Hi Maria"]);
    }

    #[test]
    fn window_keeps_most_recent_lines() {
        let lines: Vec<String> = (0..30).map(|i| format!("line {}", i)).collect();
        let windowed = window_lines(&lines, 10);

        assert_eq!(windowed.len(), 10);
        assert_eq!(windowed[0], "line 20");
        assert_eq!(windowed[9], "line 29");
    }

    #[test]
    fn window_returns_everything_when_short() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(window_lines(&lines, 10).len(), 2);
    }

    #[test]
    fn continuation_prompt_ends_with_persona_cue() {
        let lines = vec!["Customer: Hello".to_string(), "Salesperson: Hi".to_string()];
        let prompt = continuation_prompt(&test_context(), &lines);

        assert!(prompt.contains("Conversation history:"));
        assert!(prompt.contains("Customer: Hello"));
        assert!(prompt.ends_with("Maria:"));
    }

    #[test]
    fn stop_sequences_bound_one_reply() {
        let stops = stop_sequences("Maria");
        assert_eq!(stops, vec!["Maria:", "Salesperson:", "Customer:", "\n\n"]);
    }

    #[test]
    fn extract_reply_takes_text_after_last_delimiter() {
        let raw = "Maria: first pass\nSalesperson: pitch\nMaria: I need to see numbers.";
        assert_eq!(extract_reply(raw, "Maria:"), "I need to see numbers.");
    }

    #[test]
    fn extract_reply_without_delimiter_returns_whole_output() {
        assert_eq!(
            extract_reply("  Just tell me the price.  ", "Maria:"),
            "Just tell me the price."
        );
    }

    #[test]
    fn extract_reply_strips_dangling_trainee_label() {
        let raw = "Maria: Sounds interesting.\nSalesperson:";
        assert_eq!(extract_reply(raw, "Maria:"), "Sounds interesting.");
    }

    #[test]
    fn extract_reply_can_come_back_empty() {
        assert_eq!(extract_reply("Maria:   ", "Maria:"), "");
    }

    proptest! {
        #[test]
        fn window_never_exceeds_bound(
            count in 0usize..60,
            window in 1usize..20,
        ) {
            let lines: Vec<String> = (0..count).map(|i| format!("line {}", i)).collect();
            let windowed = window_lines(&lines, window);
            prop_assert!(windowed.len() <= window);
            // the kept lines are exactly the most recent ones
            prop_assert_eq!(windowed, &lines[count.saturating_sub(window)..]);
        }
    }
}
