//! Fixed prompt and reply texts
//!
//! Every parameterized text carries a single `{feedback}` placeholder that is
//! substituted with the customer's words.

pub const FEEDBACK_PLACEHOLDER: &str = "{feedback}";

pub const SENTIMENT_PROMPT: &str = "\
Classify the sentiment of the following airline customer feedback.
Answer with exactly one word: positive or negative.

Text:
{feedback}
";

pub const FAULT_PROMPT: &str = "\
The following airline customer feedback describes a negative experience.
Decide whether it was caused by the airline (for example lost luggage or a delay caused by the airline) \
or by something beyond the airline's control (for example weather).
Answer with exactly one of: airline fault, not airline fault.

Text:
{feedback}
";

pub const POSITIVE_INSTRUCTION: &str = "\
You are a professional customer service representative.
The customer has shared a positive experience with the airline. Respond professionally, thanking them for their feedback and for choosing to fly with the airline.

Your response should follow these guidelines:
1. Address the customer directly and express appreciation for their positive feedback.
2. Keep the response warm and professional, encouraging them to choose the airline again in the future.

Text:
{feedback}
";

pub const NEGATIVE_AIRLINE_FAULT_INSTRUCTION: &str = "\
You are a customer service representative skilled in handling customer grievances.
The customer had a negative experience due to an issue caused by the airline (e.g., lost luggage). Offer your sympathies, inform the customer that customer service will reach out soon to resolve the issue or provide compensation.

Your response should follow these guidelines:
1. Address the customer directly and express sincere apologies for the inconvenience.
2. Reassure the customer that the airline's customer service team will contact them to resolve the issue or provide compensation.
3. Keep the tone empathetic and professional.

Text:
{feedback}
";

pub const NEGATIVE_NOT_AIRLINE_FAULT_INSTRUCTION: &str = "\
You are a professional customer service representative.
The customer had a negative experience due to an issue beyond the airline's control (e.g., weather-related delays). Offer your sympathies, and explain that the airline is not liable in such situations, but appreciate their understanding.

Your response should follow these guidelines:
1. Address the customer directly and apologize for the inconvenience they experienced.
2. Politely explain that the situation was beyond the airline's control, and express appreciation for their understanding.
3. Keep the tone empathetic and professional.

Text:
{feedback}
";

/// Static thank-you shown when no other template applies
pub const FALLBACK_REPLY: &str = "Thank you for sharing your experience. We value your feedback.";

// Replies shown when rendering skips the generator; each quotes the feedback back
pub const POSITIVE_REPLY: &str = "\
Thank you for your kind words and for choosing to fly with us. \
We are delighted you enjoyed your trip and look forward to welcoming you on board again soon.

You wrote:
{feedback}
";

pub const NEGATIVE_AIRLINE_FAULT_REPLY: &str = "\
We are sincerely sorry for the trouble our airline caused on your trip. \
Our customer service team will contact you shortly to resolve the issue or arrange compensation.

You wrote:
{feedback}
";

pub const NEGATIVE_NOT_AIRLINE_FAULT_REPLY: &str = "\
We are sorry for the inconvenience you experienced. \
The situation was beyond the airline's control, and we truly appreciate your understanding.

You wrote:
{feedback}
";

/// Substitute the feedback into a template's placeholder.
///
/// Only the template's own placeholder is replaced, so feedback that itself
/// contains `{feedback}` is inserted literally.
pub fn fill(template: &str, feedback: &str) -> String {
    template.replacen(FEEDBACK_PLACEHOLDER, feedback, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_parameterized_text_ends_with_the_feedback() {
        for template in [
            SENTIMENT_PROMPT,
            FAULT_PROMPT,
            POSITIVE_INSTRUCTION,
            NEGATIVE_AIRLINE_FAULT_INSTRUCTION,
            NEGATIVE_NOT_AIRLINE_FAULT_INSTRUCTION,
            POSITIVE_REPLY,
            NEGATIVE_AIRLINE_FAULT_REPLY,
            NEGATIVE_NOT_AIRLINE_FAULT_REPLY,
        ] {
            assert_eq!(template.matches(FEEDBACK_PLACEHOLDER).count(), 1);
            assert!(template.ends_with(":\n{feedback}\n"));
        }
    }

    #[test]
    fn test_fill_inserts_feedback_literally() {
        let filled = fill(SENTIMENT_PROMPT, "I typed {feedback} on purpose");
        assert!(filled.ends_with("Text:\nI typed {feedback} on purpose\n"));
        assert!(filled.starts_with("Classify the sentiment"));
    }
}
