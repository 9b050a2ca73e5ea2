//! Image-request intent classification.
//!
//! A fixed, ordered list of phrase prefixes decides whether a chat message
//! is an image-generation request. This is a plain prefix classifier, not a
//! model-based detector: phrasings that match no pattern fall through to the
//! normal chat path.

/// Trigger prefixes checked in order; the first match wins.
///
/// Longer variants precede their shorter stems so that stripping removes
/// the full trigger phrase.
const TRIGGER_PREFIXES: &[&str] = &[
    "generate an image of",
    "generate a picture of",
    "create an image of",
    "make an image of",
    "generate an image",
    "draw me",
    "draw",
    "imagine",
    "visualize",
    "illustrate",
    "sketch",
];

/// Minimum characters a stripped prompt must keep; shorter remainders fall
/// back to the original message text.
const MIN_PROMPT_CHARS: usize = 3;

/// Outcome of classifying a message as an image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// The trigger phrase that matched.
    pub trigger: &'static str,
    /// The descriptive prompt with the trigger stripped.
    pub prompt: String,
}

/// Classifies a message, returning the extracted request on a match.
///
/// Matching is ASCII-case-insensitive on the trimmed message and requires
/// the trigger to end at a word boundary, so "drawing a conclusion" is not
/// an image request. Classification is pure: the same input always yields
/// the same result.
pub fn classify_image_request(message: &str) -> Option<ImageRequest> {
    let trimmed = message.trim();

    for trigger in TRIGGER_PREFIXES {
        let Some(head) = trimmed.get(..trigger.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(trigger) {
            continue;
        }

        let rest = &trimmed[trigger.len()..];
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            continue;
        }

        let prompt = rest.trim();
        let prompt = if prompt.chars().count() < MIN_PROMPT_CHARS {
            trimmed.to_string()
        } else {
            prompt.to_string()
        };

        return Some(ImageRequest { trigger, prompt });
    }

    None
}
