/*!
 * Prompt and response codec for tagged subtitle batches.
 *
 * A batch is encoded as a prompt with 1-based `[N]` tags local to the batch,
 * and the model is asked to answer under the same tags. Decoding is lenient:
 * it takes whatever tags come back, in order, and merging pairs them with
 * entries positionally.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::SubtitleEntry;

/// Instruction block placed ahead of the tagged entries
const PROMPT_HEADER: &str = "Translate the following {count} subtitle entries to {language}. \
Return only the translations, each starting with the same [N] tag as its entry. \
Keep exactly {count} tagged entries in the same order; a translation may span \
multiple lines but must stay under its tag. Do not add notes or explanations.";

/// Font color used to mark the translated line in merged output
pub const TRANSLATION_COLOR: &str = "yellow";

static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("Invalid tag regex pattern"));

/// Build the prompt for one batch of entries.
///
/// Tags are local to the batch: the first entry is always `[1]` regardless of
/// its sequence number in the file.
pub fn encode_batch(entries: &[SubtitleEntry], target_language: &str) -> String {
    let mut prompt = PROMPT_HEADER
        .replace("{count}", &entries.len().to_string())
        .replace("{language}", target_language);

    for (i, entry) in entries.iter().enumerate() {
        prompt.push_str(&format!("\n\n[{}]\n{}", i + 1, entry.text));
    }

    prompt
}

/// Extract tagged translations from a model response, in order of appearance.
///
/// Each translation runs from its `[N]` tag to the next tag or the end of the
/// response, trimmed. Multi-line translations and stray `]` characters inside
/// the text are fine. Responses with no tags decode to an empty list; this
/// never fails.
pub fn decode_response(response: &str) -> Vec<String> {
    let tags: Vec<(usize, usize, usize)> = TAG_REGEX
        .captures_iter(response)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str().parse::<usize>().ok()?;
            Some((whole.start(), whole.end(), number))
        })
        .collect();

    let mut translations = Vec::with_capacity(tags.len());
    for (i, &(_, text_start, number)) in tags.iter().enumerate() {
        if number != i + 1 {
            debug!(
                "Tag [{}] arrived at position {} of the response",
                number,
                i + 1
            );
        }

        let text_end = tags
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(response.len());
        translations.push(response[text_start..text_end].trim().to_string());
    }

    translations
}

/// Append each translation to its entry as a colored second line.
///
/// Pairing is positional and stops at the shorter side: entries without a
/// translation keep their original text, surplus translations are dropped.
/// Returns the number of entries that received a translation.
pub fn merge_translations(entries: &mut [SubtitleEntry], translations: &[String]) -> usize {
    if translations.len() != entries.len() {
        warn!(
            "Batch returned {} translations for {} entries",
            translations.len(),
            entries.len()
        );
    }

    let mut merged = 0;
    for (entry, translation) in entries.iter_mut().zip(translations.iter()) {
        entry.text = format!(
            "{}\n<font color=\"{}\">{}</font>",
            entry.text, TRANSLATION_COLOR, translation
        );
        merged += 1;
    }

    merged
}
