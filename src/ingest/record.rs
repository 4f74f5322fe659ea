//! Parses one raw corpus line into a normalized word record.
//!
//! Pure and storage-free: a line either yields a record or is skipped.

use serde_json::Value;

/// A validated, normalized dictionary entry ready for upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRecord {
    pub word_rank: i32,
    pub head_word: String,
    pub word_id: String,
    pub book_id: String,
    /// The full parsed object, carried verbatim into storage.
    pub content: Value,
}

/// Parses a single line of newline-delimited JSON.
///
/// Returns `None` for blank lines, unparsable JSON, and records missing any
/// of the four required fields. Rejection is silent; the caller counts
/// skipped lines and keeps streaming.
///
/// `override_book_id`, when supplied, wins over the record's own `bookId`.
#[must_use]
pub fn parse_line(line: &str, override_book_id: Option<&str>) -> Option<WordRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed: Value = serde_json::from_str(trimmed).ok()?;

    let word_rank = positive_int(parsed.get("wordRank")?)?;
    let head_word = non_empty_string(parsed.get("headWord")?)?;
    let word_id = non_empty_string(parsed.pointer("/content/word/wordId")?)?;

    let book_id = match override_book_id {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => non_empty_string(parsed.get("bookId")?)?,
    };

    Some(WordRecord {
        word_rank,
        head_word,
        word_id,
        book_id,
        content: parsed,
    })
}

/// Coerces a JSON value to a positive integer: integers, integral floats,
/// and numeric strings all qualify.
fn positive_int(value: &Value) -> Option<i32> {
    let rank = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                let f = n.as_f64()?;
                if f.fract() != 0.0 {
                    return None;
                }
                f as i64
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    if rank <= 0 {
        return None;
    }
    i32::try_from(rank).ok()
}

/// Coerces a JSON value to a trimmed, non-empty string. Numbers coerce to
/// their decimal representation; anything else is rejected.
fn non_empty_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(rank: &str, head: &str, book: &str, word: &str) -> String {
        format!(
            r#"{{"wordRank":{rank},"headWord":{head},"bookId":{book},"content":{{"word":{{"wordId":{word}}}}}}}"#
        )
    }

    #[test]
    fn parses_a_complete_record() {
        let raw = line("3", r#""apple""#, r#""B1""#, r#""W1""#);
        let record = parse_line(&raw, None).unwrap();

        assert_eq!(record.word_rank, 3);
        assert_eq!(record.head_word, "apple");
        assert_eq!(record.book_id, "B1");
        assert_eq!(record.word_id, "W1");
        assert_eq!(record.content["content"]["word"]["wordId"], "W1");
    }

    #[test]
    fn content_is_kept_in_full() {
        let raw = r#"{"wordRank":1,"headWord":"a","bookId":"B","content":{"word":{"wordId":"W"},"extra":{"deep":[1,2,3]}}}"#;
        let record = parse_line(raw, None).unwrap();
        assert_eq!(record.content["content"]["extra"]["deep"][2], 3);
    }

    #[test]
    fn rejects_blank_and_malformed_lines() {
        assert!(parse_line("", None).is_none());
        assert!(parse_line("   \t", None).is_none());
        assert!(parse_line("{not json", None).is_none());
        assert!(parse_line("[1,2,3", None).is_none());
    }

    #[test]
    fn rejects_missing_required_fields() {
        assert!(
            parse_line(r#"{"headWord":"a","bookId":"B","content":{"word":{"wordId":"W"}}}"#, None)
                .is_none()
        );
        assert!(
            parse_line(r#"{"wordRank":1,"bookId":"B","content":{"word":{"wordId":"W"}}}"#, None)
                .is_none()
        );
        assert!(parse_line(r#"{"wordRank":1,"headWord":"a","content":{"word":{"wordId":"W"}}}"#, None).is_none());
        assert!(parse_line(r#"{"wordRank":1,"headWord":"a","bookId":"B","content":{}}"#, None).is_none());
    }

    #[test]
    fn rejects_non_positive_and_fractional_ranks() {
        assert!(parse_line(&line("0", r#""a""#, r#""B""#, r#""W""#), None).is_none());
        assert!(parse_line(&line("-2", r#""a""#, r#""B""#, r#""W""#), None).is_none());
        assert!(parse_line(&line("1.5", r#""a""#, r#""B""#, r#""W""#), None).is_none());
    }

    #[test]
    fn coerces_rank_from_integral_float_and_numeric_string() {
        assert_eq!(
            parse_line(&line("2.0", r#""a""#, r#""B""#, r#""W""#), None)
                .unwrap()
                .word_rank,
            2
        );
        assert_eq!(
            parse_line(&line(r#""7""#, r#""a""#, r#""B""#, r#""W""#), None)
                .unwrap()
                .word_rank,
            7
        );
    }

    #[test]
    fn trims_string_fields_and_rejects_whitespace_only() {
        let record =
            parse_line(&line("1", r#""  apple  ""#, r#"" B1 ""#, r#"" W1 ""#), None).unwrap();
        assert_eq!(record.head_word, "apple");
        assert_eq!(record.book_id, "B1");
        assert_eq!(record.word_id, "W1");

        assert!(parse_line(&line("1", r#""   ""#, r#""B""#, r#""W""#), None).is_none());
    }

    #[test]
    fn override_book_id_wins() {
        let raw = line("1", r#""a""#, r#""B1""#, r#""W1""#);
        assert_eq!(parse_line(&raw, Some("B9")).unwrap().book_id, "B9");
        // Blank override falls back to the record's own field.
        assert_eq!(parse_line(&raw, Some("  ")).unwrap().book_id, "B1");
    }

    #[test]
    fn override_supplies_book_id_when_record_has_none() {
        let raw = r#"{"wordRank":1,"headWord":"a","content":{"word":{"wordId":"W1"}}}"#;
        assert!(parse_line(raw, None).is_none());
        assert_eq!(parse_line(raw, Some("B2")).unwrap().book_id, "B2");
    }
}
