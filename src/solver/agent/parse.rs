//! Extracting guesses from model replies
//!
//! Answers are expected between `<ANSWER>` and `</ANSWER>`, one bracketed,
//! comma-separated word list per line:
//!
//! ```text
//! <ANSWER>
//! FISH: [Bass, Flounder, Salmon, Trout]
//! </ANSWER>
//! ```

const OPEN: &str = "<ANSWER>";
const CLOSE: &str = "</ANSWER>";

/// Text of the first answer block
#[must_use]
pub fn answer_block(reply: &str) -> Option<&str> {
    let start = reply.find(OPEN)? + OPEN.len();
    let len = reply[start..].find(CLOSE)?;
    Some(&reply[start..start + len])
}

/// Text from the first `[` to the last `]` of a line
fn bracketed(line: &str) -> Option<&str> {
    let open = line.find('[')?;
    let close = line.rfind(']')?;
    (close > open).then(|| &line[open + 1..close])
}

fn split_words(list: &str) -> Vec<String> {
    list.split(',').map(|word| word.trim().to_string()).collect()
}

/// The first bracketed list inside the answer block
#[must_use]
pub fn parse_group(reply: &str) -> Option<Vec<String>> {
    answer_block(reply)?
        .lines()
        .find_map(bracketed)
        .map(split_words)
}

/// Every bracketed list inside the answer block, one per line
#[must_use]
pub fn parse_partition(reply: &str) -> Option<Vec<Vec<String>>> {
    let groups: Vec<Vec<String>> = answer_block(reply)?
        .lines()
        .filter_map(bracketed)
        .map(split_words)
        .collect();
    (!groups.is_empty()).then_some(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_answer() {
        let reply = "Thinking...\n<ANSWER> FISH: [Bass, Flounder, Salmon, Trout] </ANSWER>";
        assert_eq!(
            parse_group(reply),
            Some(vec![
                "Bass".to_string(),
                "Flounder".to_string(),
                "Salmon".to_string(),
                "Trout".to_string()
            ])
        );
    }

    #[test]
    fn only_the_first_block_counts() {
        let reply = "<ANSWER>A: [one, two]</ANSWER> <ANSWER>B: [three]</ANSWER>";
        assert_eq!(answer_block(reply), Some("A: [one, two]"));
    }

    #[test]
    fn missing_delimiters_or_brackets() {
        assert_eq!(parse_group("FISH: [Bass, Trout]"), None);
        assert_eq!(parse_group("<ANSWER> FISH: Bass, Trout"), None);
        assert_eq!(parse_group("<ANSWER> FISH: Bass, Trout </ANSWER>"), None);
        assert_eq!(parse_partition("<ANSWER>\nnothing here\n</ANSWER>"), None);
    }

    #[test]
    fn multi_line_partition() {
        let reply = "<ANSWER>\n\
                     FISH: [Bass, Flounder, Salmon, Trout]\n\
                     FIRE ___: [Ant, Drill, Island, Opal]\n\
                     WET WEATHER: [Hail, Rain, Sleet, Snow]\n\
                     NBA TEAMS: [Bucks, Heat, Jazz, Nets]\n\
                     </ANSWER>";
        let groups = parse_partition(reply).unwrap();
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[3], vec!["Bucks", "Heat", "Jazz", "Nets"]);
    }

    #[test]
    fn brackets_span_first_to_last() {
        assert_eq!(
            parse_group("<ANSWER> X: [a, [b], c] </ANSWER>"),
            Some(vec!["a".to_string(), "[b]".to_string(), "c".to_string()])
        );
    }
}
