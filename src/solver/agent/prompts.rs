//! Prompt templates for the language-model agent

use crate::engine::{Mode, Response};

pub const SYSTEM_PROMPT: &str = "You are a puzzle-solving agent. Solve the word puzzles the user \
gives you by drawing on your knowledge of language and the world, and follow the user's \
formatting instructions exactly.";

const RULES: &str = "There are 16 words that form 4 groups of 4. Every group shares a theme. \
Use each of the 16 words exactly once.\n\
Themes can be simple, such as \"types of fish\": Bass, Flounder, Salmon, Trout. \
They can also need lateral thinking, such as \"FIRE ___\": Ant, Drill, Island, Opal.";

const GROUP_FORMAT: &str = "<ANSWER> GROUP NAME: [WORD, WORD, WORD, WORD] </ANSWER>";

const PARTITION_FORMAT: &str = "<ANSWER>\n\
GROUP 1 NAME: [WORD, WORD, WORD, WORD]\n\
GROUP 2 NAME: [WORD, WORD, WORD, WORD]\n\
GROUP 3 NAME: [WORD, WORD, WORD, WORD]\n\
GROUP 4 NAME: [WORD, WORD, WORD, WORD]\n\
</ANSWER>";

const GROUP_REASONING: &str = "- First, summarize the rules and the objective in at most 50 words\n\
- Then name a theme shared by four of the words and explain briefly why each word fits\n";

const PARTITION_REASONING: &str = "- First, summarize the rules and the objective in at most 50 words\n\
- Then name the four themes and explain briefly why each word fits its group\n";

fn format_for(mode: Mode) -> &'static str {
    match mode {
        Mode::Iterative => GROUP_FORMAT,
        Mode::AllAtOnce => PARTITION_FORMAT,
    }
}

fn reminders(mode: Mode, chain_of_thought: bool) -> String {
    let reasoning = match (chain_of_thought, mode) {
        (false, _) => "",
        (true, Mode::Iterative) => GROUP_REASONING,
        (true, Mode::AllAtOnce) => PARTITION_REASONING,
    };
    format!(
        "{reasoning}- Reply with your answer in the format above, inside the <ANSWER> delimiters, \
         with no other text\n\
         - Check the conversation so far and never repeat an earlier guess"
    )
}

/// First user message of a conversation
#[must_use]
pub fn initial(mode: Mode, words: &str, chain_of_thought: bool) -> String {
    let task = match mode {
        Mode::Iterative => {
            "Give the single group you are most confident in. I will enter it and tell you \
             whether it was correct, incorrect or nearly correct (3 of 4 words). We continue \
             until the puzzle is solved or you run out of guesses."
        }
        Mode::AllAtOnce => {
            "Give all four groups at once. Replace each GROUP NAME with a name for the theme."
        }
    };
    format!(
        "Let's solve a daily word puzzle about finding connections between words.\n{RULES}\n\n\
         {task}\n\nFormat your answer as:\n{}\n\nRules:\n{}\n\nThe 16 words are:\n{words}",
        format_for(mode),
        reminders(mode, chain_of_thought),
    )
}

/// User message that reports the outcome of the previous guess
///
/// `response` is `None` when no guess reached the game; it is treated as
/// invalid.
#[must_use]
pub fn follow_up(
    mode: Mode,
    response: Option<Response>,
    game_message: &str,
    words: &str,
    chain_of_thought: bool,
) -> String {
    let nudge = match response {
        Some(Response::Correct) => "Well done. Keep going with the remaining words.",
        Some(Response::NearlyCorrect) => {
            "Keep going. Again, give the group you are most certain of and do not repeat an \
             earlier guess."
        }
        Some(Response::Incorrect) => {
            "Let's keep going. Again, give your best answer and do not repeat an earlier guess."
        }
        Some(Response::Invalid) | None => {
            "Your answer could not be used. Try again and follow the format exactly."
        }
    };
    format!(
        "The game replied: {game_message}\n\n{nudge}\n\nFormat your answer as:\n{}\n\n\
         As a reminder:\n{}\n\nThe remaining words are:\n{words}",
        format_for(mode),
        reminders(mode, chain_of_thought),
    )
}
