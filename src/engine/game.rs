//! Puzzle state machine
//!
//! Owns the state of one playthrough. `reset` starts a fresh attempt and
//! `step` validates, classifies and applies a guess. Invalid guesses are
//! reported through the observation and never change counters.

use super::guess::{Guess, Mode, Response};
use super::observation::{Observation, Step};
use crate::core::{CATEGORY_COUNT, GROUP_SIZE, Puzzle, Word, normalize};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Number of revealed categories that wins the puzzle
///
/// Once three groups are known the fourth is forced.
pub const REVEALS_TO_WIN: usize = CATEGORY_COUNT - 1;

/// Settings fixed for the lifetime of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub mode: Mode,
    /// Incorrect or nearly-correct guesses allowed
    pub max_guesses: usize,
    /// Seed for the word shuffle; `None` draws from the OS
    pub shuffle_seed: Option<u64>,
}

impl GameConfig {
    #[must_use]
    pub const fn new(mode: Mode, max_guesses: usize) -> Self {
        Self {
            mode,
            max_guesses,
            shuffle_seed: None,
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Mode::Iterative, 4)
    }
}

/// Contract violations of `step`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("{found} guess submitted to a {expected} puzzle")]
    ModeMismatch { expected: Mode, found: Mode },

    #[error("the playthrough has already finished")]
    Finished,
}

#[derive(Debug, Clone)]
struct PuzzleState {
    remaining: Vec<Word>,
    /// Indices into the puzzle's categories, in reveal order
    revealed: Vec<usize>,
    guesses: Vec<Guess>,
    guesses_remaining: usize,
    message: String,
    response: Option<Response>,
}

/// A single puzzle attempt
pub struct PuzzleGame {
    puzzle: Puzzle,
    config: GameConfig,
    rng: StdRng,
    state: PuzzleState,
}

impl PuzzleGame {
    /// Create a game; the state is already reset
    #[must_use]
    pub fn new(puzzle: Puzzle, config: GameConfig) -> Self {
        let rng = config
            .shuffle_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let state = PuzzleState {
            remaining: Vec::new(),
            revealed: Vec::new(),
            guesses: Vec::new(),
            guesses_remaining: config.max_guesses,
            message: String::new(),
            response: None,
        };

        let mut game = Self {
            puzzle,
            config,
            rng,
            state,
        };
        game.reset();
        game
    }

    /// Start a fresh attempt and return the initial observation
    pub fn reset(&mut self) -> Observation {
        let mut words: Vec<Word> = self.puzzle.words().cloned().collect();
        words.shuffle(&mut self.rng);

        self.state = PuzzleState {
            remaining: words,
            revealed: Vec::new(),
            guesses: Vec::new(),
            guesses_remaining: self.config.max_guesses,
            message: String::new(),
            response: None,
        };

        debug!(
            puzzle = self.puzzle.id(),
            mode = %self.config.mode,
            guesses = self.config.max_guesses,
            "puzzle reset"
        );

        self.observation()
    }

    /// Apply a guess
    ///
    /// # Errors
    /// Returns `EngineError::ModeMismatch` if the guess shape does not match
    /// the game mode, or `EngineError::Finished` after the game is over.
    /// Malformed words never produce an error; they yield `Response::Invalid`.
    pub fn step(&mut self, guess: &Guess) -> Result<Step, EngineError> {
        if self.is_done() {
            return Err(EngineError::Finished);
        }

        let response = match (self.config.mode, guess) {
            (Mode::Iterative, Guess::Group(words)) => self.apply_group(words),
            (Mode::AllAtOnce, Guess::Partition(groups)) => self.apply_partition(groups),
            (expected, other) => {
                return Err(EngineError::ModeMismatch {
                    expected,
                    found: other.mode(),
                });
            }
        };

        if response.consumes_guess() {
            self.state.guesses_remaining -= 1;
        }
        self.state.response = Some(response);

        let won = self.state.revealed.len() >= REVEALS_TO_WIN;
        if won {
            self.reveal_all();
        }

        debug!(
            puzzle = self.puzzle.id(),
            %response,
            guesses_remaining = self.state.guesses_remaining,
            revealed = self.state.revealed.len(),
            "guess applied"
        );

        Ok(Step {
            observation: self.observation(),
            done: self.is_done(),
            reward: u8::from(won),
        })
    }

    /// Whether the playthrough is over
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.guesses_remaining == 0 || self.state.revealed.len() >= REVEALS_TO_WIN
    }

    #[must_use]
    pub const fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn observation(&self) -> Observation {
        let categories = self.puzzle.categories();
        Observation {
            words: self.state.remaining.clone(),
            guesses: self.state.guesses.clone(),
            revealed: self
                .state
                .revealed
                .iter()
                .map(|&i| categories[i].clone())
                .collect(),
            revealed_difficulties: self
                .state
                .revealed
                .iter()
                .map(|&i| categories[i].difficulty)
                .collect(),
            guesses_remaining: self.state.guesses_remaining,
            mode: self.config.mode,
            message: self.state.message.clone(),
            response: self.state.response,
        }
    }

    fn apply_group(&mut self, words: &[String]) -> Response {
        let normalized: Vec<String> = words.iter().map(|w| normalize(w)).collect();
        let distinct: FxHashSet<&str> = normalized.iter().map(String::as_str).collect();

        let valid = normalized.len() == GROUP_SIZE
            && distinct.len() == GROUP_SIZE
            && distinct.iter().all(|w| self.is_remaining(w));
        if !valid {
            return self.invalid();
        }

        self.state.guesses.push(Guess::Group(normalized.clone()));

        let mut exact = None;
        let mut off_by_one = false;
        for (index, category) in self.puzzle.categories().iter().enumerate() {
            match category.overlap(distinct.iter().copied()) {
                GROUP_SIZE => {
                    exact = Some(index);
                    break;
                }
                3 => off_by_one = true,
                _ => {}
            }
        }

        if let Some(index) = exact {
            let category = &self.puzzle.categories()[index];
            self.state.remaining.retain(|w| !category.contains(w.text()));
            self.state.revealed.push(index);
            self.state.message = format!(
                "Correct! The category was {}. Difficulty: {}.",
                category.description, category.difficulty
            );
            Response::Correct
        } else if off_by_one {
            self.state.message = "Nearly Correct. Three of your words are in a group, \
                                  but one is not in the same group."
                .to_string();
            Response::NearlyCorrect
        } else {
            self.state.message = "Incorrect guess.".to_string();
            Response::Incorrect
        }
    }

    /// Validates list shape and universe membership only; a word may repeat
    /// across sub-lists.
    fn apply_partition(&mut self, groups: &[Vec<String>]) -> Response {
        let normalized: Vec<Vec<String>> = groups
            .iter()
            .map(|g| g.iter().map(|w| normalize(w)).collect())
            .collect();

        let valid = normalized.len() == CATEGORY_COUNT
            && normalized.iter().all(|group| {
                group.len() == GROUP_SIZE && group.iter().all(|w| self.puzzle.contains(w))
            });
        if !valid {
            return self.invalid();
        }

        let all_match = self.puzzle.categories().iter().all(|category| {
            normalized
                .iter()
                .any(|group| category.overlap(group.iter().map(String::as_str)) == GROUP_SIZE)
        });
        self.state.guesses.push(Guess::Partition(normalized));

        if all_match {
            self.reveal_all();
            self.state.message = "Correct! You guessed all categories.".to_string();
            Response::Correct
        } else {
            self.state.message = "Incorrect guess.".to_string();
            Response::Incorrect
        }
    }

    fn invalid(&mut self) -> Response {
        self.state.message = "Invalid guess. Please try again.".to_string();
        Response::Invalid
    }

    fn is_remaining(&self, word: &str) -> bool {
        self.state.remaining.iter().any(|w| w.text() == word)
    }

    /// Reveal every category, keeping earlier reveals first
    fn reveal_all(&mut self) {
        for index in 0..CATEGORY_COUNT {
            if !self.state.revealed.contains(&index) {
                self.state.revealed.push(index);
            }
        }
        self.state.remaining.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;
    use crate::core::puzzle::tests::fish_puzzle;

    const FISH: [&str; 4] = ["BASS", "FLOUNDER", "SALMON", "TROUT"];
    const FIRE: [&str; 4] = ["ANT", "DRILL", "ISLAND", "OPAL"];
    const WEATHER: [&str; 4] = ["HAIL", "RAIN", "SLEET", "SNOW"];
    const TEAMS: [&str; 4] = ["BUCKS", "HEAT", "JAZZ", "NETS"];

    fn iterative_game(max_guesses: usize) -> PuzzleGame {
        PuzzleGame::new(
            fish_puzzle(),
            GameConfig::new(Mode::Iterative, max_guesses).with_seed(7),
        )
    }

    fn all_at_once_game(max_guesses: usize) -> PuzzleGame {
        PuzzleGame::new(
            fish_puzzle(),
            GameConfig::new(Mode::AllAtOnce, max_guesses).with_seed(7),
        )
    }

    #[test]
    fn reset_produces_fresh_observation() {
        let mut game = iterative_game(4);
        let obs = game.reset();

        assert_eq!(obs.words.len(), 16);
        assert!(obs.guesses.is_empty());
        assert!(obs.revealed.is_empty());
        assert_eq!(obs.guesses_remaining, 4);
        assert_eq!(obs.message, "");
        assert_eq!(obs.response, None);
        assert!(!game.is_done());
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let a = iterative_game(4).observation();
        let b = iterative_game(4).observation();
        assert_eq!(a.words, b.words);
    }

    #[test]
    fn correct_guess_reveals_category() {
        let mut game = iterative_game(4);
        let step = game.step(&Guess::group(FISH)).unwrap();

        assert_eq!(step.observation.response, Some(Response::Correct));
        assert_eq!(step.observation.revealed.len(), 1);
        assert_eq!(step.observation.revealed[0].description, "FISH");
        assert_eq!(step.observation.words.len(), 12);
        assert_eq!(step.observation.guesses_remaining, 4);
        assert!(!step.done);
        assert_eq!(step.reward, 0);
    }

    #[test]
    fn overlap_classification() {
        let mut game = iterative_game(4);

        let step = game
            .step(&Guess::group(["BASS", "FLOUNDER", "SALMON", "HEAT"]))
            .unwrap();
        assert_eq!(step.observation.response, Some(Response::NearlyCorrect));
        assert_eq!(step.observation.guesses_remaining, 3);

        let step = game
            .step(&Guess::group(["BASS", "FLOUNDER", "HEAT", "JAZZ"]))
            .unwrap();
        assert_eq!(step.observation.response, Some(Response::Incorrect));
        assert_eq!(step.observation.guesses_remaining, 2);

        let step = game.step(&Guess::group(FISH)).unwrap();
        assert_eq!(step.observation.response, Some(Response::Correct));
        assert_eq!(step.observation.guesses_remaining, 2);
    }

    #[test]
    fn raw_words_are_normalized() {
        let mut game = iterative_game(4);
        let step = game
            .step(&Guess::group(["Bass,", " flounder ", "SALMON.", "trout"]))
            .unwrap();
        assert_eq!(step.observation.response, Some(Response::Correct));
        assert_eq!(
            step.observation.guesses,
            vec![Guess::group(["BASS", "FLOUNDER", "SALMON", "TROUT"])]
        );
    }

    #[test]
    fn invalid_guesses_do_not_mutate_state() {
        let mut game = iterative_game(4);
        game.step(&Guess::group(FISH)).unwrap();
        let before = game.observation();

        let invalid = [
            Guess::group(["HAIL", "RAIN", "SLEET"]),
            Guess::group(["HAIL", "RAIN", "SLEET", "SNOW", "HEAT"]),
            Guess::group(["HAIL", "RAIN", "SLEET", "CARP"]),
            Guess::group(["HAIL", "RAIN", "SLEET", "hail"]),
            // Already revealed words are no longer available
            Guess::group(["BASS", "RAIN", "SLEET", "SNOW"]),
        ];

        for guess in &invalid {
            let step = game.step(guess).unwrap();
            assert_eq!(step.observation.response, Some(Response::Invalid));
            assert_eq!(step.observation.message, "Invalid guess. Please try again.");
            assert_eq!(step.observation.guesses_remaining, before.guesses_remaining);
            assert_eq!(step.observation.words, before.words);
            assert_eq!(step.observation.revealed, before.revealed);
            assert_eq!(step.observation.guesses, before.guesses);
            assert!(!step.done);
        }
    }

    #[test]
    fn three_reveals_force_full_win() {
        let mut game = iterative_game(4);

        game.step(&Guess::group(WEATHER)).unwrap();
        game.step(&Guess::group(FISH)).unwrap();
        let step = game.step(&Guess::group(TEAMS)).unwrap();

        assert!(step.done);
        assert_eq!(step.reward, 1);
        assert_eq!(step.observation.revealed.len(), 4);
        assert!(step.observation.words.is_empty());

        // Earlier reveals keep their order, the forced one comes last
        let order: Vec<&str> = step
            .observation
            .revealed
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(order, vec!["WET WEATHER", "FISH", "NBA TEAMS", "FIRE ___"]);
        assert!(step.observation.is_revealed(Difficulty::Purple));
    }

    #[test]
    fn running_out_of_guesses_loses() {
        let mut game = iterative_game(2);

        let step = game.step(&Guess::group(["BASS", "ANT", "HAIL", "JAZZ"])).unwrap();
        assert!(!step.done);

        let step = game.step(&Guess::group(["BASS", "ANT", "HAIL", "HEAT"])).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, 0);
        assert_eq!(step.observation.guesses_remaining, 0);
        assert_eq!(step.observation.words.len(), 16);
    }

    #[test]
    fn step_after_finish_is_an_error() {
        let mut game = iterative_game(1);
        game.step(&Guess::group(["BASS", "ANT", "HAIL", "JAZZ"])).unwrap();

        assert_eq!(
            game.step(&Guess::group(FISH)),
            Err(EngineError::Finished)
        );
    }

    #[test]
    fn mode_mismatch_is_an_error() {
        let mut game = iterative_game(4);
        let result = game.step(&Guess::partition([FISH, FIRE, WEATHER, TEAMS]));

        assert_eq!(
            result,
            Err(EngineError::ModeMismatch {
                expected: Mode::Iterative,
                found: Mode::AllAtOnce
            })
        );
    }

    #[test]
    fn termination_bound_holds() {
        let guesses = [
            Guess::group(["BASS", "ANT", "HAIL", "JAZZ"]),
            Guess::group(FISH),
            Guess::group(["DRILL", "ANT", "HAIL", "HEAT"]),
            Guess::group(FIRE),
            Guess::group(["RAIN", "SNOW", "NETS", "BUCKS"]),
            Guess::group(TEAMS),
        ];
        let max_guesses = 3;
        let mut game = iterative_game(max_guesses);

        let mut steps = 0;
        for guess in guesses.iter().cycle() {
            if game.is_done() {
                break;
            }
            game.step(guess).unwrap();
            steps += 1;
        }

        assert!(steps <= max_guesses + REVEALS_TO_WIN);
        assert!(game.is_done());
    }

    #[test]
    fn all_at_once_correct_in_any_order() {
        let mut game = all_at_once_game(4);
        let step = game
            .step(&Guess::partition([
                ["opal", "island", "drill", "ant"],
                TEAMS,
                FISH,
                WEATHER,
            ]))
            .unwrap();

        assert_eq!(step.observation.response, Some(Response::Correct));
        assert!(step.done);
        assert_eq!(step.reward, 1);
        assert_eq!(step.observation.revealed.len(), 4);
        assert!(step.observation.words.is_empty());
    }

    #[test]
    fn all_at_once_incorrect_costs_a_guess() {
        let mut game = all_at_once_game(2);
        let step = game
            .step(&Guess::partition([
                ["BASS", "FLOUNDER", "SALMON", "OPAL"],
                ["ANT", "DRILL", "ISLAND", "TROUT"],
                WEATHER,
                TEAMS,
            ]))
            .unwrap();

        assert_eq!(step.observation.response, Some(Response::Incorrect));
        assert_eq!(step.observation.guesses_remaining, 1);
        assert!(step.observation.revealed.is_empty());
        assert!(!step.done);
    }

    #[test]
    fn all_at_once_invalid_shapes() {
        let mut game = all_at_once_game(4);

        let short_group = Guess::partition(vec![
            vec!["BASS", "FLOUNDER", "SALMON"],
            FIRE.to_vec(),
            WEATHER.to_vec(),
            TEAMS.to_vec(),
        ]);
        let unknown_word = Guess::partition([
            ["BASS", "FLOUNDER", "SALMON", "CARP"],
            FIRE,
            WEATHER,
            TEAMS,
        ]);
        let three_groups = Guess::partition([FISH, FIRE, WEATHER]);

        for guess in [short_group, unknown_word, three_groups] {
            let step = game.step(&guess).unwrap();
            assert_eq!(step.observation.response, Some(Response::Invalid));
            assert_eq!(step.observation.guesses_remaining, 4);
        }
        assert!(game.observation().guesses.is_empty());
    }

    #[test]
    fn all_at_once_repeated_word_is_incorrect_not_invalid() {
        let mut game = all_at_once_game(4);
        let step = game
            .step(&Guess::partition([
                FISH,
                ["ANT", "DRILL", "ISLAND", "BASS"],
                WEATHER,
                TEAMS,
            ]))
            .unwrap();

        assert_eq!(step.observation.response, Some(Response::Incorrect));
        assert_eq!(step.observation.guesses_remaining, 3);
    }
}
