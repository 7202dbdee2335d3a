//! Timed quiz game.
//!
//! Five questions are sampled without replacement from a fixed pool of ten
//! and presented in random order. Each question carries a 30 second
//! deadline: answering before it is evaluated immediately, expiry scores
//! the question incorrect. A short delay separates a scored question from
//! the next one (or from round completion after the last). The round
//! succeeds iff at least three of the five answers were correct.

use crate::timers::{TimerKind, TimerSet};
use crate::SessionError;
use rand::seq::SliceRandom;
use rand::Rng;

/// Per-question countdown.
pub const QUESTION_TIME_MS: u64 = 30_000;

/// Delay between a scored question and the next.
pub const ADVANCE_DELAY_MS: u64 = 1_500;

/// Questions per round.
pub const ROUND_SIZE: usize = 5;

/// Correct answers required to pass.
pub const PASS_THRESHOLD: u32 = 3;

/// One quiz question: prompt, four ordered options, index of the correct
/// one.
#[derive(Clone, Copy, Debug)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub correct: usize,
}

/// The fixed question pool.
pub static QUESTION_POOL: [Question; 10] = [
    Question {
        prompt: "What is a blockchain?",
        options: [
            "A type of cryptocurrency",
            "A distributed, immutable ledger",
            "A centralized database",
            "A programming language",
        ],
        correct: 1,
    },
    Question {
        prompt: "What does NFT stand for?",
        options: [
            "New Financial Token",
            "Non-Fungible Token",
            "Network File Transfer",
            "National Fintech Technology",
        ],
        correct: 1,
    },
    Question {
        prompt: "Which of these is NOT a cryptocurrency?",
        options: ["Bitcoin", "Ethereum", "Solana", "PayPal"],
        correct: 3,
    },
    Question {
        prompt: "What is a smart contract?",
        options: [
            "A legal agreement between two parties",
            "Self-executing code on a blockchain",
            "A type of cryptocurrency wallet",
            "A hardware device for storing crypto",
        ],
        correct: 1,
    },
    Question {
        prompt: "What consensus mechanism does Solana primarily use?",
        options: [
            "Proof of Work",
            "Proof of Stake",
            "Proof of History",
            "Delegated Proof of Stake",
        ],
        correct: 2,
    },
    Question {
        prompt: "What is a crypto wallet?",
        options: [
            "A physical device that stores cryptocurrencies",
            "Software that manages private keys",
            "A bank account for digital assets",
            "An exchange for trading cryptocurrencies",
        ],
        correct: 1,
    },
    Question {
        prompt: "What is DeFi?",
        options: [
            "Decentralized Finance",
            "Digital Financial Institution",
            "Distributed File Integration",
            "Direct Finance Investment",
        ],
        correct: 0,
    },
    Question {
        prompt: "What is the main advantage of using embedded wallets?",
        options: [
            "They offer better security than hardware wallets",
            "They simplify user onboarding for Web3 applications",
            "They provide higher transaction speeds",
            "They allow for offline transactions",
        ],
        correct: 1,
    },
    Question {
        prompt: "What is a DAO?",
        options: [
            "Digital Asset Organization",
            "Decentralized Autonomous Organization",
            "Distributed Application Overlay",
            "Direct Access Operation",
        ],
        correct: 1,
    },
    Question {
        prompt: "What is the purpose of identity verification in Web3?",
        options: [
            "To verify government IDs",
            "To provide secure identity verification and authentication",
            "To create cryptocurrency wallets",
            "To authorize bank transactions",
        ],
        correct: 1,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Waiting for an answer to the current question.
    Question,
    /// Question scored; waiting out the advance delay.
    Advancing,
    /// Round finished.
    Complete { success: bool },
}

/// One quiz round.
#[derive(Clone, Debug)]
pub struct QuizGame {
    /// Indices into [`QUESTION_POOL`], in presentation order.
    round: Vec<usize>,
    current: usize,
    correct: u32,
    /// How the last question was scored (display only).
    last_answer_correct: Option<bool>,
    phase: Phase,
}

impl QuizGame {
    /// Draw a fresh round and arm the first question's deadline.
    pub fn new(rng: &mut impl Rng, now_ms: u64, timers: &mut TimerSet) -> Self {
        let mut indices: Vec<usize> = (0..QUESTION_POOL.len()).collect();
        indices.shuffle(rng);
        indices.truncate(ROUND_SIZE);
        timers.schedule(TimerKind::QuestionDeadline, now_ms + QUESTION_TIME_MS);
        Self {
            round: indices,
            current: 0,
            correct: 0,
            last_answer_correct: None,
            phase: Phase::Question,
        }
    }

    /// Draw a fresh random sample and reset every counter.
    pub fn restart(&mut self, rng: &mut impl Rng, now_ms: u64, timers: &mut TimerSet) {
        timers.cancel(TimerKind::QuestionDeadline);
        timers.cancel(TimerKind::AdvanceDelay);
        *self = Self::new(rng, now_ms, timers);
    }

    /// Answer the current question.
    ///
    /// Answers arriving during the advance delay are no-ops; answering a
    /// finished round or an out-of-range option is an error.
    pub fn answer(
        &mut self,
        option: usize,
        now_ms: u64,
        timers: &mut TimerSet,
    ) -> Result<(), SessionError> {
        match self.phase {
            Phase::Complete { .. } => {
                return Err(SessionError::InvalidInput("round already complete".into()));
            }
            Phase::Advancing => return Ok(()),
            Phase::Question => {}
        }
        let question = self.current_question();
        if option >= question.options.len() {
            return Err(SessionError::InvalidInput(format!(
                "option {option} out of range"
            )));
        }

        timers.cancel(TimerKind::QuestionDeadline);
        let correct = option == question.correct;
        if correct {
            self.correct += 1;
        }
        self.last_answer_correct = Some(correct);
        self.phase = Phase::Advancing;
        timers.schedule(TimerKind::AdvanceDelay, now_ms + ADVANCE_DELAY_MS);
        Ok(())
    }

    /// The countdown expired unanswered: score the question incorrect.
    pub fn on_question_deadline(&mut self, now_ms: u64, timers: &mut TimerSet) {
        if self.phase != Phase::Question {
            return;
        }
        self.last_answer_correct = Some(false);
        self.phase = Phase::Advancing;
        timers.schedule(TimerKind::AdvanceDelay, now_ms + ADVANCE_DELAY_MS);
    }

    /// The advance delay elapsed: move to the next question, or complete
    /// the round after the last one.
    pub fn on_advance_delay(&mut self, now_ms: u64, timers: &mut TimerSet) {
        if self.phase != Phase::Advancing {
            return;
        }
        if self.current + 1 < self.round.len() {
            self.current += 1;
            self.last_answer_correct = None;
            self.phase = Phase::Question;
            timers.schedule(TimerKind::QuestionDeadline, now_ms + QUESTION_TIME_MS);
        } else {
            self.phase = Phase::Complete {
                success: self.correct >= PASS_THRESHOLD,
            };
        }
    }

    /// `Some(success)` once the round is finished.
    pub fn outcome(&self) -> Option<bool> {
        match self.phase {
            Phase::Complete { success } => Some(success),
            _ => None,
        }
    }

    pub fn current_question(&self) -> &'static Question {
        &QUESTION_POOL[self.round[self.current]]
    }

    /// Zero-based index of the question being asked.
    pub fn question_index(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> u32 {
        self.correct
    }

    pub fn last_answer_correct(&self) -> Option<bool> {
        self.last_answer_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiz(seed: u64, timers: &mut TimerSet) -> QuizGame {
        QuizGame::new(&mut StdRng::seed_from_u64(seed), 0, timers)
    }

    /// Answer the current question correctly or not, then fire the advance
    /// delay.
    fn play_question(game: &mut QuizGame, timers: &mut TimerSet, now_ms: u64, correctly: bool) {
        let question = game.current_question();
        let option = if correctly {
            question.correct
        } else {
            (question.correct + 1) % question.options.len()
        };
        game.answer(option, now_ms, timers).unwrap();
        assert_eq!(
            timers.pop_expired(now_ms + ADVANCE_DELAY_MS),
            vec![TimerKind::AdvanceDelay]
        );
        game.on_advance_delay(now_ms + ADVANCE_DELAY_MS, timers);
    }

    #[test]
    fn test_round_samples_without_replacement() {
        let mut timers = TimerSet::new();
        let game = quiz(1, &mut timers);
        assert_eq!(game.round.len(), ROUND_SIZE);
        let mut seen = game.round.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ROUND_SIZE, "round must not repeat questions");
    }

    #[test]
    fn test_three_of_five_passes() {
        let mut timers = TimerSet::new();
        let mut game = quiz(2, &mut timers);
        for index in 0..ROUND_SIZE {
            play_question(&mut game, &mut timers, index as u64 * 5_000, index < 3);
        }
        assert_eq!(game.score(), 3);
        assert_eq!(game.outcome(), Some(true));
    }

    #[test]
    fn test_two_of_five_fails() {
        let mut timers = TimerSet::new();
        let mut game = quiz(3, &mut timers);
        for index in 0..ROUND_SIZE {
            play_question(&mut game, &mut timers, index as u64 * 5_000, index < 2);
        }
        assert_eq!(game.score(), 2);
        assert_eq!(game.outcome(), Some(false));
    }

    #[test]
    fn test_timeout_scores_incorrect() {
        let mut timers = TimerSet::new();
        let mut game = quiz(4, &mut timers);

        // Let every question time out.
        for _ in 0..ROUND_SIZE {
            let deadline = timers.deadline(TimerKind::QuestionDeadline).unwrap();
            assert_eq!(
                timers.pop_expired(deadline),
                vec![TimerKind::QuestionDeadline]
            );
            game.on_question_deadline(deadline, &mut timers);
            assert_eq!(game.last_answer_correct(), Some(false));
            let advance = timers.deadline(TimerKind::AdvanceDelay).unwrap();
            timers.pop_expired(advance);
            game.on_advance_delay(advance, &mut timers);
        }
        assert_eq!(game.score(), 0);
        assert_eq!(game.outcome(), Some(false));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_answer_during_advance_delay_is_ignored() {
        let mut timers = TimerSet::new();
        let mut game = quiz(5, &mut timers);
        let question = game.current_question();
        game.answer(question.correct, 0, &mut timers).unwrap();
        assert_eq!(game.score(), 1);
        // Second answer before the advance delay fires changes nothing.
        game.answer(question.correct, 100, &mut timers).unwrap();
        assert_eq!(game.score(), 1);
        assert_eq!(game.question_index(), 0);
    }

    #[test]
    fn test_out_of_range_option_is_rejected() {
        let mut timers = TimerSet::new();
        let mut game = quiz(6, &mut timers);
        let err = game.answer(4, 0, &mut timers).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
        // The question is still live.
        assert!(timers.deadline(TimerKind::QuestionDeadline).is_some());
    }

    #[test]
    fn test_answer_after_completion_is_rejected() {
        let mut timers = TimerSet::new();
        let mut game = quiz(7, &mut timers);
        for index in 0..ROUND_SIZE {
            play_question(&mut game, &mut timers, index as u64 * 5_000, true);
        }
        assert_eq!(game.outcome(), Some(true));
        let err = game.answer(0, 100_000, &mut timers).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
    }

    #[test]
    fn test_restart_draws_fresh_round_and_resets() {
        let mut timers = TimerSet::new();
        let mut game = quiz(8, &mut timers);
        play_question(&mut game, &mut timers, 0, true);
        assert_eq!(game.question_index(), 1);

        game.restart(&mut StdRng::seed_from_u64(9), 50_000, &mut timers);
        assert_eq!(game.question_index(), 0);
        assert_eq!(game.score(), 0);
        assert_eq!(game.outcome(), None);
        assert_eq!(
            timers.deadline(TimerKind::QuestionDeadline),
            Some(50_000 + QUESTION_TIME_MS)
        );
        assert!(timers.deadline(TimerKind::AdvanceDelay).is_none());
    }

    #[test]
    fn test_question_pool_indices_are_valid() {
        for question in QUESTION_POOL {
            assert!(question.correct < question.options.len());
        }
    }
}
