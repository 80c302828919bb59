use serde::Serialize;

pub const TITLE: &str = "20 Questions";
pub const QUESTION_HINT: &str = "<No   ?   Yes>";
pub const CONFIRM_HINT: &str = "<No        Yes>";

/// The four fixed screens a host can show, keyed by engine phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Question {
        title: String,
        number: usize,
        prompt: String,
        hint: String,
    },
    ConfirmGuess {
        name: String,
        hint: String,
    },
    Win,
    OutOfGuesses,
}

impl Screen {
    pub fn question(number: usize, prompt: &str) -> Self {
        Screen::Question {
            title: TITLE.to_string(),
            number,
            prompt: prompt.to_string(),
            hint: QUESTION_HINT.to_string(),
        }
    }

    pub fn confirm_guess(name: &str) -> Self {
        Screen::ConfirmGuess {
            name: name.to_string(),
            hint: CONFIRM_HINT.to_string(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Screen::Question {
                title,
                number,
                prompt,
                hint,
            } => vec![
                format!("{title} ({number})"),
                prompt.clone(),
                hint.clone(),
            ],
            Screen::ConfirmGuess { name, hint } => vec![
                "Are you thinking of:".to_string(),
                name.clone(),
                hint.clone(),
            ],
            Screen::Win => vec!["I guessed it!".to_string(), "You win!".to_string()],
            Screen::OutOfGuesses => vec![
                "Out of guesses!".to_string(),
                "Press BACK to restart".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Screen;

    #[test]
    fn question_lines_number_the_prompt() {
        let lines = Screen::question(3, "Is it portable?").lines();
        assert_eq!(lines[0], "20 Questions (3)");
        assert_eq!(lines[1], "Is it portable?");
    }

    #[test]
    fn screens_serialize_with_tag() {
        let json = serde_json::to_string(&Screen::Win).unwrap();
        assert_eq!(json, r#"{"screen":"win"}"#);
        let json = serde_json::to_string(&Screen::confirm_guess("TV Remote")).unwrap();
        assert!(json.contains(r#""screen":"confirm_guess""#));
        assert!(json.contains(r#""name":"TV Remote""#));
    }
}
