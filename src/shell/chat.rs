//! Scripted chat widget: ordered keyword rules, first match wins.

use regex::Regex;

pub const FALLBACK_REPLY: &str = "I'm a scripted assistant, so I may have missed that. Try asking about projects, skills, experience, the resume, or how to get in touch.";
pub const EMPTY_REPLY: &str = "Type a question and I'll do my best to answer.";

const DEFAULT_RULES: &[(&str, &str)] = &[
    (
        r"\b(hi|hello|hey|howdy)\b",
        "Hi there! Ask me about Jonathan's projects, skills, or experience.",
    ),
    (
        r"\b(resume|cv)\b",
        "Use the Resume button: enter your email, confirm the 6-digit code we send, and the PDF opens in a new tab.",
    ),
    (
        r"\b(project|projects|portfolio|built)\b",
        "Highlights are in the Projects section, from systems tooling to full-stack web apps.",
    ),
    (
        r"\b(skill|skills|stack|languages?|tech)\b",
        "Day to day: Rust, TypeScript, Python and SQL, with a soft spot for backend and infrastructure work.",
    ),
    (
        r"\b(experience|work|job|intern(ship)?)\b",
        "The Experience section walks through recent roles and what shipped in each.",
    ),
    (
        r"\b(contact|email|reach|hire|linkedin)\b",
        "The contact form at the bottom of the page goes straight to Jonathan's inbox.",
    ),
    (r"\b(thanks|thank you|thx)\b", "Anytime!"),
];

pub struct Rule {
    pattern: Regex,
    reply: String,
}

impl Rule {
    /// # Errors
    /// Returns an error if `pattern` is not a valid regex.
    pub fn new(pattern: &str, reply: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("(?i){pattern}"))?,
            reply: reply.into(),
        })
    }
}

pub struct Responder {
    rules: Vec<Rule>,
    fallback: String,
}

impl Responder {
    #[must_use]
    pub fn new(rules: Vec<Rule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn reply(&self, message: &str) -> &str {
        let message = message.trim();
        if message.is_empty() {
            return EMPTY_REPLY;
        }

        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(message))
            .map_or(self.fallback.as_str(), |rule| rule.reply.as_str())
    }
}

impl Default for Responder {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(pattern, reply)| Rule::new(pattern, *reply).ok())
            .collect();
        Self::new(rules, FALLBACK_REPLY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_default_rule_compiles() {
        assert_eq!(Responder::default().rules.len(), DEFAULT_RULES.len());
    }

    #[test]
    fn first_match_wins() {
        let bot = Responder::default();
        // greets before it talks about the resume
        assert!(bot.reply("Hey, can I see your resume?").starts_with("Hi there"));
        assert!(bot.reply("RESUME please").starts_with("Use the Resume button"));
    }

    #[test]
    fn word_boundaries_matter() {
        let bot = Responder::default();
        assert_eq!(bot.reply("this is a worthy thing"), FALLBACK_REPLY);
        assert!(bot.reply("what tech do you use").starts_with("Day to day"));
    }

    #[test]
    fn blank_and_unknown() {
        let bot = Responder::default();
        assert_eq!(bot.reply("   "), EMPTY_REPLY);
        assert_eq!(bot.reply("what's the weather"), FALLBACK_REPLY);
    }

    #[test]
    fn custom_rules() {
        let bot = Responder::new(vec![Rule::new(r"\bping\b", "pong").unwrap()], "?");
        assert_eq!(bot.reply("ping"), "pong");
        assert_eq!(bot.reply("pingpong"), "?");
    }
}
