use shared::error::{AppError, AppResult};

pub const GREETING_REPLY: &str = "Hi! I can help you plan your event: finding vendors and venues, \
checking availability, budgeting, and managing your bookings. What are you planning?";

pub const OFF_TOPIC_REPLY: &str = "Sorry, I can only help with event planning on this marketplace, \
such as vendors, venues, bookings, and availability.";

const EVENT_KEYWORDS: &[&str] = &[
    "anniversar", "availab", "band", "banquet", "birthday", "book", "budget", "cake", "cancel",
    "cater", "celebrat", "ceremon", "christening", "conference", "debut", "decor", "dj", "emcee",
    "event", "florist", "flower", "gathering", "guest", "host", "invitation", "lights", "makeup",
    "marketplace", "menu", "music", "package", "party", "photo", "plan", "price", "pricing",
    "quote", "reception", "rent", "reunion", "schedule", "seminar", "sound", "theme", "vendor",
    "venue", "wedding",
];

const BLOCKED_TOPICS: &[&str] = &[
    "bitcoin", "code", "crypto", "diagnos", "election", "gambl", "hack", "homework", "lawsuit",
    "politic", "programming", "religio", "stock",
];

const GREETING_WORDS: &[&str] = &[
    "afternoon", "day", "evening", "good", "hello", "hey", "hi", "morning", "thank", "thanks",
    "there", "you", "yo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    Greeting,
    OffTopic,
    Relevant,
}

#[derive(Debug, Clone, Copy)]
pub struct RelevanceFilter {
    max_chars: usize,
}

impl RelevanceFilter {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// 空メッセージと長すぎるメッセージは 422 にする
    pub fn classify(&self, message: &str) -> AppResult<Relevance> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::UnprocessableEntity("message must not be empty".into()));
        }
        if message.chars().count() > self.max_chars {
            return Err(AppError::UnprocessableEntity(format!(
                "message must be at most {} characters",
                self.max_chars
            )));
        }

        let lowered = message.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if !words.is_empty() && words.iter().all(|w| GREETING_WORDS.contains(w)) {
            return Ok(Relevance::Greeting);
        }

        let mentions = |keywords: &[&str]| {
            words
                .iter()
                .any(|w| keywords.iter().any(|k| w.starts_with(k)))
        };

        let on_topic = mentions(EVENT_KEYWORDS);
        if mentions(BLOCKED_TOPICS) && !on_topic {
            return Ok(Relevance::OffTopic);
        }
        if on_topic {
            Ok(Relevance::Relevant)
        } else {
            Ok(Relevance::OffTopic)
        }
    }
}

#[derive(Debug)]
pub struct AssistantReply {
    pub reply: String,
    pub relevant: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RelevanceFilter {
        RelevanceFilter::new(50)
    }

    #[test]
    fn greetings_are_answered_locally() {
        assert_eq!(filter().classify("Hello there!").unwrap(), Relevance::Greeting);
        assert_eq!(filter().classify("  good morning ").unwrap(), Relevance::Greeting);
    }

    #[test]
    fn event_questions_are_relevant() {
        assert_eq!(
            filter().classify("Which venues fit 150 guests?").unwrap(),
            Relevance::Relevant
        );
        assert_eq!(
            filter().classify("hi, can I book a photographer?").unwrap(),
            Relevance::Relevant
        );
    }

    #[test]
    fn blocked_topics_are_refused_unless_event_related() {
        assert_eq!(
            filter().classify("Should I buy bitcoin?").unwrap(),
            Relevance::OffTopic
        );
        assert_eq!(
            filter().classify("Can I pay the venue in crypto?").unwrap(),
            Relevance::Relevant
        );
        assert_eq!(
            filter().classify("What is the capital of France?").unwrap(),
            Relevance::OffTopic
        );
    }

    #[test]
    fn empty_and_oversized_messages_are_rejected() {
        assert!(filter().classify("   ").is_err());
        assert!(filter().classify(&"wedding ".repeat(10)).is_err());
    }
}
