//! Curated writing prompts and the quotes shown on the home screen.

use crate::mood::Mood;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryPrompt {
    pub id: &'static str,
    pub title: &'static str,
    pub prompt: &'static str,
    pub mood: Mood,
    pub icon: &'static str,
}

pub const MEMORY_PROMPTS: [MemoryPrompt; 8] = [
    MemoryPrompt {
        id: "solitude",
        title: "Solitude",
        prompt: "Write about a time you felt completely alone.",
        mood: Mood::Dark,
        icon: "🌑",
    },
    MemoryPrompt {
        id: "wonder",
        title: "Wonder",
        prompt: "Describe something that recently filled you with awe.",
        mood: Mood::Dreamy,
        icon: "✨",
    },
    MemoryPrompt {
        id: "serenity",
        title: "Serenity",
        prompt: "Recall a moment of perfect peace in your life.",
        mood: Mood::Calm,
        icon: "🌊",
    },
    MemoryPrompt {
        id: "nostalgia",
        title: "Nostalgia",
        prompt: "What memory brings you the most comfort when you revisit it?",
        mood: Mood::Dreamy,
        icon: "🕰",
    },
    MemoryPrompt {
        id: "growth",
        title: "Growth",
        prompt: "Reflect on how you've changed in the past year.",
        mood: Mood::Calm,
        icon: "🌱",
    },
    MemoryPrompt {
        id: "shadow",
        title: "Shadow",
        prompt: "Explore a part of yourself that you usually keep hidden.",
        mood: Mood::Dark,
        icon: "👤",
    },
    MemoryPrompt {
        id: "gratitude",
        title: "Gratitude",
        prompt: "What are you most thankful for right now?",
        mood: Mood::Calm,
        icon: "🙏",
    },
    MemoryPrompt {
        id: "dream",
        title: "Dream",
        prompt: "Describe a recurring dream or a dream that has stayed with you.",
        mood: Mood::Dreamy,
        icon: "💭",
    },
];

pub fn find_prompt(id: &str) -> Option<&'static MemoryPrompt> {
    MEMORY_PROMPTS.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: [Quote; 7] = [
    Quote {
        text: "The quieter you become, the more you can hear.",
        author: "Ram Dass",
    },
    Quote {
        text: "In the journal I do not just express myself more openly than I could to any person; I create myself.",
        author: "Susan Sontag",
    },
    Quote {
        text: "What you seek is seeking you.",
        author: "Rumi",
    },
    Quote {
        text: "The most valuable possession you can own is an open heart.",
        author: "Carlos Santana",
    },
    Quote {
        text: "The unexamined life is not worth living.",
        author: "Socrates",
    },
    Quote {
        text: "Between stimulus and response there is a space. In that space is our power to choose our response.",
        author: "Viktor E. Frankl",
    },
    Quote {
        text: "We write to taste life twice, in the moment and in retrospect.",
        author: "Anaïs Nin",
    },
];

pub fn random_quote() -> &'static Quote {
    QUOTES.choose(&mut rand::thread_rng()).unwrap_or(&QUOTES[0])
}
