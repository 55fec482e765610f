//! Built-in suggestions used when no real search backend is available.

use super::Suggestion;

struct Fixture {
    key: &'static str,
    suggestions: &'static [(&'static str, &'static str, &'static str)],
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        key: "gpt4",
        suggestions: &[
            (
                "Claude AI by Anthropic",
                "https://www.anthropic.com/claude",
                "Claude is a next-generation AI assistant from Anthropic.",
            ),
            (
                "Google Gemini",
                "https://gemini.google.com",
                "Gemini is Google's multimodal AI model and assistant.",
            ),
        ],
    },
    Fixture {
        key: "stablediffusion",
        suggestions: &[
            (
                "Midjourney",
                "https://www.midjourney.com",
                "Independent research lab producing an image generation model.",
            ),
            (
                "DALL-E by OpenAI",
                "https://openai.com/dall-e-3",
                "Creates realistic images and art from a natural language description.",
            ),
        ],
    },
    Fixture {
        key: "huggingface",
        suggestions: &[
            (
                "PapersWithCode",
                "https://paperswithcode.com/",
                "Machine learning papers with code and tracked benchmarks.",
            ),
            (
                "TensorHub",
                "https://tensorhub.io/",
                "Repository of pre-trained models ready for fine-tuning.",
            ),
        ],
    },
];

const GENERIC: &[(&str, &str, &str)] = &[
    (
        "AI-Chat Demo (example alternative)",
        "https://chat.example.com",
        "Example AI chat service, for testing",
    ),
    (
        "Image Generator (example alternative)",
        "https://image.example.com",
        "Example image generation service, for testing",
    ),
];

/// Lowercase ASCII alphanumerics only: "Stable Diffusion" becomes
/// "stablediffusion".
fn normalize(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn to_suggestions(entries: &[(&str, &str, &str)]) -> Vec<Suggestion> {
    entries
        .iter()
        .map(|(title, link, snippet)| Suggestion {
            title: (*title).to_string(),
            link: (*link).to_string(),
            snippet: Some((*snippet).to_string()),
        })
        .collect()
}

/// Fixture suggestions for a resource title.
///
/// Deterministic: the first fixture whose key occurs in the normalized
/// title wins, otherwise the generic placeholder pair is returned.
pub fn fixture_suggestions(title: &str) -> Vec<Suggestion> {
    let normalized = normalize(title);
    FIXTURES
        .iter()
        .find(|fixture| normalized.contains(fixture.key))
        .map_or_else(|| to_suggestions(GENERIC), |f| to_suggestions(f.suggestions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Stable Diffusion XL"), "stablediffusionxl");
        assert_eq!(normalize("GPT-4 Turbo"), "gpt4turbo");
        assert_eq!(normalize("Hugging Face Hub"), "huggingfacehub");
    }

    #[test]
    fn test_fixture_match_is_deterministic() {
        let first = fixture_suggestions("Stable Diffusion");
        assert_eq!(first, fixture_suggestions("Stable Diffusion"));
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].title, "Midjourney");
        assert_eq!(first[1].link, "https://openai.com/dall-e-3");

        assert_eq!(fixture_suggestions("GPT-4")[0].link, "https://www.anthropic.com/claude");
        assert_eq!(fixture_suggestions("Hugging Face")[0].link, "https://paperswithcode.com/");
    }

    #[test]
    fn test_unmatched_title_gets_generic_pair() {
        let links: Vec<_> = fixture_suggestions("Foo")
            .into_iter()
            .map(|s| s.link)
            .collect();
        assert_eq!(links, ["https://chat.example.com", "https://image.example.com"]);
    }
}
