//! Completion providers for the financial assistant
//!
//! A provider maps a composed prompt to generated text. [`GeminiClient`]
//! is the production implementation; [`OfflineProvider`] serves canned
//! answers and keeps the assistant functional without an LLM dependency.

use async_trait::async_trait;

use crate::error::Result;

pub mod gemini;

pub use gemini::GeminiClient;

/// Generated text returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
}

/// Trait for text-completion backends
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion>;
}

/// Keyword-matched canned answers for development and demos
pub struct OfflineProvider;

#[async_trait]
impl CompletionProvider for OfflineProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        Ok(Completion {
            text: canned_answer(user_input_of(prompt)).to_string(),
        })
    }
}

/// Isolate the raw question from a composed prompt. The template embeds
/// it after the final `User input:` marker; keyword matching must not see
/// the instructional text or the investment catalog, which would always
/// match "invest". Text without the marker is matched as-is.
fn user_input_of(prompt: &str) -> &str {
    let tail = prompt.rsplit("User input:").next().unwrap_or(prompt);
    tail.strip_suffix("Answer:").unwrap_or(tail).trim()
}

/// Map a financial question to fixed beginner-friendly advice by keyword
fn canned_answer(input: &str) -> &'static str {
    let lower = input.to_lowercase();

    if lower.contains("invest") {
        "Based on your financial profile, I recommend considering a mix of low-cost index \
         funds and ETFs. Start with a small amount that you can afford to invest regularly. \
         Remember to focus on long-term growth and diversification."
    } else if lower.contains("budget") || lower.contains("spending") {
        "Looking at your spending patterns, your housing costs are at 32% of your income, \
         which is within the recommended 30-35% range. However, your dining out expenses are \
         trending higher than average at 24%. Consider setting a specific budget for eating \
         out to help meet your savings goals faster."
    } else if lower.contains("save") || lower.contains("saving") {
        "Based on your income and expenses, I suggest setting up automatic transfers of $850 \
         per month to your savings account. This would help you reach your emergency fund \
         goal in about 4 months. Would you like me to suggest a savings schedule?"
    } else if lower.contains("debt") || lower.contains("loan") {
        "I see you have a current credit card balance of $1,846.29. If you pay only the \
         minimum payment, it will take approximately 7 years to clear this debt. I recommend \
         increasing your monthly payment to at least $300 to clear it within 7 months and \
         save on interest."
    } else if lower.contains("retire") {
        "For retirement planning, I recommend aiming to save 15% of your pre-tax income. \
         Based on your current income and age, you should aim for a retirement savings of \
         approximately $1.2 million by age 65. Would you like me to create a detailed \
         retirement savings plan?"
    } else if lower.contains("index fund") {
        "Index funds are investment funds that aim to replicate the performance of a \
         specific market index, like the S&P 500. They work by investing in all (or a \
         representative sample) of the securities in the target index, in the same \
         proportions as their weight in the index.\n\nKey benefits:\n\u{2022} Low fees \
         compared to actively managed funds\n\u{2022} Built-in diversification\n\u{2022} \
         Passive management strategy requiring less oversight\n\nFor beginners, consider \
         funds that track broad market indexes like the S&P 500, Total Stock Market, or \
         International Stock indexes. Would you like some specific fund recommendations \
         based on your risk tolerance?"
    } else {
        "I'm processing your financial query. Could you provide more details?"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{build_prompt, UserProfile};

    #[tokio::test]
    async fn test_offline_provider_matches_keywords() {
        let provider = OfflineProvider;

        let reply = provider.complete("How should I invest?").await.unwrap();
        assert!(reply.text.contains("index funds and ETFs"));

        let reply = provider.complete("Help me with my budget").await.unwrap();
        assert!(reply.text.contains("spending patterns"));

        let reply = provider.complete("Tell me a joke").await.unwrap();
        assert_eq!(
            reply.text,
            "I'm processing your financial query. Could you provide more details?"
        );
    }

    #[tokio::test]
    async fn test_offline_provider_ignores_template_text() {
        // The composed prompt always contains the word "invest"; only the
        // user's own question may drive the match.
        let prompt = build_prompt(&UserProfile::default(), "", "what about my debt?");
        let provider = OfflineProvider;

        let reply = provider.complete(&prompt).await.unwrap();
        assert!(reply.text.contains("credit card balance"));
    }

    #[test]
    fn test_user_input_isolation() {
        let prompt = build_prompt(&UserProfile::default(), "User: hi\n", "How do I retire early?");
        assert_eq!(user_input_of(&prompt), "How do I retire early?");
        assert_eq!(user_input_of("plain question"), "plain question");
    }
}
