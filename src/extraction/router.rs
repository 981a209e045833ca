use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::CATEGORIES;
use crate::errors::ExpenseError;

use super::{parse_model_response, ExtractedExpense};

/// A backend able to run one completion against a named model.
pub trait ExtractionProvider: Send + Sync {
    fn complete(&self, model: &str, text: &str) -> Result<String, ExpenseError>;
}

/// Instruction sent alongside the user text; lists the accepted category ids.
pub fn system_prompt() -> String {
    let ids: Vec<&str> = CATEGORIES.iter().map(|info| info.id.as_str()).collect();
    format!(
        "Extract one expense from the user's description and reply with JSON only: \
         {{\"amount\": number, \"category\": one of [{}], \"item\": short description, \
         \"note\": string}}. Use amount 0 when no amount is given and \"other\" when \
         the category is unclear.",
        ids.join(", ")
    )
}

#[derive(Debug, Default)]
struct RouterState {
    current: usize,
    cooldowns: HashMap<String, DateTime<Utc>>,
}

/// Fallback chain of models with a per-model cooldown after failures.
///
/// State sits behind a mutex so one router can be shared across requests.
#[derive(Debug)]
pub struct ModelRouter {
    chain: Vec<String>,
    cooldown: Duration,
    state: Mutex<RouterState>,
}

impl ModelRouter {
    pub fn new(chain: Vec<String>, cooldown: Duration) -> Result<Self, ExpenseError> {
        let chain: Vec<String> = chain
            .into_iter()
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .collect();
        if chain.is_empty() {
            return Err(ExpenseError::InvalidInput(
                "model chain must name at least one model".into(),
            ));
        }
        Ok(Self {
            chain,
            cooldown,
            state: Mutex::new(RouterState::default()),
        })
    }

    /// Router over the configured model chain and cooldown.
    pub fn from_config(config: &Config) -> Result<Self, ExpenseError> {
        Self::new(config.models.clone(), config.model_cooldown())
    }

    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// First model at or after the current index that is not cooling down.
    pub fn current_model(&self, now: DateTime<Utc>) -> Option<String> {
        self.candidates(now).into_iter().next()
    }

    /// Usable models in try order, starting from the current index and wrapping.
    pub fn candidates(&self, now: DateTime<Utc>) -> Vec<String> {
        let state = self.lock();
        (0..self.chain.len())
            .map(|offset| &self.chain[(state.current + offset) % self.chain.len()])
            .filter(|model| {
                state
                    .cooldowns
                    .get(model.as_str())
                    .map_or(true, |until| *until <= now)
            })
            .cloned()
            .collect()
    }

    pub fn mark_failure(&self, model: &str, now: DateTime<Utc>) {
        let mut state = self.lock();
        let until = now
            .checked_add_signed(self.cooldown)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        state.cooldowns.insert(model.to_string(), until);
        warn!(model, %until, "model placed in cooldown");
    }

    pub fn mark_success(&self, model: &str) {
        let mut state = self.lock();
        state.cooldowns.remove(model);
        if let Some(index) = self.chain.iter().position(|m| m == model) {
            state.current = index;
        }
    }

    pub fn is_cooling_down(&self, model: &str, now: DateTime<Utc>) -> bool {
        self.lock()
            .cooldowns
            .get(model)
            .is_some_and(|until| *until > now)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RouterState> {
        // A poisoned lock only means a panic mid-update; the map is still usable.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Runs `text` through the router's models until one yields a parseable reply.
pub fn extract_expense(
    router: &ModelRouter,
    provider: &dyn ExtractionProvider,
    text: &str,
    now: DateTime<Utc>,
) -> Result<ExtractedExpense, ExpenseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExpenseError::InvalidInput("nothing to extract".into()));
    }

    let candidates = router.candidates(now);
    if candidates.is_empty() {
        return Err(ExpenseError::Extraction(
            "every model is cooling down".into(),
        ));
    }

    let mut last_error = None;
    for model in candidates {
        debug!(%model, "requesting extraction");
        match provider
            .complete(&model, text)
            .and_then(|reply| parse_model_response(&reply))
        {
            Ok(extracted) => {
                router.mark_success(&model);
                info!(%model, amount = extracted.amount, "expense extracted");
                return Ok(extracted);
            }
            Err(err) => {
                router.mark_failure(&model, now);
                last_error = Some(err);
            }
        }
    }

    Err(ExpenseError::Extraction(match last_error {
        Some(err) => format!("all models failed, last error: {err}"),
        None => "all models failed".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::TimeZone;
    use std::sync::Mutex as StdMutex;

    struct ScriptedProvider {
        failing: Vec<&'static str>,
        calls: StdMutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn failing(models: &[&'static str]) -> Self {
            Self {
                failing: models.to_vec(),
                calls: StdMutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ExtractionProvider for ScriptedProvider {
        fn complete(&self, model: &str, _text: &str) -> Result<String, ExpenseError> {
            self.calls.lock().unwrap().push(model.to_string());
            if self.failing.contains(&model) {
                return Err(ExpenseError::Extraction(format!("{model} quota exceeded")));
            }
            Ok(r#"{"amount": 80, "category": "food", "item": "lunch", "note": ""}"#.into())
        }
    }

    fn router() -> ModelRouter {
        ModelRouter::new(
            vec!["primary".into(), "secondary".into(), "tertiary".into()],
            Duration::seconds(60),
        )
        .unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn router_follows_config() {
        let config = Config {
            models: vec!["fast".into(), " ".into(), "careful".into()],
            model_cooldown_secs: 30,
            ..Config::default()
        };
        let router = ModelRouter::from_config(&config).unwrap();
        assert_eq!(router.chain(), ["fast", "careful"]);

        router.mark_failure("fast", at(0));
        assert!(router.is_cooling_down("fast", at(29)));
        assert!(!router.is_cooling_down("fast", at(30)));
        assert_eq!(router.current_model(at(0)).as_deref(), Some("careful"));
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert!(ModelRouter::new(vec![" ".into()], Duration::seconds(1)).is_err());
    }

    #[test]
    fn falls_back_and_remembers_working_model() {
        let router = router();
        let provider = ScriptedProvider::failing(&["primary"]);

        let extracted = extract_expense(&router, &provider, "lunch 80", at(0)).unwrap();
        assert_eq!(extracted.category, Category::Food);
        assert_eq!(provider.calls(), vec!["primary", "secondary"]);
        assert!(router.is_cooling_down("primary", at(0)));
        assert_eq!(router.current_model(at(0)).as_deref(), Some("secondary"));
    }

    #[test]
    fn cooldown_expires() {
        let router = router();
        router.mark_failure("primary", at(0));
        assert_eq!(router.candidates(at(30)), vec!["secondary", "tertiary"]);
        assert_eq!(
            router.candidates(at(60)),
            vec!["primary", "secondary", "tertiary"]
        );
    }

    #[test]
    fn candidates_wrap_from_current_index() {
        let router = router();
        router.mark_success("tertiary");
        assert_eq!(
            router.candidates(at(0)),
            vec!["tertiary", "primary", "secondary"]
        );
    }

    #[test]
    fn all_models_failing_is_an_extraction_error() {
        let router = router();
        let provider = ScriptedProvider::failing(&["primary", "secondary", "tertiary"]);
        let err = extract_expense(&router, &provider, "lunch 80", at(0)).unwrap_err();
        assert!(matches!(err, ExpenseError::Extraction(_)));

        // Every model is now cooling down, so nothing is called.
        let err = extract_expense(&router, &provider, "lunch 80", at(1)).unwrap_err();
        assert!(matches!(err, ExpenseError::Extraction(_)));
        assert_eq!(provider.calls().len(), 3);
    }

    #[test]
    fn unparseable_reply_counts_as_failure() {
        struct Chatty;
        impl ExtractionProvider for Chatty {
            fn complete(&self, model: &str, _text: &str) -> Result<String, ExpenseError> {
                if model == "primary" {
                    Ok("I think that was lunch.".into())
                } else {
                    Ok(r#"{"amount": 12, "category": "snacks", "item": "gum"}"#.into())
                }
            }
        }
        let router = router();
        let extracted = extract_expense(&router, &Chatty, "gum 12", at(0)).unwrap();
        assert_eq!(extracted.category, Category::Other);
        assert!(router.is_cooling_down("primary", at(0)));
    }

    #[test]
    fn prompt_lists_every_category() {
        let prompt = system_prompt();
        for info in CATEGORIES.iter() {
            assert!(prompt.contains(info.id.as_str()));
        }
    }
}
