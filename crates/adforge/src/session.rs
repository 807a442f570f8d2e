//! Interactive session controller.
//!
//! [`AdSession`] owns the listing forms, the generated copy, and the
//! client-side quota window. It drives the generate / regenerate / optimize
//! flow against a [`CopyDriver`], charging the credit ledger only after the
//! provider call succeeds, and persists its state between runs.

use adforge_core::{
    AdRequest, AutoData, Category, ClothingData, ElectronicsData, GeneratedAd, ListingDetails,
    OptimizeRequest, OptimizedAd, ServicesData, Tone,
};
use adforge_credits::{CreditLedger, Operation};
use adforge_error::{AdforgeResult, StateError, StateErrorKind};
use adforge_interface::CopyDriver;
use adforge_rate_limit::{AdforgeConfig, QuotaTracker};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Saved-state size cap. Above it photos are stripped before writing, the
/// way a browser client degrades when its storage quota fills up.
const MAX_SAVED_BYTES: usize = 4 * 1024 * 1024;

/// One form per category, all kept alive so switching tabs loses nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionForms {
    /// Electronics form.
    #[serde(default)]
    pub electronics: ElectronicsData,
    /// Vehicle form.
    #[serde(default)]
    pub auto: AutoData,
    /// Services form.
    #[serde(default)]
    pub services: ServicesData,
    /// Clothing form.
    #[serde(default)]
    pub clothing: ClothingData,
}

impl SessionForms {
    /// The tagged listing form for `category`.
    pub fn details(&self, category: Category) -> ListingDetails {
        match category {
            Category::Electronics => ListingDetails::Electronics(self.electronics.clone()),
            Category::Auto => ListingDetails::Auto(self.auto.clone()),
            Category::Services => ListingDetails::Services(self.services.clone()),
            Category::Clothing => ListingDetails::Clothing(self.clothing.clone()),
        }
    }

    fn strip_photos(&mut self) {
        self.electronics.photo = None;
        self.clothing.photo = None;
    }
}

fn default_category() -> Category {
    Category::Electronics
}

/// The persisted part of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Active category tab.
    #[serde(default = "default_category")]
    pub category: Category,
    /// Selected copy tone.
    #[serde(default)]
    pub tone: Tone,
    /// All four listing forms.
    #[serde(default)]
    pub forms: SessionForms,
    /// Last generated ad text, if any.
    #[serde(default)]
    pub generated_text: Option<String>,
    /// Seller tip from the last generation.
    #[serde(default)]
    pub smart_tip: Option<String>,
    /// Keywords from the last optimization.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Balance after the last metered operation.
    #[serde(default)]
    pub credits: Option<f64>,
    /// Message from the last failed operation, for UI display.
    #[serde(skip)]
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            category: default_category(),
            tone: Tone::default(),
            forms: SessionForms::default(),
            generated_text: None,
            smart_tip: None,
            keywords: Vec::new(),
            credits: None,
            last_error: None,
        }
    }
}

/// Drives the generate / optimize flow for one user session.
///
/// A session allows one operation in flight at a time, consumes a quota
/// slot when an attempt starts (success or not), and never charges credits
/// for copy the user did not receive.
pub struct AdSession {
    state: SessionState,
    driver: Arc<dyn CopyDriver>,
    quota: QuotaTracker,
    ledger: Option<CreditLedger>,
    user_id: Option<String>,
    store: Option<PathBuf>,
    busy: bool,
}

impl AdSession {
    /// Creates an in-memory session.
    pub fn new(driver: Arc<dyn CopyDriver>, config: &AdforgeConfig) -> Self {
        Self {
            state: SessionState::default(),
            driver,
            quota: QuotaTracker::new(config.quota),
            ledger: None,
            user_id: None,
            store: None,
            busy: false,
        }
    }

    /// Creates a session persisted under `dir`, restoring any previous
    /// state and quota window found there.
    pub fn with_store(driver: Arc<dyn CopyDriver>, config: &AdforgeConfig, dir: &Path) -> Self {
        let state_path = dir.join("session.json");
        let state = Self::restore(&state_path);
        Self {
            state,
            driver,
            quota: QuotaTracker::with_store(config.quota, dir.join("quota.json")),
            ledger: None,
            user_id: None,
            store: Some(state_path),
            busy: false,
        }
    }

    /// Attaches a credit ledger; operations become metered for `user_id`.
    pub fn with_ledger(mut self, ledger: CreditLedger, user_id: impl Into<String>) -> Self {
        self.ledger = Some(ledger);
        self.user_id = Some(user_id.into());
        self
    }

    /// Read access to the session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access to the listing forms.
    pub fn forms_mut(&mut self) -> &mut SessionForms {
        &mut self.state.forms
    }

    /// Switches the active category.
    ///
    /// Other tabs keep their form entries, but generated output belongs to
    /// the listing it was drafted for and is cleared.
    pub fn set_category(&mut self, category: Category) {
        if self.state.category != category {
            self.state.generated_text = None;
            self.state.smart_tip = None;
            self.state.keywords.clear();
            self.state.last_error = None;
        }
        self.state.category = category;
    }

    /// Selects the copy tone.
    pub fn set_tone(&mut self, tone: Tone) {
        self.state.tone = tone;
    }

    /// Remaining requests in the quota window.
    pub fn quota_remaining(&mut self) -> u32 {
        self.quota.remaining()
    }

    /// The billable kind the next draft would be: a repeat draft is a
    /// discounted regeneration.
    pub fn draft_operation(&self) -> Operation {
        if self.state.generated_text.is_some() {
            Operation::Regeneration
        } else {
            Operation::Generation
        }
    }

    /// Drafts (or re-drafts) an ad from the active form.
    ///
    /// The quota slot is consumed when the attempt starts; the ledger is
    /// charged only after the provider returns copy.
    #[instrument(skip(self), fields(category = %self.state.category))]
    pub async fn generate(&mut self) -> AdforgeResult<GeneratedAd> {
        self.begin()?;
        if let Err(e) = self.quota.check() {
            self.fail(&e.to_string());
            return Err(e);
        }

        let details = self.state.forms.details(self.state.category);
        if let Err(e) = details.validate() {
            self.fail(&e.to_string());
            return Err(e.into());
        }

        let operation = self.draft_operation();
        if let Err(e) = self.check_balance(operation).await {
            self.fail(&e.to_string());
            return Err(e);
        }

        // Attempt starts here; failed calls still count against the window.
        self.quota.register();
        let request = AdRequest {
            details,
            tone: self.state.tone,
            model: None,
        };
        let ad = match self.driver.draft(&request).await {
            Ok(ad) => ad,
            Err(e) => {
                self.fail(&e.to_string());
                return Err(e);
            }
        };

        info!(operation = ?operation, "Draft received");
        self.state.generated_text = Some(ad.ad_text.clone());
        self.state.smart_tip = Some(ad.smart_tip.clone());
        self.state.keywords.clear();
        self.settle(operation).await;
        self.finish();
        Ok(ad)
    }

    /// Rewrites the current ad with SEO keywords worked in.
    #[instrument(skip(self), fields(category = %self.state.category))]
    pub async fn optimize(&mut self) -> AdforgeResult<OptimizedAd> {
        self.begin()?;
        let Some(current_text) = self.state.generated_text.clone() else {
            self.busy = false;
            return Err(StateError::new(StateErrorKind::NothingToOptimize).into());
        };
        if let Err(e) = self.quota.check() {
            self.fail(&e.to_string());
            return Err(e);
        }

        if let Err(e) = self.check_balance(Operation::Optimization).await {
            self.fail(&e.to_string());
            return Err(e);
        }

        self.quota.register();
        let request = OptimizeRequest {
            current_text,
            details: self.state.forms.details(self.state.category),
            model: None,
        };
        let ad = match self.driver.optimize(&request).await {
            Ok(ad) => ad,
            Err(e) => {
                self.fail(&e.to_string());
                return Err(e);
            }
        };

        info!(keywords = ad.keywords.len(), "Optimization received");
        self.state.generated_text = Some(ad.tagged_text());
        self.state.keywords = ad.keywords.clone();
        self.settle(Operation::Optimization).await;
        self.finish();
        Ok(ad)
    }

    /// Writes the session state to its store.
    ///
    /// When the serialized state exceeds the size cap, photos are stripped
    /// and the rest of the form is kept, rather than losing everything.
    pub fn save(&self) -> AdforgeResult<()> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        let mut raw = serde_json::to_string(&self.state)
            .map_err(|e| StateError::new(StateErrorKind::Persistence(e.to_string())))?;
        if raw.len() > MAX_SAVED_BYTES {
            warn!(bytes = raw.len(), "Saved state too large, stripping photos");
            let mut slim = self.state.clone();
            slim.forms.strip_photos();
            raw = serde_json::to_string(&slim)
                .map_err(|e| StateError::new(StateErrorKind::Persistence(e.to_string())))?;
        }
        fs::write(path, raw)
            .map_err(|e| StateError::new(StateErrorKind::Persistence(e.to_string())))?;
        Ok(())
    }

    fn restore(path: &Path) -> SessionState {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => {
                    debug!(path = %path.display(), "Session state restored");
                    state
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Saved session is corrupt, starting fresh");
                    SessionState::default()
                }
            },
            Err(_) => SessionState::default(),
        }
    }

    fn begin(&mut self) -> AdforgeResult<()> {
        if self.busy {
            return Err(StateError::new(StateErrorKind::Busy).into());
        }
        self.busy = true;
        self.state.last_error = None;
        Ok(())
    }

    fn fail(&mut self, message: &str) {
        self.state.last_error = Some(message.to_string());
        self.busy = false;
    }

    fn finish(&mut self) {
        if let Err(e) = self.save() {
            warn!("Failed to persist session state: {}", e);
        }
        self.busy = false;
    }

    async fn check_balance(&self, operation: Operation) -> AdforgeResult<()> {
        let (Some(ledger), Some(user_id)) = (&self.ledger, &self.user_id) else {
            return Ok(());
        };
        let summary = ledger.summary(user_id).await?;
        ledger.ensure_affordable(summary.credits, operation)
    }

    /// Post-success debit. A ledger hiccup here surfaces through
    /// `last_error` but never claws back the copy the user already has.
    async fn settle(&mut self, operation: Operation) {
        let (Some(ledger), Some(user_id)) = (&self.ledger, &self.user_id) else {
            return;
        };
        match ledger.charge(user_id, operation, None).await {
            Ok(balance) => self.state.credits = Some(balance),
            Err(e) => {
                warn!("Post-success debit failed: {}", e);
                self.state.last_error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::Photo;
    use adforge_error::{GeminiError, GeminiErrorKind};
    use adforge_rate_limit::CreditCosts;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    struct MockDriver {
        fail: bool,
        calls: AtomicU32,
    }

    impl MockDriver {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail: false,
                calls: AtomicU32::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl CopyDriver for MockDriver {
        async fn draft(&self, _req: &AdRequest) -> AdforgeResult<GeneratedAd> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GeminiError::new(GeminiErrorKind::HttpError {
                    status_code: 503,
                    message: "overloaded".to_string(),
                })
                .into());
            }
            Ok(GeneratedAd {
                ad_text: "**Продам PlayStation 5**".to_string(),
                smart_tip: "Сфотографируйте серийный номер.".to_string(),
            })
        }

        async fn optimize(&self, req: &OptimizeRequest) -> AdforgeResult<OptimizedAd> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OptimizedAd {
                ad_text: req.current_text.clone(),
                keywords: vec!["ps5".to_string(), "приставка".to_string()],
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }

        fn model_name(&self) -> &str {
            "mock-1"
        }
    }

    fn config() -> AdforgeConfig {
        AdforgeConfig::from_toml(include_str!("../../../adforge.toml")).unwrap()
    }

    fn filled_session(driver: Arc<MockDriver>) -> AdSession {
        let mut session = AdSession::new(driver, &config());
        session.forms_mut().electronics.model = "PlayStation 5".to_string();
        session.forms_mut().electronics.specs = "825GB".to_string();
        session
    }

    #[tokio::test]
    async fn generate_fills_the_session_state() {
        let mut session = filled_session(MockDriver::ok());
        let ad = session.generate().await.unwrap();
        assert_eq!(ad.ad_text, "**Продам PlayStation 5**");
        assert_eq!(
            session.state().generated_text.as_deref(),
            Some("**Продам PlayStation 5**")
        );
        assert!(session.state().smart_tip.is_some());
        assert!(session.state().last_error.is_none());
    }

    #[tokio::test]
    async fn empty_form_is_rejected_before_any_provider_call() {
        let driver = MockDriver::ok();
        let mut session = AdSession::new(driver.clone(), &config());
        let err = session.generate().await.unwrap_err();
        assert!(err.to_string().contains("Required fields missing"));
        assert_eq!(driver.calls.load(Ordering::SeqCst), 0);
        // Validation failures cost no quota slot.
        assert_eq!(session.quota_remaining(), 15);
    }

    #[tokio::test]
    async fn second_draft_is_a_discounted_regeneration() {
        let mut session = filled_session(MockDriver::ok());
        assert_eq!(session.draft_operation(), Operation::Generation);
        session.generate().await.unwrap();
        assert_eq!(session.draft_operation(), Operation::Regeneration);
    }

    #[tokio::test]
    async fn failed_attempt_still_consumes_a_quota_slot() {
        let mut session = filled_session(MockDriver::failing());
        assert!(session.generate().await.is_err());
        assert_eq!(session.quota_remaining(), 14);
        assert!(session.state().last_error.is_some());
        assert!(session.state().generated_text.is_none());
        // The session is usable again after the failure.
        assert_eq!(session.draft_operation(), Operation::Generation);
    }

    #[tokio::test]
    async fn exhausted_quota_blocks_before_the_driver() {
        let driver = MockDriver::ok();
        let mut session = filled_session(driver.clone());
        // Drain the window.
        for _ in 0..15 {
            session.quota.register();
        }
        let err = session.generate().await.unwrap_err();
        assert!(err.to_string().contains("quota exhausted"));
        assert_eq!(driver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn optimize_requires_generated_text() {
        let mut session = filled_session(MockDriver::ok());
        let err = session.optimize().await.unwrap_err();
        assert!(err.to_string().contains("Nothing to optimize"));
    }

    #[tokio::test]
    async fn optimize_appends_the_search_tags_line() {
        let mut session = filled_session(MockDriver::ok());
        session.generate().await.unwrap();
        let ad = session.optimize().await.unwrap();
        assert_eq!(ad.keywords.len(), 2);
        let text = session.state().generated_text.clone().unwrap();
        assert!(text.contains("🔍 Теги для поиска: ps5, приставка"));
        assert_eq!(session.state().keywords, vec!["ps5", "приставка"]);
    }

    #[tokio::test]
    async fn state_round_trips_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session =
                AdSession::with_store(MockDriver::ok(), &config(), dir.path());
            session.forms_mut().auto.make_model = "Toyota Camry".to_string();
            session.set_category(Category::Auto);
            session.set_tone(Tone::Brief);
            session.save().unwrap();
        }
        let session = AdSession::with_store(MockDriver::ok(), &config(), dir.path());
        assert_eq!(session.state().category, Category::Auto);
        assert_eq!(session.state().tone, Tone::Brief);
        assert_eq!(session.state().forms.auto.make_model, "Toyota Camry");
    }

    #[tokio::test]
    async fn oversized_state_is_saved_without_photos() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session =
                AdSession::with_store(MockDriver::ok(), &config(), dir.path());
            session.forms_mut().electronics.model = "iPhone 13".to_string();
            session.forms_mut().electronics.photo = Some(Photo {
                mime: "image/jpeg".to_string(),
                data: "A".repeat(5 * 1024 * 1024),
            });
            session.save().unwrap();
        }
        let session = AdSession::with_store(MockDriver::ok(), &config(), dir.path());
        // The photo was dropped; the rest of the form survived.
        assert!(session.state().forms.electronics.photo.is_none());
        assert_eq!(session.state().forms.electronics.model, "iPhone 13");
    }

    #[tokio::test]
    async fn corrupt_store_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("session.json"), "{broken").unwrap();
        let session = AdSession::with_store(MockDriver::ok(), &config(), dir.path());
        assert_eq!(session.state(), &SessionState::default());
    }

    /// Serves one canned HTTP response per expected ledger call, then stops.
    async fn stub_ledger(responses: Vec<(u16, &'static str)>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let reply = format!(
                    "HTTP/1.1 {status} STUB\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(reply.as_bytes()).await;
            }
        });
        format!("http://{addr}")
    }

    fn metered(session: AdSession, base_url: String) -> AdSession {
        session.with_ledger(
            CreditLedger::new(base_url, "service-key", CreditCosts::default()),
            "user-1",
        )
    }

    #[tokio::test]
    async fn metered_generate_debits_and_reconciles_the_balance() {
        let base = stub_ledger(vec![
            (200, r#"{"credits": 5.0, "history": []}"#),
            (200, r#"{"new_balance": 4.0}"#),
        ])
        .await;
        let mut session = metered(filled_session(MockDriver::ok()), base);
        session.generate().await.unwrap();
        assert_eq!(session.state().credits, Some(4.0));
        assert!(session.state().last_error.is_none());
    }

    #[tokio::test]
    async fn insufficient_balance_blocks_before_the_driver() {
        let base = stub_ledger(vec![(200, r#"{"credits": 0.2, "history": []}"#)]).await;
        let driver = MockDriver::ok();
        let mut session = metered(filled_session(driver.clone()), base);
        let err = session.generate().await.unwrap_err();
        assert!(err.to_string().contains("Insufficient credits"));
        assert_eq!(driver.calls.load(Ordering::SeqCst), 0);
        // Blocked before the attempt started, so no quota slot was spent.
        assert_eq!(session.quota_remaining(), 15);
    }

    #[tokio::test]
    async fn failed_debit_surfaces_but_keeps_the_copy() {
        let base = stub_ledger(vec![
            (200, r#"{"credits": 5.0, "history": []}"#),
            (500, r#"{"error": "ledger offline"}"#),
        ])
        .await;
        let mut session = metered(filled_session(MockDriver::ok()), base);
        let ad = session.generate().await.unwrap();
        assert_eq!(ad.ad_text, "**Продам PlayStation 5**");
        assert!(session.state().generated_text.is_some());
        let message = session.state().last_error.clone().unwrap();
        assert!(message.contains("update_user_credits"));
    }
}
