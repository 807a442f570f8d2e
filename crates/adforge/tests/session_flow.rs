//! End-to-end session flow against a scripted driver.

use adforge::{
    AdRequest, AdSession, AdforgeConfig, AdforgeResult, Category, CopyDriver, GeneratedAd,
    OptimizeRequest, OptimizedAd, Tone,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

struct ScriptedDriver {
    drafts: AtomicU32,
}

#[async_trait]
impl CopyDriver for ScriptedDriver {
    async fn draft(&self, req: &AdRequest) -> AdforgeResult<GeneratedAd> {
        let n = self.drafts.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedAd {
            ad_text: format!("**Объявление №{n}** ({})", req.details.category()),
            smart_tip: "Снимайте при дневном свете.".to_string(),
        })
    }

    async fn optimize(&self, req: &OptimizeRequest) -> AdforgeResult<OptimizedAd> {
        Ok(OptimizedAd {
            ad_text: format!("{} — выгодная цена", req.current_text),
            keywords: vec!["купить".to_string(), "недорого".to_string()],
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-1"
    }
}

fn session() -> AdSession {
    let config =
        AdforgeConfig::from_toml(include_str!("../../../adforge.toml")).expect("bundled defaults");
    AdSession::new(
        Arc::new(ScriptedDriver {
            drafts: AtomicU32::new(1),
        }),
        &config,
    )
}

#[tokio::test]
async fn generate_then_optimize_produces_tagged_copy() {
    let mut session = session();
    session.set_tone(Tone::Brief);
    session.forms_mut().electronics.model = "MacBook Air M2".to_string();
    session.forms_mut().electronics.specs = "16GB/512GB".to_string();

    let ad = session.generate().await.unwrap();
    assert!(ad.ad_text.contains("electronics"));

    let optimized = session.optimize().await.unwrap();
    assert_eq!(optimized.keywords, vec!["купить", "недорого"]);

    let shown = session.state().generated_text.clone().unwrap();
    assert!(shown.contains("выгодная цена"));
    assert!(shown.contains("🔍 Теги для поиска: купить, недорого"));
}

#[tokio::test]
async fn switching_category_clears_output_but_keeps_forms() {
    let mut session = session();
    session.forms_mut().electronics.model = "PlayStation 5".to_string();
    session.forms_mut().electronics.specs = "825GB".to_string();
    session.generate().await.unwrap();
    assert!(session.state().generated_text.is_some());

    session.set_category(Category::Auto);
    assert!(session.state().generated_text.is_none());
    assert_eq!(session.state().forms.electronics.model, "PlayStation 5");

    // Coming back to the tab does not resurrect the old draft.
    session.set_category(Category::Electronics);
    assert!(session.state().generated_text.is_none());
}

#[tokio::test]
async fn each_attempt_consumes_quota() {
    let mut session = session();
    session.forms_mut().services.service_type = "Ремонт техники".to_string();
    session.forms_mut().services.experience = "10 лет".to_string();
    session.forms_mut().services.benefit = "Выезд в день обращения".to_string();
    session.set_category(Category::Services);

    let before = session.quota_remaining();
    session.generate().await.unwrap();
    assert_eq!(session.quota_remaining(), before - 1);
}
