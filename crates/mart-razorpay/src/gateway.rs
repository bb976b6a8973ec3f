//! # Hosted Checkout Gateway
//!
//! Adapter over the Razorpay hosted checkout widget. `open` builds the
//! widget options from a payment intent, asks a `WidgetLauncher` to
//! present it, and waits for the single terminal outcome: completed,
//! dismissed, or failed. The provider SDK is known to be able to fire
//! its callback more than once; the completion handle lets only the
//! first call through.

use async_trait::async_trait;
use mart_core::{
    CheckoutError, CheckoutGateway, CheckoutResult, GatewayOutcome, GatewayResult, PaymentIntent,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;
use tracing::debug;

/// Options handed to the hosted checkout widget
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOptions {
    pub key: String,

    /// Amount in the smallest currency unit
    pub amount: i64,

    pub currency: String,

    /// Storefront name shown in the widget chrome
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub order_id: String,

    pub theme: WidgetTheme,
}

#[derive(Debug, Clone, Serialize)]
pub struct WidgetTheme {
    pub color: String,
}

/// Storefront identity shown in the widget
#[derive(Debug, Clone)]
pub struct StorefrontProfile {
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub theme_color: String,
}

impl Default for StorefrontProfile {
    fn default() -> Self {
        Self {
            name: "Village Mart".to_string(),
            description: None,
            logo: Some("/images/logo.png".to_string()),
            theme_color: "#16a34a".to_string(),
        }
    }
}

/// What the widget reported back
#[derive(Debug)]
enum WidgetEvent {
    Completed(GatewayResult),
    Dismissed,
    Failed(String),
}

/// One-shot completion feed for a single widget interaction. Only the
/// first terminal call has effect; every later call is dropped and
/// reported as such to the caller.
#[derive(Clone)]
pub struct CompletionHandle {
    tx: Arc<Mutex<Option<oneshot::Sender<WidgetEvent>>>>,
}

impl CompletionHandle {
    fn channel() -> (Self, oneshot::Receiver<WidgetEvent>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// The shopper completed payment. Returns false if an outcome was
    /// already delivered.
    pub fn completed(&self, result: GatewayResult) -> bool {
        self.deliver(WidgetEvent::Completed(result))
    }

    /// The shopper dismissed the widget
    pub fn dismissed(&self) -> bool {
        self.deliver(WidgetEvent::Dismissed)
    }

    /// The widget reported a failure
    pub fn failed(&self, reason: impl Into<String>) -> bool {
        self.deliver(WidgetEvent::Failed(reason.into()))
    }

    fn deliver(&self, event: WidgetEvent) -> bool {
        let sender = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}

/// Presents the provider widget to the shopper. The embedding surface
/// (webview bridge, test harness) implements this; the outcome comes
/// back through the completion handle.
#[async_trait]
pub trait WidgetLauncher: Send + Sync {
    /// Present the widget. An `Err` here means the widget never opened
    /// (script unreachable, SDK missing).
    async fn launch(
        &self,
        options: CheckoutOptions,
        completion: CompletionHandle,
    ) -> CheckoutResult<()>;
}

/// The hosted-checkout gateway adapter
pub struct HostedCheckout {
    profile: StorefrontProfile,
    launcher: Arc<dyn WidgetLauncher>,
}

impl HostedCheckout {
    pub fn new(launcher: Arc<dyn WidgetLauncher>) -> Self {
        Self {
            profile: StorefrontProfile::default(),
            launcher,
        }
    }

    /// Builder: set the storefront identity
    pub fn with_profile(mut self, profile: StorefrontProfile) -> Self {
        self.profile = profile;
        self
    }

    fn options_for(&self, intent: &PaymentIntent) -> CheckoutOptions {
        CheckoutOptions {
            key: intent.key.clone(),
            amount: intent.amount,
            currency: intent.currency.as_str().to_string(),
            name: self.profile.name.clone(),
            description: self.profile.description.clone(),
            image: self.profile.logo.clone(),
            order_id: intent.order_id.clone(),
            theme: WidgetTheme {
                color: self.profile.theme_color.clone(),
            },
        }
    }
}

#[async_trait]
impl CheckoutGateway for HostedCheckout {
    async fn open(&self, intent: &PaymentIntent) -> CheckoutResult<GatewayOutcome> {
        // A malformed intent never reaches the widget
        if let Err(err) = intent.ensure_usable() {
            return Err(CheckoutError::Gateway(err.to_string()));
        }

        let (completion, outcome) = CompletionHandle::channel();
        let options = self.options_for(intent);

        debug!(order_id = %intent.order_id, "opening hosted checkout");
        self.launcher.launch(options, completion).await?;

        match outcome.await {
            Ok(WidgetEvent::Completed(result)) => {
                if result.payment_id.is_empty()
                    || result.order_id.is_empty()
                    || result.signature.is_empty()
                {
                    return Err(CheckoutError::Gateway(
                        "incomplete payment response from widget".to_string(),
                    ));
                }
                Ok(GatewayOutcome::Completed(result))
            }
            Ok(WidgetEvent::Dismissed) => Ok(GatewayOutcome::Dismissed),
            Ok(WidgetEvent::Failed(reason)) => Err(CheckoutError::Gateway(reason)),
            // Launcher dropped the handle without delivering an outcome
            Err(_) => Err(CheckoutError::Gateway(
                "widget closed without an outcome".to_string(),
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "razorpay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mart_core::Currency;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn intent() -> PaymentIntent {
        PaymentIntent {
            order_id: "order_9nQpF3xTf".into(),
            key: "rzp_test_gGgY5VEwsyhoK2".into(),
            amount: 22900,
            currency: Currency::INR,
        }
    }

    fn payment() -> GatewayResult {
        GatewayResult {
            payment_id: "pay_29QQoUBi66xm2f".into(),
            order_id: "order_9nQpF3xTf".into(),
            signature: "deadbeef".into(),
        }
    }

    struct ScriptedLauncher {
        script: fn(&CheckoutOptions, &CompletionHandle),
        launched: AtomicBool,
    }

    impl ScriptedLauncher {
        fn new(script: fn(&CheckoutOptions, &CompletionHandle)) -> Arc<Self> {
            Arc::new(Self {
                script,
                launched: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl WidgetLauncher for ScriptedLauncher {
        async fn launch(
            &self,
            options: CheckoutOptions,
            completion: CompletionHandle,
        ) -> CheckoutResult<()> {
            self.launched.store(true, Ordering::SeqCst);
            (self.script)(&options, &completion);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_completed_payment_flows_through() {
        let launcher = ScriptedLauncher::new(|options, completion| {
            assert_eq!(options.key, "rzp_test_gGgY5VEwsyhoK2");
            assert_eq!(options.order_id, "order_9nQpF3xTf");
            assert_eq!(options.amount, 22900);
            assert_eq!(options.currency, "INR");
            assert_eq!(options.name, "Village Mart");
            completion.completed(payment());
        });
        let gateway = HostedCheckout::new(launcher);

        let outcome = gateway.open(&intent()).await.unwrap();
        assert_eq!(outcome, GatewayOutcome::Completed(payment()));
    }

    #[tokio::test]
    async fn test_dismissal_is_not_an_error() {
        let launcher = ScriptedLauncher::new(|_, completion| {
            completion.dismissed();
        });
        let gateway = HostedCheckout::new(launcher);

        let outcome = gateway.open(&intent()).await.unwrap();
        assert_eq!(outcome, GatewayOutcome::Dismissed);
    }

    #[tokio::test]
    async fn test_widget_failure_rejects() {
        let launcher = ScriptedLauncher::new(|_, completion| {
            completion.failed("SDK failed to load");
        });
        let gateway = HostedCheckout::new(launcher);

        let err = gateway.open(&intent()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_malformed_intent_rejected_before_launch() {
        let launcher = ScriptedLauncher::new(|_, completion| {
            completion.dismissed();
        });
        let gateway = HostedCheckout::new(Arc::clone(&launcher) as Arc<dyn WidgetLauncher>);

        let mut bad = intent();
        bad.key.clear();
        let err = gateway.open(&bad).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Gateway(_)));
        assert!(!launcher.launched.load(Ordering::SeqCst));

        let mut bad = intent();
        bad.order_id.clear();
        assert!(gateway.open(&bad).await.is_err());
    }

    #[tokio::test]
    async fn test_only_first_completion_wins() {
        let launcher = ScriptedLauncher::new(|_, completion| {
            assert!(completion.completed(payment()));
            // The SDK firing its callback again has no effect
            assert!(!completion.completed(GatewayResult {
                payment_id: "pay_other".into(),
                order_id: "order_other".into(),
                signature: "ffff".into(),
            }));
            assert!(!completion.dismissed());
        });
        let gateway = HostedCheckout::new(launcher);

        let outcome = gateway.open(&intent()).await.unwrap();
        assert_eq!(outcome, GatewayOutcome::Completed(payment()));
    }

    #[tokio::test]
    async fn test_dropped_handle_is_a_gateway_error() {
        struct DroppingLauncher;

        #[async_trait]
        impl WidgetLauncher for DroppingLauncher {
            async fn launch(
                &self,
                _options: CheckoutOptions,
                completion: CompletionHandle,
            ) -> CheckoutResult<()> {
                drop(completion);
                Ok(())
            }
        }

        let gateway = HostedCheckout::new(Arc::new(DroppingLauncher));
        let err = gateway.open(&intent()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_incomplete_payment_response_rejected() {
        let launcher = ScriptedLauncher::new(|_, completion| {
            completion.completed(GatewayResult {
                payment_id: "pay_29QQoUBi66xm2f".into(),
                order_id: "order_9nQpF3xTf".into(),
                signature: String::new(),
            });
        });
        let gateway = HostedCheckout::new(launcher);

        let err = gateway.open(&intent()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_launcher_error_surfaces() {
        struct UnreachableLauncher {
            attempts: AtomicUsize,
        }

        #[async_trait]
        impl WidgetLauncher for UnreachableLauncher {
            async fn launch(
                &self,
                _options: CheckoutOptions,
                _completion: CompletionHandle,
            ) -> CheckoutResult<()> {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                Err(CheckoutError::Gateway(
                    "checkout script unreachable".to_string(),
                ))
            }
        }

        let launcher = Arc::new(UnreachableLauncher {
            attempts: AtomicUsize::new(0),
        });
        let gateway = HostedCheckout::new(Arc::clone(&launcher) as Arc<dyn WidgetLauncher>);

        let err = gateway.open(&intent()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Gateway(_)));
        // No retry: one open, one launch attempt
        assert_eq!(launcher.attempts.load(Ordering::SeqCst), 1);
    }
}
