use crate::app::error::{ServiceError, ServiceResult};
use crate::crypto::address::random_tx_hash;
use crate::domain::model::{Payment, PaymentStatus};
use crate::domain::validation::{self, ValidationError};
use crate::storage::Storage;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Smallest accepted payment per currency.
const MINIMUM_AMOUNTS: &[(&str, f64)] = &[
    ("ETH", 0.001),
    ("BNB", 0.001),
    ("MATIC", 0.1),
    ("USDT", 1.0),
    ("USDC", 1.0),
];

pub fn minimum_amount(currency: &str) -> Option<f64> {
    MINIMUM_AMOUNTS
        .iter()
        .find(|(c, _)| *c == currency)
        .map(|(_, min)| *min)
}

fn default_payment_method() -> String {
    "crypto".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub meme_coin_id: Uuid,
    pub amount: f64,
    pub currency: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProcessPaymentRequest {
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

pub struct PaymentService {
    store: Arc<dyn Storage>,
}

impl PaymentService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user_id: Uuid, request: CreatePaymentRequest) -> ServiceResult<Payment> {
        let currency = request.currency.trim().to_ascii_uppercase();
        let minimum = minimum_amount(&currency)
            .ok_or_else(|| ValidationError::new("currency", "unsupported currency"))?;
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(ValidationError::new("amount", "must be a positive number").into());
        }
        if request.amount < minimum {
            return Err(ValidationError::new(
                "amount",
                format!("minimum payment is {minimum} {currency}"),
            )
            .into());
        }
        let payment_method = request.payment_method.trim().to_string();
        validation::length("payment_method", &payment_method, 1, 50)?;

        self.store
            .meme_coin_by_id(request.meme_coin_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("meme coin"))?;

        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4(),
            meme_coin_id: request.meme_coin_id,
            amount: request.amount,
            currency,
            payment_method,
            transaction_hash: None,
            status: PaymentStatus::Pending,
            paid_at: None,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_payment(&payment).await?;
        tracing::info!(
            payment_id = %payment.id,
            amount = payment.amount,
            currency = %payment.currency,
            "Payment created"
        );
        Ok(payment)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> ServiceResult<Payment> {
        let payment = self
            .store
            .payment_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("payment"))?;
        if payment.user_id != user_id {
            return Err(ServiceError::forbidden("payment belongs to another user"));
        }
        Ok(payment)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Payment>> {
        Ok(self.store.payments_by_user(user_id).await?)
    }

    /// Settles a pending payment. A missing hash gets a simulated one.
    pub async fn process(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: ProcessPaymentRequest,
    ) -> ServiceResult<Payment> {
        let mut payment = self.get(user_id, id).await?;
        if payment.status != PaymentStatus::Pending {
            return Err(ServiceError::InvalidState(format!(
                "only pending payments can be processed (currently {})",
                payment.status
            )));
        }
        let hash = match request.transaction_hash.map(|h| h.trim().to_string()) {
            Some(h) if !h.is_empty() => {
                validation::transaction_hash(&h)?;
                h
            }
            _ => random_tx_hash(),
        };

        let now = Utc::now();
        payment.status = PaymentStatus::Completed;
        payment.transaction_hash = Some(hash);
        payment.paid_at = Some(now);
        payment.updated_at = now;
        if !self
            .store
            .transition_payment(&payment, PaymentStatus::Pending)
            .await?
        {
            return Err(ServiceError::InvalidState("payment was settled concurrently".into()));
        }
        tracing::info!(payment_id = %payment.id, "Payment completed");
        Ok(payment)
    }

    pub async fn refund(&self, user_id: Uuid, id: Uuid) -> ServiceResult<Payment> {
        let mut payment = self.get(user_id, id).await?;
        if payment.status != PaymentStatus::Completed {
            return Err(ServiceError::InvalidState(format!(
                "only completed payments can be refunded (currently {})",
                payment.status
            )));
        }
        payment.status = PaymentStatus::Refunded;
        payment.updated_at = Utc::now();
        if !self
            .store
            .transition_payment(&payment, PaymentStatus::Completed)
            .await?
        {
            return Err(ServiceError::InvalidState("payment was refunded concurrently".into()));
        }
        tracing::info!(payment_id = %payment.id, "Payment refunded");
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{MemeCoin, MemeCoinStatus};
    use crate::storage::{MemeCoinRepository, MemoryStore};

    async fn setup() -> (PaymentService, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let coin = MemeCoin {
            id: Uuid::new_v4(),
            name: "Doge".into(),
            symbol: "DOGE".into(),
            description: String::new(),
            total_supply: "1000".into(),
            decimals: 18,
            image_url: None,
            website: None,
            twitter: None,
            telegram: None,
            discord: None,
            contract_address: None,
            network: "ethereum".into(),
            status: MemeCoinStatus::Pending,
            deployment_hash: None,
            deployed_at: None,
            creator_id: owner,
            price: 0.05,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        store.insert_meme_coin(&coin).await.unwrap();
        (PaymentService::new(store), owner, coin.id)
    }

    fn request(coin: Uuid, amount: f64, currency: &str) -> CreatePaymentRequest {
        CreatePaymentRequest {
            meme_coin_id: coin,
            amount,
            currency: currency.into(),
            payment_method: default_payment_method(),
        }
    }

    #[tokio::test]
    async fn minimums_are_enforced_per_currency() {
        let (svc, owner, coin) = setup().await;
        assert!(svc.create(owner, request(coin, 0.0005, "eth")).await.is_err());
        assert!(svc.create(owner, request(coin, 0.05, "MATIC")).await.is_err());
        assert!(matches!(
            svc.create(owner, request(coin, 10.0, "DOGE")).await,
            Err(ServiceError::Validation(_))
        ));
        let ok = svc.create(owner, request(coin, 0.001, "eth")).await.unwrap();
        assert_eq!(ok.currency, "ETH");
        assert_eq!(ok.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn payment_for_unknown_coin_is_not_found() {
        let (svc, owner, _) = setup().await;
        assert!(matches!(
            svc.create(owner, request(Uuid::new_v4(), 1.0, "USDT")).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn process_then_refund() {
        let (svc, owner, coin) = setup().await;
        let payment = svc.create(owner, request(coin, 5.0, "USDC")).await.unwrap();

        assert!(matches!(
            svc.refund(owner, payment.id).await,
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            svc.process(Uuid::new_v4(), payment.id, ProcessPaymentRequest::default())
                .await,
            Err(ServiceError::Forbidden(_))
        ));

        let done = svc
            .process(owner, payment.id, ProcessPaymentRequest::default())
            .await
            .unwrap();
        assert_eq!(done.status, PaymentStatus::Completed);
        assert!(done.paid_at.is_some());
        assert!(validation::transaction_hash(done.transaction_hash.as_deref().unwrap()).is_ok());

        let refunded = svc.refund(owner, payment.id).await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);
        assert_eq!(svc.list_for_user(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_transaction_hash_is_rejected() {
        let (svc, owner, coin) = setup().await;
        let payment = svc.create(owner, request(coin, 1.0, "BNB")).await.unwrap();
        let err = svc
            .process(
                owner,
                payment.id,
                ProcessPaymentRequest {
                    transaction_hash: Some("0xabc".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_processing_settles_once() {
        let (svc, owner, coin) = setup().await;
        let svc = Arc::new(svc);
        let payment_id = svc.create(owner, request(coin, 1.0, "ETH")).await.unwrap().id;

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move {
                    svc.process(owner, payment_id, ProcessPaymentRequest::default())
                        .await
                })
            })
            .collect();
        let mut winners = Vec::new();
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(done) => winners.push(done),
                Err(e) => assert!(matches!(e, ServiceError::InvalidState(_)), "{e}"),
            }
        }

        assert_eq!(winners.len(), 1);
        let stored = svc.get(owner, payment_id).await.unwrap();
        assert_eq!(stored.transaction_hash, winners[0].transaction_hash);
        assert_eq!(stored.paid_at, winners[0].paid_at);
    }
}
