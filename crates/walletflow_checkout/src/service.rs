//! Checkout workflow orchestration
//!
//! [`CheckoutService`] drives the three-step Masterpass workflow:
//! precheckout, express checkout, and the final postback. Every gateway call
//! that returns a fresh pairing id rotates the stored token for the user
//! before the new one is saved, so at most one token is ever active.

use crate::error::CheckoutError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::info;
use walletflow_config::AppConfig;
use walletflow_db::{
    CheckoutRecordRepository, DbError, ExpressCheckoutRecord, PairingRecord, PairingRepository,
    PairingSource, PrecheckoutRecord, Wallet, WalletRepository,
};
use walletflow_masterpass::{
    log_gateway_error, ExpressCheckoutRequest, GatewayError, MasterpassGateway, PaymentData,
    PostbackRequest, PrecheckoutData,
};

/// Orchestrates the wallet checkout workflow over a gateway and the
/// persistence repositories.
#[derive(Debug)]
pub struct CheckoutService<G, W, P, C> {
    gateway: G,
    wallets: W,
    pairings: P,
    records: C,
    /// Merchant checkout identifier sent on every express-checkout call.
    checkout_id: String,
    /// Per-user locks serializing pairing-token rotation. The outer mutex
    /// only guards the map; rotation itself holds the inner async lock.
    pairing_locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl<G, W, P, C> CheckoutService<G, W, P, C>
where
    G: MasterpassGateway,
    W: WalletRepository + Send + Sync,
    P: PairingRepository + Send + Sync,
    C: CheckoutRecordRepository + Send + Sync,
{
    pub fn new(
        gateway: G,
        wallets: W,
        pairings: P,
        records: C,
        checkout_id: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            wallets,
            pairings,
            records,
            checkout_id: checkout_id.into(),
            pairing_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Build the service from the application configuration, taking the
    /// merchant checkout id from the `masterpass` section.
    ///
    /// # Errors
    ///
    /// Fails with [`GatewayError::Config`] if the section is missing.
    pub fn from_app_config(
        gateway: G,
        wallets: W,
        pairings: P,
        records: C,
        config: &AppConfig,
    ) -> Result<Self, CheckoutError> {
        let masterpass = config.masterpass.as_ref().ok_or(GatewayError::Config)?;
        Ok(Self::new(
            gateway,
            wallets,
            pairings,
            records,
            masterpass.checkout_id.clone(),
        ))
    }

    fn user_lock(&self, user_id: i64) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .pairing_locks
            .lock()
            .expect("pairing lock registry poisoned");
        locks.entry(user_id).or_default().clone()
    }

    /// Mark every pairing token for the user as wasted.
    ///
    /// Idempotent; returns the number of tokens invalidated.
    pub async fn waste_all_pairing_tokens(&self, user_id: i64) -> Result<u64, CheckoutError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let invalidated = self.pairings.invalidate_all(user_id).await?;
        info!(user_id, invalidated, "pairing tokens wasted");
        Ok(invalidated)
    }

    /// Rotate the user's pairing token: mark every stored token wasted,
    /// then save the new one as the single active token.
    ///
    /// Invalidation and save run under a per-user lock so concurrent
    /// rotations cannot interleave and leave two active tokens.
    pub async fn save_pairing_token(
        &self,
        user_id: i64,
        wallet_id: i64,
        pairing_token: &str,
        source: PairingSource,
    ) -> Result<PairingRecord, CheckoutError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let invalidated = self.pairings.invalidate_all(user_id).await?;
        let record = self
            .pairings
            .save(PairingRecord {
                id: None,
                pairing_token: pairing_token.to_string(),
                source,
                user_id,
                wallet_id,
                wasted: false,
            })
            .await?;

        info!(
            user_id,
            wallet_id,
            invalidated,
            source = source.as_str(),
            "pairing token rotated"
        );
        Ok(record)
    }

    /// The user's current (newest, non-wasted) pairing token, or
    /// [`CheckoutError::NoPairingToken`] when none is active.
    pub async fn current_pairing_token(
        &self,
        user_id: i64,
    ) -> Result<PairingRecord, CheckoutError> {
        self.pairings
            .find_current(user_id)
            .await?
            .ok_or(CheckoutError::NoPairingToken(user_id))
    }

    /// The user's enabled wallet, or [`CheckoutError::NoActiveWallet`].
    pub async fn active_wallet(&self, user_id: i64) -> Result<Wallet, CheckoutError> {
        self.wallets
            .find_enabled_by_user(user_id)
            .await?
            .ok_or(CheckoutError::NoActiveWallet(user_id))
    }

    fn wallet_id(wallet: &Wallet) -> Result<i64, CheckoutError> {
        Ok(wallet
            .id
            .ok_or_else(|| DbError::QueryError("wallet record missing id".to_string()))?)
    }

    /// Reserve a transaction context for the user's current pairing token.
    ///
    /// The gateway consumes the presented token and returns a replacement;
    /// both the rotation and the returned context are persisted before the
    /// data is handed back.
    pub async fn get_precheckout_data(
        &self,
        user_id: i64,
    ) -> Result<PrecheckoutData, CheckoutError> {
        let wallet = self.active_wallet(user_id).await?;
        let wallet_id = Self::wallet_id(&wallet)?;
        let pairing = self.current_pairing_token(user_id).await?;

        let data = match self
            .gateway
            .fetch_precheckout_data(&pairing.pairing_token)
            .await
        {
            Ok(data) => data,
            Err(err) => {
                log_gateway_error(&err);
                return Err(err.into());
            }
        };

        self.save_pairing_token(user_id, wallet_id, &data.pairing_id, PairingSource::Precheckout)
            .await?;
        self.records
            .save_precheckout(PrecheckoutRecord {
                id: None,
                user_id,
                wallet_id,
                consumer_wallet_id: data.consumer_wallet_id.clone(),
                precheckout_transaction_id: data.pre_checkout_transaction_id.clone(),
                wallet_name: data.wallet_name.clone(),
            })
            .await?;

        info!(
            user_id,
            transaction_id = %data.pre_checkout_transaction_id,
            "precheckout data reserved"
        );
        Ok(data)
    }

    /// Run a full express checkout for the user.
    ///
    /// Performs a fresh precheckout, authorizes the payment against it, and
    /// persists the rotated token and the checkout record. The returned
    /// payment carries the precheckout transaction id, since the gateway
    /// leaves that field empty on this call.
    pub async fn express_checkout(
        &self,
        user_id: i64,
        amount: f64,
        currency: &str,
    ) -> Result<PaymentData, CheckoutError> {
        let precheckout = self.get_precheckout_data(user_id).await?;
        let wallet = self.active_wallet(user_id).await?;
        let wallet_id = Self::wallet_id(&wallet)?;
        let pairing = self.current_pairing_token(user_id).await?;

        let request = ExpressCheckoutRequest {
            amount,
            currency: currency.to_string(),
            card_id: wallet.default_card_id.clone(),
            checkout_id: self.checkout_id.clone(),
            digital_goods: false,
            pairing_id: pairing.pairing_token.clone(),
            pre_checkout_transaction_id: precheckout.pre_checkout_transaction_id.clone(),
            shipping_address_id: wallet.default_shipping_address_id.clone(),
        };

        let mut payment = match self.gateway.create_express_checkout(&request).await {
            Ok(payment) => payment,
            Err(err) => {
                log_gateway_error(&err);
                return Err(err.into());
            }
        };

        // The gateway returns no transaction id here; carry over the one
        // from the precheckout so the postback can reference it.
        payment.psp_transaction_id = Some(precheckout.pre_checkout_transaction_id.clone());

        self.save_pairing_token(
            user_id,
            wallet_id,
            &payment.pairing_id,
            PairingSource::ExpressCheckout,
        )
        .await?;
        self.records
            .save_express_checkout(ExpressCheckoutRecord {
                id: None,
                user_id,
                wallet_id,
                gateway_wallet_id: payment.wallet_id.clone(),
                wallet_name: payment.wallet_name.clone(),
            })
            .await?;

        info!(user_id, amount, currency, "express checkout completed");
        Ok(payment)
    }

    /// Report the final payment outcome for an authorized checkout back to
    /// the gateway.
    pub async fn postback(
        &self,
        payment: &PaymentData,
        currency: &str,
        authorization_code: &str,
        payment_successful: bool,
        amount: f64,
    ) -> Result<(), CheckoutError> {
        let transaction_id = payment
            .psp_transaction_id
            .clone()
            .ok_or(CheckoutError::MissingTransactionId)?;

        let request = PostbackRequest {
            transaction_id: transaction_id.clone(),
            currency: currency.to_string(),
            payment_code: authorization_code.to_string(),
            payment_successful,
            amount,
            payment_date: Utc::now(),
        };

        if let Err(err) = self.gateway.submit_postback(&request).await {
            log_gateway_error(&err);
            return Err(err.into());
        }

        info!(
            transaction_id = %transaction_id,
            payment_successful,
            "payment outcome reported"
        );
        Ok(())
    }
}
