#[cfg(test)]
mod tests {
    use crate::client::HttpMasterpassGateway;
    use crate::error::GatewayError;
    use crate::gateway::MasterpassGateway;
    use crate::types::{ExpressCheckoutRequest, PostbackRequest};
    use chrono::Utc;
    use serde_json::json;
    use std::time::Duration;
    use walletflow_config::MasterpassConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> HttpMasterpassGateway {
        HttpMasterpassGateway::new(&MasterpassConfig {
            base_url: server.uri(),
            checkout_id: "CHK".to_string(),
            timeout_secs: Some(1),
        })
        .unwrap()
    }

    fn express_request() -> ExpressCheckoutRequest {
        ExpressCheckoutRequest {
            amount: 10.0,
            currency: "USD".to_string(),
            card_id: "C1".to_string(),
            checkout_id: "CHK".to_string(),
            digital_goods: false,
            pairing_id: "P2".to_string(),
            pre_checkout_transaction_id: "T1".to_string(),
            shipping_address_id: "A1".to_string(),
        }
    }

    #[tokio::test]
    async fn decodes_precheckout_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/precheckout/P1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pairingId": "P2",
                "consumerWalletId": "CW1",
                "preCheckoutTransactionId": "T1",
                "walletName": "W"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let data = gateway.fetch_precheckout_data("P1").await.unwrap();

        assert_eq!(data.pairing_id, "P2");
        assert_eq!(data.consumer_wallet_id, "CW1");
        assert_eq!(data.pre_checkout_transaction_id, "T1");
        assert_eq!(data.wallet_name, "W");
    }

    #[tokio::test]
    async fn express_checkout_sends_camel_case_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/expresscheckout"))
            .and(body_partial_json(json!({
                "cardId": "C1",
                "checkoutId": "CHK",
                "digitalGoods": false,
                "pairingId": "P2",
                "preCheckoutTransactionId": "T1",
                "shippingAddressId": "A1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "walletId": "WID1",
                "walletName": "W2",
                "pairingId": "P3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let payment = gateway
            .create_express_checkout(&express_request())
            .await
            .unwrap();

        assert_eq!(payment.wallet_id, "WID1");
        assert_eq!(payment.pairing_id, "P3");
        // The provider omits the correlation id on this call.
        assert_eq!(payment.psp_transaction_id, None);
    }

    #[tokio::test]
    async fn decodes_structured_error_entries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/expresscheckout"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": {
                    "error": [{
                        "source": "expresscheckout",
                        "reasonCode": "INVALID_PAIRING",
                        "description": "pairing id is no longer valid",
                        "recoverable": true
                    }]
                }
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let err = gateway
            .create_express_checkout(&express_request())
            .await
            .unwrap_err();

        match err {
            GatewayError::Api {
                status_code,
                entries,
            } => {
                assert_eq!(status_code, 400);
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].reason_code, "INVALID_PAIRING");
                assert!(entries[0].recoverable);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unstructured_error_body_becomes_a_catch_all_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/precheckout/P1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.fetch_precheckout_data("P1").await.unwrap_err();

        match err {
            GatewayError::Api { entries, .. } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].description, "upstream exploded");
                assert!(!entries[0].recoverable);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_responses_surface_as_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/precheckout/P1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "pairingId": "P2",
                        "consumerWalletId": "CW1",
                        "preCheckoutTransactionId": "T1",
                        "walletName": "W"
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.fetch_precheckout_data("P1").await.unwrap_err();

        assert!(matches!(err, GatewayError::Timeout));
    }

    #[tokio::test]
    async fn postback_success_returns_unit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/postback"))
            .and(body_partial_json(json!({
                "transactionId": "T1",
                "paymentSuccessful": false
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        gateway
            .submit_postback(&PostbackRequest {
                transaction_id: "T1".to_string(),
                currency: "USD".to_string(),
                payment_code: "AUTH-1".to_string(),
                payment_successful: false,
                amount: 10.0,
                payment_date: Utc::now(),
            })
            .await
            .unwrap();
    }
}
