use std::{
    sync::{Arc, RwLock},
    time::Duration,
};

use did_hedera::{
    key_codec, verification_method_selector, AccountId, DIDLifecycleCoordinator, Error,
    KeyMaterial, KeyPurpose, LedgerClient, LedgerClientConfig, Network, ResolutionFormat,
    UpdateOperations, DID, DID_CORE_CONTEXT, ED25519_VERIFICATION_KEY_2020,
};
use did_hedera_mock::{MockLedger, MockLedgerClient};

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    // It's necessary to specify EnvFilter::from_default_env in order to use RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}

const OPERATOR_ACCOUNT_ID: AccountId = AccountId::new(0, 0, 2);

fn generate_signing_key() -> ed25519_dalek::SigningKey {
    ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng)
}

fn new_mock_ledger() -> Arc<RwLock<MockLedger>> {
    Arc::new(RwLock::new(MockLedger::new(Network::Testnet)))
}

fn new_mock_ledger_client(
    user_agent: &str,
    mock_ledger_la: &Arc<RwLock<MockLedger>>,
    simulated_latency_o: Option<Duration>,
) -> Arc<MockLedgerClient> {
    let mut config = LedgerClientConfig::new(Network::Testnet, OPERATOR_ACCOUNT_ID);
    if let Some(simulated_latency) = simulated_latency_o {
        config = config.with_simulated_latency(simulated_latency);
    }
    Arc::new(MockLedgerClient::new(
        user_agent.to_string(),
        config,
        mock_ledger_la.clone(),
    ))
}

fn sequence_number_of(mock_ledger_la: &Arc<RwLock<MockLedger>>, did: &DID) -> u64 {
    mock_ledger_la
        .read()
        .expect("pass")
        .topic(&did.topic_id())
        .expect("pass")
        .did_state_o
        .as_ref()
        .expect("pass")
        .sequence_number
}

#[tokio::test]
#[serial_test::serial]
async fn test_did_lifecycle_end_to_end() {
    let mock_ledger_la = new_mock_ledger();
    let coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Alice's wallet",
        &mock_ledger_la,
        None,
    ));
    let owner_key = generate_signing_key();

    let (did, created_did_document) = coordinator.create(&owner_key).await.expect("pass");
    tracing::debug!(
        "created DID {} with document:\n{}",
        did,
        serde_json::to_string_pretty(&created_did_document).expect("pass")
    );
    assert_eq!(did.network(), Network::Testnet);
    assert_eq!(
        did.public_key_base58(),
        key_codec::encode_base58(owner_key.verifying_key().as_bytes())
    );
    assert_eq!(created_did_document.did, did);

    let resolved_did_document = coordinator
        .resolve(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert_eq!(resolved_did_document, created_did_document);
    assert_eq!(resolved_did_document.verification_method_v().len(), 1);
    let verification_method = verification_method_selector::select_verification_method(
        resolved_did_document.verification_method_v(),
        verification_method_selector::ED25519_TYPE_PREFIX,
    )
    .expect("pass");
    assert_eq!(
        verification_method_selector::extract_key_material(verification_method).expect("pass"),
        owner_key.verifying_key().as_bytes()
    );

    let update_operations = UpdateOperations::builder()
        .add_service("#hub", "LinkedDomains", "https://example.com/hub")
        .build()
        .expect("pass");
    let updated_did_document = coordinator
        .update(&did, &update_operations, &owner_key)
        .await
        .expect("pass");
    let re_resolved_did_document = coordinator
        .resolve(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    tracing::debug!(
        "updated DID document:\n{}",
        serde_json::to_string_pretty(&re_resolved_did_document).expect("pass")
    );
    assert_eq!(
        re_resolved_did_document.service_v.len(),
        resolved_did_document.service_v.len() + 1
    );
    let service = re_resolved_did_document
        .find_service("#hub")
        .expect("pass");
    assert_eq!(service.id, did.with_fragment("hub"));
    assert_eq!(service.service_endpoint, "https://example.com/hub");
    assert_eq!(
        re_resolved_did_document.verification_method_v(),
        resolved_did_document.verification_method_v()
    );
    // update returns the same application/did+json shape that resolve does.
    assert_eq!(updated_did_document, re_resolved_did_document);
    assert_eq!(sequence_number_of(&mock_ledger_la, &did), 2);
}

#[tokio::test]
#[serial_test::serial]
async fn test_key_rotation() {
    let mock_ledger_la = new_mock_ledger();
    let coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Bob's wallet",
        &mock_ledger_la,
        None,
    ));
    let owner_key = generate_signing_key();
    let (did, _) = coordinator.create(&owner_key).await.expect("pass");

    // Rotate in a new controlling key (held in base58 form) and drop the root key.
    let new_key = generate_signing_key();
    let update_operations = UpdateOperations::builder()
        .add_verification_method_with_purpose(
            "#key-1",
            ED25519_VERIFICATION_KEY_2020,
            did.clone(),
            KeyMaterial::base58_from_raw(new_key.verifying_key().as_bytes()),
            KeyPurpose::Authentication,
        )
        .remove_verification_method("#did-root-key")
        .build()
        .expect("pass");
    coordinator
        .update(&did, &update_operations, &owner_key)
        .await
        .expect("pass");

    // The old key is no longer authorized, the new one is.
    let update_operations = UpdateOperations::builder()
        .add_service("#hub", "LinkedDomains", "https://example.com/hub")
        .build()
        .expect("pass");
    assert!(matches!(
        coordinator
            .update(&did, &update_operations, &owner_key)
            .await,
        Err(Error::UnauthorizedSigningKey { .. })
    ));
    coordinator
        .update(&did, &update_operations, &new_key)
        .await
        .expect("pass");
    let did_document = coordinator
        .resolve(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert_eq!(did_document.verification_method_v().len(), 1);
    assert_eq!(did_document.service_v.len(), 1);
    assert_eq!(sequence_number_of(&mock_ledger_la, &did), 3);
}

#[tokio::test]
#[serial_test::serial]
async fn test_unauthorized_update_leaves_state_unchanged() {
    let mock_ledger_la = new_mock_ledger();
    let coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Carol's wallet",
        &mock_ledger_la,
        None,
    ));
    let owner_key = generate_signing_key();
    let (did, did_document_before) = coordinator.create(&owner_key).await.expect("pass");

    let intruder_key = generate_signing_key();
    let update_operations = UpdateOperations::builder()
        .add_service("#phish", "LinkedDomains", "https://evil.example")
        .build()
        .expect("pass");
    match coordinator
        .update(&did, &update_operations, &intruder_key)
        .await
    {
        Err(Error::UnauthorizedSigningKey {
            did: error_did,
            expected,
            actual,
        }) => {
            assert_eq!(error_did, did);
            assert_eq!(
                expected,
                vec![key_codec::encode_multibase(owner_key.verifying_key().as_bytes())]
            );
            assert_eq!(
                actual,
                key_codec::encode_multibase(intruder_key.verifying_key().as_bytes())
            );
        }
        other => panic!("expected UnauthorizedSigningKey, got {:?}", other),
    }
    assert!(matches!(
        coordinator.deactivate(&did, &intruder_key).await,
        Err(Error::UnauthorizedSigningKey { .. })
    ));

    let did_document_after = coordinator
        .resolve(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert_eq!(did_document_after, did_document_before);
    assert_eq!(sequence_number_of(&mock_ledger_la, &did), 1);
}

#[tokio::test]
#[serial_test::serial]
async fn test_deactivation_is_terminal() {
    let mock_ledger_la = new_mock_ledger();
    let coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Dave's wallet",
        &mock_ledger_la,
        None,
    ));
    let owner_key = generate_signing_key();
    let (did, _) = coordinator.create(&owner_key).await.expect("pass");

    let tombstone = coordinator.deactivate(&did, &owner_key).await.expect("pass");
    assert!(tombstone.is_tombstone());
    assert_eq!(tombstone.did, did);
    assert!(tombstone.context_v.is_empty());

    // Resolution still succeeds, yielding the marker document with no verification methods.
    let resolution_result = coordinator
        .resolve_with_metadata(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    tracing::debug!(
        "resolution result for deactivated DID:\n{}",
        serde_json::to_string_pretty(&resolution_result).expect("pass")
    );
    assert!(resolution_result.did_document.is_tombstone());
    assert!(resolution_result
        .did_document
        .verification_method_v()
        .is_empty());
    assert!(resolution_result.did_document_metadata.is_deactivated());
    assert_eq!(resolution_result.did_document_metadata.version_id, 2);

    let update_operations = UpdateOperations::builder()
        .add_service("#hub", "LinkedDomains", "https://example.com/hub")
        .build()
        .expect("pass");
    assert!(matches!(
        coordinator
            .update(&did, &update_operations, &owner_key)
            .await,
        Err(Error::DocumentDeactivated(_))
    ));
    assert!(matches!(
        coordinator.deactivate(&did, &owner_key).await,
        Err(Error::DocumentDeactivated(_))
    ));
    assert_eq!(sequence_number_of(&mock_ledger_la, &did), 2);
}

#[tokio::test]
#[serial_test::serial]
async fn test_resolve_unknown_did() {
    let mock_ledger_la = new_mock_ledger();
    let coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Erin's resolver",
        &mock_ledger_la,
        None,
    ));
    let never_created_did = DID::new(
        Network::Testnet,
        generate_signing_key().verifying_key().as_bytes(),
        did_hedera::TopicId::new(0, 0, 999),
    )
    .expect("pass");
    assert!(matches!(
        coordinator
            .resolve(&never_created_did, ResolutionFormat::DidJson)
            .await,
        Err(Error::DIDNotFound(did)) if did == never_created_did
    ));
    assert!(matches!(
        coordinator
            .deactivate(&never_created_did, &generate_signing_key())
            .await,
        Err(Error::DIDNotFound(_))
    ));
}

#[tokio::test]
#[serial_test::serial]
async fn test_resolution_formats_and_metadata() {
    let mock_ledger_la = new_mock_ledger();
    let coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Frank's resolver",
        &mock_ledger_la,
        None,
    ));
    let owner_key = generate_signing_key();
    let (did, _) = coordinator.create(&owner_key).await.expect("pass");

    let did_json = coordinator
        .resolve_with_metadata(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert!(did_json.did_document.context_v.is_empty());
    assert_eq!(
        did_json.did_resolution_metadata.content_type,
        "application/did+json"
    );
    assert!(!did_json.did_document_metadata.is_deactivated());
    assert_eq!(did_json.did_document_metadata.version_id, 1);
    let value = serde_json::to_value(&did_json.did_document).expect("pass");
    assert!(value.get("@context").is_none());

    let did_ld_json = coordinator
        .resolve_with_metadata(&did, ResolutionFormat::DidLdJson)
        .await
        .expect("pass");
    assert_eq!(
        did_ld_json.did_document.context_v,
        vec![DID_CORE_CONTEXT.to_string()]
    );
    assert_eq!(
        did_ld_json.did_resolution_metadata.content_type,
        "application/did+ld+json"
    );

    coordinator
        .update(
            &did,
            &UpdateOperations::builder()
                .add_service("#hub", "LinkedDomains", "https://example.com/hub")
                .build()
                .expect("pass"),
            &owner_key,
        )
        .await
        .expect("pass");
    let updated = coordinator
        .resolve_with_metadata(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert_eq!(updated.did_document_metadata.version_id, 2);
    assert_eq!(
        updated.did_document_metadata.created,
        did_json.did_document_metadata.created
    );
    assert!(updated.did_document_metadata.updated >= did_json.did_document_metadata.updated);
}

#[tokio::test]
#[serial_test::serial]
async fn test_transport_failure() {
    let mock_ledger_la = new_mock_ledger();
    let mock_ledger_client = new_mock_ledger_client("Grace's wallet", &mock_ledger_la, None);
    let coordinator = DIDLifecycleCoordinator::new(mock_ledger_client.clone());
    let owner_key = generate_signing_key();

    mock_ledger_client.set_offline(true);
    assert!(matches!(
        coordinator.create(&owner_key).await,
        Err(Error::LedgerSubmissionError(_))
    ));
    mock_ledger_client.set_offline(false);

    let (did, did_document_before) = coordinator.create(&owner_key).await.expect("pass");
    mock_ledger_client.set_offline(true);
    // Queries are not submissions, so the transport error comes through as is.
    assert!(matches!(
        coordinator.resolve(&did, ResolutionFormat::DidJson).await,
        Err(Error::TransportError(_))
    ));
    mock_ledger_client.set_offline(false);

    // Simulate the ledger dropping off between the query and the submission.
    let (offline_signal_tx, offline_signal_rx) = tokio::sync::oneshot::channel::<()>();
    let slow_mock_ledger_client = new_mock_ledger_client(
        "Grace's slow wallet",
        &mock_ledger_la,
        Some(Duration::from_millis(100)),
    );
    let slow_coordinator = DIDLifecycleCoordinator::new(slow_mock_ledger_client.clone());
    let update_operations = UpdateOperations::builder()
        .add_service("#hub", "LinkedDomains", "https://example.com/hub")
        .build()
        .expect("pass");
    let update_task = {
        let did = did.clone();
        let owner_key = owner_key.clone();
        tokio::spawn(async move {
            let _ = offline_signal_tx.send(());
            slow_coordinator
                .update(&did, &update_operations, &owner_key)
                .await
        })
    };
    offline_signal_rx.await.expect("pass");
    // The query completes after 100ms, the submission after 200ms.
    tokio::time::sleep(Duration::from_millis(150)).await;
    slow_mock_ledger_client.set_offline(true);
    assert!(matches!(
        update_task.await.expect("pass"),
        Err(Error::LedgerSubmissionError(_))
    ));

    let did_document_after = coordinator
        .resolve(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert_eq!(did_document_after, did_document_before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial_test::serial]
async fn test_concurrent_updates_conflict() {
    let mock_ledger_la = new_mock_ledger();
    let owner_key = generate_signing_key();
    let (did, _) = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Heidi's wallet",
        &mock_ledger_la,
        None,
    ))
    .create(&owner_key)
    .await
    .expect("pass");

    // Two writers that both read the DID at sequence number 1 before either submits.
    let coordinator_0 = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Heidi's phone",
        &mock_ledger_la,
        Some(Duration::from_millis(100)),
    ));
    let coordinator_1 = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Heidi's laptop",
        &mock_ledger_la,
        Some(Duration::from_millis(100)),
    ));
    let update_operations_0 = UpdateOperations::builder()
        .add_service("#phone", "LinkedDomains", "https://phone.example.com")
        .build()
        .expect("pass");
    let update_operations_1 = UpdateOperations::builder()
        .add_service("#laptop", "LinkedDomains", "https://laptop.example.com")
        .build()
        .expect("pass");
    let (result_0, result_1) = tokio::join!(
        coordinator_0.update(&did, &update_operations_0, &owner_key),
        coordinator_1.update(&did, &update_operations_1, &owner_key),
    );
    tracing::debug!("result_0: {:?}", result_0);
    tracing::debug!("result_1: {:?}", result_1);

    let (winner_did_document, loser_error) = match (result_0, result_1) {
        (Ok(did_document), Err(e)) | (Err(e), Ok(did_document)) => (did_document, e),
        (result_0, result_1) => panic!(
            "expected exactly one update to win, got {:?} and {:?}",
            result_0, result_1
        ),
    };
    match loser_error {
        Error::ConflictingUpdate {
            did: error_did,
            expected,
            actual,
        } => {
            assert_eq!(error_did, did);
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        e => panic!("expected ConflictingUpdate, got {:?}", e),
    }

    // Only the winner's service is present; nothing was silently overwritten.
    let did_document = coordinator_0
        .resolve(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert_eq!(did_document.service_v, winner_did_document.service_v);
    assert_eq!(did_document.service_v.len(), 1);
    assert_eq!(sequence_number_of(&mock_ledger_la, &did), 2);
}

#[tokio::test]
#[serial_test::serial]
async fn test_cancelled_update_is_not_applied() {
    let mock_ledger_la = new_mock_ledger();
    let owner_key = generate_signing_key();
    let coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Ivan's wallet",
        &mock_ledger_la,
        None,
    ));
    let (did, did_document_before) = coordinator.create(&owner_key).await.expect("pass");

    let slow_coordinator = DIDLifecycleCoordinator::new(new_mock_ledger_client(
        "Ivan's slow wallet",
        &mock_ledger_la,
        Some(Duration::from_millis(200)),
    ));
    let update_operations = UpdateOperations::builder()
        .add_service("#hub", "LinkedDomains", "https://example.com/hub")
        .build()
        .expect("pass");
    // Cancel after the query has returned but while the submission is still in flight.
    assert!(tokio::time::timeout(
        Duration::from_millis(300),
        slow_coordinator.update(&did, &update_operations, &owner_key),
    )
    .await
    .is_err());

    let did_document_after = coordinator
        .resolve(&did, ResolutionFormat::DidJson)
        .await
        .expect("pass");
    assert_eq!(did_document_after, did_document_before);
    assert_eq!(sequence_number_of(&mock_ledger_la, &did), 1);
    let message_count = mock_ledger_la
        .read()
        .expect("pass")
        .topic(&did.topic_id())
        .expect("pass")
        .message_v
        .len();
    assert_eq!(message_count, 1);
}

#[tokio::test]
#[serial_test::serial]
async fn test_mock_ledger_rejects_forged_messages() {
    let mock_ledger_la = new_mock_ledger();
    let mock_ledger_client = new_mock_ledger_client("Judy's wallet", &mock_ledger_la, None);
    let coordinator = DIDLifecycleCoordinator::new(mock_ledger_client.clone());
    let owner_key = generate_signing_key();
    let (did, did_document) = coordinator.create(&owner_key).await.expect("pass");

    // An update message whose document doesn't match its operations.
    let update_operations = UpdateOperations::builder()
        .add_service("#hub", "LinkedDomains", "https://example.com/hub")
        .build()
        .expect("pass");
    let forged_message = did_hedera::DIDMessage {
        did: did.clone(),
        operation: did_hedera::DIDOperation::Update {
            document: did_document.clone(),
            updates: update_operations,
        },
        previous_sequence_number_o: Some(1),
        timestamp: time::OffsetDateTime::now_utc(),
    }
    .sign(&owner_key)
    .expect("pass");
    assert!(matches!(
        mock_ledger_client
            .submit(did_hedera::LedgerTransaction::TopicMessageSubmit {
                topic_id: did.topic_id(),
                message: forged_message.clone(),
            })
            .await,
        Err(Error::LedgerSubmissionError(_))
    ));

    // A tampered signature.
    let mut tampered_message = forged_message;
    tampered_message.signature = key_codec::encode_multibase(&[0u8; 64]);
    assert!(matches!(
        mock_ledger_client
            .submit(did_hedera::LedgerTransaction::TopicMessageSubmit {
                topic_id: did.topic_id(),
                message: tampered_message,
            })
            .await,
        Err(Error::InvalidSignature(_))
    ));
    assert_eq!(sequence_number_of(&mock_ledger_la, &did), 1);
}
