//! End-to-end flows driven entirely through nullable collaborators.

use std::sync::Arc;

use serde_json::json;

use mintgate_chains::{ChainSessionManager, SwitchOutcome};
use mintgate_faults::RawFault;
use mintgate_nullables::{NullMintSubmitter, NullVerificationProvider, NullWalletProvider};
use mintgate_types::{ChainId, ChainRegistry, UniqueIdentifier};
use mintgate_verification::{
    MintOutcome, ProviderEvent, SessionOutcome, VerificationPipeline, VerificationStatus,
};

#[tokio::test]
async fn add_then_switch_fallback_against_null_wallet() {
    let wallet = Arc::new(NullWalletProvider::new());
    // Add-first add succeeds, first switch claims the chain is unknown,
    // the retry after the fallback add succeeds.
    wallet.script_switch(Err(RawFault::from(json!({ "code": 4902 }))));
    let manager = ChainSessionManager::new(
        ChainRegistry::standard(),
        wallet.clone(),
        ChainId::new(1),
    )
    .unwrap();

    let outcome = manager.request_switch(ChainId::new(130)).await.unwrap();

    assert_eq!(outcome, SwitchOutcome::Switched);
    assert_eq!(manager.current_chain(), ChainId::new(130));
    assert!(!manager.is_switching());
    assert_eq!(
        wallet.call_log(),
        vec!["add:0x82", "switch:0x82", "add:0x82", "switch:0x82"]
    );
    assert_eq!(wallet.add_calls()[0].chain_name, "Unichain");
}

#[tokio::test]
async fn full_verification_and_mint_flow_through_nullables() {
    let provider = Arc::new(NullVerificationProvider::new());
    let submitter = Arc::new(NullMintSubmitter::new());
    let pipeline = VerificationPipeline::new(provider.clone(), submitter.clone());

    let mut handle = pipeline.start().await.unwrap();
    assert_eq!(pipeline.status(), VerificationStatus::AwaitingScan);
    assert!(handle.scan_payload.starts_with("mintgate://verify/"));

    let emitter = provider.emitter().unwrap();
    emitter.send(ProviderEvent::RequestReceived).await.unwrap();
    for count in 1..=4 {
        emitter
            .send(ProviderEvent::ProofProgress { count })
            .await
            .unwrap();
    }
    emitter
        .send(ProviderEvent::Result(SessionOutcome::Verified {
            unique_identifier: UniqueIdentifier::from("0xabc123deadbeef0042"),
            face_match_passed: true,
            personhood_verified: true,
        }))
        .await
        .unwrap();
    drop(emitter);

    let status = pipeline.run_session(&mut handle).await;
    assert_eq!(status, VerificationStatus::Verified);
    assert_eq!(pipeline.state().proofs_generated, 4);

    let outcome = pipeline.mint("0x00000000000000000000000000000000000000aa").await.unwrap();
    let MintOutcome::Minted(hash) = outcome else {
        panic!("expected a minted outcome, got {outcome:?}");
    };
    assert_eq!(pipeline.state().mint_tx_hash.as_ref(), Some(&hash));

    let submitted = submitter.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        submitted[0].unique_identifier.expose(),
        "0xabc123deadbeef0042"
    );
}

#[tokio::test]
async fn cancelled_cycle_tears_down_the_null_session() {
    let provider = Arc::new(NullVerificationProvider::new());
    let submitter = Arc::new(NullMintSubmitter::new());
    let pipeline = VerificationPipeline::new(provider.clone(), submitter.clone());

    let _handle = pipeline.start().await.unwrap();
    pipeline.cancel().await.unwrap();

    assert_eq!(pipeline.status(), VerificationStatus::Idle);
    assert_eq!(provider.closed_sessions().len(), 1);
    assert!(submitter.submitted().is_empty());
}
