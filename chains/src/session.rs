//! Chain-switch negotiation.
//!
//! One manager owns the wallet's chain session and serializes switch
//! requests: at most one negotiation is in flight, concurrent requests are
//! dropped rather than queued, and the active chain only changes on a
//! confirmed wallet response.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use mintgate_faults::classify;
use mintgate_types::{ChainDescriptor, ChainId, ChainRegistry};

use crate::error::ChainError;
use crate::provider::{AddChainRequest, SwitchChainRequest, WalletProvider};

/// Capacity of the chain-changed notification channel.
const CHANGES_CHANNEL_CAPACITY: usize = 16;

/// Mutable session state, owned exclusively by the manager.
///
/// `switching` is true only strictly between a negotiation starting and
/// resolving; `current_chain_id` changes only on confirmed switch success.
#[derive(Clone, Copy, Debug)]
struct ChainSession {
    current_chain_id: ChainId,
    switching: bool,
}

/// How a switch request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The wallet confirmed; the target is now the active chain.
    Switched,
    /// The target already was the active chain; no RPC was issued.
    AlreadyActive,
    /// Another switch is in flight; this request was dropped.
    Busy,
    /// The user declined in the wallet; not an error.
    Cancelled,
    /// The fallback added the chain but the retry switch failed. The chain
    /// is available in the wallet and the user can switch manually; never
    /// rendered as an error.
    AddedNotSwitched,
}

/// Serializes chain switches against one wallet provider.
pub struct ChainSessionManager {
    registry: ChainRegistry,
    provider: Arc<dyn WalletProvider>,
    session: Mutex<ChainSession>,
    changes: broadcast::Sender<ChainId>,
}

impl ChainSessionManager {
    pub fn new(
        registry: ChainRegistry,
        provider: Arc<dyn WalletProvider>,
        initial_chain: ChainId,
    ) -> Result<Self, ChainError> {
        if !registry.contains(initial_chain) {
            return Err(ChainError::ChainNotConfigured(initial_chain));
        }
        let (changes, _) = broadcast::channel(CHANGES_CHANNEL_CAPACITY);
        Ok(Self {
            registry,
            provider,
            session: Mutex::new(ChainSession {
                current_chain_id: initial_chain,
                switching: false,
            }),
            changes,
        })
    }

    pub fn current_chain(&self) -> ChainId {
        self.lock().current_chain_id
    }

    pub fn is_switching(&self) -> bool {
        self.lock().switching
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Receiver notified with the new chain id after every committed switch.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChainId> {
        self.changes.subscribe()
    }

    /// Negotiate a switch to `target`.
    ///
    /// Protocol: an `add_chain` attempt first for `add_first` descriptors,
    /// then `switch_chain`; a chain-unrecognized answer falls back to
    /// `add_chain` plus exactly one `switch_chain` retry. User rejection at
    /// any step ends the negotiation as [`SwitchOutcome::Cancelled`], never
    /// as an error.
    pub async fn request_switch(&self, target: ChainId) -> Result<SwitchOutcome, ChainError> {
        let descriptor = self
            .registry
            .get(target)
            .ok_or(ChainError::ChainNotConfigured(target))?
            .clone();

        {
            let mut session = self.lock();
            if session.current_chain_id == target {
                debug!(chain = %target, "switch target already active");
                return Ok(SwitchOutcome::AlreadyActive);
            }
            if session.switching {
                debug!(chain = %target, "switch already in flight, dropping request");
                return Ok(SwitchOutcome::Busy);
            }
            session.switching = true;
        }
        let _guard = SwitchGuard { manager: self };

        // Wallets commonly ship without the uncommon chains; adding first
        // avoids a guaranteed unrecognized-chain round trip.
        if descriptor.add_first {
            if let Err(fault) = self
                .provider
                .add_chain(AddChainRequest::from_descriptor(&descriptor))
                .await
            {
                if fault.is_user_rejection() {
                    info!(chain = %target, "user declined chain add");
                    return Ok(SwitchOutcome::Cancelled);
                }
                debug!(chain = %target, fault = %fault, "pre-switch add failed, continuing");
            }
        }

        match self
            .provider
            .switch_chain(SwitchChainRequest::new(target))
            .await
        {
            Ok(()) => {
                self.commit(target);
                Ok(SwitchOutcome::Switched)
            }
            Err(fault) if fault.is_user_rejection() => {
                info!(chain = %target, "user declined chain switch");
                Ok(SwitchOutcome::Cancelled)
            }
            Err(fault) if fault.is_chain_unrecognized() => {
                self.add_then_retry(target, &descriptor).await
            }
            Err(fault) => {
                let report = classify(&fault);
                warn!(chain = %target, code = report.code.as_str(), "chain switch failed");
                Err(ChainError::Switch(report))
            }
        }
    }

    /// Chain-unrecognized fallback: add the chain, then retry the switch
    /// exactly once. Retry failure leaves the chain added but not active.
    async fn add_then_retry(
        &self,
        target: ChainId,
        descriptor: &ChainDescriptor,
    ) -> Result<SwitchOutcome, ChainError> {
        debug!(chain = %target, "wallet does not recognize chain, adding");
        if let Err(fault) = self
            .provider
            .add_chain(AddChainRequest::from_descriptor(descriptor))
            .await
        {
            if fault.is_user_rejection() {
                info!(chain = %target, "user declined chain add");
                return Ok(SwitchOutcome::Cancelled);
            }
            let report = classify(&fault);
            warn!(chain = %target, code = report.code.as_str(), "fallback add failed");
            return Err(ChainError::Switch(report));
        }

        match self
            .provider
            .switch_chain(SwitchChainRequest::new(target))
            .await
        {
            Ok(()) => {
                self.commit(target);
                Ok(SwitchOutcome::Switched)
            }
            Err(fault) if fault.is_user_rejection() => {
                info!(chain = %target, "user declined chain switch after add");
                Ok(SwitchOutcome::Cancelled)
            }
            Err(fault) => {
                info!(chain = %target, fault = %fault, "chain added but switch retry failed");
                Ok(SwitchOutcome::AddedNotSwitched)
            }
        }
    }

    /// Record a confirmed switch and notify subscribers.
    fn commit(&self, target: ChainId) {
        {
            let mut session = self.lock();
            session.current_chain_id = target;
            session.switching = false;
        }
        let _ = self.changes.send(target);
        info!(chain = %target, "active chain committed");
    }

    fn lock(&self) -> MutexGuard<'_, ChainSession> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Clears the switching flag on every exit path, including panics.
struct SwitchGuard<'a> {
    manager: &'a ChainSessionManager,
}

impl Drop for SwitchGuard<'_> {
    fn drop(&mut self) {
        self.manager.lock().switching = false;
    }
}
