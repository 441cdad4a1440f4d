//! Nullable wallet provider — record chain requests without a wallet.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use mintgate_chains::{AddChainRequest, SwitchChainRequest, WalletProvider};
use mintgate_faults::RawFault;

use crate::lock;

/// A test wallet that records every request and answers from scripted
/// per-call queues. An empty queue answers success.
#[derive(Default)]
pub struct NullWalletProvider {
    switch_results: Mutex<VecDeque<Result<(), RawFault>>>,
    add_results: Mutex<VecDeque<Result<(), RawFault>>>,
    switch_calls: Mutex<Vec<SwitchChainRequest>>,
    add_calls: Mutex<Vec<AddChainRequest>>,
    /// Interleaved call log: `"switch:0x82"`, `"add:0xa4ec"`, in order.
    call_log: Mutex<Vec<String>>,
}

impl NullWalletProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `switch_chain` answer.
    pub fn script_switch(&self, result: Result<(), RawFault>) {
        lock(&self.switch_results).push_back(result);
    }

    /// Script the next `add_chain` answer.
    pub fn script_add(&self, result: Result<(), RawFault>) {
        lock(&self.add_results).push_back(result);
    }

    /// All `switch_chain` requests, in order.
    pub fn switch_calls(&self) -> Vec<SwitchChainRequest> {
        lock(&self.switch_calls).clone()
    }

    /// All `add_chain` requests, in order.
    pub fn add_calls(&self) -> Vec<AddChainRequest> {
        lock(&self.add_calls).clone()
    }

    /// Both call kinds interleaved, in arrival order.
    pub fn call_log(&self) -> Vec<String> {
        lock(&self.call_log).clone()
    }

    /// Clear all recorded calls and scripted answers.
    pub fn reset(&self) {
        lock(&self.switch_results).clear();
        lock(&self.add_results).clear();
        lock(&self.switch_calls).clear();
        lock(&self.add_calls).clear();
        lock(&self.call_log).clear();
    }
}

#[async_trait]
impl WalletProvider for NullWalletProvider {
    async fn switch_chain(&self, request: SwitchChainRequest) -> Result<(), RawFault> {
        lock(&self.call_log).push(format!("switch:{}", request.chain_id));
        lock(&self.switch_calls).push(request);
        lock(&self.switch_results).pop_front().unwrap_or(Ok(()))
    }

    async fn add_chain(&self, request: AddChainRequest) -> Result<(), RawFault> {
        lock(&self.call_log).push(format!("add:{}", request.chain_id));
        lock(&self.add_calls).push(request);
        lock(&self.add_results).pop_front().unwrap_or(Ok(()))
    }
}
