use crate::error::{Result, SquadsSdkError};
use crate::types::{GovernanceRef, UiInstruction};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Anything that can produce its instruction when the proposal is assembled.
#[async_trait]
pub trait InstructionSource: Send + Sync {
    /// Never fails; problems are reported through `UiInstruction::is_valid`.
    async fn get_instruction(&self) -> UiInstruction;
}

/// Entry a form keeps up to date in the coordinator
#[derive(Clone)]
pub struct RegisteredInstruction {
    pub governance: Option<GovernanceRef>,
    pub source: Arc<dyn InstructionSource>,
}

impl std::fmt::Debug for RegisteredInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredInstruction")
            .field("governance", &self.governance)
            .finish_non_exhaustive()
    }
}

/// Coordinator side of the registration protocol.
///
/// Forms call `register` on creation and after every state change;
/// the latest entry for a slot replaces the previous one.
pub trait InstructionRegistry: Send + Sync {
    fn register(&self, index: usize, entry: RegisteredInstruction);
}

/// Slot table of a proposal being drafted
#[derive(Default)]
pub struct ProposalInstructions {
    slots: Mutex<BTreeMap<usize, RegisteredInstruction>>,
}

impl ProposalInstructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RegisteredInstruction> {
        self.lock().get(&index).cloned()
    }

    /// Forget a slot, e.g. when the user removes an instruction from the draft
    pub fn remove(&self, index: usize) -> Option<RegisteredInstruction> {
        self.lock().remove(&index)
    }

    /// Ask every registered source for its instruction, in slot order
    pub async fn collect(&self) -> Vec<(usize, UiInstruction)> {
        // sources are awaited without holding the lock
        let entries: Vec<(usize, RegisteredInstruction)> = self
            .lock()
            .iter()
            .map(|(index, entry)| (*index, entry.clone()))
            .collect();

        let mut out = Vec::with_capacity(entries.len());
        for (index, entry) in entries {
            out.push((index, entry.source.get_instruction().await));
        }
        out
    }

    /// Collect all instructions, failing on the first invalid slot
    pub async fn assemble(&self) -> Result<Vec<UiInstruction>> {
        let mut instructions = Vec::new();
        for (index, ix) in self.collect().await {
            if !ix.is_valid {
                warn!(index, reason = ?ix.invalid_reason, "proposal instruction is invalid");
                return Err(SquadsSdkError::InvalidInstruction(index));
            }
            instructions.push(ix);
        }
        debug!(count = instructions.len(), "assembled proposal instructions");
        Ok(instructions)
    }

    /// Assemble and group serialized payloads into transaction chunks.
    ///
    /// Consecutive instructions with the same `chunk_by` share a chunk of at
    /// most that many entries; a `chunk_by` of 0 is treated as 1.
    pub async fn chunked(&self) -> Result<Vec<Vec<String>>> {
        Ok(chunk_instructions(self.assemble().await?))
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<usize, RegisteredInstruction>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InstructionRegistry for ProposalInstructions {
    fn register(&self, index: usize, entry: RegisteredInstruction) {
        if self.lock().insert(index, entry).is_none() {
            debug!(index, "registered new proposal slot");
        }
    }
}

pub fn chunk_instructions(instructions: Vec<UiInstruction>) -> Vec<Vec<String>> {
    let mut chunks: Vec<Vec<String>> = Vec::new();
    let mut current_limit = 0usize;

    for ix in instructions {
        let limit = ix.chunk_by.max(1) as usize;
        match chunks.last_mut() {
            Some(chunk) if limit == current_limit && chunk.len() < limit => {
                chunk.push(ix.serialized_instruction)
            },
            _ => {
                chunks.push(vec![ix.serialized_instruction]);
                current_limit = limit;
            },
        }
    }

    chunks
}
