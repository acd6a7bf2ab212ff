//! In-memory store used by tests and tooling.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::customer::TransportIds;
use crate::domain::facet::{FacetDraft, FacetKind};
use crate::domain::order::PaymentMethod;
use crate::store::errors::StoreResult;
use crate::store::{DialogSlot, DraftReader, DraftWriter, IdentifierSlot, PaymentSlot, SaveSlot};

#[derive(Debug, Default)]
pub struct MemoryStore {
    drafts: RefCell<HashMap<FacetKind, FacetDraft>>,
    dialog: RefCell<Option<FacetKind>>,
    payment: RefCell<Option<PaymentMethod>>,
    save_pending: RefCell<bool>,
    ids: RefCell<TransportIds>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of draft writes performed so far.
    pub fn draft_writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl DraftReader for MemoryStore {
    fn get_draft(&self, kind: FacetKind) -> StoreResult<Option<FacetDraft>> {
        Ok(self.drafts.borrow().get(&kind).cloned())
    }
}

impl DraftWriter for MemoryStore {
    fn put_draft(&self, draft: &FacetDraft) -> StoreResult<()> {
        self.drafts.borrow_mut().insert(draft.kind(), draft.clone());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

impl DialogSlot for MemoryStore {
    fn open_dialog(&self) -> StoreResult<Option<FacetKind>> {
        Ok(*self.dialog.borrow())
    }

    fn set_open_dialog(&self, kind: Option<FacetKind>) -> StoreResult<()> {
        *self.dialog.borrow_mut() = kind;
        Ok(())
    }
}

impl PaymentSlot for MemoryStore {
    fn payment_method(&self) -> StoreResult<Option<PaymentMethod>> {
        Ok(*self.payment.borrow())
    }

    fn set_payment_method(&self, method: PaymentMethod) -> StoreResult<()> {
        *self.payment.borrow_mut() = Some(method);
        Ok(())
    }
}

impl SaveSlot for MemoryStore {
    fn save_pending(&self) -> StoreResult<bool> {
        Ok(*self.save_pending.borrow())
    }

    fn set_save_pending(&self, pending: bool) -> StoreResult<()> {
        *self.save_pending.borrow_mut() = pending;
        Ok(())
    }
}

impl IdentifierSlot for MemoryStore {
    fn transport_ids(&self) -> StoreResult<TransportIds> {
        Ok(self.ids.borrow().clone())
    }

    fn remember_transport_ids(&self, ids: &TransportIds) -> StoreResult<()> {
        *self.ids.borrow_mut() = ids.clone();
        Ok(())
    }
}
